//! Ledger account routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use budgetline_core::ledger::{Account, AccountType, CreateAccountInput};
use budgetline_shared::types::{AccountId, OrganizationId};
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiResult;

/// Creates the account routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/organizations/{org_id}/accounts",
            get(list_accounts).post(create_account),
        )
        .route("/organizations/{org_id}/accounts/{account_id}", get(get_account))
        .route(
            "/organizations/{org_id}/accounts/{account_id}/active",
            post(set_active),
        )
}

/// Request body for creating an account.
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    /// Account code (unique within the organization).
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type: asset, liability, equity, revenue, expense.
    #[serde(rename = "type")]
    pub account_type: AccountType,
}

/// Request body for activating or deactivating an account.
#[derive(Debug, Deserialize)]
pub struct SetActiveRequest {
    /// New active flag.
    pub is_active: bool,
}

/// POST `/organizations/{org_id}/accounts` - Create a ledger account.
async fn create_account(
    State(state): State<AppState>,
    Path(org_id): Path<Uuid>,
    Json(payload): Json<CreateAccountRequest>,
) -> ApiResult<impl IntoResponse> {
    let account = state
        .accounts()
        .create_account(CreateAccountInput {
            organization_id: OrganizationId::from(org_id),
            code: payload.code,
            name: payload.name,
            account_type: payload.account_type,
        })
        .await?;

    info!(org_id = %org_id, account_id = %account.id, code = %account.code, "Account created");
    Ok((StatusCode::CREATED, Json(account)))
}

/// GET `/organizations/{org_id}/accounts` - List accounts ordered by code.
async fn list_accounts(
    State(state): State<AppState>,
    Path(org_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let accounts = state
        .accounts()
        .list_accounts(OrganizationId::from(org_id))
        .await?;

    Ok(Json(json!({ "accounts": accounts })))
}

/// GET `/organizations/{org_id}/accounts/{account_id}` - Get an account.
async fn get_account(
    State(state): State<AppState>,
    Path((org_id, account_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<Account>> {
    let account = state
        .accounts()
        .get_account(OrganizationId::from(org_id), AccountId::from(account_id))
        .await?;

    Ok(Json(account))
}

/// POST `/organizations/{org_id}/accounts/{account_id}/active` - Toggle posting.
async fn set_active(
    State(state): State<AppState>,
    Path((org_id, account_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<SetActiveRequest>,
) -> ApiResult<Json<Account>> {
    let account = state
        .accounts()
        .set_active(
            OrganizationId::from(org_id),
            AccountId::from(account_id),
            payload.is_active,
        )
        .await?;

    info!(account_id = %account_id, is_active = payload.is_active, "Account status changed");
    Ok(Json(account))
}
