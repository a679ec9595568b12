//! Budget period routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use budgetline_core::budget::{BudgetPeriod, BudgetPeriodStatus, CreateBudgetPeriodInput};
use budgetline_shared::types::{BudgetPeriodId, OrganizationId};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiResult;

/// Creates the budget period routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/organizations/{org_id}/budget-periods",
            get(list_periods).post(create_period),
        )
        .route(
            "/organizations/{org_id}/budget-periods/{period_id}",
            get(get_period),
        )
        .route(
            "/organizations/{org_id}/budget-periods/{period_id}/status",
            post(transition_status),
        )
}

/// Request body for creating a budget period.
#[derive(Debug, Deserialize)]
pub struct CreatePeriodRequest {
    /// Period name.
    pub name: String,
    /// First day (inclusive).
    pub start_date: NaiveDate,
    /// Last day (inclusive).
    pub end_date: NaiveDate,
}

/// Request body for a status transition.
#[derive(Debug, Deserialize)]
pub struct TransitionRequest {
    /// Target status: approved, active, closed.
    pub status: BudgetPeriodStatus,
}

/// POST `/organizations/{org_id}/budget-periods` - Create a draft period.
async fn create_period(
    State(state): State<AppState>,
    Path(org_id): Path<Uuid>,
    Json(payload): Json<CreatePeriodRequest>,
) -> ApiResult<impl IntoResponse> {
    let period = state
        .periods()
        .create_period(CreateBudgetPeriodInput {
            organization_id: OrganizationId::from(org_id),
            name: payload.name,
            start_date: payload.start_date,
            end_date: payload.end_date,
        })
        .await?;

    info!(org_id = %org_id, period_id = %period.id, "Budget period created");
    Ok((StatusCode::CREATED, Json(period)))
}

/// GET `/organizations/{org_id}/budget-periods` - List periods, latest first.
async fn list_periods(
    State(state): State<AppState>,
    Path(org_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let periods = state
        .periods()
        .list_periods(OrganizationId::from(org_id))
        .await?;

    Ok(Json(json!({ "periods": periods })))
}

/// GET `/organizations/{org_id}/budget-periods/{period_id}` - Get a period.
async fn get_period(
    State(state): State<AppState>,
    Path((org_id, period_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<BudgetPeriod>> {
    let period = state
        .periods()
        .get_period(OrganizationId::from(org_id), BudgetPeriodId::from(period_id))
        .await?;

    Ok(Json(period))
}

/// POST `/organizations/{org_id}/budget-periods/{period_id}/status` - Move along the lifecycle.
async fn transition_status(
    State(state): State<AppState>,
    Path((org_id, period_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<TransitionRequest>,
) -> ApiResult<Json<BudgetPeriod>> {
    let period = state
        .periods()
        .transition_status(
            OrganizationId::from(org_id),
            BudgetPeriodId::from(period_id),
            payload.status,
        )
        .await?;

    Ok(Json(period))
}
