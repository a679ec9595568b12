//! Organization routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use budgetline_db::entities::organizations;
use budgetline_shared::types::OrganizationId;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiResult;

/// Creates the organizations router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/organizations", post(create_organization))
        .route("/organizations/{org_id}", get(get_organization))
}

/// Request body for creating an organization.
#[derive(Debug, Deserialize)]
pub struct CreateOrganizationRequest {
    /// Display name.
    pub name: String,
    /// ISO 4217 base currency (default: USD).
    pub base_currency: Option<String>,
}

/// Response for an organization.
#[derive(Debug, Serialize)]
pub struct OrganizationResponse {
    /// Organization ID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Base currency.
    pub base_currency: String,
    /// Creation timestamp.
    pub created_at: String,
}

impl From<organizations::Model> for OrganizationResponse {
    fn from(model: organizations::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            base_currency: model.base_currency,
            created_at: model.created_at.to_rfc3339(),
        }
    }
}

/// POST /organizations - Create an organization.
async fn create_organization(
    State(state): State<AppState>,
    Json(payload): Json<CreateOrganizationRequest>,
) -> ApiResult<impl IntoResponse> {
    let currency = payload.base_currency.as_deref().unwrap_or("USD");
    let org = state.organizations().create(&payload.name, currency).await?;

    info!(org_id = %org.id, "Organization created");
    Ok((StatusCode::CREATED, Json(OrganizationResponse::from(org))))
}

/// GET /organizations/{org_id} - Get an organization.
async fn get_organization(
    State(state): State<AppState>,
    Path(org_id): Path<Uuid>,
) -> ApiResult<Json<OrganizationResponse>> {
    let org = state.organizations().get(OrganizationId::from(org_id)).await?;
    Ok(Json(org.into()))
}
