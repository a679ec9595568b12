//! Budget management routes.
//!
//! Endpoints for budgets, allocations, spend recalculation, monitoring
//! snapshots, and the budget-vs-actual report.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use budgetline_core::budget::{
    Allocation, Budget, BudgetService, BudgetTotals, BudgetType, BudgetVsActualReport,
    CreateAllocationInput, CreateBudgetInput, MonitoringSnapshot,
};
use budgetline_shared::AppError;
use budgetline_shared::types::{
    AccountId, BudgetId, BudgetPeriodId, OrganizationId, PageRequest, PageResponse,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiResult;

/// Creates the budget routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/organizations/{org_id}/budgets", post(create_budget))
        .route("/organizations/{org_id}/budgets/{budget_id}", get(get_budget))
        .route(
            "/organizations/{org_id}/budgets/{budget_id}/allocations",
            post(create_allocation),
        )
        .route(
            "/organizations/{org_id}/budgets/{budget_id}/recalculate",
            post(recalculate),
        )
        .route(
            "/organizations/{org_id}/budgets/{budget_id}/vs-actual",
            get(budget_vs_actual),
        )
        .route(
            "/organizations/{org_id}/budgets/{budget_id}/snapshots",
            get(list_snapshots),
        )
        .route(
            "/organizations/{org_id}/budgets/{budget_id}/snapshots/latest",
            get(latest_snapshot),
        )
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating a budget.
#[derive(Debug, Deserialize)]
pub struct CreateBudgetRequest {
    /// Period the budget belongs to.
    pub period_id: Uuid,
    /// Budget name (unique within the period).
    pub name: String,
    /// Budget type: operational, capital, cash_flow (default: operational).
    pub budget_type: Option<BudgetType>,
    /// Currency code (default: organization base currency).
    pub currency: Option<String>,
    /// Headline amount; allocations may not exceed it.
    pub total_amount: Decimal,
}

/// Request body for adding an allocation.
#[derive(Debug, Deserialize)]
pub struct CreateAllocationRequest {
    /// Account the allocation tracks.
    pub account_id: Uuid,
    /// Amount allocated.
    pub allocated_amount: Decimal,
}

/// Budget with allocations and live totals.
#[derive(Debug, Serialize)]
pub struct BudgetDetailResponse {
    /// Budget record.
    #[serde(flatten)]
    pub budget: Budget,
    /// Allocations in creation order.
    pub allocations: Vec<Allocation>,
    /// Totals across allocations.
    pub totals: BudgetTotals,
}

/// Result of an explicit recalculation.
#[derive(Debug, Serialize)]
pub struct RecalculateResponse {
    /// Allocations with refreshed figures.
    pub allocations: Vec<Allocation>,
    /// Snapshot appended by this run.
    pub snapshot: MonitoringSnapshot,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/organizations/{org_id}/budgets` - Create a budget.
async fn create_budget(
    State(state): State<AppState>,
    Path(org_id): Path<Uuid>,
    Json(payload): Json<CreateBudgetRequest>,
) -> ApiResult<impl IntoResponse> {
    let organization_id = OrganizationId::from(org_id);

    let currency = match payload.currency {
        Some(currency) => currency,
        None => state.organizations().get(organization_id).await?.base_currency,
    };

    let budget = state
        .budgets()
        .create_budget(CreateBudgetInput {
            organization_id,
            period_id: BudgetPeriodId::from(payload.period_id),
            name: payload.name,
            budget_type: payload.budget_type.unwrap_or(BudgetType::Operational),
            currency,
            total_amount: payload.total_amount,
        })
        .await?;

    info!(org_id = %org_id, budget_id = %budget.id, "Budget created via API");
    Ok((StatusCode::CREATED, Json(budget)))
}

/// GET `/organizations/{org_id}/budgets/{budget_id}` - Budget with allocations.
async fn get_budget(
    State(state): State<AppState>,
    Path((org_id, budget_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<BudgetDetailResponse>> {
    let found = state
        .budgets()
        .get_budget_with_allocations(OrganizationId::from(org_id), BudgetId::from(budget_id))
        .await?;

    let totals = BudgetService::summarize(&found.allocations);
    Ok(Json(BudgetDetailResponse {
        budget: found.budget,
        allocations: found.allocations,
        totals,
    }))
}

/// POST `/organizations/{org_id}/budgets/{budget_id}/allocations` - Add an allocation.
async fn create_allocation(
    State(state): State<AppState>,
    Path((org_id, budget_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<CreateAllocationRequest>,
) -> ApiResult<impl IntoResponse> {
    let allocation = state
        .budgets()
        .create_allocation(
            OrganizationId::from(org_id),
            CreateAllocationInput {
                budget_id: BudgetId::from(budget_id),
                account_id: AccountId::from(payload.account_id),
                allocated_amount: payload.allocated_amount,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(allocation)))
}

/// POST `/organizations/{org_id}/budgets/{budget_id}/recalculate` - Refresh spend from the ledger.
async fn recalculate(
    State(state): State<AppState>,
    Path((org_id, budget_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<RecalculateResponse>> {
    let reconciliation = state
        .budgets()
        .recalculate_spending(OrganizationId::from(org_id), BudgetId::from(budget_id))
        .await?;

    Ok(Json(RecalculateResponse {
        allocations: reconciliation.allocations,
        snapshot: reconciliation.snapshot,
    }))
}

/// GET `/organizations/{org_id}/budgets/{budget_id}/vs-actual` - Budget vs actual report.
async fn budget_vs_actual(
    State(state): State<AppState>,
    Path((org_id, budget_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<BudgetVsActualReport>> {
    let report = state
        .budgets()
        .budget_vs_actual(OrganizationId::from(org_id), BudgetId::from(budget_id))
        .await?;

    Ok(Json(report))
}

/// GET `/organizations/{org_id}/budgets/{budget_id}/snapshots` - Snapshot history, newest first.
async fn list_snapshots(
    State(state): State<AppState>,
    Path((org_id, budget_id)): Path<(Uuid, Uuid)>,
    Query(page): Query<PageRequest>,
) -> ApiResult<Json<PageResponse<MonitoringSnapshot>>> {
    let snapshots = state
        .budgets()
        .list_snapshots(OrganizationId::from(org_id), BudgetId::from(budget_id), &page)
        .await?;

    Ok(Json(snapshots))
}

/// GET `/organizations/{org_id}/budgets/{budget_id}/snapshots/latest` - Most recent snapshot.
async fn latest_snapshot(
    State(state): State<AppState>,
    Path((org_id, budget_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<MonitoringSnapshot>> {
    let snapshot = state
        .budgets()
        .latest_snapshot(OrganizationId::from(org_id), BudgetId::from(budget_id))
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("No snapshot recorded for budget {budget_id}"))
        })?;

    Ok(Json(snapshot))
}
