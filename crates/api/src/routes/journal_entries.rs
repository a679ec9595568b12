//! Journal entry routes: drafting, posting, voiding.
//!
//! Posting and voiding report which budgets were recalculated as a result.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use budgetline_core::ledger::{
    CreateJournalEntryInput, EntrySource, JournalEntry, JournalLineInput,
};
use budgetline_db::repositories::PostingResult;
use budgetline_shared::types::{AccountId, BudgetId, JournalEntryId, OrganizationId};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiResult;

/// Creates the journal entry routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/organizations/{org_id}/journal-entries", post(create_entry))
        .route(
            "/organizations/{org_id}/journal-entries/{entry_id}",
            get(get_entry),
        )
        .route(
            "/organizations/{org_id}/journal-entries/{entry_id}/post",
            post(post_entry),
        )
        .route(
            "/organizations/{org_id}/journal-entries/{entry_id}/void",
            post(void_entry),
        )
}

/// Request body for a journal line.
#[derive(Debug, Deserialize)]
pub struct JournalLineRequest {
    /// Account to post to.
    pub account_id: Uuid,
    /// Debit amount.
    #[serde(default)]
    pub debit: Decimal,
    /// Credit amount.
    #[serde(default)]
    pub credit: Decimal,
    /// Optional memo.
    pub memo: Option<String>,
}

/// Request body for creating a draft journal entry.
#[derive(Debug, Deserialize)]
pub struct CreateEntryRequest {
    /// Accounting date (YYYY-MM-DD).
    pub entry_date: NaiveDate,
    /// Optional document reference.
    pub reference: Option<String>,
    /// Description.
    pub description: String,
    /// Originating document type (default: manual).
    pub source: Option<EntrySource>,
    /// Lines.
    pub lines: Vec<JournalLineRequest>,
}

/// Response for a posted or voided entry.
#[derive(Debug, Serialize)]
pub struct PostingResponse {
    /// Entry after the status change.
    pub entry: JournalEntry,
    /// Budgets whose figures were refreshed.
    pub recalculated_budgets: Vec<BudgetId>,
}

impl From<PostingResult> for PostingResponse {
    fn from(result: PostingResult) -> Self {
        Self {
            entry: result.entry,
            recalculated_budgets: result.outcome.recalculated,
        }
    }
}

/// POST `/organizations/{org_id}/journal-entries` - Create a draft entry.
async fn create_entry(
    State(state): State<AppState>,
    Path(org_id): Path<Uuid>,
    Json(payload): Json<CreateEntryRequest>,
) -> ApiResult<impl IntoResponse> {
    let lines = payload
        .lines
        .into_iter()
        .map(|line| JournalLineInput {
            account_id: AccountId::from(line.account_id),
            debit: line.debit,
            credit: line.credit,
            memo: line.memo,
        })
        .collect();

    let entry = state
        .journal()
        .create_entry(CreateJournalEntryInput {
            organization_id: OrganizationId::from(org_id),
            entry_date: payload.entry_date,
            reference: payload.reference,
            description: payload.description,
            source: payload.source.unwrap_or(EntrySource::Manual),
            lines,
        })
        .await?;

    info!(org_id = %org_id, entry_id = %entry.id, "Journal entry drafted");
    Ok((StatusCode::CREATED, Json(entry)))
}

/// GET `/organizations/{org_id}/journal-entries/{entry_id}` - Get an entry with lines.
async fn get_entry(
    State(state): State<AppState>,
    Path((org_id, entry_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<JournalEntry>> {
    let entry = state
        .journal()
        .get_entry(OrganizationId::from(org_id), JournalEntryId::from(entry_id))
        .await?;

    Ok(Json(entry))
}

/// POST `/organizations/{org_id}/journal-entries/{entry_id}/post` - Post an entry.
async fn post_entry(
    State(state): State<AppState>,
    Path((org_id, entry_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<PostingResponse>> {
    let result = state
        .journal()
        .post_entry(OrganizationId::from(org_id), JournalEntryId::from(entry_id))
        .await?;

    info!(
        org_id = %org_id,
        entry_id = %entry_id,
        recalculated = result.outcome.recalculated.len(),
        "Journal entry posted"
    );
    Ok(Json(result.into()))
}

/// POST `/organizations/{org_id}/journal-entries/{entry_id}/void` - Void a posted entry.
async fn void_entry(
    State(state): State<AppState>,
    Path((org_id, entry_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<PostingResponse>> {
    let result = state
        .journal()
        .void_entry(OrganizationId::from(org_id), JournalEntryId::from(entry_id))
        .await?;

    info!(
        org_id = %org_id,
        entry_id = %entry_id,
        recalculated = result.outcome.recalculated.len(),
        "Journal entry voided"
    );
    Ok(Json(result.into()))
}
