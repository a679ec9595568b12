//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod accounts;
pub mod budget_periods;
pub mod budgets;
pub mod health;
pub mod journal_entries;
pub mod organizations;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(organizations::routes())
        .merge(accounts::routes())
        .merge(journal_entries::routes())
        .merge(budget_periods::routes())
        .merge(budgets::routes())
}
