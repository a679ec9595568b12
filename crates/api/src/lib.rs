//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes for ledger, budget period, and budget operations
//! - Error-to-response mapping

pub mod error;
pub mod routes;

use axum::Router;
use budgetline_core::events::EventDispatcher;
use budgetline_db::{
    AccountRepository, BudgetEventHandler, BudgetPeriodRepository, BudgetRepository,
    JournalRepository, OrganizationRepository,
};
use budgetline_shared::BudgetConfig;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// Handlers notified when journal entries are posted or voided.
    pub events: EventDispatcher,
}

impl AppState {
    /// Builds state; budgets are recalculated on post/void unless disabled.
    #[must_use]
    pub fn new(db: DatabaseConnection, budget: &BudgetConfig) -> Self {
        let mut events = EventDispatcher::new();
        if budget.recalculate_on_post {
            let budgets = BudgetRepository::new(db.clone());
            events = events.with_handler(Arc::new(BudgetEventHandler::new(budgets)));
        }

        Self {
            db: Arc::new(db),
            events,
        }
    }

    pub(crate) fn organizations(&self) -> OrganizationRepository {
        OrganizationRepository::new((*self.db).clone())
    }

    pub(crate) fn accounts(&self) -> AccountRepository {
        AccountRepository::new((*self.db).clone())
    }

    pub(crate) fn journal(&self) -> JournalRepository {
        JournalRepository::new((*self.db).clone(), self.events.clone())
    }

    pub(crate) fn periods(&self) -> BudgetPeriodRepository {
        BudgetPeriodRepository::new((*self.db).clone())
    }

    pub(crate) fn budgets(&self) -> BudgetRepository {
        BudgetRepository::new((*self.db).clone())
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
