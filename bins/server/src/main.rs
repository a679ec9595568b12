//! Budgetline API Server
//!
//! Main entry point for the budget-vs-actual service.

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use budgetline_api::{AppState, create_router};
use budgetline_db::connect_with;
use budgetline_db::migration::{Migrator, MigratorTrait};
use budgetline_shared::{AppConfig, LoggingConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    init_tracing(&config.logging);

    let db = connect_with(&config.database).await?;
    info!(max_connections = config.database.max_connections, "Connected to database");

    if config.database.run_migrations {
        Migrator::up(&db, None).await?;
        info!("Migrations applied");
    }

    let state = AppState::new(db, &config.budget);
    info!(
        recalculate_on_post = config.budget.recalculate_on_post,
        handlers = state.events.len(),
        "Ledger event handlers registered"
    );

    let app = create_router(state);

    let addr = config.server.bind_address();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter));
    let registry = tracing_subscriber::registry().with(filter);

    if logging.json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
