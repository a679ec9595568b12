//! Router tests against an in-memory SQLite database.

use std::str::FromStr;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
};
use budgetline_api::{AppState, create_router};
use budgetline_db::migration::{Migrator, MigratorTrait};
use budgetline_shared::BudgetConfig;
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ConnectOptions, Database};
use serde_json::{Value, json};
use tower::ServiceExt;

async fn app(recalculate_on_post: bool) -> Router {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).sqlx_logging(false);
    let db = Database::connect(options).await.unwrap();
    Migrator::up(&db, None).await.unwrap();

    create_router(AppState::new(db, &BudgetConfig { recalculate_on_post }))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(format!("/api/v1{uri}"));
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn amount(value: &Value) -> Decimal {
    Decimal::from_str(value.as_str().unwrap()).unwrap()
}

fn id(value: &Value) -> String {
    value["id"].as_str().unwrap().to_string()
}

/// Organization, expense + cash accounts, an active Q1 period, and a budget
/// allocating 400 to the expense account.
struct Seeded {
    org: String,
    expense: String,
    cash: String,
    period: String,
    budget: String,
}

async fn seed(app: &Router) -> Seeded {
    let (status, org) = send(app, Method::POST, "/organizations", Some(json!({ "name": "Acme" }))).await;
    assert_eq!(status, StatusCode::CREATED);
    let org = id(&org);

    let (_, expense) = send(
        app,
        Method::POST,
        &format!("/organizations/{org}/accounts"),
        Some(json!({ "code": "6100", "name": "Travel", "type": "expense" })),
    )
    .await;
    let (_, cash) = send(
        app,
        Method::POST,
        &format!("/organizations/{org}/accounts"),
        Some(json!({ "code": "1000", "name": "Cash", "type": "asset" })),
    )
    .await;

    let (status, period) = send(
        app,
        Method::POST,
        &format!("/organizations/{org}/budget-periods"),
        Some(json!({ "name": "FY2026 Q1", "start_date": "2026-01-01", "end_date": "2026-03-31" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(period["status"], "draft");
    let period = id(&period);

    for next in ["approved", "active"] {
        let (status, _) = send(
            app,
            Method::POST,
            &format!("/organizations/{org}/budget-periods/{period}/status"),
            Some(json!({ "status": next })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, budget) = send(
        app,
        Method::POST,
        &format!("/organizations/{org}/budgets"),
        Some(json!({ "period_id": period, "name": "Operations", "total_amount": "1000" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(budget["currency"], "USD");
    let budget = id(&budget);

    let (status, _) = send(
        app,
        Method::POST,
        &format!("/organizations/{org}/budgets/{budget}/allocations"),
        Some(json!({ "account_id": id(&expense), "allocated_amount": "400" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    Seeded {
        org,
        expense: id(&expense),
        cash: id(&cash),
        period,
        budget,
    }
}

async fn post_spend(app: &Router, seeded: &Seeded, date: &str, value: &str) -> (StatusCode, Value) {
    let (status, entry) = send(
        app,
        Method::POST,
        &format!("/organizations/{}/journal-entries", seeded.org),
        Some(json!({
            "entry_date": date,
            "description": "Flights",
            "lines": [
                { "account_id": seeded.expense, "debit": value },
                { "account_id": seeded.cash, "credit": value }
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(entry["status"], "draft");

    send(
        app,
        Method::POST,
        &format!("/organizations/{}/journal-entries/{}/post", seeded.org, id(&entry)),
        None,
    )
    .await
}

#[tokio::test]
async fn test_health() {
    let app = app(true).await;
    let (status, body) = send(&app, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "up");
}

#[tokio::test]
async fn test_posting_recalculates_budget() {
    let app = app(true).await;
    let seeded = seed(&app).await;

    let (status, posted) = post_spend(&app, &seeded, "2026-02-10", "150.5").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(posted["entry"]["status"], "posted");
    assert_eq!(posted["recalculated_budgets"], json!([seeded.budget]));

    let (status, budget) = send(
        &app,
        Method::GET,
        &format!("/organizations/{}/budgets/{}", seeded.org, seeded.budget),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(budget["name"], "Operations");
    assert_eq!(amount(&budget["allocations"][0]["spent_amount"]), dec!(150.5));
    assert_eq!(amount(&budget["allocations"][0]["remaining_amount"]), dec!(249.5));
    assert_eq!(amount(&budget["totals"]["spent"]), dec!(150.5));

    let (status, latest) = send(
        &app,
        Method::GET,
        &format!("/organizations/{}/budgets/{}/snapshots/latest", seeded.org, seeded.budget),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(amount(&latest["total_spent"]), dec!(150.5));
}

#[tokio::test]
async fn test_posting_without_recalculation() {
    let app = app(false).await;
    let seeded = seed(&app).await;

    let (status, posted) = post_spend(&app, &seeded, "2026-02-10", "150.5").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(posted["recalculated_budgets"], json!([]));

    let (status, _) = send(
        &app,
        Method::GET,
        &format!("/organizations/{}/budgets/{}/snapshots/latest", seeded.org, seeded.budget),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, recalculated) = send(
        &app,
        Method::POST,
        &format!("/organizations/{}/budgets/{}/recalculate", seeded.org, seeded.budget),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(amount(&recalculated["allocations"][0]["spent_amount"]), dec!(150.5));
    assert_eq!(recalculated["snapshot"]["overspent_allocations"], 0);
}

#[tokio::test]
async fn test_vs_actual_and_snapshot_history() {
    let app = app(true).await;
    let seeded = seed(&app).await;

    post_spend(&app, &seeded, "2026-01-15", "100").await;
    post_spend(&app, &seeded, "2026-03-01", "500").await;

    let (status, report) = send(
        &app,
        Method::GET,
        &format!("/organizations/{}/budgets/{}/vs-actual", seeded.org, seeded.budget),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["period_name"], "FY2026 Q1");
    assert_eq!(report["lines"][0]["account_code"], "6100");
    assert_eq!(report["lines"][0]["variance"]["status"], "unfavorable");
    assert_eq!(amount(&report["lines"][0]["remaining"]), dec!(-200));

    let (status, page) = send(
        &app,
        Method::GET,
        &format!(
            "/organizations/{}/budgets/{}/snapshots?page=1&per_page=1",
            seeded.org, seeded.budget
        ),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["meta"]["total"], 2);
    assert_eq!(page["meta"]["total_pages"], 2);
    assert_eq!(amount(&page["data"][0]["total_spent"]), dec!(600));
}

#[tokio::test]
async fn test_unbalanced_entry_rejected() {
    let app = app(true).await;
    let seeded = seed(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/organizations/{}/journal-entries", seeded.org),
        Some(json!({
            "entry_date": "2026-02-10",
            "description": "Lopsided",
            "lines": [
                { "account_id": seeded.expense, "debit": "100" },
                { "account_id": seeded.cash, "credit": "90" }
            ]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_invalid_period_transition() {
    let app = app(true).await;
    let seeded = seed(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/organizations/{}/budget-periods/{}/status", seeded.org, seeded.period),
        Some(json!({ "status": "draft" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "BUSINESS_RULE_VIOLATION");
}

#[tokio::test]
async fn test_duplicate_allocation_conflicts() {
    let app = app(true).await;
    let seeded = seed(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/organizations/{}/budgets/{}/allocations", seeded.org, seeded.budget),
        Some(json!({ "account_id": seeded.expense, "allocated_amount": "50" })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "CONFLICT");
}

#[tokio::test]
async fn test_unknown_budget_not_found() {
    let app = app(true).await;
    let seeded = seed(&app).await;

    let (status, body) = send(
        &app,
        Method::GET,
        &format!(
            "/organizations/{}/budgets/{}",
            seeded.org,
            uuid::Uuid::now_v7()
        ),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_amount_beyond_four_decimals_rejected() {
    let app = app(true).await;
    let seeded = seed(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/organizations/{}/journal-entries", seeded.org),
        Some(json!({
            "entry_date": "2026-02-10",
            "description": "Fractional",
            "lines": [
                { "account_id": seeded.expense, "debit": "10.00005" },
                { "account_id": seeded.cash, "credit": "10.00005" }
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/organizations/{}/budgets/{}/allocations", seeded.org, seeded.budget),
        Some(json!({ "account_id": seeded.cash, "allocated_amount": "1.123456" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
