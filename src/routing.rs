//! Application router configuration.

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;

use crate::{
    AppState,
    analysis::{
        get_analysis_endpoint, get_comparison_endpoint, get_monthly_endpoint, get_stats_endpoint,
    },
    budget_goal::{list_budget_goals_endpoint, set_budget_goal_endpoint},
    csv_import::upload_transactions_endpoint,
    endpoints,
    transaction::{create_transaction_endpoint, list_transactions_endpoint},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_service_info))
        .route(endpoints::UPLOAD, post(upload_transactions_endpoint))
        .route(
            endpoints::TRANSACTIONS,
            get(list_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(endpoints::ANALYSIS, get(get_analysis_endpoint))
        .route(endpoints::MONTHLY, get(get_monthly_endpoint))
        .route(
            endpoints::BUDGET_GOALS,
            get(list_budget_goals_endpoint).post(set_budget_goal_endpoint),
        )
        .route(endpoints::COMPARISON, get(get_comparison_endpoint))
        .route(endpoints::STATS, get(get_stats_endpoint))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// Describe the API: name, version, and available endpoints.
async fn get_service_info() -> Response {
    Json(json!({
        "message": "Budget Analytics API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "POST /api/upload": "Upload a CSV file of transactions",
            "GET /api/transactions": "List transactions with optional filters",
            "POST /api/transactions": "Create a transaction",
            "GET /api/analysis": "Get the spending analysis",
            "GET /api/monthly": "Get the monthly breakdown",
            "POST /api/budget-goals": "Set a budget goal",
            "GET /api/budget-goals": "List budget goals",
            "GET /api/comparison": "Compare two time periods",
            "GET /api/stats": "Get overall statistics",
        },
    }))
    .into_response()
}

/// The JSON 404 response for unknown routes.
async fn get_404_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "the requested resource could not be found" })),
    )
        .into_response()
}
