//! Endpoint for the monthly breakdown report.

use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::{
    AppState, Error,
    transaction::{TransactionFilter, get_transactions},
};

use super::{
    aggregation::{MonthlySummary, monthly_breakdown},
    range::ReportQuery,
};

#[derive(Debug, Serialize)]
struct MonthlyResponse {
    monthly_breakdown: Vec<MonthlySummary>,
}

/// Handle requests for the monthly breakdown: per-month income, expenses,
/// savings, and savings rate over an optional date range.
pub async fn get_monthly_endpoint(
    State(state): State<AppState>,
    Query(params): Query<ReportQuery>,
) -> Result<Response, Error> {
    let filter: TransactionFilter = params.try_into()?;

    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    let transactions = get_transactions(&filter, &connection)?;

    Ok(Json(MonthlyResponse {
        monthly_breakdown: monthly_breakdown(&transactions),
    })
    .into_response())
}

#[cfg(test)]
mod monthly_endpoint_tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::{endpoints, test_utils::new_test_server};

    #[tokio::test]
    async fn monthly_breakdown_skips_empty_months() {
        let server = new_test_server();
        for body in [
            json!({"date": "2024-01-01", "category": "Salary", "amount": 1000.0, "type": "income"}),
            json!({"date": "2024-03-10", "category": "Groceries", "amount": 100.0, "type": "expense"}),
        ] {
            server
                .post(endpoints::TRANSACTIONS)
                .json(&body)
                .await
                .assert_status(StatusCode::CREATED);
        }

        let response = server.get(endpoints::MONTHLY).await;

        response.assert_status_ok();
        let body = response.json::<serde_json::Value>();
        let months = body["monthly_breakdown"].as_array().unwrap();
        assert_eq!(months.len(), 2);
        assert_eq!(months[0]["month"], "2024-01");
        assert_eq!(months[0]["income"], 1000.0);
        assert_eq!(months[0]["savings_rate"], 100.0);
        assert_eq!(months[1]["month"], "2024-03");
        assert_eq!(months[1]["expenses"], 100.0);
        assert_eq!(months[1]["savings_rate"], 0.0);
    }

    #[tokio::test]
    async fn monthly_breakdown_is_empty_without_transactions() {
        let server = new_test_server();

        let response = server.get(endpoints::MONTHLY).await;

        response.assert_status_ok();
        let body = response.json::<serde_json::Value>();
        assert_eq!(body["monthly_breakdown"], json!([]));
    }
}
