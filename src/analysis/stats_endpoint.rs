//! Endpoint for overall statistics across all recorded transactions.

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::{
    AppState, Error,
    transaction::{TransactionFilter, count_categories, count_transactions, get_transactions},
};

use super::aggregation::{SummaryStats, summarize};

#[derive(Debug, Serialize)]
struct StatsResponse {
    total_transactions: u32,
    unique_categories: u32,
    #[serde(flatten)]
    summary: SummaryStats,
}

/// Handle requests for the overall statistics: unfiltered summary stats plus
/// transaction and category counts.
pub async fn get_stats_endpoint(State(state): State<AppState>) -> Result<Response, Error> {
    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    let transactions = get_transactions(&TransactionFilter::default(), &connection)?;

    Ok(Json(StatsResponse {
        total_transactions: count_transactions(&connection)?,
        unique_categories: count_categories(&connection)?,
        summary: summarize(&transactions),
    })
    .into_response())
}
