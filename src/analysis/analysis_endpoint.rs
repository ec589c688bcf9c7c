//! Endpoint for the spending analysis report.

use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use time::Date;

use crate::{
    AppState, Error,
    transaction::{Transaction, TransactionFilter, get_transactions},
};

use super::{
    aggregation::{SummaryStats, category_spending, summarize},
    range::ReportQuery,
};

#[derive(Debug, Serialize)]
struct AnalysisResponse {
    summary: SummaryStats,
    category_spending: BTreeMap<String, f64>,
    /// The dates of the earliest and latest transactions considered, if any.
    date_range: Option<DataDateRange>,
}

#[derive(Debug, Serialize)]
struct DataDateRange {
    start: Date,
    end: Date,
}

fn data_date_range(transactions: &[Transaction]) -> Option<DataDateRange> {
    // Transactions arrive sorted by date ascending.
    match (transactions.first(), transactions.last()) {
        (Some(first), Some(last)) => Some(DataDateRange {
            start: first.date,
            end: last.date,
        }),
        _ => None,
    }
}

/// Handle requests for the spending analysis report: summary statistics plus
/// per-category expense totals over an optional date range.
///
/// A range with no transactions yields zeroed summary stats and an empty
/// category map, not an error.
pub async fn get_analysis_endpoint(
    State(state): State<AppState>,
    Query(params): Query<ReportQuery>,
) -> Result<Response, Error> {
    let filter: TransactionFilter = params.try_into()?;

    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    let transactions = get_transactions(&filter, &connection)?;

    Ok(Json(AnalysisResponse {
        summary: summarize(&transactions),
        category_spending: category_spending(&transactions),
        date_range: data_date_range(&transactions),
    })
    .into_response())
}
