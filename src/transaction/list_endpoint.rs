//! Endpoint for listing transactions with optional filters.

use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::{AppState, Error, category::CategoryName};

use super::{
    core::Transaction,
    query::{TransactionFilter, get_transactions, parse_optional_date},
};

/// The accepted query parameters, all optional.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionListQuery {
    /// Only include transactions on or after this date (`YYYY-MM-DD`).
    pub start_date: Option<String>,
    /// Only include transactions on or before this date (`YYYY-MM-DD`).
    pub end_date: Option<String>,
    /// Only include transactions with this category.
    pub category: Option<String>,
    /// Only include transactions of this type ("income" or "expense").
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
}

impl TryFrom<TransactionListQuery> for TransactionFilter {
    type Error = Error;

    fn try_from(params: TransactionListQuery) -> Result<Self, Self::Error> {
        TransactionFilter::new(
            parse_optional_date(params.start_date.as_deref())?,
            parse_optional_date(params.end_date.as_deref())?,
            params
                .category
                .as_deref()
                .map(CategoryName::new)
                .transpose()?,
            params
                .transaction_type
                .as_deref()
                .map(str::parse)
                .transpose()?,
        )
    }
}

#[derive(Debug, Serialize)]
struct TransactionListResponse {
    count: usize,
    transactions: Vec<Transaction>,
}

/// Handle requests for the filtered transaction list.
///
/// Returns an empty list (not an error) when nothing matches.
pub async fn list_transactions_endpoint(
    State(state): State<AppState>,
    Query(params): Query<TransactionListQuery>,
) -> Result<Response, Error> {
    let filter: TransactionFilter = params.try_into()?;

    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    let transactions = get_transactions(&filter, &connection)?;

    Ok(Json(TransactionListResponse {
        count: transactions.len(),
        transactions,
    })
    .into_response())
}
