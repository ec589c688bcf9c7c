//! Endpoint for creating a single transaction from a JSON body.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::{AppState, Error, category::CategoryName};

use super::core::{NewTransaction, Transaction, create_transaction, parse_date};

/// The JSON body accepted when creating a transaction.
///
/// Dates and types come in as raw strings so that a malformed value produces
/// a descriptive validation error instead of a generic deserialization
/// failure.
#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    /// The date of the transaction as `YYYY-MM-DD`.
    pub date: String,
    /// The category of the transaction.
    pub category: String,
    /// The amount of money spent or earned, sign free.
    pub amount: f64,
    /// "income" or "expense".
    #[serde(rename = "type")]
    pub transaction_type: String,
    /// An optional description.
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Serialize)]
struct CreateTransactionResponse {
    message: &'static str,
    transaction: Transaction,
}

/// Handle transaction creation requests.
///
/// Responds with 201 and the created transaction on success, or 400 with a
/// descriptive error when a field is missing or malformed.
pub async fn create_transaction_endpoint(
    State(state): State<AppState>,
    payload: Result<Json<CreateTransactionRequest>, JsonRejection>,
) -> Result<Response, Error> {
    let Json(request) =
        payload.map_err(|rejection| Error::InvalidRequestBody(rejection.body_text()))?;

    let new_transaction = NewTransaction::new(
        parse_date(&request.date)?,
        CategoryName::new(&request.category)?,
        request.amount,
        request.transaction_type.parse()?,
    )
    .description(&request.description);

    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    let transaction = create_transaction(new_transaction, &connection)?;

    Ok((
        StatusCode::CREATED,
        Json(CreateTransactionResponse {
            message: "Transaction created successfully",
            transaction,
        }),
    )
        .into_response())
}
