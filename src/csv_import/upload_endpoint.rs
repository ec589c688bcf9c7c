//! Endpoint for uploading transactions as a CSV file.

use axum::{
    Json,
    extract::{Multipart, State, multipart::Field},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde_json::json;

use crate::{AppState, Error, transaction::NewTransaction};

use super::csv::parse_csv;

/// Handle CSV upload requests.
///
/// Reads the first CSV file field from the multipart form, validates every
/// row, and inserts all rows inside a single database transaction. If any row
/// fails validation the whole upload fails and nothing is persisted.
///
/// Responds with 201 and the number of inserted rows on success.
pub async fn upload_transactions_endpoint(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, Error> {
    let field = multipart
        .next_field()
        .await
        .map_err(|error| Error::Multipart(error.to_string()))?
        .ok_or_else(|| Error::Multipart("no file provided".to_owned()))?;

    let csv_data = read_csv_field(field).await?;
    let new_transactions = parse_csv(&csv_data)?;

    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    let sql_transaction = connection.unchecked_transaction()?;
    let transactions_added = insert_transaction_list(new_transactions, &sql_transaction)?;
    sql_transaction.commit()?;

    tracing::info!("imported {} transactions from CSV", transactions_added);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "CSV uploaded successfully",
            "transactions_added": transactions_added,
        })),
    )
        .into_response())
}

async fn read_csv_field(field: Field<'_>) -> Result<String, Error> {
    let is_csv_content_type = field.content_type() == Some("text/csv");
    let is_csv_file_name = field
        .file_name()
        .is_some_and(|file_name| file_name.to_lowercase().ends_with(".csv"));

    if !is_csv_content_type && !is_csv_file_name {
        return Err(Error::NotCsv);
    }

    let data = field.text().await.map_err(|error| {
        tracing::error!("Could not read data from multipart form field: {error}");
        Error::Multipart("could not read data from multipart form field".to_owned())
    })?;

    tracing::debug!("Received CSV upload of {} bytes", data.len());

    Ok(data)
}

/// Insert many transactions, reusing one prepared statement.
///
/// **Note**: Pass in a transaction for `connection` to get all-or-nothing
/// behaviour.
fn insert_transaction_list(
    new_transactions: Vec<NewTransaction>,
    connection: &Connection,
) -> Result<usize, Error> {
    let mut statement = connection.prepare(
        "INSERT INTO \"transaction\" (date, category, amount, transaction_type, description, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )?;

    let created_at = time::OffsetDateTime::now_utc();
    let mut inserted = 0;

    for new_transaction in new_transactions {
        statement.execute((
            new_transaction.date,
            new_transaction.category.as_ref(),
            new_transaction.signed_amount(),
            new_transaction.transaction_type,
            &new_transaction.description,
            created_at,
        ))?;

        inserted += 1;
    }

    Ok(inserted)
}
