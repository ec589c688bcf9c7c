//! Budget Analytics is a JSON API for recording financial transactions and
//! budget goals, and for computing spreadsheet-style reports over them:
//! spending by category, monthly income/expense breakdowns, and
//! period-over-period comparisons.
//!
//! Transactions enter the system either one at a time through the JSON API or
//! in bulk through CSV uploads. All data lives in a single SQLite database.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use time::Date;
use tokio::signal;

mod analysis;
mod app_state;
mod budget_goal;
mod category;
mod csv_import;
mod db;
mod endpoints;
mod routing;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use category::CategoryName;
pub use db::initialize as initialize_db;
pub use routing::build_router;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A date string could not be parsed as a calendar date.
    #[error("could not parse \"{value}\" as a date (expected YYYY-MM-DD): {reason}")]
    InvalidDate {
        /// The string that failed to parse.
        value: String,
        /// The parse error, as text.
        reason: String,
    },

    /// A date range had its end before its start.
    #[error("invalid date range: end date {end} is before start date {start}")]
    InvalidDateRange {
        /// The start of the range.
        start: Date,
        /// The end of the range.
        end: Date,
    },

    /// An amount string could not be parsed as a number.
    #[error("could not parse \"{0}\" as an amount")]
    InvalidAmount(String),

    /// A transaction type string was not one of the accepted values.
    #[error("\"{0}\" is not a valid transaction type, expected \"income\" or \"expense\"")]
    InvalidTransactionType(String),

    /// An empty string was used where a category name is required.
    #[error("category cannot be empty")]
    EmptyCategory,

    /// A budget goal was given a zero, negative, or non-finite monthly limit.
    #[error("monthly limit must be a positive number, got {0}")]
    InvalidMonthlyLimit(f64),

    /// A required query parameter was not provided.
    #[error("missing required query parameter \"{0}\"")]
    MissingParameter(&'static str),

    /// The CSV had issues that prevented it from being ingested.
    ///
    /// Covers both structural problems (missing columns) and per-row
    /// validation failures. Any row failing validation rejects the whole
    /// upload, so the error message names the offending row.
    #[error("could not parse the CSV file: {0}")]
    InvalidCsv(String),

    /// The multipart form could not be parsed as a CSV file upload.
    #[error("could not parse multipart form: {0}")]
    Multipart(String),

    /// The multipart form did not contain a CSV file.
    #[error("file is not a CSV")]
    NotCsv,

    /// The JSON request body could not be deserialized.
    #[error("could not parse the request body: {0}")]
    InvalidRequestBody(String),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidDate { .. }
            | Error::InvalidDateRange { .. }
            | Error::InvalidAmount(_)
            | Error::InvalidTransactionType(_)
            | Error::EmptyCategory
            | Error::InvalidMonthlyLimit(_)
            | Error::MissingParameter(_)
            | Error::InvalidCsv(_)
            | Error::Multipart(_)
            | Error::NotCsv
            | Error::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::SqlError(_) | Error::DatabaseLockError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        // Server-side failures are logged in full but reported to the client
        // as an opaque message. No stack traces, no SQL.
        let message = if status_code == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("request failed: {}", self);
            "an internal error occurred".to_owned()
        } else {
            self.to_string()
        };

        (status_code, Json(json!({ "error": message }))).into_response()
    }
}
