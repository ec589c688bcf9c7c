//! Transaction management for the budget analytics API.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `NewTransaction` for creating transactions
//! - Database functions for storing and querying transactions
//! - Endpoint handlers for creating and listing transactions

mod core;
mod create_endpoint;
mod list_endpoint;
mod query;

pub use core::{
    NewTransaction, Transaction, TransactionType, count_categories, count_transactions,
    create_transaction, create_transaction_table,
};
pub use create_endpoint::create_transaction_endpoint;
pub use list_endpoint::list_transactions_endpoint;
pub use query::{TransactionFilter, get_transactions};

pub(crate) use core::parse_date;
pub(crate) use query::{parse_optional_date, parse_required_date};
