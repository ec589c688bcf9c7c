//! Defines the core data models and database queries for transactions.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::{
    Date, OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description,
};

use crate::{Error, category::CategoryName};

/// Database identifier for a transaction.
pub type TransactionId = i64;

/// The calendar date format accepted by the API and CSV uploads.
const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// Parse an ISO-8601 calendar date (`YYYY-MM-DD`).
///
/// # Errors
/// Returns an [Error::InvalidDate] naming the offending string if it cannot
/// be parsed.
pub(crate) fn parse_date(text: &str) -> Result<Date, Error> {
    Date::parse(text.trim(), &DATE_FORMAT).map_err(|error| Error::InvalidDate {
        value: text.to_owned(),
        reason: error.to_string(),
    })
}

/// Whether a transaction records money earned or money spent.
///
/// This field is authoritative for classification: the stored sign of the
/// amount is derived from it at insertion time, so income rows are always
/// positive and expense rows always negative in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money earned, e.g. salary.
    Income,
    /// Money spent, e.g. groceries.
    Expense,
}

impl TransactionType {
    /// The string form stored in the database and used in the API.
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if s.eq_ignore_ascii_case("income") {
            Ok(TransactionType::Income)
        } else if s.eq_ignore_ascii_case("expense") {
            Ok(TransactionType::Expense)
        } else {
            Err(Error::InvalidTransactionType(s.to_owned()))
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;

        text.parse()
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

/// A financial event where money was either spent or earned.
///
/// To create a new `Transaction`, use [NewTransaction] with
/// [create_transaction].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// When the transaction happened.
    pub date: Date,
    /// The category the transaction belongs to, e.g. "Groceries".
    pub category: CategoryName,
    /// The amount of money spent or earned. Expenses are stored negative,
    /// income positive.
    pub amount: f64,
    /// Whether the transaction is income or an expense.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// A text description of what the transaction was for. May be empty.
    pub description: String,
    /// When the transaction was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A transaction that has not been persisted yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// When the transaction happened.
    pub date: Date,
    /// The category the transaction belongs to.
    pub category: CategoryName,
    /// The amount of money spent or earned, sign free. The sign stored in the
    /// database is derived from `transaction_type`, not from this value.
    pub amount: f64,
    /// Whether the transaction is income or an expense.
    pub transaction_type: TransactionType,
    /// A text description of what the transaction was for.
    pub description: String,
}

impl NewTransaction {
    /// Create a new transaction with an empty description.
    pub fn new(
        date: Date,
        category: CategoryName,
        amount: f64,
        transaction_type: TransactionType,
    ) -> Self {
        Self {
            date,
            category,
            amount,
            transaction_type,
            description: String::new(),
        }
    }

    /// Set the description for the transaction.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }

    /// The amount with the canonical sign: negative for expenses, positive
    /// for income.
    pub(crate) fn signed_amount(&self) -> f64 {
        match self.transaction_type {
            TransactionType::Income => self.amount.abs(),
            TransactionType::Expense => -self.amount.abs(),
        }
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new transaction in the database.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn create_transaction(
    new_transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\" (date, category, amount, transaction_type, description, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING id, date, category, amount, transaction_type, description, created_at",
        )?
        .query_row(
            (
                new_transaction.date,
                new_transaction.category.as_ref(),
                new_transaction.signed_amount(),
                new_transaction.transaction_type,
                &new_transaction.description,
                OffsetDateTime::now_utc(),
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM \"transaction\";", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

/// Get the number of distinct categories across all transactions.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn count_categories(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row(
            "SELECT COUNT(DISTINCT category) FROM \"transaction\";",
            [],
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NOT NULL,
            category TEXT NOT NULL,
            amount REAL NOT NULL,
            transaction_type TEXT NOT NULL,
            description TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_transaction_date ON \"transaction\"(date);
        CREATE INDEX IF NOT EXISTS idx_transaction_category ON \"transaction\"(category);",
    )?;

    Ok(())
}

/// Map a database row to a [Transaction].
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let date = row.get(1)?;
    let raw_category: String = row.get(2)?;
    let amount = row.get(3)?;
    let transaction_type = row.get(4)?;
    let description = row.get(5)?;
    let created_at = row.get(6)?;

    Ok(Transaction {
        id,
        date,
        category: CategoryName::new_unchecked(&raw_category),
        amount,
        transaction_type,
        description,
        created_at,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod transaction_type_tests {
    use crate::{Error, transaction::TransactionType};

    #[test]
    fn parses_known_values() {
        assert_eq!("income".parse(), Ok(TransactionType::Income));
        assert_eq!("expense".parse(), Ok(TransactionType::Expense));
        assert_eq!(" Income ".parse(), Ok(TransactionType::Income));
    }

    #[test]
    fn rejects_unknown_values() {
        let result: Result<TransactionType, Error> = "transfer".parse();

        assert_eq!(
            result,
            Err(Error::InvalidTransactionType("transfer".to_owned()))
        );
    }
}

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        category::CategoryName,
        db::initialize,
        transaction::{
            NewTransaction, TransactionType, count_categories, count_transactions,
            create_transaction,
        },
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn create_succeeds() {
        let conn = get_test_connection();

        let result = create_transaction(
            NewTransaction::new(
                date!(2024 - 01 - 01),
                CategoryName::new_unchecked("Salary"),
                3500.0,
                TransactionType::Income,
            )
            .description("January pay"),
            &conn,
        );

        match result {
            Ok(transaction) => {
                assert!(transaction.id > 0);
                assert_eq!(transaction.amount, 3500.0);
                assert_eq!(transaction.transaction_type, TransactionType::Income);
                assert_eq!(transaction.description, "January pay");
            }
            Err(error) => panic!("Unexpected error: {error}"),
        }
    }

    #[test]
    fn create_stores_expenses_with_negative_amount() {
        let conn = get_test_connection();

        let transaction = create_transaction(
            NewTransaction::new(
                date!(2024 - 01 - 05),
                CategoryName::new_unchecked("Groceries"),
                120.50,
                TransactionType::Expense,
            ),
            &conn,
        )
        .expect("Could not create transaction");

        assert_eq!(transaction.amount, -120.50);
    }

    #[test]
    fn create_stores_income_with_positive_amount() {
        let conn = get_test_connection();

        // A negative amount on an income row is normalized, the type wins.
        let transaction = create_transaction(
            NewTransaction::new(
                date!(2024 - 01 - 01),
                CategoryName::new_unchecked("Salary"),
                -3500.0,
                TransactionType::Income,
            ),
            &conn,
        )
        .expect("Could not create transaction");

        assert_eq!(transaction.amount, 3500.0);
    }

    #[test]
    fn get_count() {
        let conn = get_test_connection();
        let want_count = 20;
        for i in 1..=want_count {
            create_transaction(
                NewTransaction::new(
                    date!(2025 - 10 - 05),
                    CategoryName::new_unchecked("Misc"),
                    i as f64,
                    TransactionType::Expense,
                ),
                &conn,
            )
            .expect("Could not create transaction");
        }

        let got_count = count_transactions(&conn).expect("Could not get count");

        assert_eq!(want_count, got_count);
    }

    #[test]
    fn count_distinct_categories() {
        let conn = get_test_connection();
        for category in ["Groceries", "Rent", "Groceries"] {
            create_transaction(
                NewTransaction::new(
                    date!(2024 - 02 - 01),
                    CategoryName::new_unchecked(category),
                    10.0,
                    TransactionType::Expense,
                ),
                &conn,
            )
            .expect("Could not create transaction");
        }

        let got = count_categories(&conn).expect("Could not get category count");

        assert_eq!(got, 2);
    }
}
