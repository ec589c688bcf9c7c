//! Filtered retrieval of transactions.

use rusqlite::{Connection, ToSql};
use time::Date;

use crate::{Error, category::CategoryName};

use super::core::{Transaction, TransactionType, map_transaction_row, parse_date};

/// The filters to apply when querying transactions.
///
/// Filters combine with AND; a `None` field imposes no constraint.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TransactionFilter {
    /// Only include transactions on or after this date.
    pub start_date: Option<Date>,
    /// Only include transactions on or before this date.
    pub end_date: Option<Date>,
    /// Only include transactions with this exact category.
    pub category: Option<CategoryName>,
    /// Only include transactions of this type.
    pub transaction_type: Option<TransactionType>,
}

impl TransactionFilter {
    /// Create a filter, checking that the date range is ordered.
    ///
    /// # Errors
    /// Returns an [Error::InvalidDateRange] if both dates are present and the
    /// end date is before the start date.
    pub fn new(
        start_date: Option<Date>,
        end_date: Option<Date>,
        category: Option<CategoryName>,
        transaction_type: Option<TransactionType>,
    ) -> Result<Self, Error> {
        if let (Some(start), Some(end)) = (start_date, end_date)
            && end < start
        {
            return Err(Error::InvalidDateRange { start, end });
        }

        Ok(Self {
            start_date,
            end_date,
            category,
            transaction_type,
        })
    }

    /// Create a filter restricted to a date range only.
    ///
    /// # Errors
    /// Returns an [Error::InvalidDateRange] if the end date is before the
    /// start date.
    pub fn date_range(start_date: Option<Date>, end_date: Option<Date>) -> Result<Self, Error> {
        Self::new(start_date, end_date, None, None)
    }
}

/// Parse an optional raw date parameter, treating an absent value as no
/// constraint.
pub(crate) fn parse_optional_date(value: Option<&str>) -> Result<Option<Date>, Error> {
    value.map(parse_date).transpose()
}

/// Parse a required raw date parameter.
///
/// # Errors
/// Returns an [Error::MissingParameter] naming the parameter when absent, or
/// an [Error::InvalidDate] when present but unparseable.
pub(crate) fn parse_required_date(
    name: &'static str,
    value: Option<&str>,
) -> Result<Date, Error> {
    match value {
        Some(text) => parse_date(text),
        None => Err(Error::MissingParameter(name)),
    }
}

/// Get the transactions matching `filter`, ordered by date ascending.
///
/// Returns an empty vector when nothing matches.
///
/// # Errors
/// Returns an [Error::SqlError] if the query fails or a row cannot be mapped.
pub fn get_transactions(
    filter: &TransactionFilter,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let mut clauses: Vec<&str> = Vec::new();
    let mut params: Vec<Box<dyn ToSql>> = Vec::new();

    if let Some(start_date) = filter.start_date {
        params.push(Box::new(start_date));
        clauses.push("date >= ?");
    }

    if let Some(end_date) = filter.end_date {
        params.push(Box::new(end_date));
        clauses.push("date <= ?");
    }

    if let Some(category) = &filter.category {
        params.push(Box::new(category.as_ref().to_owned()));
        clauses.push("category = ?");
    }

    if let Some(transaction_type) = filter.transaction_type {
        params.push(Box::new(transaction_type));
        clauses.push("transaction_type = ?");
    }

    let where_clause = if clauses.is_empty() {
        String::new()
    } else {
        format!("WHERE {} ", clauses.join(" AND "))
    };

    // Sort by date, and then ID to keep transaction order stable.
    let query = format!(
        "SELECT id, date, category, amount, transaction_type, description, created_at \
         FROM \"transaction\" {}ORDER BY date ASC, id ASC",
        where_clause
    );

    connection
        .prepare(&query)?
        .query_map(
            rusqlite::params_from_iter(params.iter().map(|param| param.as_ref())),
            map_transaction_row,
        )?
        .map(|transaction_result| transaction_result.map_err(Error::SqlError))
        .collect()
}

#[cfg(test)]
mod filter_tests {
    use time::macros::date;

    use crate::{Error, transaction::TransactionFilter};

    #[test]
    fn new_rejects_inverted_range() {
        let result = TransactionFilter::date_range(
            Some(date!(2024 - 02 - 01)),
            Some(date!(2024 - 01 - 01)),
        );

        assert_eq!(
            result,
            Err(Error::InvalidDateRange {
                start: date!(2024 - 02 - 01),
                end: date!(2024 - 01 - 01),
            })
        );
    }

    #[test]
    fn new_accepts_single_day_range() {
        let result = TransactionFilter::date_range(
            Some(date!(2024 - 01 - 01)),
            Some(date!(2024 - 01 - 01)),
        );

        assert!(result.is_ok());
    }
}
