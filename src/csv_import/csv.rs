//! Parsing and validation of uploaded transaction CSV files.

use crate::{
    Error,
    category::CategoryName,
    transaction::{NewTransaction, parse_date},
};

/// The columns that every upload must provide.
const REQUIRED_COLUMNS: [&str; 4] = ["date", "category", "amount", "type"];

/// The optional description column.
const DESCRIPTION_COLUMN: &str = "description";

/// Parses CSV data containing transactions.
///
/// Expects a header row naming at least the columns `date`, `category`,
/// `amount` and `type` (a `description` column is optional), followed by one
/// transaction per row. Column order does not matter.
///
/// Validation is all-or-nothing: the first invalid row fails the whole parse
/// so that an upload is never partially ingested.
///
/// # Errors
/// Returns an [Error::InvalidCsv] naming the missing column or the offending
/// row when the data is not in the accepted format.
pub fn parse_csv(text: &str) -> Result<Vec<NewTransaction>, Error> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|error| Error::InvalidCsv(format!("could not read header row: {error}")))?
        .clone();

    let column_index = |name: &str| headers.iter().position(|header| header == name);

    let mut required_indices = [0usize; REQUIRED_COLUMNS.len()];

    for (i, name) in REQUIRED_COLUMNS.iter().enumerate() {
        required_indices[i] = column_index(name).ok_or_else(|| {
            Error::InvalidCsv(format!(
                "missing required column \"{name}\" (expected header \
                 date,category,amount,type,description)"
            ))
        })?;
    }

    let [date_column, category_column, amount_column, type_column] = required_indices;
    let description_column = column_index(DESCRIPTION_COLUMN);

    let mut transactions = Vec::new();

    for (row_index, record) in reader.records().enumerate() {
        // Row numbers are 1-based and include the header row, matching what a
        // user sees in their spreadsheet.
        let row_number = row_index + 2;

        let record = record
            .map_err(|error| Error::InvalidCsv(format!("row {row_number}: {error}")))?;

        let field = |column: usize, name: &str| {
            record
                .get(column)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| {
                    Error::InvalidCsv(format!("row {row_number}: missing value for \"{name}\""))
                })
        };

        let date = parse_date(field(date_column, "date")?)
            .map_err(|error| Error::InvalidCsv(format!("row {row_number}: {error}")))?;

        let category = CategoryName::new(field(category_column, "category")?)
            .map_err(|_| Error::InvalidCsv(format!("row {row_number}: category cannot be empty")))?;

        let raw_amount = field(amount_column, "amount")?;
        let amount: f64 = raw_amount.parse().map_err(|_| {
            Error::InvalidCsv(format!(
                "row {row_number}: could not parse \"{raw_amount}\" as an amount"
            ))
        })?;

        let transaction_type = field(type_column, "type")?
            .parse()
            .map_err(|error| Error::InvalidCsv(format!("row {row_number}: {error}")))?;

        let description = description_column
            .and_then(|column| record.get(column))
            .unwrap_or_default();

        transactions.push(
            NewTransaction::new(date, category, amount, transaction_type)
                .description(description),
        );
    }

    Ok(transactions)
}

#[cfg(test)]
mod parse_csv_tests {
    use time::macros::date;

    use crate::{Error, transaction::TransactionType};

    use super::parse_csv;

    #[test]
    fn parses_valid_csv() {
        let text = "date,category,amount,type,description\n\
            2024-01-01,Salary,3500.00,income,January pay\n\
            2024-01-05,Groceries,-120.50,expense,Weekly shop\n";

        let transactions = parse_csv(text).expect("Could not parse CSV");

        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions[0].date, date!(2024 - 01 - 01));
        assert_eq!(transactions[0].category.as_ref(), "Salary");
        assert_eq!(transactions[0].transaction_type, TransactionType::Income);
        assert_eq!(transactions[1].amount, -120.50);
        assert_eq!(transactions[1].description, "Weekly shop");
    }

    #[test]
    fn accepts_columns_in_any_order() {
        let text = "type,amount,date,category\n\
            expense,42.00,2024-01-05,Groceries\n";

        let transactions = parse_csv(text).expect("Could not parse CSV");

        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].category.as_ref(), "Groceries");
        assert_eq!(transactions[0].description, "");
    }

    #[test]
    fn fails_on_missing_required_column() {
        let text = "date,category,amount\n2024-01-05,Groceries,42.00\n";

        let result = parse_csv(text);

        match result {
            Err(Error::InvalidCsv(message)) => assert!(message.contains("\"type\"")),
            other => panic!("expected InvalidCsv error, got {other:?}"),
        }
    }

    #[test]
    fn fails_on_unparseable_date_naming_the_row() {
        let text = "date,category,amount,type,description\n\
            2024-01-01,Salary,3500.00,income,\n\
            05/01/2024,Groceries,42.00,expense,\n";

        let result = parse_csv(text);

        match result {
            Err(Error::InvalidCsv(message)) => assert!(message.starts_with("row 3:")),
            other => panic!("expected InvalidCsv error, got {other:?}"),
        }
    }

    #[test]
    fn fails_on_non_numeric_amount() {
        let text = "date,category,amount,type,description\n\
            2024-01-05,Groceries,lots,expense,\n";

        let result = parse_csv(text);

        match result {
            Err(Error::InvalidCsv(message)) => assert!(message.contains("lots")),
            other => panic!("expected InvalidCsv error, got {other:?}"),
        }
    }

    #[test]
    fn fails_on_unknown_transaction_type() {
        let text = "date,category,amount,type,description\n\
            2024-01-05,Groceries,42.00,transfer,\n";

        let result = parse_csv(text);

        match result {
            Err(Error::InvalidCsv(message)) => assert!(message.contains("transfer")),
            other => panic!("expected InvalidCsv error, got {other:?}"),
        }
    }

    #[test]
    fn fails_on_missing_field_value() {
        let text = "date,category,amount,type,description\n\
            2024-01-05,,42.00,expense,\n";

        let result = parse_csv(text);

        assert!(matches!(result, Err(Error::InvalidCsv(_))));
    }

    #[test]
    fn empty_file_with_header_parses_to_no_transactions() {
        let text = "date,category,amount,type,description\n";

        let transactions = parse_csv(text).expect("Could not parse CSV");

        assert!(transactions.is_empty());
    }
}
