//! Date-range query parameters shared by the reporting endpoints.

use serde::Deserialize;

use crate::{
    Error,
    transaction::{TransactionFilter, parse_optional_date},
};

/// The optional date-range parameters accepted by the reporting endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    /// Only consider transactions on or after this date (`YYYY-MM-DD`).
    pub start_date: Option<String>,
    /// Only consider transactions on or before this date (`YYYY-MM-DD`).
    pub end_date: Option<String>,
}

impl TryFrom<ReportQuery> for TransactionFilter {
    type Error = Error;

    fn try_from(params: ReportQuery) -> Result<Self, Self::Error> {
        TransactionFilter::date_range(
            parse_optional_date(params.start_date.as_deref())?,
            parse_optional_date(params.end_date.as_deref())?,
        )
    }
}

#[cfg(test)]
mod report_query_tests {
    use time::macros::date;

    use crate::{Error, transaction::TransactionFilter};

    use super::ReportQuery;

    #[test]
    fn converts_to_filter() {
        let params = ReportQuery {
            start_date: Some("2024-01-01".to_owned()),
            end_date: Some("2024-12-31".to_owned()),
        };

        let filter: TransactionFilter = params.try_into().unwrap();

        assert_eq!(filter.start_date, Some(date!(2024 - 01 - 01)));
        assert_eq!(filter.end_date, Some(date!(2024 - 12 - 31)));
    }

    #[test]
    fn rejects_unparseable_dates() {
        let params = ReportQuery {
            start_date: Some("January 1st".to_owned()),
            end_date: None,
        };

        let result: Result<TransactionFilter, Error> = params.try_into();

        assert!(matches!(result, Err(Error::InvalidDate { .. })));
    }
}
