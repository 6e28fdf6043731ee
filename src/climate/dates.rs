use crate::error::{AppError, Result};
use chrono::{Months, NaiveDate};

pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` path parameter.
pub fn parse_iso_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), ISO_DATE_FORMAT)
        .map_err(|_| AppError::InvalidDateFormat(value.to_string()))
}

/// The same calendar day one year earlier; Feb 29 falls back to Feb 28.
pub fn one_year_before(date: NaiveDate) -> NaiveDate {
    date.checked_sub_months(Months::new(12)).unwrap_or(date)
}
