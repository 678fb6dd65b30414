use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Wire format for dates picked on the form. The `Z` is literal.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Formats a picked day as midnight in [`TIMESTAMP_FORMAT`].
pub fn format_timestamp(date: NaiveDate) -> String {
    date.and_time(NaiveTime::MIN)
        .format(TIMESTAMP_FORMAT)
        .to_string()
}

/// Parses a stored timestamp back to its day, if it is well-formed.
pub fn parse_timestamp(value: &str) -> Option<NaiveDate> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .ok()
        .map(|dt| dt.date())
}
