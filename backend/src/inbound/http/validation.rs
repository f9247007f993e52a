//! Shared validation helpers for inbound HTTP adapters.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::json;

use crate::domain::Error;

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

fn invalid_value_error(field: FieldName, message: String, code: &str, value: &str) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": code,
    }))
}

pub(crate) fn parse_rfc3339_timestamp(
    value: String,
    field: FieldName,
) -> Result<DateTime<Utc>, Error> {
    DateTime::parse_from_rfc3339(&value)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|_| {
            let name = field.as_str();
            invalid_value_error(
                field,
                format!("{name} must be an RFC 3339 timestamp"),
                "invalid_timestamp",
                &value,
            )
        })
}

pub(crate) fn parse_day(value: String, field: FieldName) -> Result<NaiveDate, Error> {
    NaiveDate::parse_from_str(&value, "%Y-%m-%d").map_err(|_| {
        let name = field.as_str();
        invalid_value_error(
            field,
            format!("{name} must be a calendar date (YYYY-MM-DD)"),
            "invalid_date",
            &value,
        )
    })
}

/// Normalise an optional query parameter: blank values count as absent.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|raw| !raw.trim().is_empty())
}
