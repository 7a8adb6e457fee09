//! Shared validation helpers for inbound HTTP adapters.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::json;

use crate::domain::{CareType, Error, IdParseError, Recurrence};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    InvalidDate,
    InvalidEnum,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidUuid => "invalid_uuid",
            Self::InvalidDate => "invalid_date",
            Self::InvalidEnum => "invalid_enum",
        }
    }
}

/// Newtype wrapper for HTTP field names.
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

fn field_error(field: FieldName, code: ErrorCode, message: String, value: Option<&str>) -> Error {
    let details = match value {
        Some(value) => json!({ "field": field.as_str(), "value": value, "code": code.as_str() }),
        None => json!({ "field": field.as_str(), "code": code.as_str() }),
    };
    Error::invalid_request(message).with_details(details)
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    field_error(
        field,
        ErrorCode::MissingField,
        format!("missing required field: {}", field.as_str()),
        None,
    )
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    field_error(
        field,
        ErrorCode::InvalidUuid,
        format!("{} must be a valid UUID", field.as_str()),
        Some(value),
    )
}

/// Parse a path segment into one of the typed identifiers.
pub(crate) fn parse_id<T>(value: &str, field: FieldName) -> Result<T, Error>
where
    T: FromStr<Err = IdParseError>,
{
    T::from_str(value).map_err(|_| invalid_uuid_error(field, value))
}

/// Accept an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC).
pub(crate) fn parse_due_date(value: &str, field: FieldName) -> Result<DateTime<Utc>, Error> {
    let value = value.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Ok(timestamp.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
        .ok_or_else(|| {
            field_error(
                field,
                ErrorCode::InvalidDate,
                format!("{} must be an RFC 3339 timestamp or YYYY-MM-DD date", field.as_str()),
                Some(value),
            )
        })
}

fn parse_wire_enum<T: FromStr>(
    value: &str,
    field: FieldName,
    allowed: &'static str,
) -> Result<T, Error> {
    T::from_str(value).map_err(|_| {
        field_error(
            field,
            ErrorCode::InvalidEnum,
            format!("{} must be one of {allowed}", field.as_str()),
            Some(value),
        )
    })
}

pub(crate) fn parse_care_type(value: &str, field: FieldName) -> Result<CareType, Error> {
    parse_wire_enum(value, field, "watering, fertilizing, pruning")
}

/// Absent or blank values mean no recurrence.
pub(crate) fn parse_recurrence(value: Option<&str>, field: FieldName) -> Result<Recurrence, Error> {
    match value.map(str::trim) {
        None | Some("") => Ok(Recurrence::None),
        Some(raw) => parse_wire_enum(raw, field, "none, daily, weekly, monthly"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorCode as DomainCode, PostId};
    use chrono::TimeZone;
    use rstest::rstest;

    const DATE: FieldName = FieldName::new("date");

    #[rstest]
    fn bad_uuid_reports_field_and_code() {
        let err = parse_id::<PostId>("nope", FieldName::new("id")).expect_err("invalid");
        assert_eq!(err.code(), DomainCode::InvalidRequest);
        let details = err.details().expect("details");
        assert_eq!(details["code"], "invalid_uuid");
        assert_eq!(details["field"], "id");
        assert_eq!(details["value"], "nope");
    }

    #[rstest]
    #[case("2024-01-01", 0)]
    #[case("2024-01-01T09:30:00Z", 9)]
    #[case("2024-01-01T10:30:00+01:00", 9)]
    fn due_dates_accept_both_forms(#[case] raw: &str, #[case] hour: u32) {
        let parsed = parse_due_date(raw, DATE).expect("valid date");
        let expected = Utc
            .with_ymd_and_hms(2024, 1, 1, hour, if hour == 0 { 0 } else { 30 }, 0)
            .single()
            .expect("valid timestamp");
        assert_eq!(parsed, expected);
    }

    #[rstest]
    #[case("tomorrow")]
    #[case("2024-13-01")]
    #[case("")]
    fn malformed_due_dates_are_rejected(#[case] raw: &str) {
        let err = parse_due_date(raw, DATE).expect_err("invalid");
        assert_eq!(err.details().map(|d| d["code"].clone()), Some("invalid_date".into()));
    }

    #[rstest]
    #[case(None, Recurrence::None)]
    #[case(Some(" "), Recurrence::None)]
    #[case(Some("Weekly"), Recurrence::Weekly)]
    fn recurrence_defaults_to_none(#[case] raw: Option<&str>, #[case] expected: Recurrence) {
        assert_eq!(parse_recurrence(raw, FieldName::new("repeat")), Ok(expected));
    }

    #[rstest]
    fn unknown_care_type_is_invalid() {
        let err = parse_care_type("repotting", FieldName::new("type")).expect_err("invalid");
        assert_eq!(err.code(), DomainCode::InvalidRequest);
    }
}
