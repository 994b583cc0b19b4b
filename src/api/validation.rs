use chrono::NaiveDate;
use serde::Serialize;
use std::str::FromStr;

use super::ApiError;
use crate::domain::Price;
use crate::models::workshop::DATE_FORMAT;

/// One rejected field of a request payload.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Collects every problem with a payload so the client sees all of them at once.
#[derive(Debug, Default)]
pub struct Violations(Vec<FieldError>);

impl Violations {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldError::new(field, message));
    }

    /// Records the error of `result` against `field` and passes the value through.
    pub fn check<T>(&mut self, field: &str, result: Result<T, String>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(message) => {
                self.push(field, message);
                None
            }
        }
    }

    pub fn into_result(self) -> Result<(), ApiError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ApiError::InvalidData(self.0))
        }
    }
}

/// Trimmed, non-empty text of at most `max` characters.
pub fn required_text(value: Option<&str>, max: usize) -> Result<String, String> {
    let Some(value) = value else {
        return Err("is required".to_string());
    };
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("cannot be empty".to_string());
    }
    bounded(trimmed, max)
}

/// Like [`required_text`] for fields that may be absent; blank input counts as absent.
pub fn optional_text(value: Option<&str>, max: usize) -> Result<Option<String>, String> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(trimmed) => bounded(trimmed, max).map(Some),
    }
}

fn bounded(value: &str, max: usize) -> Result<String, String> {
    if value.chars().count() > max {
        return Err(format!("must be {max} characters or less"));
    }
    Ok(value.to_string())
}

pub fn parse_enum<T>(value: &str) -> Result<T, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| e.to_string())
}

pub fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| format!("invalid date '{value}', expected YYYY-MM-DD"))
}

/// Accepts a JSON number or a decimal string.
pub fn parse_price(value: &serde_json::Value) -> Result<Price, String> {
    serde_json::from_value(value.clone()).map_err(|e| e.to_string())
}

pub fn parse_seats(value: &serde_json::Value) -> Result<i32, String> {
    let seats = value
        .as_i64()
        .ok_or_else(|| "must be a whole number".to_string())?;
    if seats < 1 {
        return Err("must be at least 1".to_string());
    }
    i32::try_from(seats).map_err(|_| "is too large".to_string())
}

/// Positive integer id from a JSON payload.
pub fn parse_id(value: Option<&serde_json::Value>) -> Result<i32, String> {
    let value = value.ok_or_else(|| "is required".to_string())?;
    let id = value
        .as_i64()
        .ok_or_else(|| "must be an integer id".to_string())?;
    if id <= 0 {
        return Err("must be a positive integer".to_string());
    }
    i32::try_from(id).map_err(|_| "is out of range".to_string())
}

pub fn validate_email(value: Option<&str>) -> Result<String, String> {
    let email = required_text(value, 255)?;
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(email),
        _ => Err(format!("'{email}' is not a valid email address")),
    }
}

pub fn validate_password(value: Option<&str>) -> Result<String, String> {
    const MIN_LEN: usize = 6;

    let password = value.ok_or_else(|| "is required".to_string())?;
    if password.chars().count() < MIN_LEN {
        return Err(format!("must be at least {MIN_LEN} characters"));
    }
    if password.len() > 1024 {
        return Err("is too long".to_string());
    }
    Ok(password.to_string())
}

pub fn validate_search_query(query: Option<&str>) -> Option<String> {
    query
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_required_text() {
        assert_eq!(required_text(Some("  React  "), 255).unwrap(), "React");
        assert!(required_text(None, 255).is_err());
        assert!(required_text(Some("   "), 255).is_err());
        assert!(required_text(Some(&"a".repeat(256)), 255).is_err());
        assert!(required_text(Some(&"a".repeat(255)), 255).is_ok());
    }

    #[test]
    fn test_optional_text() {
        assert_eq!(optional_text(None, 10).unwrap(), None);
        assert_eq!(optional_text(Some(""), 10).unwrap(), None);
        assert_eq!(
            optional_text(Some("Pune"), 10).unwrap(),
            Some("Pune".to_string())
        );
        assert!(optional_text(Some("much too long"), 5).is_err());
    }

    #[test]
    fn test_parse_date() {
        assert!(parse_date("2025-01-15").is_ok());
        assert!(parse_date("2025-02-30").is_err());
        assert!(parse_date("15/01/2025").is_err());
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price(&json!(2500)).unwrap().cents(), 250_000);
        assert_eq!(parse_price(&json!("19.99")).unwrap().cents(), 1999);
        assert!(parse_price(&json!(-1)).is_err());
        assert!(parse_price(&json!("1.999")).is_err());
        assert!(parse_price(&json!(true)).is_err());
    }

    #[test]
    fn test_parse_seats() {
        assert_eq!(parse_seats(&json!(30)).unwrap(), 30);
        assert!(parse_seats(&json!(0)).is_err());
        assert!(parse_seats(&json!(2.5)).is_err());
        assert!(parse_seats(&json!("30")).is_err());
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id(Some(&json!(4))).unwrap(), 4);
        assert!(parse_id(None).is_err());
        assert!(parse_id(Some(&json!(0))).is_err());
        assert!(parse_id(Some(&json!("4"))).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email(Some("admin@workshopwise.com")).is_ok());
        assert!(validate_email(Some("not-an-email")).is_err());
        assert!(validate_email(Some("@example.com")).is_err());
    }

    #[test]
    fn test_violations_collects_all() {
        let mut violations = Violations::new();
        assert_eq!(violations.check("title", required_text(None, 255)), None);
        assert_eq!(violations.check("seats", parse_seats(&json!(0))), None);
        assert_eq!(
            violations.check("company", required_text(Some("Acme"), 255)),
            Some("Acme".to_string())
        );
        match violations.into_result() {
            Err(ApiError::InvalidData(details)) => {
                let fields: Vec<_> = details.iter().map(|d| d.field.as_str()).collect();
                assert_eq!(fields, vec!["title", "seats"]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_validate_search_query() {
        assert_eq!(
            validate_search_query(Some("  react ")),
            Some("react".to_string())
        );
        assert_eq!(validate_search_query(Some("   ")), None);
        assert_eq!(validate_search_query(None), None);
    }
}
