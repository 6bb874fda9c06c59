//! Request field validation
//!
//! Checks are declared one per field and accumulate into a list of
//! [`FieldError`]s so a client sees every problem at once.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::Serialize;

use crate::domain::user::value_objects::Email;

/// A single failed check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub msg: String,
    pub param: String,
    pub location: &'static str,
}

impl FieldError {
    pub fn body(param: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            param: param.into(),
            location: "body",
        }
    }
}

/// Accumulates field errors
///
/// # Example
/// ```
/// use devconnect_api::domain::validation::Validator;
///
/// let errors = Validator::new()
///     .required("name", Some(""), "Name is required")
///     .email("email", Some("a@x.com"), "Please include a valid email")
///     .finish()
///     .unwrap_err();
///
/// assert_eq!(errors.len(), 1);
/// assert_eq!(errors[0].param, "name");
/// ```
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value must be present and not blank
    pub fn required(mut self, param: &str, value: Option<&str>, msg: &str) -> Self {
        if value.map_or(true, |v| v.trim().is_empty()) {
            self.errors.push(FieldError::body(param, msg));
        }
        self
    }

    /// Value must be present (may be empty)
    pub fn present(mut self, param: &str, value: Option<&str>, msg: &str) -> Self {
        if value.is_none() {
            self.errors.push(FieldError::body(param, msg));
        }
        self
    }

    /// Value must be a well-formed email address
    pub fn email(mut self, param: &str, value: Option<&str>, msg: &str) -> Self {
        if !value.map_or(false, |v| Email::is_valid(v.trim())) {
            self.errors.push(FieldError::body(param, msg));
        }
        self
    }

    /// Value must have at least `min` characters
    pub fn min_length(mut self, param: &str, value: Option<&str>, min: usize, msg: &str) -> Self {
        if value.map_or(true, |v| v.chars().count() < min) {
            self.errors.push(FieldError::body(param, msg));
        }
        self
    }

    /// Value, when supplied, must parse as a date
    pub fn date(mut self, param: &str, value: Option<&str>, msg: &str) -> Self {
        if let Some(v) = value.filter(|v| !v.trim().is_empty()) {
            if parse_date(v).is_none() {
                self.errors.push(FieldError::body(param, msg));
            }
        }
        self
    }

    /// Record a failure decided by the caller
    pub fn check(mut self, ok: bool, param: &str, msg: &str) -> Self {
        if !ok {
            self.errors.push(FieldError::body(param, msg));
        }
        self
    }

    pub fn finish(self) -> Result<(), Vec<FieldError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

/// Parses an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC)
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}
