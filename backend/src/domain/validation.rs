//! Per-field validation error accumulation.
//!
//! Constructors for request-shaped aggregates (registrations, content drafts)
//! check every field and report all failures at once, keyed by field name.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::json;

use super::Error;

/// Message used when a required field is absent.
pub const REQUIRED_MESSAGE: &str = "This field is required.";
/// Message used when a required text field is blank.
pub const BLANK_MESSAGE: &str = "This field may not be blank.";

/// Field name to messages map collected while validating a payload.
///
/// # Examples
/// ```
/// use cms_backend::domain::FieldErrors;
///
/// let mut errors = FieldErrors::new();
/// errors.push("title", "This field may not be blank.");
/// assert_eq!(errors.get("title"), Some(&["This field may not be blank.".to_owned()][..]));
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, Vec<String>>);

impl FieldErrors {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message against `field`.
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    /// Record the error of `result` against `field`, returning the value on success.
    pub fn check<T, E: fmt::Display>(
        &mut self,
        field: &'static str,
        result: Result<T, E>,
    ) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.push(field, err.to_string());
                None
            }
        }
    }

    /// Whether no field has failed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages recorded for `field`.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Names of every failing field in sorted order.
    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.keys().copied()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                first = false;
                write!(f, "{field}: {message}")?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

impl From<FieldErrors> for Error {
    fn from(value: FieldErrors) -> Self {
        Error::invalid_request("validation failed").with_details(json!({ "fields": value.0 }))
    }
}

/// Require a present, non-blank value. Returns the trimmed text.
pub(crate) fn required_text<'a>(
    errors: &mut FieldErrors,
    field: &'static str,
    value: Option<&'a str>,
) -> Option<&'a str> {
    match value.map(str::trim) {
        None => {
            errors.push(field, REQUIRED_MESSAGE);
            None
        }
        Some("") => {
            errors.push(field, BLANK_MESSAGE);
            None
        }
        Some(text) => Some(text),
    }
}
