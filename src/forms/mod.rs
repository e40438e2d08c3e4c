//! Form validation
//!
//! Each input shape gets an explicit form struct with a `validate` method
//! producing either the accepted values or a list of field-level errors.
//! Uniqueness checks that need the database live in the services; the forms
//! validate shape only.

pub mod contact;
pub mod login;
pub mod news;
pub mod register;

pub use contact::ContactForm;
pub use login::LoginForm;
pub use news::NewsForm;
pub use register::RegisterForm;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;

/// A single field-level validation error
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Name of the offending field
    pub field: &'static str,
    /// Human-readable message
    pub message: String,
}

/// Accumulated field-level validation errors for one form submission
#[derive(Debug, Clone, Default, Serialize)]
pub struct FieldErrors {
    errors: Vec<FieldError>,
}

impl FieldErrors {
    /// Create an empty error list
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error against a field
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// Whether any error was recorded
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// All recorded errors
    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// Messages recorded against a specific field
    pub fn for_field(&self, field: &str) -> Vec<&str> {
        self.errors
            .iter()
            .filter(|e| e.field == field)
            .map(|e| e.message.as_str())
            .collect()
    }

    /// Group messages by field for template rendering
    pub fn by_field(&self) -> BTreeMap<&'static str, Vec<String>> {
        let mut map: BTreeMap<&'static str, Vec<String>> = BTreeMap::new();
        for error in &self.errors {
            map.entry(error.field).or_default().push(error.message.clone());
        }
        map
    }
}

/// Lenient email shape check, enough to catch obvious typos.
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

/// Check that a string looks like an email address
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}
