//! Field-level validation for request bodies
//!
//! Write DTOs implement [`Validate`] by running their fields through a
//! [`FieldErrors`] collector. The [`ValidatedJson`](crate::extract::ValidatedJson)
//! extractor calls it before a handler body executes.
//!
//! ```rust,ignore
//! impl Validate for AuthorCreate {
//!     fn validate(&self) -> Vec<FieldError> {
//!         let mut errors = FieldErrors::default();
//!         errors.required_text("firstName", &self.first_name, 50);
//!         errors.into_vec()
//!     }
//! }
//! ```

use std::fmt::Display;

use serde::Serialize;

/// A single failed rule on a named request field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Implemented by every request body that must be checked before use
pub trait Validate {
    /// Return every failing field; an empty list means the value is valid
    fn validate(&self) -> Vec<FieldError>;
}

/// Collector for field errors. Each rule records at most one error.
#[derive(Debug, Default)]
pub struct FieldErrors {
    errors: Vec<FieldError>,
}

impl FieldErrors {
    fn push(&mut self, field: &'static str, message: String) {
        self.errors.push(FieldError { field, message });
    }

    /// Value must not be empty or whitespace-only
    pub fn required(&mut self, field: &'static str, value: &str) -> bool {
        if value.trim().is_empty() {
            self.push(field, format!("{field} is required"));
            return false;
        }
        true
    }

    /// Value must not exceed `max` characters
    pub fn max_chars(&mut self, field: &'static str, value: &str, max: usize) -> bool {
        if value.chars().count() > max {
            self.push(field, format!("{field} cannot exceed {max} characters"));
            return false;
        }
        true
    }

    /// Value length must fall within `min..=max` characters
    pub fn chars_between(&mut self, field: &'static str, value: &str, min: usize, max: usize) -> bool {
        let len = value.chars().count();
        if len < min || len > max {
            self.push(
                field,
                format!("{field} must be between {min} and {max} characters"),
            );
            return false;
        }
        true
    }

    /// Required and bounded text, the most common rule pair
    pub fn required_text(&mut self, field: &'static str, value: &str, max: usize) -> bool {
        self.required(field, value) && self.max_chars(field, value, max)
    }

    /// Optional text: only checked when present
    pub fn optional_text(&mut self, field: &'static str, value: Option<&str>, max: usize) -> bool {
        match value {
            Some(value) => self.max_chars(field, value, max),
            None => true,
        }
    }

    /// Value must be greater than or equal to `min`
    pub fn at_least<T>(&mut self, field: &'static str, value: T, min: T) -> bool
    where
        T: PartialOrd + Display,
    {
        if value < min {
            self.push(field, format!("{field} must be at least {min}"));
            return false;
        }
        true
    }

    /// Record a rule that was evaluated outside this collector
    pub fn reject(&mut self, field: &'static str, message: impl Into<String>) {
        self.push(field, message.into());
    }

    pub fn into_vec(self) -> Vec<FieldError> {
        self.errors
    }
}
