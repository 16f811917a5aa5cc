//! Validation Framework
//!
//! Provides validation for all application inputs: create requests and
//! tri-state update patches.

mod case;

pub use case::*;

use crate::ApplicationError;
use caseflow_domain::errors::ValidationError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

/// Validation result containing all errors
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Whether validation passed
    pub valid: bool,
    /// Field-level errors
    pub field_errors: HashMap<String, Vec<String>>,
    /// Object-level errors
    pub object_errors: Vec<String>,
}

impl ValidationResult {
    /// Create a successful validation result
    pub fn success() -> Self {
        Self {
            valid: true,
            field_errors: HashMap::new(),
            object_errors: Vec::new(),
        }
    }

    /// Create a failed validation result with a single error
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            field_errors: HashMap::new(),
            object_errors: vec![message.into()],
        }
    }

    /// Add a field-level error
    pub fn add_field_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.valid = false;
        self.field_errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// Add an object-level error
    pub fn add_object_error(&mut self, message: impl Into<String>) {
        self.valid = false;
        self.object_errors.push(message.into());
    }

    /// Merge another validation result into this one
    pub fn merge(&mut self, other: ValidationResult) {
        if !other.valid {
            self.valid = false;
        }

        for (field, errors) in other.field_errors {
            self.field_errors.entry(field).or_default().extend(errors);
        }

        self.object_errors.extend(other.object_errors);
    }

    /// Convert to ApplicationError if invalid
    pub fn to_error(&self) -> Option<ApplicationError> {
        if self.valid {
            return None;
        }

        let mut messages = Vec::new();

        for (field, errors) in &self.field_errors {
            for error in errors {
                messages.push(format!("{}: {}", field, error));
            }
        }

        messages.extend(self.object_errors.clone());

        Some(ValidationError::Multiple(messages).into())
    }

    /// Ensure validation passed, returning error if not
    pub fn ensure_valid(&self) -> Result<(), ApplicationError> {
        if let Some(err) = self.to_error() {
            Err(err)
        } else {
            Ok(())
        }
    }
}

/// Trait for validatable types
pub trait Validatable {
    /// Validate the type and return a result
    fn validate_all(&self) -> ValidationResult;
}

/// Extension to convert validator errors to our format
pub trait ValidatorExt {
    fn to_validation_result(&self) -> ValidationResult;
}

impl<T: Validate> ValidatorExt for T {
    fn to_validation_result(&self) -> ValidationResult {
        match self.validate() {
            Ok(_) => ValidationResult::success(),
            Err(errors) => {
                let mut result = ValidationResult::success();

                for (field, field_errors) in errors.field_errors() {
                    for error in field_errors {
                        let message = error
                            .message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| error.code.to_string());
                        result.add_field_error(field.to_string(), message);
                    }
                }

                result
            }
        }
    }
}

/// Common validation rules
pub struct ValidationRules;

impl ValidationRules {
    /// Validate a sub-score against its inclusive bounds
    pub fn validate_sub_score(value: u8, field: &str, min: u8, max: u8) -> ValidationResult {
        let mut result = ValidationResult::success();

        if value < min || value > max {
            result.add_field_error(field, format!("Must be between {} and {}", min, max));
        }

        result
    }

    /// Validate a string length
    pub fn validate_length(
        value: &str,
        field: &str,
        min: Option<usize>,
        max: Option<usize>,
    ) -> ValidationResult {
        let mut result = ValidationResult::success();

        if let Some(min_len) = min {
            if value.chars().count() < min_len {
                result.add_field_error(field, format!("Must be at least {} characters", min_len));
            }
        }

        if let Some(max_len) = max {
            if value.chars().count() > max_len {
                result.add_field_error(field, format!("Must be {} characters or less", max_len));
            }
        }

        result
    }
}
