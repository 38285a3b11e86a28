//! Constraint checks called by generated `validate()` methods
//!
//! Each helper checks one declared constraint and returns the first
//! violation. Generated code calls them in field order with `?`.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Compiled `pattern` constraints, keyed by their source text
static PATTERNS: Lazy<Mutex<HashMap<String, Regex>>> = Lazy::new(|| Mutex::new(HashMap::new()));

/// A violated input constraint
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{field}: length {actual} exceeds maxLength {max}")]
    MaxLength {
        field: String,
        max: usize,
        actual: usize,
    },

    #[error("{field}: length {actual} is below minLength {min}")]
    MinLength {
        field: String,
        min: usize,
        actual: usize,
    },

    #[error("{field}: value does not match pattern '{pattern}'")]
    Pattern { field: String, pattern: String },

    #[error("{field}: pattern '{pattern}' is not a valid regular expression: {reason}")]
    InvalidPattern {
        field: String,
        pattern: String,
        reason: String,
    },

    #[error("{field}: '{actual}' is not one of [{}]", .allowed.join(", "))]
    Enum {
        field: String,
        allowed: Vec<String>,
        actual: String,
    },

    #[error("{field}: {actual} exceeds maximum {limit}{}", exclusive_suffix(.exclusive))]
    Maximum {
        field: String,
        limit: f64,
        exclusive: bool,
        actual: f64,
    },

    #[error("{field}: {actual} is below minimum {limit}{}", exclusive_suffix(.exclusive))]
    Minimum {
        field: String,
        limit: f64,
        exclusive: bool,
        actual: f64,
    },

    #[error("{field}: {actual} is not a multiple of {factor}")]
    MultipleOf {
        field: String,
        factor: f64,
        actual: f64,
    },
}

fn exclusive_suffix(exclusive: &bool) -> &'static str {
    if *exclusive { " (exclusive)" } else { "" }
}

impl ValidationError {
    /// Name of the offending input field
    pub fn field(&self) -> &str {
        match self {
            ValidationError::MaxLength { field, .. }
            | ValidationError::MinLength { field, .. }
            | ValidationError::Pattern { field, .. }
            | ValidationError::InvalidPattern { field, .. }
            | ValidationError::Enum { field, .. }
            | ValidationError::Maximum { field, .. }
            | ValidationError::Minimum { field, .. }
            | ValidationError::MultipleOf { field, .. } => field,
        }
    }
}

/// Length in characters, matching JSON Schema semantics
pub fn max_length(field: &str, value: &str, max: usize) -> Result<(), ValidationError> {
    let actual = value.chars().count();
    if actual > max {
        return Err(ValidationError::MaxLength {
            field: field.to_string(),
            max,
            actual,
        });
    }
    Ok(())
}

pub fn min_length(field: &str, value: &str, min: usize) -> Result<(), ValidationError> {
    let actual = value.chars().count();
    if actual < min {
        return Err(ValidationError::MinLength {
            field: field.to_string(),
            min,
            actual,
        });
    }
    Ok(())
}

/// Unanchored match, as JSON Schema defines `pattern`
pub fn pattern(field: &str, value: &str, pattern: &str) -> Result<(), ValidationError> {
    let regex = compiled(pattern).map_err(|e| ValidationError::InvalidPattern {
        field: field.to_string(),
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })?;
    if !regex.is_match(value) {
        return Err(ValidationError::Pattern {
            field: field.to_string(),
            pattern: pattern.to_string(),
        });
    }
    Ok(())
}

fn compiled(pattern: &str) -> Result<Regex, regex::Error> {
    let mut cache = PATTERNS.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(regex) = cache.get(pattern) {
        return Ok(regex.clone());
    }
    let regex = Regex::new(pattern)?;
    cache.insert(pattern.to_string(), regex.clone());
    Ok(regex)
}

/// Enum check; non-string values are compared by their text form
pub fn one_of(field: &str, value: &str, allowed: &[&str]) -> Result<(), ValidationError> {
    if !allowed.contains(&value) {
        return Err(ValidationError::Enum {
            field: field.to_string(),
            allowed: allowed.iter().map(|s| s.to_string()).collect(),
            actual: value.to_string(),
        });
    }
    Ok(())
}

pub fn maximum(field: &str, value: f64, limit: f64, exclusive: bool) -> Result<(), ValidationError> {
    let violated = if exclusive { value >= limit } else { value > limit };
    if violated {
        return Err(ValidationError::Maximum {
            field: field.to_string(),
            limit,
            exclusive,
            actual: value,
        });
    }
    Ok(())
}

pub fn minimum(field: &str, value: f64, limit: f64, exclusive: bool) -> Result<(), ValidationError> {
    let violated = if exclusive { value <= limit } else { value < limit };
    if violated {
        return Err(ValidationError::Minimum {
            field: field.to_string(),
            limit,
            exclusive,
            actual: value,
        });
    }
    Ok(())
}

pub fn multiple_of(field: &str, value: f64, factor: f64) -> Result<(), ValidationError> {
    if factor == 0.0 {
        return Ok(());
    }
    let quotient = value / factor;
    if (quotient - quotient.round()).abs() > 1e-9 {
        return Err(ValidationError::MultipleOf {
            field: field.to_string(),
            factor,
            actual: value,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_counts_characters() {
        assert!(max_length("name", "héllo", 5).is_ok());
        let err = max_length("name", "héllo!", 5).unwrap_err();
        assert_eq!(err.to_string(), "name: length 6 exceeds maxLength 5");
        assert!(min_length("name", "", 1).is_err());
    }

    #[test]
    fn test_pattern() {
        assert!(pattern("sku", "AB-123", r"^[A-Z]{2}-\d+$").is_ok());
        assert!(matches!(
            pattern("sku", "ab-123", r"^[A-Z]{2}-\d+$"),
            Err(ValidationError::Pattern { .. })
        ));
        assert!(matches!(
            pattern("sku", "x", "("),
            Err(ValidationError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_patterns_are_compiled_once() {
        let source = r"^cache-\d{3}$";
        assert!(pattern("tag", "cache-123", source).is_ok());
        assert!(pattern("tag", "cache-12", source).is_err());
        let cache = PATTERNS.lock().unwrap();
        assert_eq!(cache.keys().filter(|k| k.as_str() == source).count(), 1);
        assert!(!cache.contains_key("("));
    }

    #[test]
    fn test_one_of() {
        assert!(one_of("status", "sold", &["available", "sold"]).is_ok());
        let err = one_of("status", "lost", &["available", "sold"]).unwrap_err();
        assert_eq!(err.to_string(), "status: 'lost' is not one of [available, sold]");
        assert_eq!(err.field(), "status");
    }

    #[test]
    fn test_bounds_respect_exclusive_flag() {
        assert!(maximum("limit", 100.0, 100.0, false).is_ok());
        assert!(maximum("limit", 100.0, 100.0, true).is_err());
        assert!(minimum("limit", 1.0, 1.0, false).is_ok());
        assert!(minimum("limit", 1.0, 1.0, true).is_err());
        assert!(minimum("limit", 0.5, 1.0, false).is_err());
    }

    #[test]
    fn test_multiple_of() {
        assert!(multiple_of("step", 15.0, 5.0).is_ok());
        assert!(multiple_of("step", 0.3, 0.1).is_ok());
        assert!(multiple_of("step", 7.0, 5.0).is_err());
    }
}
