//! Shared validation rules for the health record model.
//!
//! Every property setter in `hrv-model` funnels its input through the functions in this crate so
//! that a rejected value always surfaces as the same tagged [`ValidationError`] variant, whichever
//! type raised it.
//!
//! Two kinds of failure exist:
//! - [`ValidationError::Argument`]: the value is missing content the field requires (empty or
//!   whitespace-only text).
//! - [`ValidationError::Range`]: the value is well-formed but outside the field's domain (an hour
//!   of 24, a length of zero metres).

use std::fmt::Display;
use std::ops::RangeInclusive;

/// Errors raised when a value is rejected by a field's rules.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The value lies outside the permitted domain of the field.
    #[error("{field} is out of range: {reason}")]
    Range { field: &'static str, reason: String },

    /// The value is empty, whitespace-only or otherwise unusable for the field.
    #[error("invalid argument for {field}: {reason}")]
    Argument { field: &'static str, reason: String },
}

impl ValidationError {
    /// Name of the field that rejected the value.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::Range { field, .. } | ValidationError::Argument { field, .. } => field,
        }
    }
}

/// Type alias for Results that can fail with a [`ValidationError`].
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Accepts text that carries at least one non-whitespace character.
///
/// The text is returned unchanged (not trimmed) so that what the user entered is what gets
/// written back to the service.
///
/// # Errors
///
/// Returns [`ValidationError::Argument`] if the input is empty or whitespace-only.
pub fn non_blank(field: &'static str, value: impl Into<String>) -> ValidationResult<String> {
    let value = value.into();
    if value.trim().is_empty() {
        return Err(ValidationError::Argument {
            field,
            reason: "cannot be empty or whitespace".into(),
        });
    }
    Ok(value)
}

/// Same as [`non_blank`] for optional fields: `None` clears the field and is always accepted.
pub fn optional_non_blank(
    field: &'static str,
    value: Option<String>,
) -> ValidationResult<Option<String>> {
    value.map(|v| non_blank(field, v)).transpose()
}

/// Accepts a value inside an inclusive range.
///
/// # Errors
///
/// Returns [`ValidationError::Range`] naming the permitted bounds.
pub fn in_range<T>(field: &'static str, value: T, range: RangeInclusive<T>) -> ValidationResult<T>
where
    T: PartialOrd + Display + Copy,
{
    if !range.contains(&value) {
        return Err(ValidationError::Range {
            field,
            reason: format!(
                "{} is not between {} and {}",
                value,
                range.start(),
                range.end()
            ),
        });
    }
    Ok(value)
}

/// Accepts any finite floating point value.
pub fn finite(field: &'static str, value: f64) -> ValidationResult<f64> {
    if !value.is_finite() {
        return Err(ValidationError::Range {
            field,
            reason: format!("{value} is not a finite number"),
        });
    }
    Ok(value)
}

/// Accepts a finite value strictly greater than zero.
pub fn positive(field: &'static str, value: f64) -> ValidationResult<f64> {
    let value = finite(field, value)?;
    if value <= 0.0 {
        return Err(ValidationError::Range {
            field,
            reason: format!("{value} must be greater than zero"),
        });
    }
    Ok(value)
}

/// Accepts a finite value greater than or equal to zero.
pub fn non_negative(field: &'static str, value: f64) -> ValidationResult<f64> {
    let value = finite(field, value)?;
    if value < 0.0 {
        return Err(ValidationError::Range {
            field,
            reason: format!("{value} must not be negative"),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_blank_accepts_text_and_keeps_it_verbatim() {
        assert_eq!(non_blank("name", "  Aspirin ").unwrap(), "  Aspirin ");
    }

    #[test]
    fn non_blank_rejects_empty_and_whitespace() {
        let err = non_blank("name", "").expect_err("should reject empty");
        assert!(matches!(err, ValidationError::Argument { field: "name", .. }));

        let err = non_blank("name", " \t\n").expect_err("should reject whitespace");
        assert!(matches!(err, ValidationError::Argument { field: "name", .. }));
    }

    #[test]
    fn optional_non_blank_allows_clearing() {
        assert_eq!(optional_non_blank("title", None).unwrap(), None);
        assert!(optional_non_blank("title", Some(" ".into())).is_err());
        assert_eq!(
            optional_non_blank("title", Some("Dr".into())).unwrap(),
            Some("Dr".to_string())
        );
    }

    #[test]
    fn in_range_is_inclusive_at_both_ends() {
        assert_eq!(in_range("year", 1000, 1000..=9999).unwrap(), 1000);
        assert_eq!(in_range("year", 9999, 1000..=9999).unwrap(), 9999);

        let err = in_range("year", 999, 1000..=9999).expect_err("should reject 999");
        assert_eq!(err.field(), "year");
        assert!(matches!(err, ValidationError::Range { reason, .. } if reason.contains("999")));
    }

    #[test]
    fn positive_rejects_zero_negative_and_nan() {
        assert!(positive("length", 0.0).is_err());
        assert!(positive("length", -1.0).is_err());
        assert!(positive("length", f64::NAN).is_err());
        assert_eq!(positive("length", 1.83).unwrap(), 1.83);
    }

    #[test]
    fn non_negative_accepts_zero() {
        assert_eq!(non_negative("weight", 0.0).unwrap(), 0.0);
        assert!(non_negative("weight", -0.5).is_err());
        assert!(finite("altitude", f64::INFINITY).is_err());
        assert_eq!(finite("altitude", -12.0).unwrap(), -12.0);
    }
}
