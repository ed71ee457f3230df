//! Error types for deployment validation and cost analysis

use thiserror::Error;

/// A field violated one of its declared constraints.
///
/// Raised synchronously while constructing (or deserializing) a model
/// type. Every variant names the offending field so front ends can report
/// it back to the user unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Value is lower than the field's minimum
    #[error("{field} must be >= {min}, got {actual}")]
    BelowMinimum {
        field: &'static str,
        min: f64,
        actual: f64,
    },

    /// Value is higher than the field's maximum
    #[error("{field} must be <= {max}, got {actual}")]
    AboveMaximum {
        field: &'static str,
        max: f64,
        actual: f64,
    },

    /// NaN or infinite float
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },

    /// Traffic split percentages do not add up to 100
    #[error("traffic split percentages must sum to 100% (±{tolerance}), got {actual}")]
    SplitSum { actual: f64, tolerance: f64 },

    /// Value is not one of the accepted literals
    #[error("{field} must be one of [{allowed}], got '{actual}'")]
    NotAllowed {
        field: &'static str,
        allowed: &'static str,
        actual: String,
    },

    /// Required text field is empty
    #[error("{field} must not be blank")]
    Blank { field: &'static str },
}

impl ValidationError {
    /// Name of the field that failed validation
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::BelowMinimum { field, .. }
            | ValidationError::AboveMaximum { field, .. }
            | ValidationError::NotFinite { field }
            | ValidationError::NotAllowed { field, .. }
            | ValidationError::Blank { field } => field,
            ValidationError::SplitSum { .. } => "traffic_split",
        }
    }
}

/// Errors surfaced by the calculator, optimizer and plugin layers
#[derive(Debug, Error)]
pub enum TcoError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("failed to load pricing catalog: {0}")]
    Pricing(#[from] config::ConfigError),

    #[error("pricing catalog has no entry for {0}")]
    MissingRate(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Input parsed as JSON but did not describe a valid deployment or command
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl TcoError {
    /// Short machine-readable error kind, used in plugin and HTTP envelopes
    pub fn kind(&self) -> &'static str {
        match self {
            TcoError::Validation(_) | TcoError::InvalidInput(_) => "validation",
            TcoError::Pricing(_) | TcoError::MissingRate(_) => "pricing",
            TcoError::Serialization(_) => "serialization",
            TcoError::InvalidRequest(_) => "invalid_request",
        }
    }
}

pub type Result<T> = std::result::Result<T, TcoError>;

/// Check a float lies in `[min, +inf)` and is finite
pub(crate) fn check_min_f64(
    field: &'static str,
    value: f64,
    min: f64,
) -> std::result::Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite { field });
    }
    if value < min {
        return Err(ValidationError::BelowMinimum {
            field,
            min,
            actual: value,
        });
    }
    Ok(value)
}

/// Check a float lies in `[min, max]` and is finite
pub(crate) fn check_range_f64(
    field: &'static str,
    value: f64,
    min: f64,
    max: f64,
) -> std::result::Result<f64, ValidationError> {
    let value = check_min_f64(field, value, min)?;
    if value > max {
        return Err(ValidationError::AboveMaximum {
            field,
            max,
            actual: value,
        });
    }
    Ok(value)
}

/// Check an integer is at least `min` and fits in a `u32`
pub(crate) fn check_u32(
    field: &'static str,
    value: i64,
    min: u32,
) -> std::result::Result<u32, ValidationError> {
    if value < i64::from(min) {
        return Err(ValidationError::BelowMinimum {
            field,
            min: f64::from(min),
            actual: value as f64,
        });
    }
    u32::try_from(value).map_err(|_| ValidationError::AboveMaximum {
        field,
        max: f64::from(u32::MAX),
        actual: value as f64,
    })
}

/// Check an integer is non-negative
pub(crate) fn check_u64(field: &'static str, value: i64) -> std::result::Result<u64, ValidationError> {
    u64::try_from(value).map_err(|_| ValidationError::BelowMinimum {
        field,
        min: 0.0,
        actual: value as f64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_reported_for_each_variant() {
        let err = check_min_f64("peak_bandwidth", -1.0, 0.0).unwrap_err();
        assert_eq!(err.field(), "peak_bandwidth");

        let err = check_range_f64("direct_connect_percent", 150.0, 0.0, 100.0).unwrap_err();
        assert_eq!(err.field(), "direct_connect_percent");
        assert!(matches!(err, ValidationError::AboveMaximum { .. }));

        let err = ValidationError::SplitSum {
            actual: 101.0,
            tolerance: 0.01,
        };
        assert_eq!(err.field(), "traffic_split");
    }

    #[test]
    fn test_nan_is_not_finite() {
        let err = check_min_f64("monthly_tonnage", f64::NAN, 0.0).unwrap_err();
        assert_eq!(err, ValidationError::NotFinite { field: "monthly_tonnage" });
    }

    #[test]
    fn test_int_below_minimum_message() {
        let err = check_u32("vcpu", 0, 1).unwrap_err();
        assert_eq!(err.to_string(), "vcpu must be >= 1, got 0");
    }

    #[test]
    fn test_int_overflow_rejected() {
        let err = check_u32("memory", i64::from(u32::MAX) + 1, 1).unwrap_err();
        assert!(matches!(err, ValidationError::AboveMaximum { field: "memory", .. }));
    }

    #[test]
    fn test_negative_storage_rejected() {
        let err = check_u64("ebs_storage", -5).unwrap_err();
        assert_eq!(err.to_string(), "ebs_storage must be >= 0, got -5");
        assert_eq!(check_u64("ebs_storage", 0).unwrap(), 0);
    }

    #[test]
    fn test_tco_error_kind() {
        let err: TcoError = ValidationError::Blank { field: "region" }.into();
        assert_eq!(err.kind(), "validation");
        assert!(err.to_string().contains("region must not be blank"));
    }
}
