//! Error types for overflow detection.

use thiserror::Error;

/// Errors that can occur when starting a detection scan.
///
/// All of them are raised before the first sample is read. Once a scan has
/// started it cannot fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DetectError {
    /// A detection parameter was negative (or NaN, for the threshold).
    #[error("Invalid parameter `{parameter}`: must be non-negative, got {value}")]
    InvalidParameter {
        /// Parameter name as exposed at the HTTP boundary.
        parameter: &'static str,
        /// The rejected value, formatted for display.
        value: String,
    },
}

impl DetectError {
    pub(crate) fn invalid(parameter: &'static str, value: impl ToString) -> Self {
        DetectError::InvalidParameter {
            parameter,
            value: value.to_string(),
        }
    }

    /// Name of the offending parameter.
    pub fn parameter(&self) -> &'static str {
        match self {
            DetectError::InvalidParameter { parameter, .. } => parameter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_parameter_and_value() {
        let err = DetectError::invalid("threshold", -0.13);
        assert_eq!(
            err.to_string(),
            "Invalid parameter `threshold`: must be non-negative, got -0.13"
        );
        assert_eq!(err.parameter(), "threshold");
    }
}
