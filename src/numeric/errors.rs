// ============================================================================
// Numeric Errors
// Error types for arbitrary-precision decimal operations
// ============================================================================

use std::fmt;

/// Errors raised by decimal operations.
///
/// Numeric edge cases (division by zero, overflow, operations on NaN or
/// Infinity) are not errors: they produce special values. Only the three
/// conditions below are reported.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DecimalError {
    /// Malformed literal, out-of-range configuration value or argument,
    /// or a non-integer where an integer is required. Carries the offending token.
    InvalidArgument(String),
    /// A precomputed constant (π or ln 10) was requested beyond its stored digits
    PrecisionLimitExceeded,
    /// A secure random source was requested but none is available
    SecureRandomUnavailable,
}

impl DecimalError {
    pub(crate) fn invalid(token: impl fmt::Display) -> Self {
        DecimalError::InvalidArgument(token.to_string())
    }
}

impl fmt::Display for DecimalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecimalError::InvalidArgument(token) => {
                write!(f, "[DecimalError] Invalid argument: {}", token)
            },
            DecimalError::PrecisionLimitExceeded => {
                write!(f, "[DecimalError] Precision limit exceeded")
            },
            DecimalError::SecureRandomUnavailable => {
                write!(f, "[DecimalError] crypto unavailable")
            },
        }
    }
}

impl std::error::Error for DecimalError {}

/// Result type alias for decimal operations
pub type DecimalResult<T> = Result<T, DecimalError>;
