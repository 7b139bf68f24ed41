//! Validation error types

use std::fmt;

/// Validation error for request models and parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required field or parameter is missing or empty
    Empty { field: &'static str },

    /// Numeric field must be strictly positive
    NotPositive { field: &'static str },

    /// Value doesn't parse into the expected form (UUID, boolean, ...)
    InvalidFormat { field: &'static str, reason: &'static str },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "please provide the valid {}", field),
            Self::NotPositive { field } => write!(f, "{} must be greater than zero", field),
            Self::InvalidFormat { field, reason } => write!(f, "{}: {}", field, reason),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Require a strictly positive value for `field`.
pub(crate) fn positive(field: &'static str, value: i64) -> Result<(), ValidationError> {
    if value <= 0 {
        return Err(ValidationError::NotPositive { field });
    }
    Ok(())
}
