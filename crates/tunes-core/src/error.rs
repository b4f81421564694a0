//! Error Types

use thiserror::Error;

/// Result type alias for domain operations
pub type Result<T> = std::result::Result<T, CoreError>;

/// Domain validation errors
///
/// Every variant is safe to echo back to the customer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A required field was absent or blank
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Price could not be parsed or was not positive
    #[error("Invalid package price.")]
    InvalidPrice,

    /// Any other malformed input
    #[error("{0}")]
    Invalid(String),
}

impl CoreError {
    /// Name of the offending field, when there is one
    pub fn field(&self) -> Option<&'static str> {
        match self {
            CoreError::MissingField(field) => Some(field),
            CoreError::InvalidPrice => Some("packagePrice"),
            CoreError::Invalid(_) => None,
        }
    }
}
