//! Client Error Types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, ClientError>;

/// Client-side errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Request could not be sent or the connection dropped
    #[error("Network error: {0}")]
    Network(String),

    /// Server answered `{success: false, message}`
    #[error("{0}")]
    Rejected(String),

    /// Server body could not be read
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// A submission is already in flight
    #[error("A request is already in progress")]
    Busy,

    /// Operation not allowed at the current stage
    #[error("Cannot {action} while {stage}")]
    InvalidStage { action: &'static str, stage: &'static str },

    /// Widget reported a payment for a gateway order this flow did not open
    #[error("Payment does not belong to the current order ({0})")]
    UnknownOrder(String),
}

impl ClientError {
    /// Text shown inline next to the form
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Network(_) => "Could not reach the server. Please try again.".into(),
            ClientError::Decode(_) => "Something went wrong. Please try again.".into(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Network(err.to_string())
        }
    }
}
