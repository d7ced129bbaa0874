//! Error types and handling for `TripScout`

use thiserror::Error;

/// Main error type for the `TripScout` service
#[derive(Error, Debug)]
pub enum TripScoutError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Caller input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Socket and other I/O failures
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl TripScoutError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Whether the caller caused this error
    #[must_use]
    pub fn is_caller_error(&self) -> bool {
        matches!(self, TripScoutError::Validation { .. })
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            TripScoutError::Validation { message } => message.clone(),
            TripScoutError::Config { .. } => {
                "Service is misconfigured. Please contact the operator.".to_string()
            }
            TripScoutError::Io { .. } => "Internal server error".to_string(),
        }
    }
}
