//! # Client Error Types
//!
//! Unified error handling for the dbt Cloud client. Nothing in this crate
//! retries or recovers from an error; every variant reaches the caller.

use thiserror::Error;

/// Client operation result type
pub type ClientResult<T> = Result<T, ClientError>;

/// Error types for client operations
#[derive(Debug, Error)]
pub enum ClientError {
    /// Required identifiers were missing; raised before any request is sent.
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("JSON serialization/deserialization failed: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Invalid response: {field} - {reason}")]
    InvalidResponse { field: String, reason: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl ClientError {
    /// Create an invalid credentials error
    pub fn invalid_credentials(message: impl Into<String>) -> Self {
        Self::InvalidCredentials(message.into())
    }

    /// Create an API error from an HTTP status and response body
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError(message.into())
    }

    /// Create an invalid response error
    ///
    /// Used when a response parses as JSON but lacks the shape a domain
    /// method extracts from it (`data`, `data.id`). Never defaulted.
    pub fn invalid_response(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidResponse {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Check if error is worth retrying by the caller.
    ///
    /// The client itself never retries.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            ClientError::HttpError(e) => e.is_timeout() || e.is_connect(),
            ClientError::ApiError { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// True for the local precondition failure raised before any request.
    #[must_use]
    pub fn is_invalid_credentials(&self) -> bool {
        matches!(self, ClientError::InvalidCredentials(_))
    }
}
