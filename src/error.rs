//! Error types for the step analytics server
//!
//! This module provides a comprehensive error type hierarchy using `thiserror`
//! for proper error handling across all components.

use thiserror::Error;

/// The main error type for step analytics operations
#[derive(Error, Debug)]
pub enum Error {
    /// Protocol-level errors (auth, routing, tool invocation)
    #[error("{0}")]
    Protocol(#[from] ProtocolError),

    /// Step store errors, wrapped with the message callers see
    #[error("Failed to fetch step data: {0}")]
    Store(#[from] StoreError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with message
    #[error("{0}")]
    Generic(String),
}

/// Protocol errors, one variant per error class the wire protocol can report
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// Shared-secret check failed
    #[error("Unauthorized")]
    Unauthorized,

    /// Unknown method name
    #[error("Method not found: {0}")]
    MethodNotFound(String),

    /// Tool name not in the catalog
    #[error("Unknown tool: {0}")]
    ToolNotFound(String),

    /// Tool ran but failed
    #[error("Tool execution failed: {0}")]
    ToolExecutionFailed(String),

    /// Unexpected fault; detail goes to logs, never to the caller
    #[error("Internal server error")]
    Internal,
}

impl ProtocolError {
    /// Numeric error code carried in the response envelope
    pub fn code(&self) -> i32 {
        match self {
            ProtocolError::Unauthorized => 401,
            ProtocolError::MethodNotFound(_) | ProtocolError::ToolNotFound(_) => -32601,
            ProtocolError::ToolExecutionFailed(_) | ProtocolError::Internal => -32603,
        }
    }
}

/// Step store errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// Request could not be sent or completed
    #[error("Request failed: {0}")]
    Request(String),

    /// Store answered with a non-success status
    #[error("Store responded with status {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body or status text
        message: String,
    },

    /// Response body did not match the row contract
    #[error("Failed to decode step rows: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            StoreError::Decode(err.to_string())
        } else {
            StoreError::Request(err.to_string())
        }
    }
}

/// Result type alias for step analytics operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a generic error from a string
    pub fn generic<S: Into<String>>(msg: S) -> Self {
        Error::Generic(msg.into())
    }
}
