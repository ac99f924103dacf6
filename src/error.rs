//! Error types for the Lookback client.

use thiserror::Error;

/// Errors surfaced by Lookback API operations.
///
/// Every failure category is a distinct variant so callers can branch on
/// kind instead of inspecting message text. None of these are retried
/// internally; each is raised to the caller once.
#[derive(Error, Debug)]
pub enum LookbackError {
    /// Client-side configuration problem, detected before any network call.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Network or IO failure while dispatching the request.
    #[error("transport error: {0}")]
    Transport(String),

    /// The server rejected the request with HTTP 401.
    #[error("authorization failed, check username and password")]
    Authorization,

    /// The server response carried no body.
    #[error("no data received from server")]
    NoData,

    /// The response body was not well-formed JSON or did not match the
    /// expected result shape.
    #[error("failed to parse response body: {0}")]
    Parse(String),

    /// The deserialized result is inconsistent with the query that
    /// produced it.
    #[error("result validation failed: {0}")]
    ResultValidation(String),

    /// The previous result carries no further page of data.
    #[error("pagination error: {0}")]
    Pagination(String),
}

/// Result type for Lookback API operations.
pub type Result<T> = std::result::Result<T, LookbackError>;

impl From<reqwest::Error> for LookbackError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for LookbackError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
