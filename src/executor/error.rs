//! HTTP transport error types.
//!
//! This module defines the errors an `HttpClient` can report while sending a
//! built request, including network errors, timeouts, and TLS issues.

use thiserror::Error;

/// Errors that can occur while sending a request over the network.
#[derive(Debug, Error)]
pub enum RequestError {
    /// Network error occurred during request execution.
    ///
    /// This includes connection failures, DNS resolution errors,
    /// and failures while reading the response body.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Request timed out before completion.
    ///
    /// Only possible when a timeout has been configured.
    #[error("Request timed out")]
    Timeout,

    /// TLS/SSL error occurred during HTTPS connection.
    #[error("TLS/SSL error: {0}")]
    TlsError(String),

    /// The HTTP client could not be constructed or the request could not be
    /// assembled from the descriptor (e.g. an invalid header name).
    #[error("Request build error: {0}")]
    BuildError(String),
}

/// Convert reqwest errors to RequestError.
impl From<reqwest::Error> for RequestError {
    fn from(err: reqwest::Error) -> Self {
        let message = err.to_string();
        if err.is_timeout() {
            RequestError::Timeout
        } else if err.is_builder() {
            RequestError::BuildError(message)
        } else if message.contains("certificate") || message.contains("TLS") || message.contains("SSL")
        {
            RequestError::TlsError(message)
        } else if err.is_connect() {
            RequestError::NetworkError(format!("Connection failed: {}", message))
        } else {
            RequestError::NetworkError(message)
        }
    }
}
