//! Crate-level error type.
//!
//! Every fallible operation of the engine (formatting input, building a
//! request, executing it, rendering the response) reports a `TemplateError`.
//! A non-2xx HTTP status is never an error: it selects the template's error
//! branch and renders normally.

use crate::executor::RequestError;
use thiserror::Error;

/// Errors produced while preparing, executing, or rendering a request template.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Raw user input could not be parsed according to its declared input kind.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The interpolated URL is not a valid absolute HTTP(S) URL.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Transport failure while sending the request or reading the response.
    #[error(transparent)]
    Network(#[from] RequestError),

    /// The response body does not match the branch's declared input kind.
    #[error("Failed to parse response body: {0}")]
    ResponseParse(String),

    /// A placeholder referenced a path that does not exist in the data context
    /// while the strict missing-value policy is active.
    #[error("Missing value for placeholder '{{{{{path}}}}}'")]
    MissingValue { path: String },

    /// The template document itself is malformed.
    #[error("Invalid template: {0}")]
    InvalidTemplate(String),
}

impl TemplateError {
    /// Returns true for failures caused by the network rather than by the
    /// template, its data, or the response body.
    pub fn is_network(&self) -> bool {
        matches!(self, TemplateError::Network(_))
    }
}
