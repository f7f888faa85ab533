//! Request templates.
//!
//! Templates are authored as JSON documents (see [`schema`]) and loaded once;
//! the same template can then be executed any number of times with different
//! data contexts.

pub mod schema;

pub use schema::{
    BodyKind, BodyTemplate, InputSpec, OutputKind, RequestTemplate, ResponseBranch,
    ResponseInputKind, ResponseSection,
};

use crate::error::TemplateError;
use std::fs;
use std::path::Path;

/// Parses a template from JSON text.
///
/// # Examples
///
/// ```
/// use request_template::template::parse_template;
///
/// let template = parse_template(r#"{
///     "url": "https://api.example.com/{{q}}",
///     "method": "GET",
///     "response": {
///         "content": {"input_kind": "json", "output_kind": "text", "output": "Result: {{answer}}"},
///         "error": {"input_kind": "text", "output_kind": "text", "output": "Failed: {{.}}"}
///     }
/// }"#).unwrap();
/// assert_eq!(template.url, "https://api.example.com/{{q}}");
/// ```
pub fn parse_template(json: &str) -> Result<RequestTemplate, TemplateError> {
    serde_json::from_str(json).map_err(|e| TemplateError::InvalidTemplate(e.to_string()))
}

/// Reads and parses a template file.
pub fn load_template(path: impl AsRef<Path>) -> Result<RequestTemplate, TemplateError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        TemplateError::InvalidTemplate(format!("failed to read {}: {}", path.display(), e))
    })?;

    parse_template(&content).map_err(|e| match e {
        TemplateError::InvalidTemplate(msg) => {
            TemplateError::InvalidTemplate(format!("{}: {}", path.display(), msg))
        }
        other => other,
    })
}
