//! Raw user input formatting.
//!
//! Before a data context is assembled, the raw string a user typed is turned
//! into a typed value according to the template's declared input kind.

use crate::error::TemplateError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

static WHITESPACE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("Failed to compile whitespace regex"));

static COMMA_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*,\s*").expect("Failed to compile comma regex"));

/// Declared shape of a raw input string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InputKind {
    /// Parse as a JSON document.
    Json,
    /// Split on runs of whitespace.
    SpaceSeparated,
    /// Split on commas, absorbing whitespace around each comma.
    CommaSeparated,
    /// Keep the string as-is.
    #[default]
    Text,
}

impl InputKind {
    /// Returns the wire name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            InputKind::Json => "json",
            InputKind::SpaceSeparated => "space-separated",
            InputKind::CommaSeparated => "comma-separated",
            InputKind::Text => "text",
        }
    }
}

impl std::fmt::Display for InputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses `raw` into a typed value according to `kind`.
///
/// - `Json`: the parsed document, or `TemplateError::InvalidInput`.
/// - `SpaceSeparated` / `CommaSeparated`: an array of strings. Empty input
///   yields an empty array. No trimming happens beyond what splitting
///   implies, so leading or trailing separators produce empty elements.
/// - `Text`: the input unchanged, as a JSON string.
///
/// # Examples
///
/// ```
/// use request_template::variables::{format_input, InputKind};
/// use serde_json::json;
///
/// assert_eq!(format_input("a, b , c", InputKind::CommaSeparated).unwrap(), json!(["a", "b", "c"]));
/// assert_eq!(format_input("a  b\tc", InputKind::SpaceSeparated).unwrap(), json!(["a", "b", "c"]));
/// assert_eq!(format_input(r#"{"n": 1}"#, InputKind::Json).unwrap(), json!({"n": 1}));
/// ```
pub fn format_input(raw: &str, kind: InputKind) -> Result<Value, TemplateError> {
    match kind {
        InputKind::Json => {
            serde_json::from_str(raw).map_err(|e| TemplateError::InvalidInput(e.to_string()))
        }
        InputKind::SpaceSeparated => Ok(split(raw, &WHITESPACE_REGEX)),
        InputKind::CommaSeparated => Ok(split(raw, &COMMA_REGEX)),
        InputKind::Text => Ok(Value::String(raw.to_string())),
    }
}

fn split(raw: &str, separator: &Regex) -> Value {
    if raw.is_empty() {
        return Value::Array(Vec::new());
    }
    Value::Array(
        separator
            .split(raw)
            .map(|part| Value::String(part.to_string()))
            .collect(),
    )
}
