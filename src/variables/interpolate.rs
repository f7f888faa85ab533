//! Placeholder interpolation engine.
//!
//! This module replaces `{{path}}` placeholders in a string template with
//! values looked up in a JSON data context. It is used for every templated
//! field of a request (URL, query, headers, body) and for the output template
//! rendered from a response body.
//!
//! Substitution is a single pass: inserted values are never scanned again, so
//! data coming from users or remote servers cannot inject placeholders.

use super::escape::EscapeFn;
use super::path::{resolve_path, value_to_string};
use crate::error::TemplateError;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Matches an escaped opening `\{{`, an escaped closing `\}}`, or a
/// `{{path}}` placeholder (path captured in group 1).
static PLACEHOLDER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\\\{\{|\\\}\}|\{\{([^}]+)\}\}").expect("Failed to compile placeholder regex")
});

/// Matches a template made of exactly one placeholder.
static SOLE_PLACEHOLDER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\{\{([^}]+)\}\}$").expect("Failed to compile sole placeholder regex")
});

/// What to do when a placeholder path is not present in the data context.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingPolicy {
    /// Substitute an empty string.
    #[default]
    Lenient,
    /// Fail with `TemplateError::MissingValue`.
    Strict,
}

/// Substitutes placeholders in string templates using a data context.
///
/// An `Interpolator` is a small `Copy` value: a missing-value policy plus an
/// optional escape function applied to every substituted value.
///
/// # Examples
///
/// ```
/// use request_template::variables::{escape, Interpolator};
/// use serde_json::json;
///
/// let context = json!({"q": "rust lang", "page": 2});
///
/// let plain = Interpolator::lenient();
/// assert_eq!(plain.interpolate("q={{q}}&p={{page}}", &context).unwrap(), "q=rust lang&p=2");
///
/// let for_urls = plain.with_escape(escape::url_component);
/// assert_eq!(for_urls.interpolate("/search/{{q}}", &context).unwrap(), "/search/rust%20lang");
/// ```
#[derive(Clone, Copy, Default)]
pub struct Interpolator {
    policy: MissingPolicy,
    escape: Option<EscapeFn>,
}

impl std::fmt::Debug for Interpolator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interpolator")
            .field("policy", &self.policy)
            .field("escaped", &self.escape.is_some())
            .finish()
    }
}

impl Interpolator {
    /// Creates an interpolator with the given missing-value policy and no escaping.
    pub fn new(policy: MissingPolicy) -> Self {
        Self {
            policy,
            escape: None,
        }
    }

    /// Missing paths become empty strings.
    pub fn lenient() -> Self {
        Self::new(MissingPolicy::Lenient)
    }

    /// Missing paths are errors.
    pub fn strict() -> Self {
        Self::new(MissingPolicy::Strict)
    }

    /// Returns a copy of this interpolator that passes substituted values
    /// through `escape` before insertion.
    pub fn with_escape(self, escape: EscapeFn) -> Self {
        Self {
            escape: Some(escape),
            ..self
        }
    }

    /// Returns a copy of this interpolator without escaping.
    pub fn without_escape(self) -> Self {
        Self {
            escape: None,
            ..self
        }
    }

    /// The active missing-value policy.
    pub fn policy(&self) -> MissingPolicy {
        self.policy
    }

    /// Substitutes every placeholder in `template`.
    ///
    /// Literal text outside placeholders, including `\{{` / `\}}` escapes
    /// (emitted as `{{` / `}}`), passes through unchanged.
    pub fn interpolate(&self, template: &str, context: &Value) -> Result<String, TemplateError> {
        // Fast path: nothing to substitute
        if !template.contains("{{") && !template.contains("\\}}") {
            return Ok(template.to_string());
        }

        let mut result = String::with_capacity(template.len() + template.len() / 4);
        let mut last_match_end = 0;

        for cap in PLACEHOLDER_REGEX.captures_iter(template) {
            let Some(full_match) = cap.get(0) else {
                continue;
            };
            result.push_str(&template[last_match_end..full_match.start()]);
            result.push_str(&self.substitute(&cap, context)?);
            last_match_end = full_match.end();
        }

        result.push_str(&template[last_match_end..]);
        Ok(result)
    }

    /// Like [`interpolate`](Self::interpolate), but reports an absent value.
    ///
    /// When the template is exactly one placeholder and its path resolves to
    /// `null` or is missing, returns `Ok(None)`. Under the strict policy a
    /// missing path is still an error. Any other template yields `Some`.
    pub fn interpolate_optional(
        &self,
        template: &str,
        context: &Value,
    ) -> Result<Option<String>, TemplateError> {
        if let Some(cap) = SOLE_PLACEHOLDER_REGEX.captures(template) {
            let path = cap[1].trim();
            match resolve_path(context, path) {
                Some(Value::Null) => return Ok(None),
                None if self.policy == MissingPolicy::Lenient => return Ok(None),
                None => return Err(missing(path)),
                Some(_) => {}
            }
        }

        self.interpolate(template, context).map(Some)
    }

    /// Interpolates every string leaf of a JSON tree.
    ///
    /// Objects and arrays recurse; numbers, booleans and `null` pass through
    /// unchanged. Object keys are not interpolated.
    pub fn interpolate_value(&self, template: &Value, context: &Value) -> Result<Value, TemplateError> {
        Ok(match template {
            Value::String(s) => Value::String(self.interpolate(s, context)?),
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|item| self.interpolate_value(item, context))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            Value::Object(fields) => {
                let mut out = Map::with_capacity(fields.len());
                for (key, value) in fields {
                    out.insert(key.clone(), self.interpolate_value(value, context)?);
                }
                Value::Object(out)
            }
            Value::Null | Value::Bool(_) | Value::Number(_) => template.clone(),
        })
    }

    fn substitute(&self, cap: &Captures<'_>, context: &Value) -> Result<String, TemplateError> {
        let Some(path) = cap.get(1) else {
            // Escaped brace pair
            return Ok(if cap[0].starts_with("\\{") { "{{" } else { "}}" }.to_string());
        };

        let path = path.as_str().trim();
        let raw = match resolve_path(context, path) {
            Some(value) => value_to_string(value),
            None => match self.policy {
                MissingPolicy::Lenient => String::new(),
                MissingPolicy::Strict => return Err(missing(path)),
            },
        };

        Ok(match self.escape {
            Some(escape) => escape(&raw),
            None => raw,
        })
    }
}

fn missing(path: &str) -> TemplateError {
    TemplateError::MissingValue {
        path: path.to_string(),
    }
}

/// Interpolates `template` against `context` with the lenient policy.
///
/// Missing paths become empty strings, so this never fails.
///
/// # Examples
///
/// ```
/// use request_template::variables::interpolate;
/// use serde_json::json;
///
/// assert_eq!(interpolate("id={{missing.path}}", &json!({}), None), "id=");
/// assert_eq!(interpolate("Failed: {{.}}", &json!("boom"), None), "Failed: boom");
/// ```
pub fn interpolate(template: &str, context: &Value, escape: Option<EscapeFn>) -> String {
    Interpolator {
        policy: MissingPolicy::Lenient,
        escape,
    }
    .interpolate(template, context)
    .unwrap_or_default()
}
