//! Request template schema.
//!
//! A `RequestTemplate` is author-supplied JSON configuration describing one
//! outbound HTTP request and how to render its response. It is never mutated
//! at runtime.
//!
//! # Example
//!
//! ```json
//! {
//!   "url": "https://api.example.com/search/{{q}}",
//!   "method": "GET",
//!   "headers": {"Authorization": "Bearer {{token}}"},
//!   "query": {"limit": "{{limit}}"},
//!   "input": {"kind": "space-separated"},
//!   "body": null,
//!   "response": {
//!     "content": {"input_kind": "json", "output_kind": "markdown", "output": "*{{title}}*"},
//!     "error": {"input_kind": "text", "output_kind": "text", "output": "Failed: {{.}}"}
//!   }
//! }
//! ```
//!
//! Authored templates may also use `type` for `kind`, and `input_type` /
//! `output_type` for `input_kind` / `output_kind`.

use crate::error::TemplateError;
use crate::models::HttpMethod;
use crate::variables::{format_input, InputKind};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Immutable description of one HTTP request and the rendering of its response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestTemplate {
    /// URL template. Substituted values are percent-encoded.
    pub url: String,

    /// HTTP verb, literal.
    pub method: HttpMethod,

    /// Header templates in declaration order.
    ///
    /// A `null` value, or a value that is a single placeholder resolving to
    /// `null` or nothing, omits the header.
    #[serde(default, with = "ordered_pairs")]
    pub headers: Vec<(String, Option<String>)>,

    /// Declared kind of the raw user input this template expects.
    #[serde(default)]
    pub input: InputSpec,

    /// Query parameter templates, appended to the URL in declaration order.
    #[serde(default, with = "ordered_pairs")]
    pub query: Vec<(String, String)>,

    /// Request body, if any.
    #[serde(default)]
    pub body: Option<BodyTemplate>,

    /// Output templates for successful and failed responses.
    pub response: ResponseSection,
}

impl RequestTemplate {
    /// The declared input kind (text when the template does not say).
    pub fn input_kind(&self) -> InputKind {
        self.input.kind
    }

    /// Formats raw user input with this template's declared input kind.
    pub fn format_input(&self, raw: &str) -> Result<Value, TemplateError> {
        format_input(raw, self.input.kind)
    }
}

/// The `input` section of a template.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSpec {
    #[serde(default, alias = "type")]
    pub kind: InputKind,
}

/// Request body template. Exactly one kind applies per template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBody", into = "RawBody")]
pub enum BodyTemplate {
    /// JSON tree whose string leaves are templates; sent serialized.
    Json(Value),
    /// Form fields, sent as `application/x-www-form-urlencoded`.
    Form(Vec<(String, String)>),
    /// Raw text template.
    Text(String),
}

impl BodyTemplate {
    /// The body kind tag.
    pub fn kind(&self) -> BodyKind {
        match self {
            BodyTemplate::Json(_) => BodyKind::Json,
            BodyTemplate::Form(_) => BodyKind::Form,
            BodyTemplate::Text(_) => BodyKind::Text,
        }
    }
}

/// Body kind tag as written in templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyKind {
    Json,
    Form,
    Text,
}

/// Wire shape of a body: `{kind, content}`.
#[derive(Serialize, Deserialize)]
struct RawBody {
    #[serde(alias = "type")]
    kind: BodyKind,
    #[serde(default)]
    content: Value,
}

impl TryFrom<RawBody> for BodyTemplate {
    type Error = String;

    fn try_from(raw: RawBody) -> Result<Self, Self::Error> {
        match raw.kind {
            BodyKind::Json => Ok(BodyTemplate::Json(raw.content)),
            BodyKind::Text => match raw.content {
                Value::String(text) => Ok(BodyTemplate::Text(text)),
                other => Err(format!("text body content must be a string, got {}", other)),
            },
            BodyKind::Form => match raw.content {
                Value::Object(fields) => fields
                    .into_iter()
                    .map(|(name, value)| match value {
                        Value::String(value) => Ok((name, value)),
                        other => Err(format!(
                            "form field '{}' must be a string template, got {}",
                            name, other
                        )),
                    })
                    .collect::<Result<Vec<_>, _>>()
                    .map(BodyTemplate::Form),
                other => Err(format!("form body content must be an object, got {}", other)),
            },
        }
    }
}

impl From<BodyTemplate> for RawBody {
    fn from(body: BodyTemplate) -> Self {
        let kind = body.kind();
        let content = match body {
            BodyTemplate::Json(value) => value,
            BodyTemplate::Text(text) => Value::String(text),
            BodyTemplate::Form(fields) => Value::Object(
                fields
                    .into_iter()
                    .map(|(name, value)| (name, Value::String(value)))
                    .collect::<Map<_, _>>(),
            ),
        };
        RawBody { kind, content }
    }
}

/// The `response` section: one branch per HTTP outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseSection {
    /// Rendered when the response status is 2xx.
    pub content: ResponseBranch,
    /// Rendered for every other status.
    pub error: ResponseBranch,
}

/// How to parse a response body and render the user-visible output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseBranch {
    /// How the body is parsed before interpolation.
    #[serde(default, alias = "input_type")]
    pub input_kind: ResponseInputKind,

    /// Rendering target reported alongside the content.
    #[serde(default, alias = "output_type")]
    pub output_kind: OutputKind,

    /// Output template interpolated against the parsed body.
    pub output: String,
}

/// Declared shape of a response body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseInputKind {
    #[default]
    Json,
    Text,
}

/// Declared rendering target of the final output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    #[default]
    Text,
    Image,
    Html,
    Markdown,
}

impl OutputKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputKind::Text => "text",
            OutputKind::Image => "image",
            OutputKind::Html => "html",
            OutputKind::Markdown => "markdown",
        }
    }
}

impl std::fmt::Display for OutputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// (De)serializes a JSON object as an ordered list of pairs.
///
/// Document order is kept and duplicate keys are preserved. `null` is read
/// as an empty list.
mod ordered_pairs {
    use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
    use serde::ser::{Serialize, SerializeMap, Serializer};
    use std::fmt;
    use std::marker::PhantomData;

    #[allow(clippy::ptr_arg)]
    pub fn serialize<S, V>(pairs: &Vec<(String, V)>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        V: Serialize,
    {
        let mut map = serializer.serialize_map(Some(pairs.len()))?;
        for (key, value) in pairs {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D, V>(deserializer: D) -> Result<Vec<(String, V)>, D::Error>
    where
        D: Deserializer<'de>,
        V: Deserialize<'de>,
    {
        deserializer.deserialize_any(PairsVisitor(PhantomData))
    }

    struct PairsVisitor<V>(PhantomData<V>);

    impl<'de, V: Deserialize<'de>> Visitor<'de> for PairsVisitor<V> {
        type Value = Vec<(String, V)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an object of string templates")
        }

        fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
            Ok(Vec::new())
        }

        fn visit_none<E: serde::de::Error>(self) -> Result<Self::Value, E> {
            Ok(Vec::new())
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
            let mut pairs = Vec::with_capacity(access.size_hint().unwrap_or(0));
            while let Some((key, value)) = access.next_entry::<String, V>()? {
                pairs.push((key, value));
            }
            Ok(pairs)
        }
    }
}
