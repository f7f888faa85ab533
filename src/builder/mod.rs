//! Request builder.
//!
//! Resolves a `RequestTemplate` against a data context into a fully-specified
//! `HttpRequest`: URL with query parameters, headers, and encoded body. This
//! step is synchronous and never touches the network.

use crate::error::TemplateError;
use crate::models::HttpRequest;
use crate::template::{BodyTemplate, RequestTemplate};
use crate::variables::{escape, Interpolator};
use reqwest::header::{HeaderName, HeaderValue};
use serde_json::Value;
use url::Url;

const JSON_CONTENT_TYPE: &str = "application/json";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Builds the request described by `template` for the given data context.
///
/// - The URL template is interpolated with percent-encoding of substituted
///   values, then parsed; it must be an absolute `http`/`https` URL.
/// - Query parameters are appended in declaration order; repeated keys are kept.
/// - Headers whose value is absent (see [`Interpolator::interpolate_optional`])
///   are dropped. Names must be valid HTTP tokens (`InvalidTemplate`) and
///   interpolated values valid header values (`InvalidInput`).
/// - The body is encoded per its kind, and a matching `Content-Type` is added
///   when the template does not declare one.
///
/// # Examples
///
/// ```
/// use request_template::builder::build_request;
/// use request_template::template::parse_template;
/// use request_template::variables::Interpolator;
/// use serde_json::json;
///
/// let template = parse_template(r#"{
///     "url": "https://api.x/{{q}}",
///     "method": "GET",
///     "query": {"k": "{{v}}"},
///     "response": {"content": {"output": ""}, "error": {"output": ""}}
/// }"#).unwrap();
///
/// let request = build_request(&template, &json!({"q": "search", "v": "42"}), Interpolator::lenient()).unwrap();
/// assert_eq!(request.url.as_str(), "https://api.x/search?k=42");
/// ```
pub fn build_request(
    template: &RequestTemplate,
    context: &Value,
    interpolator: Interpolator,
) -> Result<HttpRequest, TemplateError> {
    let interpolator = interpolator.without_escape();

    let mut url = build_url(&template.url, context, interpolator)?;
    append_query(&mut url, &template.query, context, interpolator)?;

    let mut request = HttpRequest::new(template.method, url);

    for (name, value) in &template.headers {
        let Some(value) = value else {
            continue;
        };
        if HeaderName::from_bytes(name.as_bytes()).is_err() {
            return Err(TemplateError::InvalidTemplate(format!(
                "invalid header name '{}'",
                name
            )));
        }
        if let Some(value) = interpolator.interpolate_optional(value, context)? {
            if HeaderValue::from_str(&value).is_err() {
                return Err(TemplateError::InvalidInput(format!(
                    "header '{}' has a value that is not a valid HTTP header value",
                    name
                )));
            }
            request.add_header(name.clone(), value);
        }
    }

    if let Some(body) = &template.body {
        let (encoded, content_type) = build_body(body, context, interpolator)?;
        if !request.has_header("content-type") {
            request.add_header("Content-Type", content_type);
        }
        request.set_body(encoded);
    }

    log::debug!(
        "[{}] built {} {} ({} headers, body: {} bytes)",
        request.id,
        request.method,
        request.url,
        request.headers.len(),
        request.body.as_ref().map_or(0, String::len)
    );

    Ok(request)
}

/// Interpolates the URL template and validates the result.
fn build_url(template: &str, context: &Value, interpolator: Interpolator) -> Result<Url, TemplateError> {
    let raw = interpolator
        .with_escape(escape::url_component)
        .interpolate(template, context)?;

    let url = Url::parse(&raw).map_err(|e| TemplateError::InvalidUrl {
        url: raw.clone(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(TemplateError::InvalidUrl {
            url: raw,
            reason: format!("only HTTP and HTTPS are supported, got: {}", scheme),
        }),
    }
}

/// Appends interpolated query parameters; the URL layer encodes them.
fn append_query(
    url: &mut Url,
    query: &[(String, String)],
    context: &Value,
    interpolator: Interpolator,
) -> Result<(), TemplateError> {
    if query.is_empty() {
        return Ok(());
    }

    let values = query
        .iter()
        .map(|(name, value)| Ok((name, interpolator.interpolate(value, context)?)))
        .collect::<Result<Vec<_>, TemplateError>>()?;

    let mut pairs = url.query_pairs_mut();
    for (name, value) in &values {
        pairs.append_pair(name, value);
    }
    Ok(())
}

/// Encodes the body, returning it with its default content type.
fn build_body(
    body: &BodyTemplate,
    context: &Value,
    interpolator: Interpolator,
) -> Result<(String, &'static str), TemplateError> {
    match body {
        BodyTemplate::Json(content) => {
            let value = interpolator.interpolate_value(content, context)?;
            Ok((value.to_string(), JSON_CONTENT_TYPE))
        }
        BodyTemplate::Form(fields) => {
            let mut form = url::form_urlencoded::Serializer::new(String::new());
            for (name, value) in fields {
                form.append_pair(name, &interpolator.interpolate(value, context)?);
            }
            Ok((form.finish(), FORM_CONTENT_TYPE))
        }
        BodyTemplate::Text(text) => Ok((interpolator.interpolate(text, context)?, TEXT_CONTENT_TYPE)),
    }
}
