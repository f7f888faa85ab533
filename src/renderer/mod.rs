//! Response renderer.
//!
//! Turns an `HttpResponse` into the user-visible `TemplateOutput`. The HTTP
//! status selects the template branch up front: 2xx renders `content`, every
//! other status renders `error`. Both branches go through the same parsing and
//! interpolation, and a non-2xx status is never reported as an error.

use crate::error::TemplateError;
use crate::models::HttpResponse;
use crate::template::{OutputKind, ResponseBranch, ResponseInputKind, ResponseSection};
use crate::variables::Interpolator;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Which response branch produced an output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Branch {
    /// The response status was 2xx.
    Content,
    /// Any other status.
    Error,
}

impl Branch {
    pub fn as_str(&self) -> &'static str {
        match self {
            Branch::Content => "content",
            Branch::Error => "error",
        }
    }
}

impl std::fmt::Display for Branch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The branch selected for a response, with its template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome<'a> {
    Success(&'a ResponseBranch),
    Failure(&'a ResponseBranch),
}

impl<'a> Outcome<'a> {
    /// Selects the branch for `response` from the template's response section.
    pub fn select(response: &HttpResponse, section: &'a ResponseSection) -> Self {
        if response.is_success() {
            Outcome::Success(&section.content)
        } else {
            Outcome::Failure(&section.error)
        }
    }

    pub fn branch(&self) -> Branch {
        match self {
            Outcome::Success(_) => Branch::Content,
            Outcome::Failure(_) => Branch::Error,
        }
    }

    pub fn template(&self) -> &'a ResponseBranch {
        match self {
            Outcome::Success(branch) | Outcome::Failure(branch) => branch,
        }
    }
}

/// Rendered output of one template execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateOutput {
    /// Interpolated output template.
    pub content: String,

    /// Rendering target declared by the selected branch.
    #[serde(rename = "type")]
    pub output_kind: OutputKind,

    /// Branch that produced the output.
    pub branch: Branch,

    /// HTTP status code of the response.
    pub status: u16,
}

impl TemplateOutput {
    pub fn is_error(&self) -> bool {
        self.branch == Branch::Error
    }
}

/// Renders `response` using the branch selected by its status.
///
/// The body is parsed per the branch's input kind (`json` fails with
/// `TemplateError::ResponseParse` on malformed JSON; `text` is read as a
/// string) and becomes the data context for the branch's output template.
/// No escaping is applied to the output.
pub fn render_response(
    response: &HttpResponse,
    section: &ResponseSection,
    interpolator: Interpolator,
) -> Result<TemplateOutput, TemplateError> {
    let outcome = Outcome::select(response, section);
    let branch = outcome.template();

    let body = parse_body(response, branch.input_kind)?;
    let content = interpolator.without_escape().interpolate(&branch.output, &body)?;

    Ok(TemplateOutput {
        content,
        output_kind: branch.output_kind,
        branch: outcome.branch(),
        status: response.status_code,
    })
}

/// Parses a response body into the data context for the output template.
pub fn parse_body(response: &HttpResponse, kind: ResponseInputKind) -> Result<Value, TemplateError> {
    match kind {
        ResponseInputKind::Json => serde_json::from_slice(&response.body)
            .map_err(|e| TemplateError::ResponseParse(format!("HTTP {}: {}", response.status_code, e))),
        ResponseInputKind::Text => Ok(Value::String(response.body_text())),
    }
}
