//! Declarative HTTP request templating engine.
//!
//! A request template is a JSON document describing how to turn raw user input
//! into an HTTP request and how to turn the response into displayable text. The
//! engine resolves `{{ path }}` placeholders against a JSON data context,
//! performs exactly one HTTP call, and renders the response through one of two
//! branches depending on the status code.
//!
//! # Architecture
//!
//! - **variables**: placeholder interpolation, escape functions, input formatting
//! - **template**: the template document schema and loaders
//! - **builder**: resolves a template and data context into an `HttpRequest`
//! - **executor**: the `HttpClient` seam, the reqwest client, and `TemplateExecutor`
//! - **renderer**: selects the response branch and renders `TemplateOutput`
//! - **models**: request and response values passed between stages
//! - **config**: engine settings (timeout, redirects, TLS, missing-value policy)
//!
//! # Flow
//!
//! 1. Raw input is formatted per the template's input kind ([`format_input`])
//! 2. The formatted value is placed in the data context under a caller-chosen key
//! 3. [`build_request`] interpolates the URL, query, headers, and body
//! 4. The request is sent once through an [`HttpClient`]
//! 5. [`render_response`] parses the body and interpolates the selected branch
//!
//! # Example
//!
//! ```no_run
//! use request_template::{execute_request, format_input, InputKind, RequestTemplate};
//! use serde_json::json;
//!
//! # async fn run() -> Result<(), request_template::TemplateError> {
//! let template: RequestTemplate = request_template::template::parse_template(r#"{
//!     "url": "https://api.example.com/weather",
//!     "method": "GET",
//!     "query": {"city": "{{input}}"},
//!     "response": {
//!         "content": {"input_kind": "json", "output_kind": "markdown", "output": "**{{temp}}**"},
//!         "error": {"input_kind": "text", "output_kind": "text", "output": "Failed: {{.}}"}
//!     }
//! }"#)?;
//!
//! let input = format_input("Paris", InputKind::Text)?;
//! let output = execute_request(&template, &json!({"input": input})).await?;
//! println!("{}", output.content);
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod executor;
pub mod models;
pub mod renderer;
pub mod template;
pub mod variables;

pub use builder::build_request;
pub use config::{load_config, EngineConfig};
pub use error::TemplateError;
pub use executor::{execute_request, HttpClient, ReqwestClient, TemplateExecutor};
pub use renderer::{render_response, Branch, TemplateOutput};
pub use template::{OutputKind, RequestTemplate};
pub use variables::{format_input, interpolate, InputKind, Interpolator, MissingPolicy};
