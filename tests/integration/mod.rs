//! Integration tests module for request-template
//!
//! Shared helpers for driving templates against a local wiremock server.

pub mod branching_test;
pub mod end_to_end_test;

use request_template::template::parse_template;
use request_template::RequestTemplate;

/// Parses a template, replacing `$BASE` with the mock server URI.
///
/// The base is spliced in literally so it is never percent-encoded by URL
/// interpolation.
pub fn template_for(base: &str, json: &str) -> RequestTemplate {
    parse_template(&json.replace("$BASE", base)).expect("template should parse")
}
