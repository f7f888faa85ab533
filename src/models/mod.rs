//! Data models for HTTP requests and responses.
//!
//! The request builder produces an `HttpRequest`; an `HttpClient` turns it
//! into an `HttpResponse` for the response renderer.

pub mod request;
pub mod response;

pub use request::{HttpMethod, HttpRequest};
pub use response::HttpResponse;
