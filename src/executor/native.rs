//! HTTP client backed by reqwest.

use super::error::RequestError;
use super::HttpClient;
use crate::config::EngineConfig;
use crate::models::{HttpMethod, HttpRequest, HttpResponse};
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Instant;

/// `HttpClient` implementation using a shared `reqwest::Client`.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
    default_headers: HashMap<String, String>,
}

impl ReqwestClient {
    /// Builds a client honouring the timeout, redirect, and TLS settings of `config`.
    pub fn from_config(config: &EngineConfig) -> Result<Self, RequestError> {
        let redirect = if config.follow_redirects {
            reqwest::redirect::Policy::limited(config.max_redirects as usize)
        } else {
            reqwest::redirect::Policy::none()
        };

        let mut builder = reqwest::Client::builder()
            .redirect(redirect)
            .danger_accept_invalid_certs(!config.validate_ssl);

        if let Some(timeout) = config.timeout_duration() {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| RequestError::BuildError(e.to_string()))?;

        Ok(Self {
            client,
            default_headers: config.default_headers.clone(),
        })
    }
}

fn to_reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::GET => reqwest::Method::GET,
        HttpMethod::POST => reqwest::Method::POST,
        HttpMethod::PUT => reqwest::Method::PUT,
        HttpMethod::DELETE => reqwest::Method::DELETE,
        HttpMethod::PATCH => reqwest::Method::PATCH,
        HttpMethod::HEAD => reqwest::Method::HEAD,
        HttpMethod::OPTIONS => reqwest::Method::OPTIONS,
        HttpMethod::TRACE => reqwest::Method::TRACE,
        HttpMethod::CONNECT => reqwest::Method::CONNECT,
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, RequestError> {
        let start_time = Instant::now();

        let mut req_builder = self
            .client
            .request(to_reqwest_method(request.method), request.url.clone());

        for (name, value) in &self.default_headers {
            if !request.has_header(name) {
                req_builder = req_builder.header(name, value);
            }
        }

        for (name, value) in &request.headers {
            req_builder = req_builder.header(name, value);
        }

        if let Some(body) = &request.body {
            req_builder = req_builder.body(body.clone());
        }

        let response = req_builder.send().await?;

        let status_code = response.status().as_u16();
        let status_text = response
            .status()
            .canonical_reason()
            .unwrap_or("Unknown")
            .to_string();

        let mut headers = HashMap::new();
        for (name, value) in response.headers() {
            if let Ok(value_str) = value.to_str() {
                headers.insert(name.as_str().to_string(), value_str.to_string());
            }
        }

        let body = response
            .bytes()
            .await
            .map_err(RequestError::from)?
            .to_vec();

        Ok(HttpResponse {
            status_code,
            status_text,
            headers,
            body,
            duration: start_time.elapsed(),
        })
    }
}
