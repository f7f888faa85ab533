//! Template executor.
//!
//! Orchestrates one template execution: build the request, perform exactly one
//! network call through an [`HttpClient`], and render the response. There are
//! no retries, no caching, and no timeout unless one is configured.
//!
//! The network call sits behind the `HttpClient` trait so the engine can be
//! driven by any transport, including in-memory fakes in tests.

pub mod error;
pub mod native;

pub use error::RequestError;
pub use native::ReqwestClient;

use crate::builder::build_request;
use crate::config::EngineConfig;
use crate::error::TemplateError;
use crate::models::{HttpRequest, HttpResponse};
use crate::renderer::{render_response, TemplateOutput};
use crate::template::RequestTemplate;
use crate::variables::Interpolator;
use async_trait::async_trait;
use serde_json::Value;

/// Sends a built request and returns the raw response.
///
/// Implementations report only transport failures as errors; any HTTP status,
/// including 4xx and 5xx, is a successful `HttpResponse`.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, RequestError>;
}

#[async_trait]
impl<C: HttpClient + ?Sized> HttpClient for &C {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, RequestError> {
        (**self).send(request).await
    }
}

#[async_trait]
impl<C: HttpClient + ?Sized> HttpClient for std::sync::Arc<C> {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, RequestError> {
        (**self).send(request).await
    }
}

/// Executes templates against an `HttpClient`.
///
/// The executor holds no per-execution state, so one instance can serve any
/// number of concurrent executions.
#[derive(Debug, Clone)]
pub struct TemplateExecutor<C> {
    client: C,
    interpolator: Interpolator,
}

impl<C: HttpClient> TemplateExecutor<C> {
    /// Creates an executor with the lenient missing-value policy.
    pub fn new(client: C) -> Self {
        Self {
            client,
            interpolator: Interpolator::lenient(),
        }
    }

    /// Replaces the interpolator used for building requests and rendering output.
    pub fn with_interpolator(mut self, interpolator: Interpolator) -> Self {
        self.interpolator = interpolator;
        self
    }

    /// The underlying HTTP client.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Builds, sends, and renders one request.
    ///
    /// # Errors
    ///
    /// - `InvalidUrl` if the interpolated URL is not an absolute HTTP(S) URL
    /// - `Network` on transport failure
    /// - `ResponseParse` if the body does not match the branch's input kind
    /// - `MissingValue` for missing placeholders under the strict policy
    ///
    /// A non-2xx response is not an error: it renders the template's error branch.
    pub async fn execute(
        &self,
        template: &RequestTemplate,
        context: &Value,
    ) -> Result<TemplateOutput, TemplateError> {
        let request = build_request(template, context, self.interpolator)?;

        let response = self.client.send(&request).await.map_err(|e| {
            log::warn!("[{}] {} {} failed: {}", request.id, request.method, request.url, e);
            TemplateError::Network(e)
        })?;

        let output = render_response(&response, &template.response, self.interpolator)?;

        log::info!(
            "[{}] {} {} -> {} in {:?}, rendered {} branch as {}",
            request.id,
            request.method,
            request.url,
            response.status_code,
            response.duration,
            output.branch,
            output.output_kind
        );

        Ok(output)
    }
}

impl TemplateExecutor<ReqwestClient> {
    /// Creates a reqwest-backed executor from configuration.
    pub fn from_config(config: &EngineConfig) -> Result<Self, TemplateError> {
        let client = ReqwestClient::from_config(config)?;
        Ok(Self::new(client).with_interpolator(Interpolator::new(config.missing_values)))
    }
}

/// Executes a template with a default reqwest-backed client.
///
/// Convenience entry point equivalent to
/// `TemplateExecutor::from_config(&EngineConfig::default())?.execute(template, context)`.
/// Callers executing many templates should keep a `TemplateExecutor` around to
/// reuse its connection pool.
pub async fn execute_request(
    template: &RequestTemplate,
    context: &Value,
) -> Result<TemplateOutput, TemplateError> {
    TemplateExecutor::from_config(&EngineConfig::default())?
        .execute(template, context)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::Branch;
    use crate::template::{parse_template, OutputKind};
    use serde_json::json;
    use std::sync::Mutex;

    /// Records requests and replies with a canned response.
    struct FakeClient {
        reply: Result<HttpResponse, fn() -> RequestError>,
        seen: Mutex<Vec<HttpRequest>>,
    }

    impl FakeClient {
        fn replying(status: u16, body: &str) -> Self {
            Self {
                reply: Ok(HttpResponse::with_body(status, body)),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing(make_error: fn() -> RequestError) -> Self {
            Self {
                reply: Err(make_error),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl HttpClient for FakeClient {
        async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, RequestError> {
            self.seen.lock().unwrap().push(request.clone());
            match &self.reply {
                Ok(response) => Ok(response.clone()),
                Err(make_error) => Err(make_error()),
            }
        }
    }

    fn scenario_template() -> RequestTemplate {
        parse_template(
            r#"{
                "url": "https://api.x/{{q}}",
                "method": "GET",
                "query": {"k": "{{v}}"},
                "body": null,
                "response": {
                    "content": {"input_kind": "json", "output_kind": "text", "output": "Result: {{answer}}"},
                    "error": {"input_kind": "text", "output_kind": "text", "output": "Failed: {{.}}"}
                }
            }"#,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_success_scenario() {
        let client = FakeClient::replying(200, r#"{"answer":"ok"}"#);
        let executor = TemplateExecutor::new(&client);

        let output = executor
            .execute(&scenario_template(), &json!({"q": "search", "v": "42"}))
            .await
            .unwrap();

        assert_eq!(output.content, "Result: ok");
        assert_eq!(output.output_kind, OutputKind::Text);
        assert_eq!(output.branch, Branch::Content);

        let seen = client.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].url.as_str(), "https://api.x/search?k=42");
    }

    #[tokio::test]
    async fn test_error_scenario() {
        let client = FakeClient::replying(500, "boom");
        let executor = TemplateExecutor::new(&client);

        let output = executor
            .execute(&scenario_template(), &json!({"q": "search", "v": "42"}))
            .await
            .unwrap();

        assert_eq!(output.content, "Failed: boom");
        assert_eq!(output.branch, Branch::Error);
        assert_eq!(output.status, 500);
    }

    #[tokio::test]
    async fn test_transport_failure_propagates() {
        let client = FakeClient::failing(|| RequestError::NetworkError("reset".to_string()));
        let executor = TemplateExecutor::new(&client);

        let result = executor.execute(&scenario_template(), &json!({})).await;
        assert!(matches!(
            result,
            Err(TemplateError::Network(RequestError::NetworkError(_)))
        ));
    }

    #[tokio::test]
    async fn test_invalid_url_never_reaches_client() {
        let mut template = scenario_template();
        template.url = "{{base}}/x".to_string();

        let client = FakeClient::replying(200, "{}");
        let executor = TemplateExecutor::new(&client);

        let result = executor.execute(&template, &json!({"base": "nowhere"})).await;
        assert!(matches!(result, Err(TemplateError::InvalidUrl { .. })));
        assert!(client.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_strict_executor() {
        let client = FakeClient::replying(200, r#"{"answer":"ok"}"#);
        let executor = TemplateExecutor::new(&client).with_interpolator(Interpolator::strict());

        let result = executor.execute(&scenario_template(), &json!({"q": "search"})).await;
        match result {
            Err(TemplateError::MissingValue { path }) => assert_eq!(path, "v"),
            other => panic!("Expected MissingValue, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_response_parse_error_propagates() {
        let client = FakeClient::replying(200, "<html>");
        let executor = TemplateExecutor::new(&client);

        let result = executor
            .execute(&scenario_template(), &json!({"q": "a", "v": "b"}))
            .await;
        assert!(matches!(result, Err(TemplateError::ResponseParse(_))));
    }

    #[test]
    fn test_from_config_uses_missing_policy() {
        let config = EngineConfig {
            missing_values: crate::variables::MissingPolicy::Strict,
            ..Default::default()
        };
        let executor = TemplateExecutor::from_config(&config).unwrap();
        assert_eq!(executor.interpolator.policy(), crate::variables::MissingPolicy::Strict);
    }
}
