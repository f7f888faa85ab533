//! Response branching and failure propagation tests
//!
//! Non-2xx statuses must render the error branch; malformed bodies, transport
//! failures, and strict-mode missing values must surface as errors.

use super::template_for;
use request_template::executor::RequestError;
use request_template::{
    execute_request, Branch, EngineConfig, MissingPolicy, OutputKind, TemplateError,
    TemplateExecutor,
};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

const WEATHER_TEMPLATE: &str = r#"{
    "url": "$BASE/weather",
    "method": "GET",
    "query": {"city": "{{input}}"},
    "response": {
        "content": {"input_kind": "json", "output_kind": "markdown", "output": "**{{city}}**: {{temp}}°"},
        "error": {"input_kind": "json", "output_kind": "text", "output": "{{error.code}}: {{error.message}}"}
    }
}"#;

async fn server_replying(status: u16, body: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_client_error_renders_error_branch() {
    let server = server_replying(404, r#"{"error":{"code":"not_found","message":"no such city"}}"#).await;
    let template = template_for(&server.uri(), WEATHER_TEMPLATE);

    let output = execute_request(&template, &json!({"input": "Atlantis"}))
        .await
        .unwrap();

    assert_eq!(output.content, "not_found: no such city");
    assert_eq!(output.output_kind, OutputKind::Text);
    assert_eq!(output.branch, Branch::Error);
    assert!(output.is_error());
}

#[tokio::test]
async fn test_every_2xx_renders_content_branch() {
    for status in [200, 201, 202, 299] {
        let server = server_replying(status, r#"{"city":"Paris","temp":21}"#).await;
        let template = template_for(&server.uri(), WEATHER_TEMPLATE);

        let output = execute_request(&template, &json!({"input": "Paris"}))
            .await
            .unwrap();

        assert_eq!(output.content, "**Paris**: 21°", "status {}", status);
        assert_eq!(output.branch, Branch::Content);
        assert_eq!(output.status, status);
    }
}

#[tokio::test]
async fn test_malformed_json_body_is_parse_error() {
    let server = server_replying(200, "<html>oops</html>").await;
    let template = template_for(&server.uri(), WEATHER_TEMPLATE);

    let result = execute_request(&template, &json!({"input": "Paris"})).await;
    assert!(matches!(result, Err(TemplateError::ResponseParse(_))));
}

#[tokio::test]
async fn test_malformed_error_body_is_parse_error() {
    let server = server_replying(502, "Bad Gateway").await;
    let template = template_for(&server.uri(), WEATHER_TEMPLATE);

    let result = execute_request(&template, &json!({"input": "Paris"})).await;
    match result {
        Err(TemplateError::ResponseParse(message)) => assert!(message.starts_with("HTTP 502")),
        other => panic!("Expected ResponseParse, got {:?}", other),
    }
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    let template = template_for("http://127.0.0.1:9", WEATHER_TEMPLATE);

    let result = execute_request(&template, &json!({"input": "Paris"})).await;
    let err = result.unwrap_err();
    assert!(err.is_network(), "unexpected error: {}", err);
}

#[tokio::test]
async fn test_timeout_is_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"city":"Paris","temp":21}"#)
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let config = EngineConfig {
        timeout: Some(50),
        ..Default::default()
    };
    let executor = TemplateExecutor::from_config(&config).unwrap();
    let template = template_for(&server.uri(), WEATHER_TEMPLATE);

    let result = executor.execute(&template, &json!({"input": "Paris"})).await;
    assert!(matches!(
        result,
        Err(TemplateError::Network(RequestError::Timeout))
    ));
}

#[tokio::test]
async fn test_invalid_url_is_reported_before_sending() {
    let server = server_replying(200, "{}").await;
    let template = template_for(
        &server.uri(),
        r#"{
            "url": "{{base}}/weather",
            "method": "GET",
            "response": {
                "content": {"input_kind": "text", "output_kind": "text", "output": "{{.}}"},
                "error": {"input_kind": "text", "output_kind": "text", "output": "{{.}}"}
            }
        }"#,
    );

    let result = execute_request(&template, &json!({"base": "not a url"})).await;
    assert!(matches!(result, Err(TemplateError::InvalidUrl { .. })));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_strict_policy_rejects_missing_output_values() {
    let server = server_replying(200, r#"{"city":"Paris"}"#).await;
    let template = template_for(&server.uri(), WEATHER_TEMPLATE);

    let lenient = execute_request(&template, &json!({"input": "Paris"}))
        .await
        .unwrap();
    assert_eq!(lenient.content, "**Paris**: °");

    let config = EngineConfig {
        missing_values: MissingPolicy::Strict,
        ..Default::default()
    };
    let strict = TemplateExecutor::from_config(&config)
        .unwrap()
        .execute(&template, &json!({"input": "Paris"}))
        .await;

    match strict {
        Err(TemplateError::MissingValue { path }) => assert_eq!(path, "temp"),
        other => panic!("Expected MissingValue, got {:?}", other),
    }
}
