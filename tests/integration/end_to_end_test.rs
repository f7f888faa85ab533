//! End-to-end integration tests for request-template
//!
//! These tests run complete template executions (input formatting, request
//! building, one HTTP call, response rendering) against a local mock server.

use super::template_for;
use request_template::template::load_template;
use request_template::{
    execute_request, Branch, EngineConfig, InputKind, MissingPolicy, OutputKind, TemplateExecutor,
};
use serde_json::json;
use std::io::Write;
use tempfile::NamedTempFile;
use wiremock::matchers::{body_json, body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SEARCH_TEMPLATE: &str = r#"{
    "url": "$BASE/{{q}}",
    "method": "GET",
    "query": {"k": "{{v}}"},
    "body": null,
    "response": {
        "content": {"input_kind": "json", "output_kind": "text", "output": "Result: {{answer}}"},
        "error": {"input_kind": "text", "output_kind": "text", "output": "Failed: {{.}}"}
    }
}"#;

#[tokio::test]
async fn test_search_template_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("k", "42"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"answer":"ok"}"#))
        .expect(1)
        .mount(&server)
        .await;

    let template = template_for(&server.uri(), SEARCH_TEMPLATE);
    let output = execute_request(&template, &json!({"q": "search", "v": "42"}))
        .await
        .unwrap();

    assert_eq!(output.content, "Result: ok");
    assert_eq!(output.output_kind, OutputKind::Text);
    assert_eq!(output.branch, Branch::Content);
    assert_eq!(output.status, 200);
}

#[tokio::test]
async fn test_search_template_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    let template = template_for(&server.uri(), SEARCH_TEMPLATE);
    let output = execute_request(&template, &json!({"q": "search", "v": "42"}))
        .await
        .unwrap();

    assert_eq!(output.content, "Failed: boom");
    assert_eq!(output.output_kind, OutputKind::Text);
    assert_eq!(output.branch, Branch::Error);
    assert_eq!(output.status, 500);
}

#[tokio::test]
async fn test_formatted_input_in_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tags"))
        .and(header("content-type", "application/json"))
        .and(header("authorization", "Bearer t0k"))
        .and(body_json(json!({
            "tags": r#"["rust","http","templates"]"#,
            "first": "rust",
            "count": "{{literal}}"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_string(r#"{"id": 7}"#))
        .expect(1)
        .mount(&server)
        .await;

    let template = template_for(
        &server.uri(),
        r#"{
            "url": "$BASE/tags",
            "method": "POST",
            "headers": {"Authorization": "Bearer {{token}}"},
            "input": {"kind": "space-separated"},
            "body": {
                "kind": "json",
                "content": {"tags": "{{input}}", "first": "{{input[0]}}", "count": "\\{{literal\\}}"}
            },
            "response": {
                "content": {"input_kind": "json", "output_kind": "markdown", "output": "Created **#{{id}}**"},
                "error": {"input_kind": "text", "output_kind": "text", "output": "{{.}}"}
            }
        }"#,
    );

    assert_eq!(template.input_kind(), InputKind::SpaceSeparated);
    let input = template.format_input("rust http templates").unwrap();

    let output = execute_request(&template, &json!({"input": input, "token": "t0k"}))
        .await
        .unwrap();

    assert_eq!(output.content, "Created **#7**");
    assert_eq!(output.output_kind, OutputKind::Markdown);
}

#[tokio::test]
async fn test_form_body_with_legacy_field_names() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string("user=ada+lovelace&pass=p%26ss"))
        .respond_with(ResponseTemplate::new(200).set_body_string("welcome"))
        .expect(1)
        .mount(&server)
        .await;

    let template = template_for(
        &server.uri(),
        r#"{
            "url": "$BASE/login",
            "method": "post",
            "body": {"type": "form", "content": {"user": "{{user}}", "pass": "{{pass}}"}},
            "response": {
                "content": {"input_type": "text", "output_type": "html", "output": "<p>{{.}}</p>"},
                "error": {"input_type": "text", "output_type": "text", "output": "{{.}}"}
            }
        }"#,
    );

    let output = execute_request(&template, &json!({"user": "ada lovelace", "pass": "p&ss"}))
        .await
        .unwrap();

    assert_eq!(output.content, "<p>welcome</p>");
    assert_eq!(output.output_kind, OutputKind::Html);
}

#[tokio::test]
async fn test_null_headers_are_omitted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .mount(&server)
        .await;

    let template = template_for(
        &server.uri(),
        r#"{
            "url": "$BASE/h",
            "method": "GET",
            "headers": {"X-Present": "{{a}}", "X-Null": null, "X-Missing": "{{nope}}", "X-Trace": "{{trace}}"},
            "response": {
                "content": {"input_kind": "json", "output_kind": "text", "output": "ok"},
                "error": {"input_kind": "text", "output_kind": "text", "output": "{{.}}"}
            }
        }"#,
    );

    execute_request(&template, &json!({"a": "1", "trace": null}))
        .await
        .unwrap();

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
    let headers = &received[0].headers;
    assert!(headers.contains_key("x-present"));
    assert!(!headers.contains_key("x-null"));
    assert!(!headers.contains_key("x-missing"));
    assert!(!headers.contains_key("x-trace"));
    assert!(headers.contains_key("user-agent"));
}

#[tokio::test]
async fn test_configured_executor_with_default_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("x-api-key", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"answer":"configured"}"#))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = EngineConfig {
        timeout: Some(5_000),
        missing_values: MissingPolicy::Strict,
        ..Default::default()
    };
    config
        .default_headers
        .insert("X-Api-Key".to_string(), "secret".to_string());

    let executor = TemplateExecutor::from_config(&config).unwrap();
    let template = template_for(&server.uri(), SEARCH_TEMPLATE);

    let output = executor
        .execute(&template, &json!({"q": "search", "v": "1"}))
        .await
        .unwrap();
    assert_eq!(output.content, "Result: configured");
}

#[tokio::test]
async fn test_template_loaded_from_file() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/42"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"{"user":{"name":"Grace","roles":["admin"]}}"#),
        )
        .mount(&server)
        .await;

    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        "{}",
        r#"{
            "url": "$BASE/users/{{input}}",
            "method": "GET",
            "response": {
                "content": {"input_kind": "json", "output_kind": "text", "output": "{{user.name}} ({{user.roles[0]}})"},
                "error": {"input_kind": "text", "output_kind": "text", "output": "{{.}}"}
            }
        }"#
        .replace("$BASE", &server.uri())
    )
    .unwrap();

    let template = load_template(file.path()).unwrap();
    let input = template.format_input("42").unwrap();
    let output = execute_request(&template, &json!({ "input": input }))
        .await
        .unwrap();

    assert_eq!(output.content, "Grace (admin)");
}
