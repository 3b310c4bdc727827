//! HTTP-level tests for the adapter against a wiremock server.

use reqwest::header::HeaderValue;
use rest_adapter::config::header_from_env;
use rest_adapter::fetch::Session;
use rest_adapter::fetch::auth::{ApiKey, UrlParam};
use rest_adapter::{AdapterConfig, AdapterError, RequestOptions, RestAdapter, blocking};
use serde_json::{Value, json};
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> AdapterConfig {
    AdapterConfig::new(format!("{}/", server.uri()))
        .with_header(
            reqwest::header::ACCEPT,
            HeaderValue::from_static("application/json"),
        )
        .with_header(
            reqwest::header::HeaderName::from_static("x-client"),
            HeaderValue::from_static("default"),
        )
}

#[tokio::test]
async fn test_get_returns_status_and_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1})))
        .expect(1)
        .mount(&server)
        .await;

    let adapter = RestAdapter::new(config_for(&server)).unwrap();
    let resp = adapter.get("users/1", RequestOptions::new()).await.unwrap();

    assert_eq!(resp.status().as_u16(), 200);
    assert_eq!(resp.json::<Value>().unwrap(), json!({"id": 1}));
}

#[tokio::test]
async fn test_verbs_hit_matching_routes() {
    let server = MockServer::start().await;
    for (verb, status) in [("POST", 201), ("PUT", 200), ("DELETE", 204)] {
        Mock::given(method(verb))
            .and(path("/v1/items/5"))
            .respond_with(ResponseTemplate::new(status))
            .expect(1)
            .mount(&server)
            .await;
    }

    let adapter = RestAdapter::new(config_for(&server).with_path_suffix("v1")).unwrap();
    let post = adapter.post("items/5", RequestOptions::new()).await.unwrap();
    let put = adapter.put("items/5", RequestOptions::new()).await.unwrap();
    let delete = adapter.delete("items/5", RequestOptions::new()).await.unwrap();

    assert_eq!(post.status().as_u16(), 201);
    assert_eq!(put.status().as_u16(), 200);
    assert_eq!(delete.status().as_u16(), 204);
}

#[tokio::test]
async fn test_post_sends_params_and_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users"))
        .and(query_param("notify", "false"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"name": "ada", "admin": false})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 7})))
        .expect(1)
        .mount(&server)
        .await;

    let adapter = RestAdapter::new(config_for(&server)).unwrap();
    let options = RequestOptions::new()
        .param("notify", "false")
        .json(json!({"name": "ada", "admin": false}));
    let resp = adapter.post("users", options).await.unwrap();

    assert_eq!(resp.status().as_u16(), 201);
    assert_eq!(resp.json::<Value>().unwrap()["id"], 7);
}

#[tokio::test]
async fn test_per_call_header_overrides_default_and_keeps_others() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me"))
        .and(header("accept", "application/json"))
        .and(header("x-client", "override"))
        .and(header("x-request-id", "r-1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let adapter = RestAdapter::new(config_for(&server)).unwrap();
    let options = RequestOptions::new()
        .try_header("X-Client", "override")
        .unwrap()
        .try_header("X-Request-Id", "r-1")
        .unwrap();
    let resp = adapter.get("me", options).await.unwrap();
    assert!(resp.is_success());
}

#[tokio::test]
async fn test_default_headers_persist_across_calls() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("x-client", "default"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&server)
        .await;

    let adapter = RestAdapter::new(config_for(&server)).unwrap();
    adapter.get("a", RequestOptions::new()).await.unwrap();
    adapter.get("b", RequestOptions::new()).await.unwrap();

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 2);
}

#[tokio::test]
async fn test_error_status_is_returned_not_raised() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not here"))
        .mount(&server)
        .await;

    let adapter = RestAdapter::new(config_for(&server)).unwrap();
    let resp = adapter.get("missing", RequestOptions::new()).await.unwrap();

    assert_eq!(resp.status().as_u16(), 404);
    assert_eq!(resp.reason(), "Not Found");
    assert_eq!(resp.text(), "not here");
}

#[tokio::test]
async fn test_per_call_timeout_surfaces_as_request_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let adapter = RestAdapter::new(config_for(&server)).unwrap();
    let err = adapter
        .get("slow", RequestOptions::new().timeout(Duration::from_millis(100)))
        .await
        .unwrap_err();

    assert!(err.is_transport());
    assert!(err.is_timeout());
}

#[tokio::test]
async fn test_api_key_header_from_env() {
    // SAFETY: the variable name is unique to this test.
    unsafe {
        std::env::set_var("REST_ADAPTER_IT_HEADER_KEY", "s3cret");
    }
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("x-api-key", "s3cret"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server).with_header_builder(header_from_env(
        reqwest::header::HeaderName::from_static("x-api-key"),
        "REST_ADAPTER_IT_HEADER_KEY",
    ));
    let adapter = RestAdapter::new(config).unwrap();
    adapter.get("feeds", RequestOptions::new()).await.unwrap();
}

#[tokio::test]
async fn test_session_decorators() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/bearer"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/param"))
        .and(query_param("api_key", "k1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let bearer = RestAdapter::with_client(
        config_for(&server),
        ApiKey::bearer(Session::new(), "tok").unwrap(),
    )
    .unwrap();
    bearer.get("bearer", RequestOptions::new()).await.unwrap();

    let param = RestAdapter::with_client(
        config_for(&server),
        UrlParam::new(Session::new(), "api_key", "k1"),
    )
    .unwrap();
    param.get("param", RequestOptions::new()).await.unwrap();
}

#[tokio::test]
async fn test_unreachable_host_is_request_error() {
    let adapter = RestAdapter::new(
        AdapterConfig::new("http://127.0.0.1:1/").with_connect_timeout(Some(Duration::from_secs(2))),
    )
    .unwrap();

    let err = adapter.get("health", RequestOptions::new()).await.unwrap_err();
    assert!(matches!(err, AdapterError::Request { .. }));
}

#[test]
fn test_insecure_adapter_constructs() {
    let adapter = RestAdapter::new(AdapterConfig::for_host("self-signed.example").with_ssl_verify(false))
        .unwrap();
    assert!(!adapter.ssl_verify());
    assert_eq!(adapter.base_url(), "https://self-signed.example/");
}

#[test]
fn test_blocking_adapter_against_mock_server() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let server = runtime.block_on(MockServer::start());
    runtime.block_on(
        Mock::given(method("GET"))
            .and(path("/users/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1})))
            .expect(2)
            .mount(&server),
    );

    let adapter = blocking::RestAdapter::new(config_for(&server)).unwrap();
    for _ in 0..2 {
        let resp = adapter.get("users/1", RequestOptions::new()).unwrap();
        assert_eq!(resp.status().as_u16(), 200);
        assert_eq!(resp.json::<Value>().unwrap(), json!({"id": 1}));
    }

    runtime.block_on(server.verify());
}
