//! Gemini client against a mock server.

use herald_gateway::{GatewayError, ModelGateway};
use herald_http::{GeminiClient, GeminiConfig};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ENDPOINT: &str = "/v1beta/models/gemini-1.5-flash-latest:generateContent";

fn client(server: &MockServer) -> GeminiClient {
    GeminiClient::new(GeminiConfig::new(&server.uri()).with_api_key("test-key")).unwrap()
}

#[tokio::test]
async fn generate_posts_prompt_and_returns_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({
            "contents": [{"role": "user", "parts": [{"text": "summarize this"}]}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "{\"summary\":\"ok\",\"tags\":[]}"}]},
                "finishReason": "STOP"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let reply = client(&server).generate("summarize this").await.unwrap();
    assert_eq!(reply, "{\"summary\":\"ok\",\"tags\":[]}");
}

#[tokio::test]
async fn configured_temperature_is_sent_as_generation_config() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .and(body_partial_json(json!({"generationConfig": {"temperature": 0.25}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [{"text": "ok"}]}, "finishReason": "STOP"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = GeminiClient::new(
        GeminiConfig::new(&server.uri())
            .with_api_key("test-key")
            .with_temperature(0.25),
    )
    .unwrap();

    assert_eq!(client.generate("p").await.unwrap(), "ok");
}

#[tokio::test]
async fn empty_candidate_text_is_response_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [{"text": "  "}]}, "finishReason": "MAX_TOKENS"}]
        })))
        .mount(&server)
        .await;

    let err = client(&server).generate("p").await.unwrap_err();
    assert!(matches!(err, GatewayError::Response(_)));
}

#[tokio::test]
async fn quota_exhaustion_maps_to_quota() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": {"code": 429, "status": "RESOURCE_EXHAUSTED"}
        })))
        .mount(&server)
        .await;

    let err = client(&server).generate("p").await.unwrap_err();
    assert!(matches!(err, GatewayError::Quota(_)));
}

#[tokio::test]
async fn bad_request_maps_to_invalid_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(400).set_body_string("API key not valid"))
        .mount(&server)
        .await;

    let err = client(&server).generate("p").await.unwrap_err();
    assert!(matches!(err, GatewayError::InvalidRequest(_)));
}

#[tokio::test]
async fn unreachable_server_is_transport_failure() {
    let client = GeminiClient::new(
        GeminiConfig::new("http://127.0.0.1:9").with_api_key("k"),
    )
    .unwrap();

    let err = client.generate("p").await.unwrap_err();
    assert!(matches!(err, GatewayError::Transport(_)));
}
