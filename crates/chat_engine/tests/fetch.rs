use std::time::Duration;

use chat_engine::{AnswerFetcher, FailureKind, FetchSettings, GeminiFetcher};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GENERATE_PATH: &str = "/v1beta/models/test-model:generateContent";

fn fetcher_for(server: &MockServer) -> GeminiFetcher {
    let settings = FetchSettings {
        base_url: server.uri(),
        model: "test-model".to_string(),
        ..FetchSettings::new("secret")
    };
    GeminiFetcher::new(settings).expect("client")
}

#[tokio::test]
async fn fetcher_posts_prompt_and_returns_candidate_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(query_param("key", "secret"))
        .and(body_string_contains("point form"))
        .and(body_string_contains("What is borrowing?"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{ "text": "• Shared access\n• Checked at compile time" }]
                }
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let answer = fetcher_for(&server)
        .fetch_answer("What is borrowing?")
        .await
        .expect("fetch ok");
    assert_eq!(answer, "• Shared access\n• Checked at compile time");
}

#[tokio::test]
async fn fetcher_reports_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(403).set_body_string("API key invalid"))
        .mount(&server)
        .await;

    let err = fetcher_for(&server).fetch_answer("q").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(403));
}

#[tokio::test]
async fn fetcher_rejects_response_without_candidates() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&server)
        .await;

    let err = fetcher_for(&server).fetch_answer("q").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::MalformedResponse);
}

#[tokio::test]
async fn fetcher_rejects_non_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = fetcher_for(&server).fetch_answer("q").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::MalformedResponse);
}

#[tokio::test]
async fn fetcher_times_out_on_slow_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(json!({ "candidates": [] })),
        )
        .mount(&server)
        .await;

    let settings = FetchSettings {
        base_url: server.uri(),
        model: "test-model".to_string(),
        request_timeout: Duration::from_millis(50),
        ..FetchSettings::new("secret")
    };
    let fetcher = GeminiFetcher::new(settings).expect("client");

    let err = fetcher.fetch_answer("q").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn fetcher_reports_network_error_when_server_is_gone() {
    let server = MockServer::builder().start().await;
    let fetcher = fetcher_for(&server);
    drop(server);

    let err = fetcher.fetch_answer("q").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Network);
}
