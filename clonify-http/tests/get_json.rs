use clonify_http::{HttpClient, HttpError, RequestOpts};
use serde_json::Value;
use std::borrow::Cow;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn url_query(target: &str) -> RequestOpts<'_> {
    RequestOpts {
        query: Some(vec![("url", Cow::Borrowed(target))]),
        ..Default::default()
    }
}

#[tokio::test]
async fn query_param_is_percent_encoded_and_json_decoded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get"))
        .and(query_param("url", "https://example.com/a?b=c"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "contents": "<html></html>"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(&format!("{}/get", server.uri())).unwrap();
    let got: Value = client
        .get_json("", url_query("https://example.com/a?b=c"))
        .await
        .unwrap();

    assert_eq!(got["contents"], "<html></html>");
}

#[tokio::test]
async fn non_success_status_is_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "error": "blocked"
        })))
        .mount(&server)
        .await;

    let client = HttpClient::new(&format!("{}/get", server.uri())).unwrap();
    let err = client
        .get_json::<Value>("", url_query("https://example.com"))
        .await
        .unwrap_err();

    match err {
        HttpError::Api { status, message, .. } => {
            assert_eq!(status.as_u16(), 403);
            assert_eq!(message, "blocked");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn server_errors_are_retried_when_budget_allows() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .mount(&server)
        .await;

    let client = HttpClient::new(&format!("{}/get", server.uri()))
        .unwrap()
        .with_retries(1);
    let got: Value = client.get_json("", RequestOpts::default()).await.unwrap();

    assert_eq!(got["ok"], true);
}

#[tokio::test]
async fn no_retry_by_default() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(&format!("{}/get", server.uri())).unwrap();
    let err = client
        .get_json::<Value>("", RequestOpts::default())
        .await
        .unwrap_err();

    assert!(matches!(err, HttpError::Api { .. }));
}

#[tokio::test]
async fn non_json_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let client = HttpClient::new(&format!("{}/get", server.uri())).unwrap();
    let err = client
        .get_json::<Value>("", RequestOpts::default())
        .await
        .unwrap_err();

    match err {
        HttpError::Decode(_, snippet) => assert!(snippet.contains("not json")),
        other => panic!("expected Decode error, got {other:?}"),
    }
}
