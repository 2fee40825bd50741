use std::sync::Arc;

use clonify_common::CLONE_FAILED_MESSAGE;
use clonify_web::{Cloner, ProxySource};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn cloner_for(server: &MockServer) -> Cloner {
    let source = ProxySource::new(&format!("{}/get", server.uri()), "contents").unwrap();
    Cloner::new(Arc::new(source))
}

#[tokio::test]
async fn proxied_page_is_extracted() {
    let server = MockServer::start().await;
    let page = r#"<html><head><style>h1{}</style><link rel="stylesheet" href="/s.css"></head>
<body><script>boot()</script><img src="/a.png"></body></html>"#;
    Mock::given(method("GET"))
        .and(path("/get"))
        .and(query_param("url", "https://example.com/?q=1&r=2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "contents": page,
            "status": { "http_code": 200 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let site = cloner_for(&server)
        .await
        .clone_site("https://example.com/?q=1&r=2")
        .await
        .unwrap();

    assert_eq!(site.result.html, page);
    assert_eq!(site.result.css, "h1{}\n\n");
    assert_eq!(site.result.js, "boot()\n\n");
    assert!(site.result.resources.contains("  • /s.css"));
    assert!(site.result.resources.contains("  • /a.png"));
}

#[tokio::test]
async fn missing_contents_is_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&server)
        .await;

    let err = cloner_for(&server)
        .await
        .clone_site("https://example.com")
        .await
        .unwrap_err();

    assert!(err.is_network());
    assert_eq!(err.user_message(), CLONE_FAILED_MESSAGE);
}

#[tokio::test]
async fn empty_contents_is_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "contents": ""
        })))
        .mount(&server)
        .await;

    let err = cloner_for(&server)
        .await
        .clone_site("https://example.com")
        .await
        .unwrap_err();
    assert!(err.is_network());
}

#[tokio::test]
async fn proxy_failure_status_is_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .expect(1)
        .mount(&server)
        .await;

    let err = cloner_for(&server)
        .await
        .clone_site("https://example.com")
        .await
        .unwrap_err();
    assert!(err.is_network());
}

#[tokio::test]
async fn invalid_url_never_reaches_proxy() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = cloner_for(&server)
        .await
        .clone_site("example dot com")
        .await
        .unwrap_err();
    assert!(err.is_validation());
}
