//! Integration tests for `SearchClient::search`.
//!
//! Uses `wiremock` to stand up a local HTTP server for each test so no real
//! network traffic is made. Covers the happy path for each response shape,
//! the request contract (auth header, body fields), and every error variant
//! that `search` can produce.

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use lookbook_search::{SearchClient, SearchError};

/// Builds a `SearchClient` against the mock server: 5-second timeout.
fn test_client(server: &MockServer) -> SearchClient {
    let endpoint = format!("{}/api/js/query", server.uri());
    SearchClient::new(&endpoint, "test-key", "test-secret", 5)
        .expect("failed to build test SearchClient")
}

/// One-product search-template response fixture.
fn search_shape_body() -> serde_json::Value {
    json!({
        "elements": { "search": { "products": { "results": [{
            "item": {
                "id": "23243250",
                "titles": { "default": "Silk Midi Dress" },
                "media": { "default": { "src": "https://cdn.example.com/a.jpg" } },
                "pricing": { "price": "199.00", "was": 259 },
                "stock": true,
                "properties": { "swatches": [] },
                "variants": []
            }
        }] } } }
    })
}

// ---------------------------------------------------------------------------
// happy paths
// ---------------------------------------------------------------------------

#[tokio::test]
async fn search_normalizes_search_template_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/js/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&search_shape_body()))
        .mount(&server)
        .await;

    let products = test_client(&server).search("dress", 20).await.unwrap();

    assert_eq!(products.len(), 1);
    assert_eq!(products[0].id, "23243250");
    assert_eq!(products[0].display_name(), Some("Silk Midi Dress"));
    assert!((products[0].pricing.price - 199.0).abs() < f64::EPSILON);
    assert_eq!(products[0].pricing.was, Some(259.0));
}

#[tokio::test]
async fn search_normalizes_autocomplete_response_with_string_price() {
    let server = MockServer::start().await;

    let body = json!({
        "elements": { "autocomplete": { "products": { "results": [{
            "item": { "id": "p1", "pricing": { "price": "42.50" } }
        }] } } }
    });

    Mock::given(method("POST"))
        .and(path("/api/js/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let products = test_client(&server).search("tote", 20).await.unwrap();

    assert_eq!(products.len(), 1);
    assert!((products[0].pricing.price - 42.5).abs() < f64::EPSILON);
}

#[tokio::test]
async fn search_with_unknown_shape_is_zero_results_not_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/js/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({"banners": []})))
        .mount(&server)
        .await;

    let result = test_client(&server).search("dress", 20).await;

    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    assert!(result.unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// request contract
// ---------------------------------------------------------------------------

#[tokio::test]
async fn search_sends_basic_auth_and_requested_with_headers() {
    let server = MockServer::start().await;

    // base64("test-key:test-secret")
    Mock::given(method("POST"))
        .and(path("/api/js/query"))
        .and(header(
            "Authorization",
            "Basic dGVzdC1rZXk6dGVzdC1zZWNyZXQ=",
        ))
        .and(header("X-Requested-With", "GrapheneFetch"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({"results": []})))
        .expect(1)
        .mount(&server)
        .await;

    let result = test_client(&server).search("dress", 20).await;
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
}

#[tokio::test]
async fn search_sends_upstream_body_contract() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/js/query"))
        .and(body_partial_json(json!({
            "format": "json",
            "search_text": "red dress",
            "template": "search",
            "page_size": 20,
            "user": { "uid": "product-search", "sid": "live-preview" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({"results": []})))
        .expect(1)
        .mount(&server)
        .await;

    let result = test_client(&server).search("red dress", 20).await;
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
}

#[tokio::test]
async fn blank_query_is_substituted_with_default_before_sending() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/js/query"))
        .and(body_partial_json(json!({ "search_text": "dress" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({"results": []})))
        .expect(1)
        .mount(&server)
        .await;

    let result = test_client(&server).search("   ", 20).await;
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
}

// ---------------------------------------------------------------------------
// error variants
// ---------------------------------------------------------------------------

#[tokio::test]
async fn non_success_status_is_surfaced_with_status_code() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/js/query"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let err = test_client(&server).search("dress", 20).await.unwrap_err();

    assert!(
        matches!(err, SearchError::UnexpectedStatus { status: 502, .. }),
        "expected UnexpectedStatus(502), got: {err:?}"
    );
}

#[tokio::test]
async fn unparseable_body_is_a_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/js/query"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = test_client(&server).search("dress", 20).await.unwrap_err();

    assert!(
        matches!(err, SearchError::Deserialize { .. }),
        "expected Deserialize, got: {err:?}"
    );
}

#[tokio::test]
async fn connection_failure_is_an_http_error() {
    // Point at a server that is already shut down.
    let server = MockServer::start().await;
    let client = test_client(&server);
    drop(server);

    let err = client.search("dress", 20).await.unwrap_err();

    assert!(
        matches!(err, SearchError::Http(_)),
        "expected Http, got: {err:?}"
    );
}
