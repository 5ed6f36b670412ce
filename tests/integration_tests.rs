//! Integration tests using wiremock to simulate HTTP servers.

use restbound::{
    Body, Client, CodecRegistry, Credentials, Error, Interceptor, MethodDescriptor, RawResponse,
    Verb,
};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct TestContact {
    name: String,
    email: String,
}

fn contact() -> TestContact {
    TestContact {
        name: "Contact1".to_string(),
        email: "contact1@example.com".to_string(),
    }
}

#[derive(Default)]
struct CountingInterceptor {
    before_send: AtomicUsize,
    responses: AtomicUsize,
    errors: AtomicUsize,
}

impl Interceptor for CountingInterceptor {
    fn on_before_send(&self, _request: &reqwest::Request) {
        self.before_send.fetch_add(1, Ordering::SeqCst);
    }

    fn on_response(&self, _response: &RawResponse) {
        self.responses.fetch_add(1, Ordering::SeqCst);
    }

    fn on_error(&self, _error: &Error) {
        self.errors.fetch_add(1, Ordering::SeqCst);
    }
}

fn client_for(server: &MockServer) -> Client {
    Client::builder()
        .base_url(server.uri())
        .unwrap()
        .build()
        .unwrap()
}

#[tokio::test]
async fn typed_get_substitutes_path_parameters() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/contact/Contact1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(contact()))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let descriptor = MethodDescriptor::new(Verb::Get, "/api/contact", "/{name}")
        .path_param("name", "Contact1");

    let result: TestContact = client.execute(descriptor).await.unwrap();
    assert_eq!(result, contact());
}

#[tokio::test]
async fn query_parameters_reach_the_wire_in_insertion_order() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let descriptor = MethodDescriptor::new(Verb::Get, "/api/contact", "/")
        .require_query_param("q", "test")
        .unwrap()
        .require_query_param("q2", "test2")
        .unwrap();

    let _: serde_json::Value = client.execute(descriptor).await.unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.query(), Some("q=test&q2=test2"));
}

#[tokio::test]
async fn post_serializes_body_through_json_handler() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/contact/"))
        .and(body_string(r#"{"email":"contact1@example.com","name":"Contact1"}"#))
        .respond_with(ResponseTemplate::new(201).set_body_json(contact()))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let descriptor = MethodDescriptor::new(Verb::Post, "/api/contact", "/")
        .body(Body::serialize(&contact()).unwrap());

    let created: TestContact = client.execute(descriptor).await.unwrap();
    assert_eq!(created, contact());
}

#[tokio::test]
async fn content_negotiation_headers_reach_the_wire() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/contact/"))
        .and(header("accept", "application/json"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let descriptor = MethodDescriptor::new(Verb::Get, "/api/contact", "/");

    let _: serde_json::Value = client.execute(descriptor).await.unwrap();
}

#[tokio::test]
async fn explicit_accept_header_wins_over_produces() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/contact/"))
        .and(header("accept", "text/html"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let descriptor =
        MethodDescriptor::new(Verb::Get, "/api/contact", "/").header("Accept", "text/html");

    let _: serde_json::Value = client.execute(descriptor).await.unwrap();
}

#[tokio::test]
async fn plain_text_response_decodes_into_string() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/motd/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("hello world"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let descriptor =
        MethodDescriptor::new(Verb::Get, "/api/motd", "/").produces(restbound::media_type::TEXT_PLAIN);

    let text: String = client.execute(descriptor).await.unwrap();
    assert_eq!(text, "hello world");
}

#[tokio::test]
async fn form_parameters_win_over_body_and_are_url_encoded() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/contact/"))
        .and(body_string("name=Contact1&note=two+words"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let descriptor = MethodDescriptor::new(Verb::Post, "/api/contact", "/")
        .form_param("name", Some("Contact1"))
        .unwrap()
        .form_param("note", Some("two words"))
        .unwrap()
        .body(Body::text("ignored"));

    client.execute_unit(descriptor).await.unwrap();
}

#[tokio::test]
async fn http_error_carries_status_and_raw_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/contact/Missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not found"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let descriptor = MethodDescriptor::new(Verb::Get, "/api/contact", "/{name}")
        .path_param("name", "Missing");

    let result = client.execute::<TestContact>(descriptor).await;
    match result {
        Err(Error::Http {
            status,
            raw_response,
            ..
        }) => {
            assert_eq!(status.as_u16(), 404);
            assert_eq!(raw_response, "Not found");
        }
        other => panic!("expected Http error, got {other:?}"),
    }
}

#[tokio::test]
async fn decode_failure_preserves_raw_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/contact/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("invalid json"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let descriptor = MethodDescriptor::new(Verb::Get, "/api/contact", "/");

    let result = client.execute::<TestContact>(descriptor).await;
    match result {
        Err(Error::Decode { raw_response, .. }) => assert_eq!(raw_response, "invalid json"),
        other => panic!("expected Decode error, got {other:?}"),
    }
}

#[tokio::test]
async fn transport_fault_notifies_error_channel_exactly_once() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/contact/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let counting = Arc::new(CountingInterceptor::default());
    let client = Client::builder()
        .base_url(mock_server.uri())
        .unwrap()
        .interceptor(counting.clone())
        .build()
        .unwrap();

    let descriptor = MethodDescriptor::new(Verb::Get, "/api/contact", "/");
    let result = client.execute::<TestContact>(descriptor).await;

    assert!(matches!(result, Err(Error::Http { .. })));
    assert_eq!(counting.before_send.load(Ordering::SeqCst), 1);
    assert_eq!(counting.errors.load(Ordering::SeqCst), 1);
    assert_eq!(counting.responses.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn connection_failure_surfaces_as_network_error() {
    // Nothing listens on this port.
    let counting = Arc::new(CountingInterceptor::default());
    let client = Client::builder()
        .base_url("http://127.0.0.1:9")
        .unwrap()
        .interceptor(counting.clone())
        .build()
        .unwrap();

    let descriptor = MethodDescriptor::new(Verb::Get, "/api", "/items");
    let result = client.execute_unit(descriptor).await;

    assert!(matches!(result, Err(Error::Network(_))));
    assert_eq!(counting.errors.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn void_shape_still_notifies_response_received() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/contact/Contact1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let counting = Arc::new(CountingInterceptor::default());
    let client = Client::builder()
        .base_url(mock_server.uri())
        .unwrap()
        .interceptor(counting.clone())
        .build()
        .unwrap();

    let descriptor = MethodDescriptor::new(Verb::Delete, "/api/contact", "/{name}")
        .path_param("name", "Contact1");
    client.execute_unit(descriptor).await.unwrap();

    assert_eq!(counting.responses.load(Ordering::SeqCst), 1);
    assert_eq!(counting.errors.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn raw_shape_returns_undecoded_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/export/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("not json at all")
                .insert_header("x-export-id", "42"),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let descriptor = MethodDescriptor::new(Verb::Get, "/api/export", "/");

    let raw = client.execute_raw(descriptor).await.unwrap();
    assert_eq!(raw.status.as_u16(), 200);
    assert_eq!(raw.text(), "not json at all");
    assert_eq!(raw.header("x-export-id"), Some("42"));
}

#[tokio::test]
async fn missing_decode_handler_fails_before_any_io() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(contact()))
        .mount(&mock_server)
        .await;

    let client = Client::builder()
        .base_url(mock_server.uri())
        .unwrap()
        .registry(CodecRegistry::new())
        .build()
        .unwrap();

    let descriptor = MethodDescriptor::new(Verb::Get, "/api/contact", "/");
    let result = client.execute::<TestContact>(descriptor).await;

    assert!(matches!(result, Err(Error::NoHandler { .. })));
    let requests = mock_server.received_requests().await.unwrap();
    assert!(requests.is_empty(), "no request should have been sent");
}

#[tokio::test]
async fn bearer_credentials_are_attached_to_every_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/contact/"))
        .and(header("authorization", "Bearer secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&mock_server)
        .await;

    let client = Client::builder()
        .base_url(mock_server.uri())
        .unwrap()
        .credentials(Credentials::Bearer("secret-token".to_string()))
        .build()
        .unwrap();

    let descriptor = MethodDescriptor::new(Verb::Get, "/api/contact", "/");
    let _: serde_json::Value = client.execute(descriptor).await.unwrap();
}

#[test]
fn blocking_shape_executes_on_the_calling_thread() {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let mock_server = rt.block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/contact/Contact1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(contact()))
            .mount(&server)
            .await;
        server
    });

    let client = Client::builder()
        .base_url(mock_server.uri())
        .unwrap()
        .build()
        .unwrap();
    let blocking = client.blocking().unwrap();

    let descriptor = MethodDescriptor::new(Verb::Get, "/api/contact", "/{name}")
        .path_param("name", "Contact1");
    let result: TestContact = blocking.execute(descriptor).unwrap();
    assert_eq!(result, contact());
}

#[test]
fn blocking_timeout_is_a_distinct_error() {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let mock_server = rt.block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/slow/"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;
        server
    });

    let counting = Arc::new(CountingInterceptor::default());
    let client = Client::builder()
        .base_url(mock_server.uri())
        .unwrap()
        .timeout(Duration::from_millis(200))
        .interceptor(counting.clone())
        .build()
        .unwrap();
    let blocking = client.blocking().unwrap();

    let descriptor = MethodDescriptor::new(Verb::Get, "/api/slow", "/");
    let result = blocking.execute::<serde_json::Value>(descriptor);

    match result {
        Err(Error::Timeout { limit }) => assert_eq!(limit, Duration::from_millis(200)),
        other => panic!("expected Timeout, got {other:?}"),
    }
    assert_eq!(counting.errors.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn unsubscribed_interceptor_stops_receiving_notifications() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&mock_server)
        .await;

    let counting = Arc::new(CountingInterceptor::default());
    let client = client_for(&mock_server);

    {
        let _subscription = client.subscribe(counting.clone());
        let descriptor = MethodDescriptor::new(Verb::Get, "/api/contact", "/");
        let _: serde_json::Value = client.execute(descriptor).await.unwrap();
    }

    let descriptor = MethodDescriptor::new(Verb::Get, "/api/contact", "/");
    let _: serde_json::Value = client.execute(descriptor).await.unwrap();

    assert_eq!(counting.before_send.load(Ordering::SeqCst), 1);
    assert_eq!(counting.responses.load(Ordering::SeqCst), 1);
}
