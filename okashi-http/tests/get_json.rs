use okashi_http::{HttpClient, HttpError, Url};
use serde::Deserialize;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Deserialize)]
struct Payload {
    value: u32,
}

fn url(server: &MockServer, rest: &str) -> Url {
    Url::parse(&format!("{}{}", server.uri(), rest)).unwrap()
}

#[tokio::test]
async fn decodes_success_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/items"))
        .and(query_param("apikey", "guest"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(r#"{"value":7}"#, "application/json"))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new().unwrap();
    let got: Payload = client
        .get_json(&url(&server, "/items?apikey=guest"))
        .await
        .unwrap();
    assert_eq!(got.value, 7);
}

#[tokio::test]
async fn malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>nope</html>"))
        .mount(&server)
        .await;

    let client = HttpClient::new().unwrap();
    let err = client
        .get_json::<Payload>(&url(&server, "/items"))
        .await
        .unwrap_err();
    match err {
        HttpError::Decode(_, snippet) => assert!(snippet.contains("nope")),
        other => panic!("expected decode error, got {other:?}"),
    }
}

#[tokio::test]
async fn server_error_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_raw(r#"{"message":"down"}"#, "application/json"))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new().unwrap();
    let err = client
        .get_json::<Payload>(&url(&server, "/items"))
        .await
        .unwrap_err();
    match err {
        HttpError::Api { status, message } => {
            assert_eq!(status.as_u16(), 503);
            assert_eq!(message, "down");
        }
        other => panic!("expected api error, got {other:?}"),
    }
}

#[tokio::test]
async fn refused_connection_is_network_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = HttpClient::new().unwrap();
    let target = Url::parse(&format!("http://{addr}/items")).unwrap();
    let err = client
        .get_json::<Payload>(&target)
        .await
        .unwrap_err();
    assert!(matches!(err, HttpError::Network(_)), "got {err:?}");
}

#[tokio::test]
async fn client_timeout_applies() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"{"value":1}"#, "application/json")
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let client = HttpClient::new()
        .unwrap()
        .with_timeout(Duration::from_millis(50));
    let err = client
        .get_json::<Payload>(&url(&server, "/items"))
        .await
        .unwrap_err();
    assert!(matches!(err, HttpError::Network(_)), "got {err:?}");
}

#[tokio::test]
async fn non_http_scheme_is_rejected_before_sending() {
    let client = HttpClient::new().unwrap();
    let target = Url::parse("ftp://example.com/items").unwrap();
    let err = client
        .get_json::<Payload>(&target)
        .await
        .unwrap_err();
    assert!(matches!(err, HttpError::Url(_)));
}
