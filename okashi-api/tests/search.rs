use okashi_api::{OkashiApi, QueryTemplate, SearchErrorKind, SearchKeyword};
use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_PATH: &str = "/toriko/api/";

fn api_for(server: &MockServer) -> OkashiApi {
    let endpoint = Url::parse(&format!("{}{}", server.uri(), API_PATH)).unwrap();
    OkashiApi::new(QueryTemplate::default().with_endpoint(endpoint)).unwrap()
}

fn record(n: u32) -> serde_json::Value {
    json!({
        "id": n.to_string(),
        "name": format!("snack-{n}"),
        "url": format!("https://sysbird.jp/toriko/{n}"),
        "image": format!("https://sysbird.jp/toriko/img/{n}.jpg"),
    })
}

fn three_good_one_missing_image() -> serde_json::Value {
    json!({
        "status": "OK",
        "count": 4,
        "item": [
            record(1),
            record(2),
            { "name": "no-image", "url": "https://sysbird.jp/toriko/99" },
            record(3),
        ]
    })
}

#[tokio::test]
async fn japanese_keyword_drops_partial_record_and_keeps_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .and(query_param("apikey", "guest"))
        .and(query_param("format", "json"))
        .and(query_param("keyword", "ポッキー"))
        .and(query_param("max", "10"))
        .and(query_param("order", "r"))
        .respond_with(ResponseTemplate::new(200).set_body_json(three_good_one_missing_image()))
        .expect(1)
        .mount(&server)
        .await;

    let items = api_for(&server).search("ポッキー").await.unwrap().unwrap();

    let names: Vec<&str> = items.iter().map(|i| i.name()).collect();
    assert_eq!(names, ["snack-1", "snack-2", "snack-3"]);
    assert_eq!(items[2].detail_url().as_str(), "https://sysbird.jp/toriko/3");
    assert_eq!(
        items[0].image_url().as_str(),
        "https://sysbird.jp/toriko/img/1.jpg"
    );
}

#[tokio::test]
async fn keyword_with_spaces_and_delimiters_reaches_server_literally() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .and(query_param("keyword", "pocky sticks & pretz #2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "item": [record(1)] })))
        .expect(1)
        .mount(&server)
        .await;

    let items = api_for(&server)
        .search("pocky sticks & pretz #2")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(items.len(), 1);

    let received = server.received_requests().await.unwrap();
    let raw_query = received[0].url.query().unwrap().to_string();
    assert!(raw_query.contains("keyword=pocky%20sticks%20%26%20pretz%20%232"));
}

#[tokio::test]
async fn null_item_is_none_and_empty_list_is_some() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("keyword", "none"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "item": null })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("keyword", "absent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "OK" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("keyword", "empty"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "item": [] })))
        .mount(&server)
        .await;

    let api = api_for(&server);
    assert!(api.search("none").await.unwrap().is_none());
    assert!(api.search("absent").await.unwrap().is_none());
    assert_eq!(api.search("empty").await.unwrap().map(|v| v.len()), Some(0));
}

#[tokio::test]
async fn repeated_search_yields_same_content_with_fresh_ids() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(three_good_one_missing_image()))
        .expect(2)
        .mount(&server)
        .await;

    let api = api_for(&server);
    let first = api.search("pocky").await.unwrap().unwrap();
    let second = api.search("pocky").await.unwrap().unwrap();

    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(second.iter()) {
        assert!(a.same_content(b));
        assert_ne!(a.id(), b.id());
    }
}

#[tokio::test]
async fn failures_are_classified() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("keyword", "broken"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"item\": [ oops"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("keyword", "down"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let api = api_for(&server);
    assert_eq!(
        api.search("broken").await.unwrap_err().kind(),
        SearchErrorKind::Decode
    );
    assert_eq!(
        api.search("down").await.unwrap_err().kind(),
        SearchErrorKind::Transport
    );
}

#[tokio::test]
async fn invalid_utf8_keyword_never_hits_the_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "item": [] })))
        .expect(0)
        .mount(&server)
        .await;

    let err = api_for(&server)
        .search(SearchKeyword::from(vec![0xc3, 0x28]))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), SearchErrorKind::Encoding);
}

#[tokio::test]
async fn unreachable_host_is_transport_failure() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let endpoint = Url::parse(&format!("http://{addr}{API_PATH}")).unwrap();
    let api = OkashiApi::new(QueryTemplate::default().with_endpoint(endpoint)).unwrap();
    let err = api.search("pocky").await.unwrap_err();
    assert_eq!(err.kind(), SearchErrorKind::Transport);
}
