// End-to-end pagination over HTTP: JsonPageSource + ReqwestHttpClient
// against a wiremock server, driven by the Pager under a lifecycle hub.

mod common;

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::time::timeout;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use moor::adapters::{JsonPageSource, ReqwestHttpClient};
use moor::binding::AttachmentHub;
use moor::paging::{PageSource, Pager, PagerConfig};
use moor::traits::Query;

const WAIT: Duration = Duration::from_secs(5);

async fn mount_two_pages(server: &MockServer) {
    // Mounted first so the cursor request is matched before the catch-all.
    Mock::given(method("GET"))
        .and(path("/notes"))
        .and(query_param("cursor", "p2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "items": [4, 5], "next": null })),
        )
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/notes"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "items": [1, 2, 3], "next": "p2" })),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_pager_drives_json_endpoint_end_to_end() {
    common::init_tracing();
    let server = MockServer::start().await;
    mount_two_pages(&server).await;

    let http = Arc::new(ReqwestHttpClient::new());
    let source = JsonPageSource::<i64>::new(http, format!("{}/notes", server.uri()));

    let hub = AttachmentHub::new();
    let pager = Pager::spawn(source, PagerConfig::new().start_with(Query::new()), &hub);
    let mut data = pager.data();

    timeout(WAIT, data.changed()).await.unwrap().unwrap();
    assert_eq!(*data.borrow_and_update(), vec![1, 2, 3]);

    pager.next_page();
    timeout(WAIT, data.changed()).await.unwrap().unwrap();
    assert_eq!(*data.borrow_and_update(), vec![1, 2, 3, 4, 5]);
    assert_eq!(*pager.loading_page().borrow(), 2);
}

#[tokio::test]
async fn test_transient_server_errors_are_retried_away() {
    common::init_tracing();
    let server = MockServer::start().await;

    // Two failures, then success: inside the retry bound, so the page
    // arrives as if nothing happened.
    Mock::given(method("GET"))
        .and(path("/notes"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/notes"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "items": [7], "next": null })),
        )
        .mount(&server)
        .await;

    let http = Arc::new(ReqwestHttpClient::new());
    let source = JsonPageSource::<i64>::new(http, format!("{}/notes", server.uri()));

    let hub = AttachmentHub::new();
    let mut pager = Pager::spawn(
        source,
        PagerConfig::new().start_with(Query::new()).surface_errors(),
        &hub,
    );
    let mut errors = pager.take_errors().unwrap();
    let mut data = pager.data();

    timeout(WAIT, data.changed()).await.unwrap().unwrap();
    assert_eq!(*data.borrow_and_update(), vec![7]);
    assert!(errors.try_recv().is_err());
}

#[tokio::test]
async fn test_bearer_token_reaches_the_wire() {
    common::init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/notes"))
        .and(header("authorization", "Bearer sesame"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "items": ["ok"], "next": null })),
        )
        .mount(&server)
        .await;

    let http = Arc::new(ReqwestHttpClient::new().with_bearer_token("sesame"));
    let source =
        JsonPageSource::<String>::new(http, format!("{}/notes", server.uri()));

    let page = source.load_initial(&Query::new()).await.unwrap();
    assert_eq!(source.items(&page), vec!["ok".to_string()]);
    assert_eq!(source.cursor(&page), None);
}

#[tokio::test]
async fn test_session_parameters_reach_the_query_string() {
    common::init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/notes"))
        .and(query_param("q", "rust"))
        .and(query_param("limit", "20"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "items": [1], "next": null })),
        )
        .mount(&server)
        .await;

    let http = Arc::new(ReqwestHttpClient::new());
    let source = JsonPageSource::<i64>::new(http, format!("{}/notes", server.uri()))
        .with_query("limit", "20");

    let params = vec![("q".to_string(), "rust".to_string())];
    let page = source.load_initial(&params).await.unwrap();
    assert_eq!(source.items(&page), vec![1]);
}
