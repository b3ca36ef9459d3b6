use std::sync::Arc;
use std::time::Duration;

use axum::http::{header, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};

use testbed_core::traits::EntityStore;

use mock_stores::{FailingEntityStore, MockEntityStore};

fn build_app(store: Arc<dyn EntityStore>) -> TestServer {
    let state = testbed_server::app_state::AppState { store };
    let app = testbed_server::router::create_router(state, Duration::from_secs(30));
    TestServer::new(app).unwrap()
}

fn build_test_app() -> TestServer {
    build_app(Arc::new(MockEntityStore::new()))
}

fn build_failing_app() -> TestServer {
    build_app(Arc::new(FailingEntityStore))
}

async fn create(server: &TestServer, body: Value) -> Value {
    let resp = server.post("/api/test/create").json(&body).await;
    resp.assert_status_ok();
    resp.json()
}

#[tokio::test]
async fn health_check_reports_record_count() {
    let server = build_test_app();
    create(&server, json!({ "name": "Alice" })).await;
    create(&server, json!({ "name": "Bob" })).await;

    let resp = server.get("/api/test/health").await;
    resp.assert_status_ok();
    assert_eq!(
        resp.text(),
        "Database connection successful! Total records: 2"
    );
}

#[tokio::test]
async fn create_assigns_id() {
    let server = build_test_app();

    let body = create(&server, json!({ "name": "Alice" })).await;
    assert_eq!(body, json!({ "id": 1, "name": "Alice" }));
}

#[tokio::test]
async fn create_ignores_client_supplied_id() {
    let server = build_test_app();

    let body = create(&server, json!({ "id": 99, "name": "Alice" })).await;
    assert_eq!(body["id"], 1);

    server.get("/api/test/99").await.assert_status_not_found();
}

#[tokio::test]
async fn create_passes_description_through() {
    let server = build_test_app();

    let body = create(&server, json!({ "name": "Alice", "description": "admin" })).await;
    assert_eq!(body["description"], "admin");

    let fetched: Value = server.get("/api/test/1").await.json();
    assert_eq!(fetched, body);
}

#[tokio::test]
async fn create_without_name_is_rejected() {
    let server = build_test_app();

    let resp = server
        .post("/api/test/create")
        .json(&json!({ "description": "nameless" }))
        .await;
    assert!(resp.status_code().is_client_error());

    let all: Value = server.get("/api/test/all").await.json();
    assert_eq!(all, json!([]));
}

#[tokio::test]
async fn saved_entity_is_found_by_id() {
    let server = build_test_app();

    let created = create(&server, json!({ "name": "Carol" })).await;
    let id = created["id"].as_i64().unwrap();

    let resp = server.get(&format!("/api/test/{id}")).await;
    resp.assert_status_ok();
    let fetched: Value = resp.json();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn list_returns_all_entities() {
    let server = build_test_app();
    create(&server, json!({ "name": "Alice" })).await;
    create(&server, json!({ "name": "Bob" })).await;

    let resp = server.get("/api/test/all").await;
    resp.assert_status_ok();
    let body: Value = resp.json();
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Alice", "Bob"]);
}

#[tokio::test]
async fn unknown_id_returns_404_for_get_put_delete() {
    let server = build_test_app();

    server.get("/api/test/42").await.assert_status_not_found();
    server
        .put("/api/test/42")
        .json(&json!({ "name": "Ghost" }))
        .await
        .assert_status_not_found();
    server.delete("/api/test/42").await.assert_status_not_found();
}

#[tokio::test]
async fn non_numeric_id_is_rejected() {
    let server = build_test_app();

    let resp = server.get("/api/test/abc").await;
    assert!(resp.status_code().is_client_error());
}

#[tokio::test]
async fn update_overwrites_with_path_id() {
    let server = build_test_app();
    create(&server, json!({ "name": "Alice" })).await;
    create(&server, json!({ "name": "Bob" })).await;

    let resp = server
        .put("/api/test/1")
        .json(&json!({ "id": 2, "name": "Alicia", "description": "renamed" }))
        .await;
    resp.assert_status_ok();
    let body: Value = resp.json();
    assert_eq!(
        body,
        json!({ "id": 1, "name": "Alicia", "description": "renamed" })
    );

    let untouched: Value = server.get("/api/test/2").await.json();
    assert_eq!(untouched["name"], "Bob");
}

#[tokio::test]
async fn delete_then_get_returns_404() {
    let server = build_test_app();
    create(&server, json!({ "name": "Alice" })).await;

    let resp = server.delete("/api/test/1").await;
    resp.assert_status_ok();
    assert_eq!(resp.text(), "Entity deleted successfully");

    server.get("/api/test/1").await.assert_status_not_found();
}

#[tokio::test]
async fn repeated_delete_returns_404() {
    let server = build_test_app();
    create(&server, json!({ "name": "Alice" })).await;
    server.delete("/api/test/1").await.assert_status_ok();

    server.delete("/api/test/1").await.assert_status_not_found();
    server.delete("/api/test/1").await.assert_status_not_found();
}

#[tokio::test]
async fn search_matches_substring_ignoring_case() {
    let server = build_test_app();
    create(&server, json!({ "name": "Alice" })).await;
    create(&server, json!({ "name": "Bob" })).await;
    create(&server, json!({ "name": "MALICE" })).await;

    let resp = server
        .get("/api/test/search")
        .add_query_param("name", "ali")
        .await;
    resp.assert_status_ok();
    let body: Value = resp.json();
    assert_eq!(
        body,
        json!([{ "id": 1, "name": "Alice" }, { "id": 3, "name": "MALICE" }])
    );
}

#[tokio::test]
async fn search_with_no_matches_returns_empty_array() {
    let server = build_test_app();
    create(&server, json!({ "name": "Alice" })).await;

    let body: Value = server
        .get("/api/test/search")
        .add_query_param("name", "zed")
        .await
        .json();
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn exact_search_matches_whole_name_only() {
    let server = build_test_app();
    create(&server, json!({ "name": "Alice" })).await;
    create(&server, json!({ "name": "alice" })).await;
    create(&server, json!({ "name": "Alice Cooper" })).await;

    let body: Value = server
        .get("/api/test/search")
        .add_query_param("name", "Alice")
        .add_query_param("exact", "true")
        .await
        .json();
    assert_eq!(body, json!([{ "id": 1, "name": "Alice" }]));
}

#[tokio::test]
async fn search_without_name_is_rejected() {
    let server = build_test_app();

    let resp = server.get("/api/test/search").await;
    assert!(resp.status_code().is_client_error());
}

#[tokio::test]
async fn alice_lifecycle() {
    let server = build_test_app();

    let created = create(&server, json!({ "name": "Alice" })).await;
    assert_eq!(created, json!({ "id": 1, "name": "Alice" }));

    let fetched: Value = server.get("/api/test/1").await.json();
    assert_eq!(fetched, json!({ "id": 1, "name": "Alice" }));

    let found: Value = server
        .get("/api/test/search")
        .add_query_param("name", "ali")
        .await
        .json();
    assert_eq!(found, json!([{ "id": 1, "name": "Alice" }]));

    server.delete("/api/test/1").await.assert_status_ok();
    server.get("/api/test/1").await.assert_status_not_found();
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let server = build_test_app();

    let resp = server
        .get("/api/test/all")
        .add_header(header::ORIGIN, HeaderValue::from_static("https://example.com"))
        .await;
    resp.assert_status_ok();
    let allowed = resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap();
    assert_eq!(allowed, "*");
}

#[tokio::test]
async fn failing_store_health_reports_error_text() {
    let server = build_failing_app();

    let resp = server.get("/api/test/health").await;
    resp.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        resp.text(),
        "Database connection failed: database error: connection refused"
    );
}

#[tokio::test]
async fn failing_store_delete_reports_error_text() {
    let server = build_failing_app();

    let resp = server.delete("/api/test/1").await;
    resp.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        resp.text(),
        "Error deleting entity: database error: connection refused"
    );
}

#[tokio::test]
async fn failing_store_json_endpoints_return_empty_500() {
    let server = build_failing_app();

    let responses = vec![
        server
            .post("/api/test/create")
            .json(&json!({ "name": "Alice" }))
            .await,
        server.get("/api/test/all").await,
        server.get("/api/test/1").await,
        server
            .put("/api/test/1")
            .json(&json!({ "name": "Alice" }))
            .await,
        server
            .get("/api/test/search")
            .add_query_param("name", "ali")
            .await,
    ];

    for resp in responses {
        resp.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert!(resp.text().is_empty());
    }
}
