use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    routing::get as get_route,
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use zitie::catalog::{parse_catalog_source, Catalog, CatalogError};
use zitie::config::Config;
use zitie::routes::build_router;
use zitie::selection::{MemoryStore, SelectionStore};
use zitie::state::AppState;
use zitie::workbench::{
    ApiClient, ClientError, DispatchTable, Effect, LoadError, UiEvent, UiRole, Workbench,
    WorkbenchOptions, LOAD_FAILURE_MESSAGE,
};

fn catalog() -> Catalog {
    parse_catalog_source(include_str!("../data/common-chars.js")).unwrap()
}

fn app() -> Router {
    build_router(AppState {
        catalog: Arc::new(catalog()),
        config: Config {
            port: 0,
            rust_log: "info".to_string(),
            catalog_path: PathBuf::from("data/common-chars.js"),
        },
    })
}

async fn get(uri: &str) -> (StatusCode, Vec<u8>) {
    let response = app()
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

async fn post_print(body: Value) -> (StatusCode, Option<String>, String) {
    let request = Request::post("/print")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app().oneshot(request).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, content_type, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn test_health_reports_ok() {
    let (status, body) = get("/health").await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["catalog_size"], 520);
}

#[tokio::test]
async fn test_chars_returns_catalog_in_order() {
    let (status, body) = get("/api/chars").await;
    assert_eq!(status, StatusCode::OK);
    let chars: Vec<String> = serde_json::from_slice(&body).unwrap();
    assert_eq!(chars.len(), 520);
    assert_eq!(chars[0], "的");
    assert!(chars.iter().all(|c| c.chars().count() == 1));
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let (status, _) = get("/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_print_large_grid_layout() {
    let (status, content_type, html) = post_print(json!({
        "selectedChars": [{ "char": "永", "lines": 2 }],
        "gridSize": "large",
        "useAnimals": true
    }))
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(content_type.unwrap().starts_with("text/html"));
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert_eq!(html.matches(r#"class="cell reference-cell""#).count(), 1);
    assert_eq!(html.matches(r#"class="practice-row""#).count(), 2);
    assert_eq!(html.matches(r#"class="cell practice-cell""#).count(), 12);
    assert!(html.contains("width: 100px; height: 100px;"));
}

#[tokio::test]
async fn test_print_defaults_to_medium_grid() {
    let (status, _, html) = post_print(json!({
        "selectedChars": [{ "char": "永" }]
    }))
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(html.matches(r#"class="cell practice-cell""#).count(), 7);
}

#[tokio::test]
async fn test_print_empty_selection_is_400_without_document() {
    let (status, content_type, body) = post_print(json!({
        "selectedChars": [],
        "gridSize": "medium",
        "useAnimals": true
    }))
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!content_type.unwrap_or_default().starts_with("text/html"));
    assert!(!body.contains("<!DOCTYPE html>"));
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_print_missing_or_malformed_selection_is_400() {
    let (status, _, _) = post_print(json!({ "gridSize": "small" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, _) = post_print(json!({ "selectedChars": "永" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, _) = post_print(json!({ "selectedChars": [{ "char": "永远" }] })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_print_over_capacity_is_400() {
    let entries: Vec<Value> = "一二三四五六七八九十百"
        .chars()
        .map(|c| json!({ "char": c.to_string() }))
        .collect();
    let (status, _, _) = post_print(json!({ "selectedChars": entries })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_print_unknown_grid_size_is_400() {
    let (status, _, _) = post_print(json!({
        "selectedChars": [{ "char": "永" }],
        "gridSize": "huge"
    }))
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_print_use_animals_is_truthy() {
    let (status, _, html) = post_print(json!({
        "selectedChars": [{ "char": "永" }],
        "useAnimals": null
    }))
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("汉字书写练习"));
    assert!(!html.contains(r#"class="ornament""#));

    let (status, _, html) = post_print(json!({
        "selectedChars": [{ "char": "永" }],
        "useAnimals": "yes"
    }))
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains(r#"class="ornament""#));
}

#[tokio::test]
async fn test_print_unparseable_body_uses_error_envelope() {
    let request = Request::post("/print")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"selectedChars\": ["))
        .unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

/// Serves `router` on an ephemeral port and tries to load a workbench from it.
async fn load_from(router: Router) -> LoadError {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    let client = ApiClient::new(format!("http://{addr}"));
    let store: Arc<dyn SelectionStore> = Arc::new(MemoryStore::default());
    let Err(err) = Workbench::load(&client, store, WorkbenchOptions::default()).await else {
        panic!("expected the catalog load to fail");
    };
    assert_eq!(err.inline_message(), LOAD_FAILURE_MESSAGE);
    err
}

#[tokio::test]
async fn test_load_rejects_non_array_catalog() {
    let router = Router::new().route(
        "/api/chars",
        get_route(|| async { Json(json!({ "a": 1 })) }),
    );
    let err = load_from(router).await;
    assert!(matches!(err.cause, ClientError::Catalog(CatalogError::Parse(_))));
}

#[tokio::test]
async fn test_load_rejects_multi_character_entry() {
    let router = Router::new().route(
        "/api/chars",
        get_route(|| async { Json(json!(["一二"])) }),
    );
    let err = load_from(router).await;
    assert!(matches!(
        err.cause,
        ClientError::Catalog(CatalogError::InvalidEntry { .. })
    ));
}

#[tokio::test]
async fn test_load_reports_server_error_status() {
    let router = Router::new().route(
        "/api/chars",
        get_route(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "catalog unavailable") }),
    );
    let err = load_from(router).await;
    assert!(matches!(err.cause, ClientError::Status { status: 500, .. }));
}

#[tokio::test]
async fn test_workbench_round_trip_against_live_server() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app()).await.unwrap();
    });

    let client = ApiClient::new(format!("http://{addr}"));
    let store: Arc<dyn SelectionStore> = Arc::new(MemoryStore::default());
    let mut wb = Workbench::load(&client, store, WorkbenchOptions::default())
        .await
        .unwrap();
    assert_eq!(wb.catalog().len(), 520);

    let table = DispatchTable::standard();
    table.dispatch(&mut wb, &UiEvent::new(UiRole::BandFilter, "basic"));
    let view = wb.snapshot();
    assert_eq!(view.page.page_count, 1);
    assert_eq!(view.items.len(), 100);

    table.dispatch(&mut wb, &UiEvent::new(UiRole::CustomInput, "永"));
    table.dispatch(&mut wb, &UiEvent::new(UiRole::LineCount, "永=2"));
    table.dispatch(&mut wb, &UiEvent::new(UiRole::GridSize, "large"));

    let Effect::Print(request) = table.dispatch(&mut wb, &UiEvent::click(UiRole::PrintButton))
    else {
        panic!("expected a print effect");
    };
    let html = wb.submit_print(&client, &request).await.unwrap();
    assert_eq!(html.matches(r#"class="cell practice-cell""#).count(), 12);
    assert!(wb.notice().is_none());
}
