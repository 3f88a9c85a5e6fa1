//! Router tests for the experiment API.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use chrono::{TimeZone, Utc};
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use nerfdash_core::models::{CategoryFlags, ExperimentRecord, MediaKind, Metrics};
use nerfdash_core::store;
use nerfdash_server::build_router;
use nerfdash_server::state::AppState;

fn record(id: u64, model: &str) -> ExperimentRecord {
    ExperimentRecord {
        id,
        title: format!("run-{id}"),
        dataset: "lego".to_string(),
        kind: MediaKind::Image,
        model: model.to_string(),
        preprocessor: "COLMAP".to_string(),
        scene_type: "tabletop".to_string(),
        virtual_scene: false,
        real_scene: true,
        date_added: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        date_updated: Utc.with_ymd_and_hms(2024, 3, 2, 12, 0, 0).unwrap(),
        metrics: Metrics::default(),
        categories: CategoryFlags::default(),
        preprocessed: true,
        trained: true,
        evaluated: true,
        successful: true,
        error: String::new(),
        raw_data: serde_json::Value::Null,
    }
}

fn test_state(tmp: &TempDir) -> AppState {
    AppState::with_records(
        vec![record(1, "NeRF"), record(2, "Gaussian")],
        tmp.path().join("experiments.json"),
    )
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn list_returns_items_and_total() {
    let tmp = TempDir::new().unwrap();
    let app = build_router(test_state(&tmp));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/experiments")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["total"], 2);
    assert_eq!(json["items"].as_array().unwrap().len(), 2);
    assert_eq!(json["items"][0]["model"], "NeRF");
}

#[tokio::test]
async fn get_unknown_id_is_404() {
    let tmp = TempDir::new().unwrap();
    let app = build_router(test_state(&tmp));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/experiments/42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn put_replaces_record_and_persists() {
    let tmp = TempDir::new().unwrap();
    let state = test_state(&tmp);
    let app = build_router(state.clone());

    let mut updated = record(1, "NeRF");
    updated.title = "renamed".to_string();
    updated.categories.opaque_obj = true;

    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/experiments/1")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&updated).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["title"], "renamed");
    assert_eq!(json["opaque_obj"], true);

    // In-memory state reflects the edit.
    let records = state.records.read().unwrap();
    assert_eq!(records[0].title, "renamed");

    // The data file was written with the full set.
    let saved = store::load_set(&state.data_path).unwrap();
    assert_eq!(saved.total, 2);
    assert_eq!(saved.items[0].title, "renamed");
}

#[tokio::test]
async fn put_with_mismatched_id_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let app = build_router(test_state(&tmp));

    let body = record(2, "Gaussian");
    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/experiments/1")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn put_unknown_id_is_404() {
    let tmp = TempDir::new().unwrap();
    let app = build_router(test_state(&tmp));

    let body = record(77, "NeRF");
    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/experiments/77")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
