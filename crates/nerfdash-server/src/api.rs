//! REST API handlers for nerfdash-server.

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tracing::{info, warn};

use nerfdash_core::{replace_record, store, ExperimentRecord, ExperimentSet};

use crate::state::AppState;

// ─── Router ──────────────────────────────────────────────────────────────────

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/experiments", get(list_experiments))
        .route("/experiments/{id}", get(get_experiment).put(put_experiment))
}

// ─── Handlers ────────────────────────────────────────────────────────────────

async fn list_experiments(State(state): State<AppState>) -> impl IntoResponse {
    let records = match state.records.read() {
        Ok(records) => records,
        Err(_) => return (StatusCode::INTERNAL_SERVER_ERROR, "state poisoned").into_response(),
    };
    Json(ExperimentSet::new(records.clone())).into_response()
}

async fn get_experiment(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> impl IntoResponse {
    let records = match state.records.read() {
        Ok(records) => records,
        Err(_) => return (StatusCode::INTERNAL_SERVER_ERROR, "state poisoned").into_response(),
    };
    match records.iter().find(|r| r.id == id) {
        Some(record) => Json(record.clone()).into_response(),
        None => (StatusCode::NOT_FOUND, format!("experiment {id} not found")).into_response(),
    }
}

/// Full-record replace. The body carries the complete updated record; the
/// response echoes it back on success.
async fn put_experiment(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(updated): Json<ExperimentRecord>,
) -> impl IntoResponse {
    if updated.id != id {
        return (
            StatusCode::BAD_REQUEST,
            format!("path id {id} does not match body id {}", updated.id),
        )
            .into_response();
    }

    let snapshot = {
        let mut records = match state.records.write() {
            Ok(records) => records,
            Err(_) => {
                return (StatusCode::INTERNAL_SERVER_ERROR, "state poisoned").into_response()
            }
        };
        if let Err(e) = replace_record(&mut records, updated.clone()) {
            return (StatusCode::NOT_FOUND, e.to_string()).into_response();
        }
        records.clone()
    };
    info!(id, "experiment updated");

    // Persist best-effort; the update already happened in memory.
    if let Err(e) = store::save_set(&state.data_path, &ExperimentSet::new(snapshot)) {
        warn!(error = %e, "failed to persist data file");
    }

    Json(updated).into_response()
}

// ─── Frontend (embedded) ─────────────────────────────────────────────────────

/// Serve the embedded frontend HTML/JS/CSS/WASM.
pub async fn serve_frontend(uri: axum::http::Uri) -> impl IntoResponse {
    let path = uri.path().trim_start_matches('/');

    let (actual_path, content) = match Assets::get(path) {
        Some(content) => (path, content),
        None => match Assets::get("index.html") {
            Some(content) => ("index.html", content),
            None => return StatusCode::NOT_FOUND.into_response(),
        },
    };

    let mime = mime_guess::from_path(actual_path).first_or_octet_stream();

    Response::builder()
        .header(header::CONTENT_TYPE, mime.as_ref())
        .body(Body::from(content.data.into_owned()))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

#[derive(rust_embed::Embed)]
#[folder = "../../frontend/dist"]
#[include = "*.html"]
#[include = "*.js"]
#[include = "*.css"]
#[include = "*.wasm"]
struct Assets;
