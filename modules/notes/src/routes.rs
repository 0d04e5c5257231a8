//! Axum route handlers for the notes API.

use crate::store::{NoteFileStore, StoreError};
use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use notes_types::*;
use std::sync::Arc;
use std::time::Instant;

/// Version from Cargo.toml, available at compile time
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const NO_STORE: [(header::HeaderName, &str); 1] = [(header::CACHE_CONTROL, "no-store, max-age=0")];

pub struct AppState {
    pub store: NoteFileStore,
    pub start_time: Instant,
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = tower_http::cors::CorsLayer::permissive();

    Router::new()
        .route(
            "/api/notes",
            get(list_notes).post(save_notes).delete(clear_notes),
        )
        .route("/api/health", get(health))
        .with_state(state)
        .layer(cors)
}

// GET /api/notes
pub async fn list_notes(State(state): State<Arc<AppState>>) -> Response {
    match state.store.read_all().await {
        Ok(notes) => (StatusCode::OK, NO_STORE, Json(notes)).into_response(),
        Err(e) => {
            log::error!("[NOTES] Error reading notes: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                NO_STORE,
                Json(Vec::<Note>::new()),
            )
                .into_response()
        }
    }
}

// POST /api/notes
pub async fn save_notes(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let mut payload: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(e) => {
            log::warn!("[NOTES] Rejected save with unparseable body: {}", e);
            return invalid_notes_data();
        }
    };

    let Some(records) = payload.get_mut("notes").map(serde_json::Value::take) else {
        log::warn!("[NOTES] Rejected save without a notes field");
        return invalid_notes_data();
    };

    match state.store.replace_all(records).await {
        Ok(count) => {
            log::info!("[NOTES] Saved {} notes", count);
            (
                StatusCode::OK,
                Json(SaveNotesResponse {
                    success: true,
                    count,
                }),
            )
                .into_response()
        }
        Err(StoreError::InvalidPayload(reason)) => {
            log::warn!("[NOTES] Rejected save: {}", reason);
            invalid_notes_data()
        }
        Err(e) => {
            log::error!("[NOTES] Error saving notes: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to save notes")),
            )
                .into_response()
        }
    }
}

// DELETE /api/notes
pub async fn clear_notes(State(state): State<Arc<AppState>>) -> Response {
    match state.store.clear_all().await {
        Ok(()) => {
            log::info!("[NOTES] Cleared all notes");
            (StatusCode::OK, Json(ClearNotesResponse { success: true })).into_response()
        }
        Err(e) => {
            log::error!("[NOTES] Error deleting notes: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to delete notes")),
            )
                .into_response()
        }
    }
}

// GET /api/health
pub async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": VERSION,
        "uptime_secs": state.start_time.elapsed().as_secs(),
    }))
}

fn invalid_notes_data() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::new("Invalid notes data")),
    )
        .into_response()
}
