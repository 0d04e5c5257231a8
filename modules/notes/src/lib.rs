//! Notes Service: persistence endpoint for the instalments notes widget.
//!
//! Serves a single note collection with read-all, replace-all and clear-all
//! over `/api/notes`, backed by a JSON file.

pub mod config;
pub mod routes;
pub mod store;

use routes::AppState;
use std::sync::Arc;
use std::time::Instant;
use store::NoteFileStore;
use tokio::net::TcpListener;

/// Serve the notes API for `store` on an already bound listener
pub async fn serve(listener: TcpListener, store: NoteFileStore) -> std::io::Result<()> {
    let state = Arc::new(AppState {
        store,
        start_time: Instant::now(),
    });
    axum::serve(listener, routes::router(state)).await
}
