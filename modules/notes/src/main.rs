//! Notes Service binary
//!
//! Default: http://127.0.0.1:9110/

use notes_service::config::ServiceConfig;
use notes_service::store::NoteFileStore;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = ServiceConfig::from_env();

    let store = NoteFileStore::new(config.data_file.clone());
    log::info!("[NOTES] Data file: {}", store.path().display());

    let addr = config.bind_addr();
    log::info!("Notes Service listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind");

    notes_service::serve(listener, store).await.expect("Server error");
}
