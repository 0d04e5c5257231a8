//! Typed HTTP client for the notes service API.

use async_trait::async_trait;
use notes_types::{ClearNotesResponse, ErrorResponse, Note, SaveNotesResponse, parse_records};

/// Remote copy of the note collection
#[async_trait]
pub trait NoteSync: Send + Sync {
    /// Fetch the full persisted collection
    async fn read_all(&self) -> Result<Vec<Note>, String>;

    /// Overwrite the persisted collection. Returns the stored count.
    async fn replace_all(&self, notes: &[Note]) -> Result<usize, String>;

    /// Overwrite the persisted collection with an empty one
    async fn clear_all(&self) -> Result<(), String>;
}

pub struct HttpNoteSync {
    base_url: String,
    client: reqwest::Client,
}

impl HttpNoteSync {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn notes_url(&self) -> String {
        format!("{}/api/notes", self.base_url)
    }

    /// Check if the notes service is up
    pub async fn health(&self) -> Result<bool, String> {
        let resp = self
            .client
            .get(format!("{}/api/health", self.base_url))
            .send()
            .await
            .map_err(|e| format!("Health check failed: {}", e))?;

        Ok(resp.status().is_success())
    }
}

/// Pull the `error` field out of a failed response, falling back to the raw body
async fn error_message(resp: reqwest::Response) -> String {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    match serde_json::from_str::<ErrorResponse>(&body) {
        Ok(err) => format!("HTTP {}: {}", status, err.error),
        Err(_) => format!("HTTP {}: {}", status, body),
    }
}

#[async_trait]
impl NoteSync for HttpNoteSync {
    async fn read_all(&self) -> Result<Vec<Note>, String> {
        let resp = self
            .client
            .get(self.notes_url())
            .send()
            .await
            .map_err(|e| format!("Load notes failed: {}", e))?;

        if !resp.status().is_success() {
            return Err(format!("Load notes {}", error_message(resp).await));
        }

        let records: Vec<serde_json::Value> = resp
            .json()
            .await
            .map_err(|e| format!("Parse notes response: {}", e))?;

        let parsed = parse_records(records);
        if parsed.dropped > 0 {
            log::warn!("[SYNC] Ignored {} invalid records from server", parsed.dropped);
        }
        Ok(parsed.notes)
    }

    async fn replace_all(&self, notes: &[Note]) -> Result<usize, String> {
        let resp = self
            .client
            .post(self.notes_url())
            .json(&serde_json::json!({ "notes": notes }))
            .send()
            .await
            .map_err(|e| format!("Save notes failed: {}", e))?;

        if !resp.status().is_success() {
            return Err(format!("Save notes {}", error_message(resp).await));
        }

        resp.json::<SaveNotesResponse>()
            .await
            .map(|r| r.count)
            .map_err(|e| format!("Parse save response: {}", e))
    }

    async fn clear_all(&self) -> Result<(), String> {
        let resp = self
            .client
            .delete(self.notes_url())
            .send()
            .await
            .map_err(|e| format!("Delete notes failed: {}", e))?;

        if !resp.status().is_success() {
            return Err(format!("Delete notes {}", error_message(resp).await));
        }

        resp.json::<ClearNotesResponse>()
            .await
            .map_err(|e| format!("Parse delete response: {}", e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notes_service::store::NoteFileStore;
    use notes_types::Category;
    use tempfile::tempdir;

    /// Run the notes service on an ephemeral port, returning its base URL
    async fn spawn_service(store: NoteFileStore) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(notes_service::serve(listener, store));
        format!("http://{}", addr)
    }

    fn note(id: &str, content: &str, category: Category) -> Note {
        Note {
            id: id.to_string(),
            content: content.to_string(),
            category,
            model_type: Some("Bank-Driven".to_string()),
            timestamp: "2024-05-01T10:00:00Z".parse().unwrap(),
            is_archived: false,
        }
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let sync = HttpNoteSync::new("http://127.0.0.1:9110/");
        assert_eq!(sync.notes_url(), "http://127.0.0.1:9110/api/notes");
    }

    #[tokio::test]
    async fn test_unreachable_service_is_an_error() {
        // Port 9 (discard) is not expected to run an HTTP server
        let sync = HttpNoteSync::new("http://127.0.0.1:9");
        let err = sync.read_all().await.unwrap_err();
        assert!(err.starts_with("Load notes failed"), "{}", err);
    }

    #[tokio::test]
    async fn test_round_trip_against_notes_service() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.json");
        let sync = HttpNoteSync::new(&spawn_service(NoteFileStore::new(&path)).await);

        assert!(sync.health().await.unwrap());
        assert!(sync.read_all().await.unwrap().is_empty());

        let mut archived = note("1", "Issuer plans", Category::BankDriven);
        archived.is_archived = true;
        let notes = vec![note("2", "Bank app instalments", Category::BankDriven), archived];

        assert_eq!(sync.replace_all(&notes).await.unwrap(), 2);
        assert_eq!(sync.read_all().await.unwrap(), notes);

        // Stored in the file with the wire field names
        let on_disk: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk[1]["isArchived"], true);
        assert_eq!(on_disk[0]["modelType"], "Bank-Driven");

        sync.clear_all().await.unwrap();
        assert!(sync.read_all().await.unwrap().is_empty());
    }
}
