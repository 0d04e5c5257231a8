//! NoteFileStore: the persisted note collection
//!
//! A single JSON array on disk with whole-collection replacement semantics.
//! Every record read from or written to the file is checked against the Note
//! schema; records that fail are dropped and logged.

use notes_types::{Note, parse_collection, parse_records};
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::{Mutex, OnceCell};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid notes data: {0}")]
    InvalidPayload(String),
}

/// File-backed store for the note collection
pub struct NoteFileStore {
    path: PathBuf,
    initialized: OnceCell<()>,
    /// Serializes writers so the file is always a whole collection
    write_lock: Mutex<()>,
}

impl NoteFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            initialized: OnceCell::new(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the data file with an empty collection on first access
    async fn ensure_initialized(&self) -> Result<(), StoreError> {
        self.initialized
            .get_or_try_init(|| async {
                if fs::try_exists(&self.path).await? {
                    return Ok(());
                }
                if let Some(parent) = self.path.parent() {
                    if !parent.as_os_str().is_empty() {
                        fs::create_dir_all(parent).await?;
                    }
                }
                fs::write(&self.path, "[]").await?;
                log::info!("[NOTES] Initialized empty notes file at {}", self.path.display());
                Ok::<(), StoreError>(())
            })
            .await?;
        Ok(())
    }

    /// Read the full collection
    pub async fn read_all(&self) -> Result<Vec<Note>, StoreError> {
        self.ensure_initialized().await?;

        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            // Removed out from under us after init
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let value: serde_json::Value = serde_json::from_str(&raw)?;
        let parsed = parse_collection(value).map_err(StoreError::InvalidPayload)?;
        if parsed.dropped > 0 {
            log::warn!(
                "[NOTES] Ignored {} invalid records in {}",
                parsed.dropped,
                self.path.display()
            );
        }
        Ok(parsed.notes)
    }

    /// Replace the whole collection with `records`, which must be a JSON array.
    /// Returns the number of notes stored.
    pub async fn replace_all(&self, records: serde_json::Value) -> Result<usize, StoreError> {
        let records = match records {
            serde_json::Value::Array(records) => records,
            _ => {
                return Err(StoreError::InvalidPayload(
                    "notes must be an array".to_string(),
                ));
            }
        };

        let parsed = parse_records(records);
        if parsed.dropped > 0 {
            log::warn!("[NOTES] Dropped {} invalid records from save", parsed.dropped);
        }

        self.write_collection(&parsed.notes).await?;
        Ok(parsed.notes.len())
    }

    /// Overwrite the collection with an empty one
    pub async fn clear_all(&self) -> Result<(), StoreError> {
        self.write_collection(&[]).await
    }

    async fn write_collection(&self, notes: &[Note]) -> Result<(), StoreError> {
        self.ensure_initialized().await?;
        let body = serde_json::to_string_pretty(notes)?;

        let _guard = self.write_lock.lock().await;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, body.as_bytes()).await?;
        fs::rename(&tmp_path, &self.path).await?;

        log::debug!("[NOTES] Wrote {} notes to {}", notes.len(), self.path.display());
        Ok(())
    }
}
