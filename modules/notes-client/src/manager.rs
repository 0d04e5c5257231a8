//! NoteManager: in-memory note collection with debounced sync
//!
//! All mutations are synchronous on `&mut self`. Each one that changes the
//! collection reschedules a single push of the whole collection to the notes
//! service; a burst of edits results in one replace-all carrying the final
//! state. Sync failures are logged and never roll back memory.

use crate::classifier::classify;
use crate::debounce::Debouncer;
use crate::normalize::normalize;
use crate::summary::{self, ExportSummary};
use crate::sync::NoteSync;
use chrono::{DateTime, Utc};
use notes_types::{Category, Note};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Debouncer key for the collection push
const SYNC_KEY: &str = "notes";

#[derive(Debug, Clone)]
pub struct ManagerConfig {
    /// Stamped on new notes as `model_type`; fallback category context
    pub model_context: Option<String>,
    /// Quiet period before the collection is pushed
    pub sync_debounce: Duration,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            model_context: None,
            sync_debounce: Duration::from_millis(500),
        }
    }
}

/// In-progress edit of one note
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditBuffer {
    pub note_id: String,
    pub content: String,
}

/// Which notes the list shows. Never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewFilter {
    pub show_archived: bool,
    /// `None` means all categories
    pub category: Option<Category>,
}

impl ViewFilter {
    pub fn matches(&self, note: &Note) -> bool {
        note.is_archived == self.show_archived
            && self.category.is_none_or(|c| c == note.category)
    }
}

/// Issues millisecond-timestamp ids that never repeat within a collection
#[derive(Debug, Default)]
struct IdGenerator {
    last: u64,
}

impl IdGenerator {
    fn next(&mut self, now: DateTime<Utc>) -> String {
        let millis = u64::try_from(now.timestamp_millis()).unwrap_or(0);
        let id = millis.max(self.last.saturating_add(1));
        self.last = id;
        id.to_string()
    }

    /// Never issue an id at or below a numeric id already in use. Values past
    /// `i64::MAX` cannot be millisecond timestamps and never collide with one.
    fn observe(&mut self, id: &str) {
        match id.parse::<u64>() {
            Ok(value) if value <= i64::MAX as u64 => self.last = self.last.max(value),
            _ => {}
        }
    }
}

/// Keeps pushes in the order they were issued: an older snapshot never lands
/// after a newer one.
#[derive(Debug, Default)]
struct PushOrder {
    issued: AtomicU64,
    /// Sequence of the newest snapshot sent
    sent: tokio::sync::Mutex<u64>,
}

impl PushOrder {
    fn next(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Push `notes` unless a newer snapshot already went out. Returns the
    /// stored count, or `None` when superseded.
    async fn push(&self, sync: &dyn NoteSync, seq: u64, notes: &[Note]) -> Result<Option<usize>, String> {
        let mut sent = self.sent.lock().await;
        if *sent > seq {
            log::debug!("[SYNC] Skipped stale snapshot {} (already sent {})", seq, *sent);
            return Ok(None);
        }
        *sent = seq;
        sync.replace_all(notes).await.map(Some)
    }
}

pub struct NoteManager {
    /// Most recent first
    notes: Vec<Note>,
    model_context: Option<String>,
    draft: String,
    editing: Option<EditBuffer>,
    filter: ViewFilter,
    ids: IdGenerator,
    sync: Arc<dyn NoteSync>,
    debouncer: Debouncer,
    pushes: Arc<PushOrder>,
}

impl NoteManager {
    /// Create a manager with an empty collection
    pub fn new(sync: Arc<dyn NoteSync>, config: ManagerConfig) -> Self {
        Self {
            notes: Vec::new(),
            model_context: config.model_context,
            draft: String::new(),
            editing: None,
            filter: ViewFilter::default(),
            ids: IdGenerator::default(),
            sync,
            debouncer: Debouncer::new(config.sync_debounce),
            pushes: Arc::new(PushOrder::default()),
        }
    }

    /// Create a manager seeded from the notes service. If the fetch fails the
    /// manager starts empty.
    pub async fn load(sync: Arc<dyn NoteSync>, config: ManagerConfig) -> Self {
        let mut manager = Self::new(sync, config);

        match manager.sync.read_all().await {
            Ok(notes) => {
                log::info!("[SYNC] Loaded {} notes", notes.len());
                manager.seed(notes);
            }
            Err(e) => {
                log::error!("[SYNC] Error loading notes: {}", e);
            }
        }

        manager
    }

    /// Replace in-memory state without scheduling a push
    fn seed(&mut self, notes: Vec<Note>) {
        for note in &notes {
            self.ids.observe(&note.id);
        }
        self.notes = notes;
        self.editing = None;
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn note(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    pub fn model_context(&self) -> Option<&str> {
        self.model_context.as_deref()
    }

    // --- Create ---

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Turn the draft into a note. Blank drafts are ignored. Returns the new id.
    pub fn create_from_draft(&mut self) -> Option<String> {
        if self.draft.trim().is_empty() {
            return None;
        }

        let content = normalize(&self.draft);
        let category = classify(&content, self.model_context.as_deref());
        let now = Utc::now();
        let id = self.ids.next(now);

        log::debug!("[NOTES] Created note {} in {}", id, category);
        self.notes.insert(
            0,
            Note {
                id: id.clone(),
                content,
                category,
                model_type: self.model_context.clone(),
                timestamp: now,
                is_archived: false,
            },
        );
        self.draft.clear();
        self.schedule_sync();

        Some(id)
    }

    /// Shorthand for `set_draft` + `create_from_draft`
    pub fn create(&mut self, text: impl Into<String>) -> Option<String> {
        self.set_draft(text);
        self.create_from_draft()
    }

    // --- Edit ---

    pub fn editing(&self) -> Option<&EditBuffer> {
        self.editing.as_ref()
    }

    /// Start editing `id` with its current content. Replaces any other edit.
    pub fn begin_edit(&mut self, id: &str) -> bool {
        let Some(note) = self.note(id) else {
            return false;
        };
        self.editing = Some(EditBuffer {
            note_id: note.id.clone(),
            content: note.content.clone(),
        });
        true
    }

    pub fn set_edit_content(&mut self, text: impl Into<String>) -> bool {
        match self.editing.as_mut() {
            Some(edit) => {
                edit.content = text.into();
                true
            }
            None => false,
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Apply the edit buffer. Blank buffers are rejected and stay open.
    pub fn save_edit(&mut self) -> bool {
        let Some(edit) = self.editing.as_ref() else {
            return false;
        };
        if edit.content.trim().is_empty() {
            return false;
        }

        let content = normalize(&edit.content);
        let Some(note) = self.notes.iter_mut().find(|n| n.id == edit.note_id) else {
            // Deleted while the buffer was open
            self.editing = None;
            return false;
        };

        let category = classify(&content, note.model_type.as_deref());
        let changed = note.content != content || note.category != category;
        note.content = content;
        note.category = category;

        self.editing = None;
        if changed {
            self.schedule_sync();
        }
        true
    }

    // --- Archive / delete ---

    /// Archive a note. Archiving twice is a no-op; returns whether anything changed.
    pub fn archive(&mut self, id: &str) -> bool {
        let Some(note) = self.notes.iter_mut().find(|n| n.id == id) else {
            return false;
        };
        if note.is_archived {
            return false;
        }

        note.is_archived = true;
        self.schedule_sync();
        true
    }

    /// Remove a note, archived or not
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.notes.len();
        self.notes.retain(|n| n.id != id);
        if self.notes.len() == before {
            return false;
        }

        if self.editing.as_ref().is_some_and(|e| e.note_id == id) {
            self.editing = None;
        }
        self.schedule_sync();
        true
    }

    // --- View ---

    pub fn filter(&self) -> ViewFilter {
        self.filter
    }

    /// Filter to `category`; selecting the active category again clears it
    pub fn select_category(&mut self, category: Category) {
        self.filter.category = if self.filter.category == Some(category) {
            None
        } else {
            Some(category)
        };
    }

    pub fn clear_category_filter(&mut self) {
        self.filter.category = None;
    }

    pub fn set_show_archived(&mut self, show_archived: bool) {
        self.filter.show_archived = show_archived;
    }

    pub fn toggle_archived_view(&mut self) {
        self.filter.show_archived = !self.filter.show_archived;
    }

    pub fn visible_notes(&self) -> Vec<&Note> {
        self.notes.iter().filter(|n| self.filter.matches(n)).collect()
    }

    pub fn active_count(&self) -> usize {
        self.notes.iter().filter(|n| !n.is_archived).count()
    }

    pub fn archived_count(&self) -> usize {
        self.notes.iter().filter(|n| n.is_archived).count()
    }

    /// Active note counts for the category filter chips
    pub fn category_counts(&self) -> Vec<(Category, usize)> {
        summary::category_counts(&self.notes)
    }

    /// Build the export report over active notes
    pub fn export(&self) -> ExportSummary {
        summary::summarize(&self.notes)
    }

    // --- Sync ---

    pub fn has_pending_sync(&self) -> bool {
        self.debouncer.is_pending(SYNC_KEY)
    }

    /// Push the current collection now if a sync is pending. Returns whether a
    /// push happened.
    pub async fn flush(&self) -> Result<bool, String> {
        if !self.debouncer.cancel(SYNC_KEY) {
            return Ok(false);
        }
        let seq = self.pushes.next();
        if let Some(count) = self.pushes.push(self.sync.as_ref(), seq, &self.notes).await? {
            log::debug!("[SYNC] Flushed {} notes", count);
        }
        Ok(true)
    }

    fn schedule_sync(&self) {
        let snapshot = self.notes.clone();
        let sync = Arc::clone(&self.sync);
        let pushes = Arc::clone(&self.pushes);
        let seq = pushes.next();

        self.debouncer.schedule(SYNC_KEY, move || async move {
            match pushes.push(sync.as_ref(), seq, &snapshot).await {
                Ok(Some(count)) => log::debug!("[SYNC] Saved {} notes", count),
                Ok(None) => {}
                Err(e) => log::error!("[SYNC] Error saving notes: {}", e),
            }
        });
    }
}
