//! Client side of the instalments notes widget.
//!
//! `NoteManager` owns the in-memory collection and pushes it to the notes
//! service after a quiet period. Classification, typo correction and the
//! export report are pure functions in their own modules.

pub mod classifier;
pub mod config;
pub mod console;
pub mod debounce;
pub mod manager;
pub mod normalize;
pub mod summary;
pub mod sync;

pub use classifier::classify;
pub use config::ClientConfig;
pub use manager::{ManagerConfig, NoteManager};
pub use summary::{ExportSummary, summarize};
pub use sync::{HttpNoteSync, NoteSync};

pub use notes_types::{Category, Note};
