//! Shared types for the notes service and its clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

// =====================================================
// Domain Types
// =====================================================

/// Payment-model topic a note is filed under.
///
/// Variant order is the fixed enumeration order used for filter chips,
/// export sections and tie-breaking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "General")]
    General,
    #[serde(rename = "Merchant-Financed")]
    MerchantFinanced,
    #[serde(rename = "Partner-Financed")]
    PartnerFinanced,
    #[serde(rename = "Acquirer-Driven")]
    AcquirerDriven,
    #[serde(rename = "Deposit & Flexible")]
    DepositFlexible,
    #[serde(rename = "Bank-Driven")]
    BankDriven,
    #[serde(rename = "Smart Routing")]
    SmartRouting,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::General,
        Category::MerchantFinanced,
        Category::PartnerFinanced,
        Category::AcquirerDriven,
        Category::DepositFlexible,
        Category::BankDriven,
        Category::SmartRouting,
    ];

    /// Wire label, e.g. "Deposit & Flexible"
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::General => "General",
            Category::MerchantFinanced => "Merchant-Financed",
            Category::PartnerFinanced => "Partner-Financed",
            Category::AcquirerDriven => "Acquirer-Driven",
            Category::DepositFlexible => "Deposit & Flexible",
            Category::BankDriven => "Bank-Driven",
            Category::SmartRouting => "Smart Routing",
        }
    }

    /// Resolve a free-text model context (e.g. "Merchant-Financed (MIT)") to a
    /// category. Exact labels win, then a label the context starts with, then
    /// `General`.
    pub fn from_context(context: &str) -> Category {
        let context = context.trim();
        if let Ok(category) = context.parse() {
            return category;
        }
        let lower = context.to_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| lower.starts_with(&c.as_str().to_lowercase()))
            .unwrap_or(Category::General)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown category: {}", s))
    }
}

/// A single user-authored annotation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub content: String,
    pub category: Category,
    /// Page/demo context the note was created from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_type: Option<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub is_archived: bool,
}

// =====================================================
// RPC Request Types
// =====================================================

/// Body of `POST /api/notes`
#[derive(Debug, Serialize, Deserialize)]
pub struct SaveNotesRequest {
    pub notes: Vec<Note>,
}

// =====================================================
// RPC Response Types
// =====================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct SaveNotesResponse {
    pub success: bool,
    pub count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClearNotesResponse {
    pub success: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { error: msg.into() }
    }
}

// =====================================================
// Record validation
// =====================================================

/// Outcome of validating a batch of raw JSON records
#[derive(Debug, Default)]
pub struct ParsedRecords {
    pub notes: Vec<Note>,
    /// Records that were not Note-shaped, had an empty id, or repeated an id
    pub dropped: usize,
}

/// Validate raw records against the Note schema. Invalid records are dropped;
/// for repeated ids the first occurrence is kept.
pub fn parse_records(records: Vec<serde_json::Value>) -> ParsedRecords {
    let mut parsed = ParsedRecords::default();
    let mut seen = HashSet::new();

    for record in records {
        match serde_json::from_value::<Note>(record) {
            Ok(note) if note.id.trim().is_empty() => {
                log::warn!("[NOTES] Dropping record with empty id");
                parsed.dropped += 1;
            }
            Ok(note) => {
                if seen.insert(note.id.clone()) {
                    parsed.notes.push(note);
                } else {
                    log::warn!("[NOTES] Dropping record with duplicate id {}", note.id);
                    parsed.dropped += 1;
                }
            }
            Err(e) => {
                log::warn!("[NOTES] Dropping malformed record: {}", e);
                parsed.dropped += 1;
            }
        }
    }

    parsed
}

/// Validate a whole collection. Anything other than a JSON array is rejected.
pub fn parse_collection(value: serde_json::Value) -> Result<ParsedRecords, String> {
    match value {
        serde_json::Value::Array(records) => Ok(parse_records(records)),
        other => Err(format!("Expected an array of notes, got {}", json_kind(&other))),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
