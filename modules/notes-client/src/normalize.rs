//! Typo corrections applied to note text on create and edit.

use once_cell::sync::Lazy;
use regex::Regex;

static CORRECTIONS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"(?i)\binstalment\b", "instalment"),
        (r"(?i)\bpayement\b", "payment"),
        (r"(?i)\bfinacial\b", "financial"),
    ]
    .into_iter()
    .map(|(pattern, replacement)| {
        (
            Regex::new(pattern).expect("correction pattern is valid"),
            replacement,
        )
    })
    .collect()
});

/// Apply the fixed whole-word corrections. Idempotent.
pub fn normalize(content: &str) -> String {
    CORRECTIONS
        .iter()
        .fold(content.to_string(), |text, (pattern, replacement)| {
            pattern.replace_all(&text, *replacement).into_owned()
        })
}
