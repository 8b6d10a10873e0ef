//! Trigger detection over message content.
//!
//! A trigger fires only on a whole-word, case-insensitive match so a short
//! entry never fires inside a longer name ("pichu" must not match
//! "pikachu"). Private entries win over public ones, and at most one
//! detection is produced per message.

use regex::Regex;

use crate::store::ListKind;

/// Game-bot error echoes that must never be treated as spawn announcements.
const NOISE_MARKERS: &[&str] = &[
    "is not a valid pokemon name",
    "you are already collecting this pokemon",
];

/// A single detected trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    pub name: String,
    pub kind: ListKind,
}

/// True for channels named with a bare number in `1..=max`.
#[must_use]
pub fn is_spawn_channel(channel_name: &str, max: u32) -> bool {
    if channel_name.is_empty() || !channel_name.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    matches!(channel_name.parse::<u32>(), Ok(n) if (1..=max).contains(&n))
}

/// True when the message is a game-bot error echo rather than a spawn.
#[must_use]
pub fn is_noise(content: &str) -> bool {
    let lower = content.to_lowercase();
    NOISE_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// Find the first watched name present in `content` as a whole word.
///
/// `private` is consulted before `public`; the first hit in iteration order
/// wins and no further names are tested.
#[must_use]
pub fn detect(content: &str, private: &[String], public: &[String]) -> Option<Detection> {
    if is_noise(content) {
        return None;
    }

    for (kind, list) in [(ListKind::Private, private), (ListKind::Public, public)] {
        if let Some(name) = list.iter().find(|name| word_match(content, name)) {
            return Some(Detection {
                name: name.clone(),
                kind,
            });
        }
    }
    None
}

/// Whole-word, case-insensitive containment test.
fn word_match(content: &str, name: &str) -> bool {
    let pattern = format!(r"(?i)\b{}\b", regex::escape(name));
    // Escaped patterns always compile; a failure just means no match.
    Regex::new(&pattern).is_ok_and(|re| re.is_match(content))
}
