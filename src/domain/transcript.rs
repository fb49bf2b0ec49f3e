use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone, Serialize)]
pub struct Entry {
    pub text: String,
    pub sender: Sender,
    pub sent_at: DateTime<Utc>,
    pub pending: bool,
}

/// Handle to a pending placeholder entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryId(usize);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TranscriptError {
    #[error("no pending entry at position {0}")]
    NotPending(usize),
}

/// Append-only chat transcript. Entries are never removed or re-ordered;
/// a pending placeholder is resolved in place once its request settles.
#[derive(Debug, Default)]
pub struct Transcript {
    entries: Vec<Entry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// One user submission: rejects blank input (no entry, no request),
    /// otherwise appends the user entry plus a pending placeholder and
    /// returns the trimmed text with the placeholder handle.
    pub fn submit(&mut self, text: &str, placeholder: &str) -> Option<(String, EntryId)> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        self.push(text, Sender::User, false);
        let id = EntryId(self.entries.len());
        self.push(placeholder, Sender::Bot, true);
        Some((text.to_string(), id))
    }

    /// Replaces the placeholder text in place and clears its pending flag.
    pub fn resolve(&mut self, id: EntryId, text: &str) -> Result<(), TranscriptError> {
        let entry = self
            .entries
            .get_mut(id.0)
            .filter(|e| e.pending)
            .ok_or(TranscriptError::NotPending(id.0))?;
        entry.text = text.to_string();
        entry.pending = false;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    fn push(&mut self, text: &str, sender: Sender, pending: bool) {
        self.entries.push(Entry {
            text: text.to_string(),
            sender,
            sent_at: Utc::now(),
            pending,
        });
    }
}
