use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One turn in the visible transcript. Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationEntry {
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// Ordered, append-only transcript for the current session. Not persisted.
#[derive(Debug, Default)]
pub struct ConversationLog {
    entries: Vec<ConversationEntry>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the two entries of a completed exchange, user first. Only
    /// one exchange is ever in flight, so entries never interleave.
    pub fn append_exchange(&mut self, transcribed: &str, response: &str) {
        let now = Utc::now();
        self.entries.push(ConversationEntry {
            role: Role::User,
            text: transcribed.to_string(),
            timestamp: now,
        });
        self.entries.push(ConversationEntry {
            role: Role::Assistant,
            text: response.to_string(),
            timestamp: now,
        });
    }

    pub fn entries(&self) -> &[ConversationEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
