//! Persisted chat-log types for Parley.
//!
//! A chat log is the ordered sequence of turns belonging to one user.
//! Turns are append-only: once written they are never mutated or deleted
//! individually (clearing truncates the whole log).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Re-export MessageRole from the reply module (it's used in both chat and
// reply-generation contexts).
pub use crate::reply::{Message, MessageRole};

/// A single persisted turn in a user's chat log.
///
/// Turns are ordered by `created_at` within a log. The UUIDv7 `id` is
/// time-sortable and breaks ties between turns written in the same
/// millisecond.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub id: Uuid,
    pub user_id: Uuid,
    pub role: MessageRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<&ChatTurn> for Message {
    fn from(turn: &ChatTurn) -> Self {
        Message {
            role: turn.role.clone(),
            content: turn.content.clone(),
        }
    }
}
