//! Reply-generation request/response types for Parley.
//!
//! These types model the data shapes for reply generation: the conversation
//! handed to a generator, the remote chat-completion protocol, and the typed
//! failures a remote provider can report.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role of a turn in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::System => write!(f, "system"),
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "system" => Ok(MessageRole::System),
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

/// A single turn of a conversation as seen by a reply generator.
///
/// This is the in-memory working copy built per request; the persisted
/// counterpart is [`crate::chat::ChatTurn`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

/// Role of a history turn in the remote chat-completion protocol.
///
/// The remote protocol knows only two roles: everything the assistant said
/// maps to `model`, everything else maps to `user`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteRole {
    User,
    Model,
}

impl fmt::Display for RemoteRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteRole::User => write!(f, "user"),
            RemoteRole::Model => write!(f, "model"),
        }
    }
}

/// One prior turn in the remote protocol's history shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryTurn {
    pub role: RemoteRole,
    pub content: String,
}

/// Sampling configuration sent with every remote chat-completion call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub max_output_tokens: u32,
    pub temperature: f64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_output_tokens: 2048,
            temperature: 0.7,
        }
    }
}

/// Request to a remote chat-completion provider.
///
/// `history` holds every turn except the newest one; `message` is the live
/// user message the provider should answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    pub history: Vec<HistoryTurn>,
    pub message: String,
    pub config: GenerationConfig,
}

/// Response from a remote chat-completion provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    pub text: String,
}

/// Errors from remote chat-completion operations.
#[derive(Debug, thiserror::Error)]
pub enum ReplyError {
    #[error("invalid or missing API credential")]
    CredentialInvalid,

    #[error("provider quota exceeded")]
    QuotaExceeded,

    #[error("provider error: {message}")]
    Provider { message: String },

    #[error("deserialization error: {0}")]
    Deserialization(String),
}
