//! ReplyGenerator trait definition.
//!
//! This is the core abstraction both generator variants implement.
//! Uses RPITIT for `generate`; dynamic dispatch goes through
//! `BoxReplyGenerator`.

use parley_types::reply::Message;

/// Reply returned for an empty conversation by every generator, with no
/// further processing and no delay.
pub const EMPTY_CONVERSATION_GREETING: &str = "Hello! How can I help you today?";

/// Trait for reply-generator backends (pattern matching, remote API).
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
///
/// `generate` always resolves with displayable text. A chat client needs
/// *something* to render, so every failure path inside a generator is
/// converted to a fixed fallback string rather than surfaced as an error.
/// The conversation is ordered oldest-first and ends with the newest user
/// turn.
pub trait ReplyGenerator: Send + Sync {
    /// Human-readable generator name (e.g., "pattern", "gemini").
    fn name(&self) -> &str;

    /// Produce the next assistant reply for the given conversation.
    fn generate(
        &self,
        conversation: &[Message],
    ) -> impl std::future::Future<Output = String> + Send;
}
