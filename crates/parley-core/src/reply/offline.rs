//! Offline fallback replies for the remote generator.
//!
//! Used when no API credential is configured and when a remote call fails
//! for a reason other than a bad credential or exhausted quota. Every reply
//! points the operator at credential setup.

/// Offline reply for greeting-like messages.
pub const OFFLINE_GREETING_REPLY: &str = "Hello! I'm running in offline mode because no AI API key is configured. Set GEMINI_API_KEY in the server environment to enable generated replies.";

/// Offline reply for help-like messages.
pub const OFFLINE_HELP_REPLY: &str = "I'd like to help, but the AI backend isn't configured yet. Ask the server operator to set GEMINI_API_KEY and restart the service.";

/// Offline reply for everything else.
pub const OFFLINE_GENERIC_REPLY: &str = "I can't reach the AI service right now because no API key is configured. Set GEMINI_API_KEY in the server environment to enable full replies.";

/// Pick an offline reply by simple keyword match on the newest turn.
pub fn offline_reply(latest: &str) -> &'static str {
    let lower = latest.to_lowercase();
    if lower.contains("hello") || lower.contains("hi") {
        OFFLINE_GREETING_REPLY
    } else if lower.contains("help") {
        OFFLINE_HELP_REPLY
    } else {
        OFFLINE_GENERIC_REPLY
    }
}
