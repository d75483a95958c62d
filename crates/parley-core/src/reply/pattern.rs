//! PatternReplyGenerator -- local keyword-matched reply generator.
//!
//! Tests an ordered list of keyword predicates against the newest turn and
//! returns the first matching canned reply. When nothing matches, a random
//! opener is combined with a length-dependent qualifier. Every reply is
//! delayed by a random 500-1500ms to emulate the latency of a real
//! completion API; chat clients built against the remote variant behave the
//! same against this one.

use std::time::Duration;

use rand::seq::IndexedRandom;
use rand::Rng;

use parley_types::reply::Message;

use super::generator::{ReplyGenerator, EMPTY_CONVERSATION_GREETING};

/// Opener phrases for replies that match no keyword predicate.
/// Immutable pool; one entry is chosen uniformly at random per reply.
const OPENERS: [&str; 8] = [
    "That's an interesting question! Let me think about that.",
    "I understand what you're asking. Here's my perspective:",
    "Great question! Based on what you've told me, I would suggest:",
    "That's a thoughtful inquiry. Here are some ideas:",
    "I see what you mean. Let me provide some insights:",
    "Excellent point! Here's how I would approach this:",
    "Thanks for sharing that with me. My response would be:",
    "I appreciate your question. Here's what I think:",
];

const GREETING_REPLY: &str = "Hello! How can I help you today?";
const HOW_ARE_YOU_REPLY: &str = "I'm doing well, thank you for asking! How are you?";
const NAME_REPLY: &str = "I'm your AI assistant! You can call me ChatBot.";
const HELP_REPLY: &str = "I'm here to help! Feel free to ask me any questions you have.";
const THANKS_REPLY: &str = "You're welcome! Is there anything else I can help you with?";
const FAREWELL_REPLY: &str = "Goodbye! It was nice chatting with you. Have a great day!";
const PROGRAMMING_REPLY: &str = "That's a great programming question! While I'm a simple chatbot, I'd recommend checking official documentation or coding communities for detailed technical help.";

/// Local reply generator backed by keyword predicates and canned phrases.
///
/// Deterministic apart from the opener choice and the simulated latency.
#[derive(Debug, Default)]
pub struct PatternReplyGenerator;

impl PatternReplyGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Ordered keyword predicates; first match wins. Earlier predicates
    /// shadow later ones when several keywords co-occur.
    fn keyword_reply(lower: &str) -> Option<&'static str> {
        if lower.contains("hello") || lower.contains("hi") {
            return Some(GREETING_REPLY);
        }
        if lower.contains("how are you") {
            return Some(HOW_ARE_YOU_REPLY);
        }
        if lower.contains("what") && lower.contains("name") {
            return Some(NAME_REPLY);
        }
        if lower.contains("help") {
            return Some(HELP_REPLY);
        }
        if lower.contains("thank") {
            return Some(THANKS_REPLY);
        }
        if lower.contains("bye") || lower.contains("goodbye") {
            return Some(FAREWELL_REPLY);
        }
        if lower.contains("code")
            || lower.contains("programming")
            || lower.contains("javascript")
            || lower.contains("python")
        {
            return Some(PROGRAMMING_REPLY);
        }
        None
    }

    /// Reply for messages that match no predicate: random opener plus a
    /// qualifier keyed off message length.
    fn filler_reply(content: &str) -> String {
        let mut rng = rand::rng();
        let opener = OPENERS
            .choose(&mut rng)
            .copied()
            .unwrap_or(OPENERS[0]);

        if content.chars().count() > 100 {
            return format!(
                "{opener} You've shared quite a detailed message. While I'm a simple AI, I appreciate you taking the time to explain your thoughts thoroughly."
            );
        }

        let qualifier = if content.split_whitespace().count() > 10 {
            "That seems like a complex topic."
        } else {
            "That's a good question."
        };
        format!("{opener} {qualifier} While I'm a basic chatbot, I hope this response is helpful!")
    }
}

impl ReplyGenerator for PatternReplyGenerator {
    fn name(&self) -> &str {
        "pattern"
    }

    async fn generate(&self, conversation: &[Message]) -> String {
        let Some(latest) = conversation.last() else {
            return EMPTY_CONVERSATION_GREETING.to_string();
        };

        let lower = latest.content.to_lowercase();
        let reply = match Self::keyword_reply(&lower) {
            Some(canned) => canned.to_string(),
            None => Self::filler_reply(&latest.content),
        };

        // ThreadRng is not Send; pick the delay before suspending.
        let delay_ms: u64 = rand::rng().random_range(500..1500);
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;

        reply
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_types::reply::MessageRole;

    fn user_turn(content: &str) -> Message {
        Message {
            role: MessageRole::User,
            content: content.to_string(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_conversation_returns_greeting_without_delay() {
        let generator = PatternReplyGenerator::new();
        let start = tokio::time::Instant::now();
        let reply = generator.generate(&[]).await;
        assert_eq!(reply, EMPTY_CONVERSATION_GREETING);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reply_within_latency_window() {
        let generator = PatternReplyGenerator::new();
        let start = tokio::time::Instant::now();
        let reply = generator
            .generate(&[user_turn("tell me about the weather")])
            .await;
        let elapsed = start.elapsed();
        assert!(!reply.is_empty());
        assert!(elapsed >= Duration::from_millis(500), "elapsed {elapsed:?}");
        assert!(elapsed < Duration::from_millis(1500), "elapsed {elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_greeting_shadows_help() {
        // "hello" and "help" co-occur; the greeting predicate comes first.
        let generator = PatternReplyGenerator::new();
        let reply = generator
            .generate(&[user_turn("Hello, can you help me?")])
            .await;
        assert_eq!(reply, GREETING_REPLY);
    }

    #[tokio::test(start_paused = true)]
    async fn test_keyword_match_is_case_insensitive() {
        let generator = PatternReplyGenerator::new();
        let reply = generator.generate(&[user_turn("THANK you so much")]).await;
        assert_eq!(reply, THANKS_REPLY);
    }

    #[tokio::test(start_paused = true)]
    async fn test_latest_turn_decides_the_reply() {
        let generator = PatternReplyGenerator::new();
        let conversation = vec![user_turn("what is your name?"), user_turn("goodbye then")];
        let reply = generator.generate(&conversation).await;
        assert_eq!(reply, FAREWELL_REPLY);
    }

    #[test]
    fn test_keyword_order() {
        assert_eq!(
            PatternReplyGenerator::keyword_reply("hi, what is your name"),
            Some(GREETING_REPLY)
        );
        assert_eq!(
            PatternReplyGenerator::keyword_reply("what is your name"),
            Some(NAME_REPLY)
        );
        assert_eq!(
            PatternReplyGenerator::keyword_reply("how do i write python code"),
            Some(PROGRAMMING_REPLY)
        );
        assert_eq!(PatternReplyGenerator::keyword_reply("weather today"), None);
    }

    #[test]
    fn test_filler_reply_short_message() {
        let reply = PatternReplyGenerator::filler_reply("why is the sky blue");
        assert!(OPENERS.iter().any(|o| reply.starts_with(o)));
        assert!(reply.contains("That's a good question."));
    }

    #[test]
    fn test_filler_reply_many_words() {
        let content = "one two three four five six seven eight nine ten eleven twelve";
        let reply = PatternReplyGenerator::filler_reply(content);
        assert!(reply.contains("That seems like a complex topic."));
    }

    #[test]
    fn test_filler_reply_long_message() {
        let content = "x".repeat(150);
        let reply = PatternReplyGenerator::filler_reply(&content);
        assert!(reply.contains("detailed message"));
    }
}
