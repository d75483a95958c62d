//! Gemini chat-completion client.

mod client;
mod types;

pub use client::GeminiClient;
