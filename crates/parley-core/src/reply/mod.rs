//! Reply-generation abstractions for Parley.
//!
//! This module defines the core traits and both generator implementations:
//! - `ReplyGenerator`: RPITIT trait every generator implements
//! - `BoxReplyGenerator`: Object-safe wrapper for configuration-time selection
//! - `PatternReplyGenerator`: local keyword/canned-phrase generator
//! - `RemoteReplyGenerator`: remote chat-completion client with local fallback

pub mod box_generator;
pub mod generator;
pub mod offline;
pub mod pattern;
pub mod remote;
