//! Shared domain types for Parley.
//!
//! This crate contains the core domain types used across the Parley service:
//! chat turns, reply-generation request/response shapes, user records, and
//! their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror,
//! secrecy.

pub mod chat;
pub mod config;
pub mod error;
pub mod reply;
pub mod user;
