//! Infrastructure layer for Parley.
//!
//! Contains implementations of the traits defined in `parley-core`:
//! SQLite storage, the reqwest-backed remote reply client, and
//! configuration loading.

pub mod config;
pub mod llm;
pub mod sqlite;
