//! ChatLogRepository trait definition.
//!
//! Provides the explicit fetch/append/clear contract for one user's chat
//! log. Implementations live in parley-infra (e.g., `SqliteChatLogRepository`).
//! Uses native async fn in traits (RPITIT, Rust 2024 edition).

use parley_types::chat::ChatTurn;
use parley_types::error::RepositoryError;
use uuid::Uuid;

/// Repository trait for chat-log persistence.
///
/// The handler works on the returned copy and saves new turns explicitly;
/// there is no aliasing between the working copy and store state.
pub trait ChatLogRepository: Send + Sync {
    /// Fetch a user's full chat log, oldest turn first.
    fn fetch_log(
        &self,
        user_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<ChatTurn>, RepositoryError>> + Send;

    /// Append new turns to a user's log. All turns are persisted together.
    fn append_turns(
        &self,
        turns: &[ChatTurn],
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Truncate a user's chat log to empty.
    fn clear_log(
        &self,
        user_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Count the turns in a user's chat log.
    fn count_turns(
        &self,
        user_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}
