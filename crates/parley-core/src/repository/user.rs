//! UserRepository trait definition.
//!
//! CRUD operations for user accounts. Implementations live in parley-infra
//! (e.g., `SqliteUserRepository`). Uses native async fn in traits (RPITIT,
//! Rust 2024 edition).

use parley_types::error::RepositoryError;
use parley_types::user::User;
use uuid::Uuid;

/// Repository trait for user persistence and token lookup.
pub trait UserRepository: Send + Sync {
    /// Create a new user.
    fn create_user(
        &self,
        user: &User,
    ) -> impl std::future::Future<Output = Result<User, RepositoryError>> + Send;

    /// Get a user by their unique ID.
    fn get_user(
        &self,
        user_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;

    /// Get a user by the SHA-256 hash of their API token.
    fn get_user_by_token_hash(
        &self,
        token_hash: &str,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;

    /// Record that a user was just seen. Best effort; callers may ignore
    /// the result.
    fn touch_last_seen(
        &self,
        user_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
