//! SQLite chat-log repository implementation.
//!
//! Implements `ChatLogRepository` from `parley-core` using sqlx with split
//! read/write pools. Follows the same patterns as `SqliteUserRepository`:
//! raw queries, private Row structs, split reader/writer pool usage.

use chrono::{DateTime, Utc};
use parley_core::chat::repository::ChatLogRepository;
use parley_types::chat::{ChatTurn, MessageRole};
use parley_types::error::RepositoryError;
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `ChatLogRepository`.
pub struct SqliteChatLogRepository {
    pool: DatabasePool,
}

impl SqliteChatLogRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain ChatTurn.
struct ChatTurnRow {
    id: String,
    user_id: String,
    role: String,
    content: String,
    created_at: String,
}

impl ChatTurnRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            role: row.try_get("role")?,
            content: row.try_get("content")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_turn(self) -> Result<ChatTurn, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid turn id: {e}")))?;
        let user_id = Uuid::parse_str(&self.user_id)
            .map_err(|e| RepositoryError::Query(format!("invalid user_id: {e}")))?;
        let role: MessageRole = self
            .role
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;
        let created_at = parse_datetime(&self.created_at)?;

        Ok(ChatTurn {
            id,
            user_id,
            role,
            content: self.content,
            created_at,
        })
    }
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

impl ChatLogRepository for SqliteChatLogRepository {
    async fn fetch_log(&self, user_id: &Uuid) -> Result<Vec<ChatTurn>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM chat_turns WHERE user_id = ? ORDER BY created_at ASC, id ASC",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows.iter()
            .map(|row| {
                ChatTurnRow::from_row(row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?
                    .into_turn()
            })
            .collect()
    }

    async fn append_turns(&self, turns: &[ChatTurn]) -> Result<(), RepositoryError> {
        let mut tx = self
            .pool
            .writer
            .begin()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        for turn in turns {
            sqlx::query(
                r#"INSERT INTO chat_turns (id, user_id, role, content, created_at)
                   VALUES (?, ?, ?, ?, ?)"#,
            )
            .bind(turn.id.to_string())
            .bind(turn.user_id.to_string())
            .bind(turn.role.to_string())
            .bind(&turn.content)
            .bind(format_datetime(&turn.created_at))
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))
    }

    async fn clear_log(&self, user_id: &Uuid) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM chat_turns WHERE user_id = ?")
            .bind(user_id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(())
    }

    async fn count_turns(&self, user_id: &Uuid) -> Result<u64, RepositoryError> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM chat_turns WHERE user_id = ?")
            .bind(user_id.to_string())
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(row.0 as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_core::repository::user::UserRepository;

    use crate::sqlite::user::SqliteUserRepository;
    use parley_types::user::User;

    async fn test_pool() -> (tempfile::TempDir, DatabasePool) {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        let pool = DatabasePool::new(&url).await.unwrap();
        (dir, pool)
    }

    async fn create_user(pool: &DatabasePool) -> Uuid {
        let user = User {
            id: Uuid::now_v7(),
            username: format!("user-{}", Uuid::now_v7()),
            token_hash: format!("hash-{}", Uuid::now_v7()),
            created_at: Utc::now(),
            last_seen_at: None,
        };
        SqliteUserRepository::new(pool.clone())
            .create_user(&user)
            .await
            .unwrap();
        user.id
    }

    fn turn(user_id: Uuid, role: MessageRole, content: &str) -> ChatTurn {
        ChatTurn {
            id: Uuid::now_v7(),
            user_id,
            role,
            content: content.to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_append_and_fetch_preserves_order() {
        let (_dir, pool) = test_pool().await;
        let repo = SqliteChatLogRepository::new(pool.clone());
        let user_id = create_user(&pool).await;

        repo.append_turns(&[
            turn(user_id, MessageRole::User, "first"),
            turn(user_id, MessageRole::Assistant, "second"),
            turn(user_id, MessageRole::User, "third"),
        ])
        .await
        .unwrap();

        let log = repo.fetch_log(&user_id).await.unwrap();
        assert_eq!(log.len(), 3);
        assert_eq!(log[0].content, "first");
        assert_eq!(log[1].content, "second");
        assert_eq!(log[2].content, "third");
        assert_eq!(log[1].role, MessageRole::Assistant);
    }

    #[tokio::test]
    async fn test_fetch_log_unknown_user_is_empty() {
        let (_dir, pool) = test_pool().await;
        let repo = SqliteChatLogRepository::new(pool);

        let log = repo.fetch_log(&Uuid::now_v7()).await.unwrap();
        assert!(log.is_empty());
    }

    #[tokio::test]
    async fn test_clear_log_is_scoped_to_one_user() {
        let (_dir, pool) = test_pool().await;
        let repo = SqliteChatLogRepository::new(pool.clone());
        let first = create_user(&pool).await;
        let second = create_user(&pool).await;

        repo.append_turns(&[turn(first, MessageRole::User, "hello")])
            .await
            .unwrap();
        repo.append_turns(&[turn(second, MessageRole::User, "hello")])
            .await
            .unwrap();

        repo.clear_log(&first).await.unwrap();

        assert!(repo.fetch_log(&first).await.unwrap().is_empty());
        assert_eq!(repo.fetch_log(&second).await.unwrap().len(), 1);
        assert_eq!(repo.count_turns(&second).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_append_requires_existing_user() {
        let (_dir, pool) = test_pool().await;
        let repo = SqliteChatLogRepository::new(pool);

        // No users row; the foreign key rejects the insert.
        let result = repo
            .append_turns(&[turn(Uuid::now_v7(), MessageRole::User, "orphan")])
            .await;
        assert!(result.is_err());
    }
}
