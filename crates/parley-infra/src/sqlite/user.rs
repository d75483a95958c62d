//! SQLite user repository implementation.
//!
//! Implements `UserRepository` from `parley-core` using sqlx with split
//! read/write pools: raw queries, private Row structs, reader for SELECTs,
//! writer for mutations.

use chrono::{DateTime, Utc};
use parley_core::repository::user::UserRepository;
use parley_types::error::RepositoryError;
use parley_types::user::User;
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `UserRepository`.
pub struct SqliteUserRepository {
    pool: DatabasePool,
}

impl SqliteUserRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain User.
struct UserRow {
    id: String,
    username: String,
    token_hash: String,
    created_at: String,
    last_seen_at: Option<String>,
}

impl UserRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            token_hash: row.try_get("token_hash")?,
            created_at: row.try_get("created_at")?,
            last_seen_at: row.try_get("last_seen_at")?,
        })
    }

    fn into_user(self) -> Result<User, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid user id: {e}")))?;
        let created_at = parse_datetime(&self.created_at)?;
        let last_seen_at = self
            .last_seen_at
            .as_deref()
            .map(parse_datetime)
            .transpose()?;

        Ok(User {
            id,
            username: self.username,
            token_hash: self.token_hash,
            created_at,
            last_seen_at,
        })
    }
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

impl UserRepository for SqliteUserRepository {
    async fn create_user(&self, user: &User) -> Result<User, RepositoryError> {
        let result = sqlx::query(
            r#"INSERT INTO users (id, username, token_hash, created_at, last_seen_at)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(user.id.to_string())
        .bind(&user.username)
        .bind(&user.token_hash)
        .bind(user.created_at.to_rfc3339())
        .bind(user.last_seen_at.as_ref().map(|dt| dt.to_rfc3339()))
        .execute(&self.pool.writer)
        .await;

        match result {
            Ok(_) => Ok(user.clone()),
            Err(e) if e.to_string().contains("UNIQUE constraint failed") => {
                Err(RepositoryError::Conflict(format!(
                    "username '{}' already exists",
                    user.username
                )))
            }
            Err(e) => Err(RepositoryError::Query(e.to_string())),
        }
    }

    async fn get_user(&self, user_id: &Uuid) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(user_id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let user_row =
                    UserRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(user_row.into_user()?))
            }
            None => Ok(None),
        }
    }

    async fn get_user_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM users WHERE token_hash = ?")
            .bind(token_hash)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let user_row =
                    UserRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(user_row.into_user()?))
            }
            None => Ok(None),
        }
    }

    async fn touch_last_seen(&self, user_id: &Uuid) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE users SET last_seen_at = ? WHERE id = ?")
            .bind(Utc::now().to_rfc3339())
            .bind(user_id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_pool() -> (tempfile::TempDir, DatabasePool) {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        let pool = DatabasePool::new(&url).await.unwrap();
        (dir, pool)
    }

    fn sample_user(username: &str) -> User {
        User {
            id: Uuid::now_v7(),
            username: username.to_string(),
            token_hash: format!("hash-{username}"),
            created_at: Utc::now(),
            last_seen_at: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_get_user() {
        let (_dir, pool) = test_pool().await;
        let repo = SqliteUserRepository::new(pool);

        let user = sample_user("ada");
        repo.create_user(&user).await.unwrap();

        let fetched = repo.get_user(&user.id).await.unwrap().unwrap();
        assert_eq!(fetched.username, "ada");
        assert_eq!(fetched.token_hash, "hash-ada");
        assert!(fetched.last_seen_at.is_none());
    }

    #[tokio::test]
    async fn test_get_user_by_token_hash() {
        let (_dir, pool) = test_pool().await;
        let repo = SqliteUserRepository::new(pool);

        let user = sample_user("grace");
        repo.create_user(&user).await.unwrap();

        let fetched = repo
            .get_user_by_token_hash("hash-grace")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.id, user.id);

        let missing = repo.get_user_by_token_hash("no-such-hash").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_is_conflict() {
        let (_dir, pool) = test_pool().await;
        let repo = SqliteUserRepository::new(pool);

        repo.create_user(&sample_user("ada")).await.unwrap();
        let mut duplicate = sample_user("ada");
        duplicate.token_hash = "other-hash".to_string();

        let err = repo.create_user(&duplicate).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_touch_last_seen() {
        let (_dir, pool) = test_pool().await;
        let repo = SqliteUserRepository::new(pool);

        let user = sample_user("ada");
        repo.create_user(&user).await.unwrap();
        repo.touch_last_seen(&user.id).await.unwrap();

        let fetched = repo.get_user(&user.id).await.unwrap().unwrap();
        assert!(fetched.last_seen_at.is_some());
    }
}
