//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both CLI and REST API.
//! ChatService is generic over the repository trait, but AppState pins it to
//! the concrete infra implementation. Generator selection happens here, once,
//! at startup; handlers only ever see the type-erased generator.

use std::path::PathBuf;
use std::sync::Arc;

use secrecy::SecretString;

use parley_core::chat::service::ChatService;
use parley_core::reply::box_generator::BoxReplyGenerator;
use parley_core::reply::pattern::PatternReplyGenerator;
use parley_core::reply::remote::RemoteReplyGenerator;
use parley_infra::config::{load_config, resolve_api_credential, resolve_data_dir};
use parley_infra::llm::gemini::GeminiClient;
use parley_infra::sqlite::chat::SqliteChatLogRepository;
use parley_infra::sqlite::pool::DatabasePool;
use parley_infra::sqlite::user::SqliteUserRepository;
use parley_types::config::{ApiCredential, AppConfig, GeneratorKind};

/// Concrete type alias for the service generics pinned to infra implementations.
pub type ConcreteChatService = ChatService<SqliteChatLogRepository>;

/// Shared application state holding all services.
///
/// Used by both CLI commands and REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ConcreteChatService>,
    pub user_repo: Arc<SqliteUserRepository>,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state: connect to DB, wire services.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();

        // Ensure data directory exists
        tokio::fs::create_dir_all(&data_dir).await?;

        // Initialize database
        let db_url = format!(
            "sqlite://{}?mode=rwc",
            data_dir.join("parley.db").display()
        );
        let db_pool = DatabasePool::new(&db_url).await?;

        // Select the reply generator once, from configuration
        let config = load_config(&data_dir).await;
        let generator = build_generator(&config);
        tracing::info!(generator = generator.name(), "reply generator selected");

        // Wire chat service with its repository
        let chat_repo = SqliteChatLogRepository::new(db_pool.clone());
        let chat_service = ChatService::new(chat_repo, generator);

        let user_repo = SqliteUserRepository::new(db_pool.clone());

        Ok(Self {
            chat_service: Arc::new(chat_service),
            user_repo: Arc::new(user_repo),
            data_dir,
            db_pool,
        })
    }
}

/// Build the configured reply generator.
///
/// A missing or placeholder credential does not fail startup: the remote
/// generator runs in offline mode and answers from its fallback pool.
fn build_generator(config: &AppConfig) -> BoxReplyGenerator {
    match config.generator {
        GeneratorKind::Pattern => BoxReplyGenerator::new(PatternReplyGenerator::new()),
        GeneratorKind::Remote => {
            let credential = resolve_api_credential();
            if !credential.is_configured() {
                tracing::warn!(
                    "GEMINI_API_KEY not configured; remote generator will answer offline"
                );
            }
            let api_key = match &credential {
                ApiCredential::Configured(secret) => secret.clone(),
                ApiCredential::Missing => SecretString::from(""),
            };
            let client = GeminiClient::new(api_key, config.model.clone());
            BoxReplyGenerator::new(RemoteReplyGenerator::new(client, &credential))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_generator_pattern() {
        let config = AppConfig::default();
        let generator = build_generator(&config);
        assert_eq!(generator.name(), "pattern");
    }

    #[test]
    fn test_build_generator_remote() {
        let config = AppConfig {
            generator: GeneratorKind::Remote,
            model: "gemini-2.0-flash".to_string(),
        };
        let generator = build_generator(&config);
        assert_eq!(generator.name(), "remote");
    }
}
