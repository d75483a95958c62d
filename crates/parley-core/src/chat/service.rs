//! Chat service orchestrating log persistence and reply generation.
//!
//! ChatService coordinates the full exchange lifecycle: load the stored
//! log, build the conversation for the generator, persist both new turns,
//! and return the updated transcript.

use chrono::Utc;
use parley_types::chat::{ChatTurn, Message, MessageRole};
use parley_types::error::RepositoryError;
use tracing::info;
use uuid::Uuid;

use crate::chat::repository::ChatLogRepository;
use crate::reply::box_generator::BoxReplyGenerator;

/// Orchestrates chat exchanges over one user's log.
///
/// Generic over `ChatLogRepository` to maintain clean architecture
/// (parley-core never depends on parley-infra). The generator variant is
/// fixed at construction time.
pub struct ChatService<R: ChatLogRepository> {
    chat_repo: R,
    generator: BoxReplyGenerator,
}

impl<R: ChatLogRepository> ChatService<R> {
    /// Create a new chat service with the given repository and generator.
    pub fn new(chat_repo: R, generator: BoxReplyGenerator) -> Self {
        Self {
            chat_repo,
            generator,
        }
    }

    /// Access the chat-log repository.
    pub fn chat_repo(&self) -> &R {
        &self.chat_repo
    }

    /// Name of the active reply generator.
    pub fn generator_name(&self) -> &str {
        self.generator.name()
    }

    /// Append a user message, generate the assistant reply, persist both,
    /// and return the full updated log.
    ///
    /// The stored log grows by exactly two turns per call. Concurrent calls
    /// for the same user are not serialized across the fetch/append span:
    /// the store serializes individual writes only, so two simultaneous
    /// exchanges can interleave.
    pub async fn append_and_reply(
        &self,
        user_id: Uuid,
        content: String,
    ) -> Result<Vec<ChatTurn>, RepositoryError> {
        let mut log = self.chat_repo.fetch_log(&user_id).await?;

        let mut conversation: Vec<Message> = log.iter().map(Message::from).collect();
        conversation.push(Message {
            role: MessageRole::User,
            content: content.clone(),
        });

        // Infallible by contract: generator failures come back as text.
        let reply = self.generator.generate(&conversation).await;

        let user_turn = ChatTurn {
            id: Uuid::now_v7(),
            user_id,
            role: MessageRole::User,
            content,
            created_at: Utc::now(),
        };
        let assistant_turn = ChatTurn {
            id: Uuid::now_v7(),
            user_id,
            role: MessageRole::Assistant,
            content: reply,
            created_at: Utc::now(),
        };

        self.chat_repo
            .append_turns(&[user_turn.clone(), assistant_turn.clone()])
            .await?;

        log.push(user_turn);
        log.push(assistant_turn);
        info!(user_id = %user_id, turns = log.len(), "chat exchange persisted");

        Ok(log)
    }

    /// Return a user's full stored log, oldest turn first.
    pub async fn history(&self, user_id: Uuid) -> Result<Vec<ChatTurn>, RepositoryError> {
        self.chat_repo.fetch_log(&user_id).await
    }

    /// Truncate a user's chat log to empty.
    pub async fn clear(&self, user_id: Uuid) -> Result<(), RepositoryError> {
        self.chat_repo.clear_log(&user_id).await?;
        info!(user_id = %user_id, "chat log cleared");
        Ok(())
    }
}
