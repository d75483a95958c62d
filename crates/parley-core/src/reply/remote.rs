//! RemoteReplyGenerator -- remote chat-completion backend with local fallback.
//!
//! Holds the capability check for the one external credential. With no
//! credential configured the generator never touches the network and
//! answers from the offline pool. With a credential, a single completion
//! attempt is made; every failure resolves to displayable text, never to an
//! error. No retry is attempted.

use parley_types::config::ApiCredential;
use parley_types::reply::{
    ChatCompletionRequest, ChatCompletionResponse, GenerationConfig, HistoryTurn, Message,
    MessageRole, RemoteRole, ReplyError,
};

use super::generator::{ReplyGenerator, EMPTY_CONVERSATION_GREETING};
use super::offline::offline_reply;

/// Reply when the provider succeeds but returns no text.
pub const EMPTY_RESPONSE_REPLY: &str = "I couldn't generate a response. Please try again.";

/// Reply when the provider rejects the configured credential.
pub const CREDENTIAL_ERROR_REPLY: &str = "The AI service rejected the configured API key. Verify the GEMINI_API_KEY value and restart the service.";

/// Reply when the provider reports an exhausted quota.
pub const QUOTA_ERROR_REPLY: &str = "The AI service quota has been exhausted. Please try again later.";

/// Client port for the remote chat-completion protocol.
///
/// The reqwest-backed implementation lives in parley-infra; tests supply
/// hand-rolled doubles.
pub trait ChatCompletionClient: Send + Sync {
    fn complete(
        &self,
        request: &ChatCompletionRequest,
    ) -> impl std::future::Future<Output = Result<ChatCompletionResponse, ReplyError>> + Send;
}

/// Remote-API-backed reply generator with local fallback.
pub struct RemoteReplyGenerator<C: ChatCompletionClient> {
    client: C,
    credential_present: bool,
}

impl<C: ChatCompletionClient> RemoteReplyGenerator<C> {
    /// Create a generator around a client, recording whether a usable
    /// credential was configured. `ApiCredential::Missing` pins the
    /// generator to offline replies without error.
    pub fn new(client: C, credential: &ApiCredential) -> Self {
        Self {
            client,
            credential_present: credential.is_configured(),
        }
    }

    /// Translate a conversation into the remote protocol's shape: every
    /// turn but the newest becomes history (`Assistant` maps to the remote
    /// `model` role, all other roles to `user`); the newest turn's content
    /// is the live message.
    fn build_request(history: &[Message], latest: &Message) -> ChatCompletionRequest {
        let history = history
            .iter()
            .map(|m| HistoryTurn {
                role: match m.role {
                    MessageRole::Assistant => RemoteRole::Model,
                    _ => RemoteRole::User,
                },
                content: m.content.clone(),
            })
            .collect();

        ChatCompletionRequest {
            history,
            message: latest.content.clone(),
            config: GenerationConfig::default(),
        }
    }
}

impl<C: ChatCompletionClient> ReplyGenerator for RemoteReplyGenerator<C> {
    fn name(&self) -> &str {
        "remote"
    }

    async fn generate(&self, conversation: &[Message]) -> String {
        let Some((latest, history)) = conversation.split_last() else {
            return EMPTY_CONVERSATION_GREETING.to_string();
        };

        if !self.credential_present {
            return offline_reply(&latest.content).to_string();
        }

        let request = Self::build_request(history, latest);

        match self.client.complete(&request).await {
            Ok(response) => {
                if response.text.trim().is_empty() {
                    EMPTY_RESPONSE_REPLY.to_string()
                } else {
                    response.text
                }
            }
            Err(ReplyError::CredentialInvalid) => CREDENTIAL_ERROR_REPLY.to_string(),
            Err(ReplyError::QuotaExceeded) => QUOTA_ERROR_REPLY.to_string(),
            Err(err) => {
                tracing::warn!(error = %err, "remote reply generation failed, using offline fallback");
                offline_reply(&latest.content).to_string()
            }
        }
    }
}
