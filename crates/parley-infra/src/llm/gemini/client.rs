//! GeminiClient -- concrete [`ChatCompletionClient`] implementation for the
//! Google Generative Language API.
//!
//! Sends requests to the `generateContent` endpoint with header
//! authentication. A single attempt per call; retry policy belongs to the
//! generator's fallback protocol, not here.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is never logged
//! or included in `Debug` output.

use std::time::Duration;

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};

use parley_core::reply::remote::ChatCompletionClient;
use parley_types::reply::{ChatCompletionRequest, ChatCompletionResponse, ReplyError};

use super::types::{
    GeminiContent, GeminiErrorResponse, GeminiGenerationConfig, GeminiPart, GeminiRequest,
    GeminiResponse,
};

/// Gemini chat-completion client.
///
/// # API Key Security
///
/// The API key is stored as a [`SecretString`] and is only exposed when
/// constructing HTTP request headers. It never appears in Debug output,
/// Display output, or tracing logs.
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
}

impl GeminiClient {
    /// Create a new Gemini client.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Gemini API key wrapped in SecretString
    /// * `model` - Model identifier (e.g., "gemini-2.0-flash")
    pub fn new(api_key: SecretString, model: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(300)) // 5 min timeout for long generations
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            api_key,
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            model,
        }
    }

    /// The model identifier this client targets.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Override the base URL (useful for testing or proxies).
    #[allow(dead_code)]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Build the full generateContent URL for the configured model.
    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    /// Convert a generic [`ChatCompletionRequest`] into a [`GeminiRequest`]:
    /// history turns first, the live message last as a `user` content entry.
    fn to_gemini_request(request: &ChatCompletionRequest) -> GeminiRequest {
        let mut contents: Vec<GeminiContent> = request
            .history
            .iter()
            .map(|turn| GeminiContent {
                role: turn.role.to_string(),
                parts: vec![GeminiPart {
                    text: turn.content.clone(),
                }],
            })
            .collect();

        contents.push(GeminiContent {
            role: "user".to_string(),
            parts: vec![GeminiPart {
                text: request.message.clone(),
            }],
        });

        GeminiRequest {
            contents,
            generation_config: GeminiGenerationConfig {
                max_output_tokens: request.config.max_output_tokens,
                temperature: request.config.temperature,
            },
        }
    }

    /// Map a non-2xx status to the typed failure taxonomy.
    ///
    /// The body may carry the Gemini error envelope; when it parses, its
    /// `status` field disambiguates 400-class credential failures.
    fn error_for_status(status: StatusCode, body: &str) -> ReplyError {
        let envelope = serde_json::from_str::<GeminiErrorResponse>(body).ok();
        let api_status = envelope
            .as_ref()
            .and_then(|e| e.error.status.as_deref())
            .unwrap_or_default();

        match status.as_u16() {
            401 | 403 => ReplyError::CredentialInvalid,
            400 if api_status == "UNAUTHENTICATED" || body.contains("API_KEY_INVALID") => {
                ReplyError::CredentialInvalid
            }
            429 => ReplyError::QuotaExceeded,
            _ => {
                let detail = envelope
                    .map(|e| e.error.message)
                    .unwrap_or_else(|| body.to_string());
                ReplyError::Provider {
                    message: format!("HTTP {status}: {detail}"),
                }
            }
        }
    }
}

// GeminiClient intentionally does NOT derive Debug to prevent accidental
// exposure of internal state.

impl ChatCompletionClient for GeminiClient {
    async fn complete(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, ReplyError> {
        let body = Self::to_gemini_request(request);

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", self.api_key.expose_secret())
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ReplyError::Provider {
                message: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(Self::error_for_status(status, &error_body));
        }

        let gemini_resp: GeminiResponse = response
            .json()
            .await
            .map_err(|e| ReplyError::Deserialization(format!("failed to parse response: {e}")))?;

        // Join all text parts of the first candidate.
        let text = gemini_resp
            .candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .map(|part| part.text.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        Ok(ChatCompletionResponse { text })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_types::reply::{GenerationConfig, HistoryTurn, RemoteRole};

    fn make_client() -> GeminiClient {
        GeminiClient::new(
            SecretString::from("test-key-not-real"),
            "gemini-2.0-flash".to_string(),
        )
    }

    fn sample_request() -> ChatCompletionRequest {
        ChatCompletionRequest {
            history: vec![
                HistoryTurn {
                    role: RemoteRole::User,
                    content: "first question".to_string(),
                },
                HistoryTurn {
                    role: RemoteRole::Model,
                    content: "first answer".to_string(),
                },
            ],
            message: "second question".to_string(),
            config: GenerationConfig::default(),
        }
    }

    #[test]
    fn test_url_building() {
        let client = make_client().with_base_url("http://localhost:8080".to_string());
        assert_eq!(
            client.url(),
            "http://localhost:8080/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn test_to_gemini_request_appends_live_message() {
        let gemini_req = GeminiClient::to_gemini_request(&sample_request());

        assert_eq!(gemini_req.contents.len(), 3);
        assert_eq!(gemini_req.contents[0].role, "user");
        assert_eq!(gemini_req.contents[1].role, "model");
        assert_eq!(gemini_req.contents[2].role, "user");
        assert_eq!(gemini_req.contents[2].parts[0].text, "second question");
        assert_eq!(gemini_req.generation_config.max_output_tokens, 2048);
    }

    #[test]
    fn test_error_mapping_credential() {
        let err = GeminiClient::error_for_status(StatusCode::FORBIDDEN, "denied");
        assert!(matches!(err, ReplyError::CredentialInvalid));

        let err = GeminiClient::error_for_status(
            StatusCode::BAD_REQUEST,
            r#"{"error":{"code":400,"message":"API key not valid","status":"INVALID_ARGUMENT","details":[{"reason":"API_KEY_INVALID"}]}}"#,
        );
        assert!(matches!(err, ReplyError::CredentialInvalid));
    }

    #[test]
    fn test_error_mapping_quota() {
        let err = GeminiClient::error_for_status(StatusCode::TOO_MANY_REQUESTS, "slow down");
        assert!(matches!(err, ReplyError::QuotaExceeded));
    }

    #[test]
    fn test_error_mapping_other() {
        let err = GeminiClient::error_for_status(StatusCode::SERVICE_UNAVAILABLE, "oops");
        match err {
            ReplyError::Provider { message } => assert!(message.contains("503")),
            other => panic!("expected Provider error, got {other:?}"),
        }
    }
}
