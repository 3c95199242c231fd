/*!
 * The translation collaborator interface and its HTTP implementation.
 *
 * `Translator` is the seam the batch executor works against; tests plug
 * in scripted implementations, production uses `ChatProvider` against an
 * OpenAI-compatible chat-completions endpoint.
 */

use async_trait::async_trait;
use log::{debug, error};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::time::Duration;

use crate::app_config::Config;
use crate::errors::TranslateError;

use super::prompts;

/// A translation collaborator: one fragment in, one translation out.
///
/// Implementations report exactly three failure classes (see
/// [`TranslateError`]); the batch executor decides retry and backoff
/// behavior from the class alone.
#[async_trait]
pub trait Translator: Send + Sync + Debug {
    async fn translate(&self, text: &str, context: &str) -> Result<String, TranslateError>;
}

/// Chat-completions request body
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

/// Chat message object
#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// Chat-completions response body
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Client for an OpenAI-compatible chat-completions endpoint.
#[derive(Debug)]
pub struct ChatProvider {
    chat_endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    system_prompt: String,
    client: Client,
}

impl ChatProvider {
    /// Create a provider from the application configuration.
    ///
    /// Uses connection pooling for better performance with many
    /// concurrent requests.
    pub fn new(config: &Config) -> Self {
        let endpoint = config.provider.endpoint.trim_end_matches('/');
        Self {
            chat_endpoint: format!("{}/chat/completions", endpoint),
            api_key: config.provider.api_key.clone(),
            model: config.provider.model.clone(),
            temperature: config.provider.temperature,
            max_tokens: config.provider.max_tokens,
            system_prompt: prompts::render_system_prompt(
                &config.translation.system_prompt,
                &config.source_language,
                &config.target_language,
            ),
            client: Client::builder()
                .timeout(Duration::from_secs(config.provider.timeout_secs))
                .pool_idle_timeout(Duration::from_secs(90))
                .pool_max_idle_per_host(20)
                .tcp_keepalive(Duration::from_secs(60))
                .build()
                .unwrap_or_default(),
        }
    }

    /// Map an HTTP status and body into the three-class error taxonomy.
    /// 429 is the capacity signal; server errors are treated as transient
    /// like a timeout; remaining client errors are terminal for the task.
    fn classify_status(status: StatusCode, body: String) -> TranslateError {
        if status == StatusCode::TOO_MANY_REQUESTS {
            TranslateError::RateLimited(body)
        } else if status.is_server_error() {
            TranslateError::Timeout(format!("server error {}: {}", status, body))
        } else {
            TranslateError::InvalidInput(format!("provider rejected request {}: {}", status, body))
        }
    }
}

#[async_trait]
impl Translator for ChatProvider {
    async fn translate(&self, text: &str, context: &str) -> Result<String, TranslateError> {
        if text.trim().is_empty() {
            return Err(TranslateError::InvalidInput("empty text".to_string()));
        }

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: self.system_prompt.clone(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompts::build_user_prompt(text, context),
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let response = self
            .client
            .post(&self.chat_endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TranslateError::Timeout(format!("request timed out: {}", e))
                } else {
                    // Transport failures are transient; retry without backoff
                    TranslateError::Timeout(format!("request failed: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = Self::classify_status(status, body);
            error!("translation call failed: {}", err);
            return Err(err);
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| {
            TranslateError::Timeout(format!("malformed provider response: {}", e))
        })?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| TranslateError::Timeout("provider returned no choices".to_string()))?;

        debug!("translated {} chars", text.chars().count());
        Ok(prompts::clean_output(&content))
    }
}
