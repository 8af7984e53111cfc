//! Client for an OpenAI-compatible chat completion service.
//!
//! Used to ask for project-level cost splits. Replies are returned as raw
//! text; callers parse them with [`super::sanitize::parse_or`].

use anyhow::{Context, Result};
use backoff::{future::retry, ExponentialBackoffBuilder};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, instrument, warn};

use crate::error::ApiError;

const MAX_REPLY_TOKENS: u32 = 1200;

#[derive(Clone)]
pub struct AiClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    max_retry: Duration,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AiErrorBody {
    error: AiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct AiErrorDetail {
    message: String,
}

impl AiClient {
    pub fn new(
        base_url: &str,
        api_key: &str,
        model: &str,
        timeout_seconds: u64,
        max_retry_seconds: u64,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        tracing::info!(base_url = base_url, model = model, "AI client initialized");

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            max_retry: Duration::from_secs(max_retry_seconds),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send a single-message prompt and return the reply text.
    ///
    /// Transport failures, 429 and 5xx responses are retried with exponential
    /// backoff until `max_retry` has elapsed. Other 4xx responses fail at once.
    #[instrument(skip(self, prompt), fields(model = %self.model))]
    pub async fn complete(
        &self,
        prompt: &str,
        request_id: Option<&str>,
    ) -> Result<String, ApiError> {
        let body = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: MAX_REPLY_TOKENS,
        };

        let policy = ExponentialBackoffBuilder::new()
            .with_initial_interval(Duration::from_millis(500))
            .with_max_elapsed_time(Some(self.max_retry))
            .build();

        retry(policy, || self.send_chat(&body, request_id)).await
    }

    async fn send_chat(
        &self,
        body: &ChatRequest<'_>,
        request_id: Option<&str>,
    ) -> Result<String, backoff::Error<ApiError>> {
        let url = format!("{}/v1/chat/completions", self.base_url);

        let mut req = self.client.post(&url).bearer_auth(&self.api_key);
        if let Some(rid) = request_id {
            req = req.header("x-request-id", rid);
        }

        debug!(url = %url, "AI service request");

        let response = req.json(body).send().await.map_err(|e| {
            warn!(error = %e, "AI service request failed");
            backoff::Error::transient(ApiError::Unavailable(format!(
                "AI service unavailable: {}",
                e
            )))
        })?;

        let status = response.status();

        if status.is_success() {
            let parsed = response.json::<ChatResponse>().await.map_err(|e| {
                error!(error = %e, "Failed to parse AI service response");
                backoff::Error::permanent(ApiError::Unavailable(format!(
                    "Invalid AI service response: {}",
                    e
                )))
            })?;

            return Ok(parsed
                .choices
                .into_iter()
                .next()
                .and_then(|c| c.message.content)
                .unwrap_or_else(|| "{}".to_string()));
        }

        let message = response
            .json::<AiErrorBody>()
            .await
            .map(|b| b.error.message)
            .unwrap_or_else(|_| format!("AI service error: {}", status));

        let err = ApiError::Unavailable(message);
        match status {
            StatusCode::TOO_MANY_REQUESTS => Err(backoff::Error::transient(err)),
            s if s.is_server_error() => {
                warn!(status = %s, "AI service error, retrying");
                Err(backoff::Error::transient(err))
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                error!("AI service authentication failed");
                Err(backoff::Error::permanent(err))
            }
            _ => {
                error!(status = %status, "AI service rejected request");
                Err(backoff::Error::permanent(err))
            }
        }
    }

    /// Check AI service reachability by listing models.
    pub async fn health_check(&self) -> Result<()> {
        let url = format!("{}/v1/models", self.base_url);

        self.client
            .get(&url)
            .bearer_auth(&self.api_key)
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .context("AI service health check failed")?
            .error_for_status()
            .context("AI service unhealthy")?;

        Ok(())
    }
}
