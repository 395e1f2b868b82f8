pub mod fallback;
pub mod prompt;

use anyhow::{Context, Result};
use log::{debug, error, info, warn};
use reqwest::{header, Client, StatusCode};

use crate::config::Config;
use crate::error::ChatError;
use crate::web::models::ChatReply;
use prompt::{CompletionPayload, CompletionResponse};

/// What a single upstream call came back with.
#[derive(Debug)]
pub enum AttemptOutcome {
    /// 2xx. `None` when the body had no usable content.
    Success(Option<String>),
    RateLimited,
    Upstream(StatusCode),
    Transport(reqwest::Error),
}

// Relays chat messages to the Mistral chat-completions API
pub struct ChatRelay {
    config: Config,
    client: Client,
}

impl ChatRelay {
    pub fn new(config: Config) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to create HTTP client")?;

        info!("Using completion API at: {} (model {})", config.api_url, config.model);

        Ok(Self { config, client })
    }

    pub async fn handle(&self, message: &str) -> Result<ChatReply, ChatError> {
        if message.is_empty() {
            return Err(ChatError::InvalidInput);
        }

        let payload = CompletionPayload::new(&self.config.model, message);
        let body = serde_json::to_vec(&payload).context("Failed to serialize completion payload")?;

        let reply = self.generate_response(message, body).await;
        Ok(ChatReply { reply })
    }

    async fn generate_response(&self, message: &str, body: Vec<u8>) -> String {
        let attempts = self.config.max_retries + 1;

        for attempt in 1..=attempts {
            debug!("Completion attempt {}/{}", attempt, attempts);

            match self.attempt(body.clone()).await {
                AttemptOutcome::Success(Some(content)) => {
                    info!("Response length: {} characters", content.len());
                    return content;
                }
                AttemptOutcome::Success(None) => {
                    warn!("Completion API returned no content");
                    return fallback::pick(message);
                }
                AttemptOutcome::RateLimited if attempt < attempts => {
                    warn!(
                        "Rate limit hit (attempt {}/{}). Retrying in {:?}...",
                        attempt, attempts, self.config.retry_delay
                    );
                    tokio::time::sleep(self.config.retry_delay).await;
                }
                AttemptOutcome::RateLimited => {
                    warn!("Rate limit hit on final attempt {}/{}", attempt, attempts);
                }
                AttemptOutcome::Upstream(status) => {
                    error!("Mistral API error: {}", status);
                    return fallback::pick(message);
                }
                AttemptOutcome::Transport(e) => {
                    error!("Network or API error: {}", e);
                    return fallback::pick(message);
                }
            }
        }

        fallback::pick(message)
    }

    /// One POST to the completion endpoint, classified.
    pub async fn attempt(&self, body: Vec<u8>) -> AttemptOutcome {
        let response = match self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return AttemptOutcome::Transport(e),
        };

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return AttemptOutcome::RateLimited;
        }
        if !status.is_success() {
            return AttemptOutcome::Upstream(status);
        }

        match response.json::<CompletionResponse>().await {
            Ok(parsed) => AttemptOutcome::Success(parsed.into_first_content()),
            Err(e) => AttemptOutcome::Transport(e),
        }
    }
}
