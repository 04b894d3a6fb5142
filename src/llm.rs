use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::ApiConfig;

/// One chat-completion round trip: system role text, user prompt, and an
/// output token budget. Model id and temperature live on the client.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub system: String,
    pub user: String,
    pub max_tokens: u32,
}

/// The external language-model service. Exactly one attempt per call;
/// callers degrade to their local fallback on `Err`, never retry.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(&self, request: &ChatRequest) -> Result<String>;
}

/// Sleep the configured rate-limit delay, then issue the call. Every
/// outbound request in the pipeline goes through here so throttling
/// stays uniform across scoring, summaries, and the digest.
pub async fn throttled_complete<L: LanguageModel + ?Sized>(
    model: &L,
    delay: Duration,
    request: &ChatRequest,
) -> Result<String> {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    let start = std::time::Instant::now();
    debug!("LLM call starting - prompt_length={} chars", request.user.len());

    let answer = model.complete(request).await?;

    info!(
        "LLM call completed - duration={:.2}s, response_length={} chars",
        start.elapsed().as_secs_f32(),
        answer.len()
    );
    Ok(answer)
}

#[derive(Serialize)]
struct ApiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ApiChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    max_tokens: u32,
    messages: Vec<ApiMessage<'a>>,
}

#[derive(Deserialize)]
struct ApiChatResponse {
    choices: Vec<ApiChoice>,
}

#[derive(Deserialize)]
struct ApiChoice {
    message: ApiMessageOwned,
}

#[derive(Deserialize)]
struct ApiMessageOwned {
    content: String,
}

/// OpenAI-compatible `/chat/completions` client.
pub struct OpenAiChatModel {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
}

impl OpenAiChatModel {
    pub fn from_config(api: &ApiConfig) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            base_url: api.base_url.trim_end_matches('/').to_string(),
            api_key: api.api_key.clone(),
            model: api.model.clone(),
            temperature: api.temperature,
        })
    }
}

#[async_trait]
impl LanguageModel for OpenAiChatModel {
    async fn complete(&self, request: &ChatRequest) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ApiChatRequest {
            model: &self.model,
            temperature: self.temperature,
            max_tokens: request.max_tokens,
            messages: vec![
                ApiMessage {
                    role: "system",
                    content: &request.system,
                },
                ApiMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("request failed for {url}"))?
            .error_for_status()
            .with_context(|| format!("HTTP error for {url}"))?
            .json::<ApiChatResponse>()
            .await
            .with_context(|| format!("decoding JSON for {url}"))?;

        let answer = response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| anyhow!("chat response contained no choices"))?;
        Ok(answer)
    }
}

/// Model stand-in for runs without network access: every call fails, so
/// each component resolves to its deterministic fallback.
pub struct OfflineModel;

#[async_trait]
impl LanguageModel for OfflineModel {
    async fn complete(&self, _request: &ChatRequest) -> Result<String> {
        Err(anyhow!("offline mode: language model calls are disabled"))
    }
}
