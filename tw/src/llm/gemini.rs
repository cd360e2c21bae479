//! Gemini API client implementation
//!
//! Implements the LlmClient trait for the Generative Language API
//! (`generateContent` and `streamGenerateContent?alt=sse`).

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use reqwest_eventsource::{Event, EventSource};
use serde::Deserialize;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::types::Role;
use super::{CompletionRequest, CompletionResponse, LlmClient, LlmError, Message, StopReason, StreamChunk, TokenUsage};
use crate::config::LlmConfig;

/// Maximum number of retries for transient errors
const MAX_RETRIES: u32 = 3;

/// Initial backoff delay for retries
const INITIAL_BACKOFF_MS: u64 = 1000;

fn is_retryable_status(status: u16) -> bool {
    matches!(status, 408 | 429 | 500 | 502 | 503 | 504)
}

/// Gemini API client
pub struct GeminiClient {
    model: String,
    api_key: Option<String>,
    key_vars: String,
    base_url: String,
    http: Client,
    max_tokens: u32,
    temperature: Option<f32>,
}

impl GeminiClient {
    /// Create a new client from configuration
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        debug!(model = %config.model(), "GeminiClient::from_config: called");
        // A missing key surfaces on the first call, not at startup
        let api_key = config.api_key().ok();
        let key_vars = config.api_key_candidates().join(" or ");

        let timeout = Duration::from_millis(config.timeout_ms);
        let http = Client::builder().timeout(timeout).build().map_err(LlmError::Network)?;

        Ok(Self {
            model: config.model().to_string(),
            api_key,
            key_vars,
            base_url: config.base_url().to_string(),
            http,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }

    fn key(&self) -> Result<&str, LlmError> {
        self.api_key
            .as_deref()
            .ok_or_else(|| LlmError::MissingCredential(self.key_vars.clone()))
    }

    fn url(&self, method: &str) -> String {
        format!("{}/v1beta/models/{}:{}", self.base_url, self.model, method)
    }

    /// Build the request body for the Gemini API
    fn build_request_body(&self, request: &CompletionRequest) -> serde_json::Value {
        debug!(%self.model, %request.max_tokens, "build_request_body: called");

        let mut generation_config = serde_json::json!({
            "maxOutputTokens": request.max_tokens.min(self.max_tokens),
        });
        if let Some(temperature) = request.temperature.or(self.temperature) {
            generation_config["temperature"] = serde_json::json!(temperature);
        }

        serde_json::json!({
            "systemInstruction": { "parts": [{ "text": request.system_prompt }] },
            "contents": convert_messages(&request.messages),
            "generationConfig": generation_config,
        })
    }
}

/// Convert internal messages to Gemini contents; the assistant role is "model"
fn convert_messages(messages: &[Message]) -> Vec<serde_json::Value> {
    messages
        .iter()
        .map(|msg| {
            let role = match msg.role {
                Role::User => "user",
                Role::Assistant => "model",
            };
            serde_json::json!({ "role": role, "parts": [{ "text": msg.content }] })
        })
        .collect()
}

impl GeminiResponse {
    /// Concatenated text of the first candidate
    fn text(&self) -> Option<String> {
        let candidate = self.candidates.first()?;
        let text: String = candidate
            .content
            .as_ref()?
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.is_empty() { None } else { Some(text) }
    }

    fn finish_reason(&self) -> Option<StopReason> {
        self.candidates
            .first()
            .and_then(|c| c.finish_reason.as_deref())
            .map(StopReason::from_gemini)
    }

    fn usage(&self) -> Option<TokenUsage> {
        self.usage_metadata.as_ref().map(|u| TokenUsage {
            input_tokens: u.prompt_token_count,
            output_tokens: u.candidates_token_count,
        })
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        debug!(%self.model, %request.max_tokens, "complete: called");
        let key = self.key()?.to_string();
        let url = self.url("generateContent");
        let body = self.build_request_body(&request);

        let mut last_error = None;
        for attempt in 0..=MAX_RETRIES {
            if attempt > 0 {
                let backoff = INITIAL_BACKOFF_MS * 2u64.pow(attempt - 1);
                warn!(attempt, backoff_ms = backoff, "complete: retrying after transient error");
                tokio::time::sleep(Duration::from_millis(backoff)).await;
            }

            let response = match self
                .http
                .post(url.clone())
                .header("x-goog-api-key", key.clone())
                .header("content-type", "application/json")
                .json(&body)
                .send()
                .await
            {
                Ok(r) => r,
                Err(e) => {
                    debug!(attempt, error = %e, "complete: network error");
                    last_error = Some(LlmError::Network(e));
                    continue;
                }
            };

            let status = response.status().as_u16();

            if status == 429 && attempt == MAX_RETRIES {
                return Err(LlmError::RateLimited {
                    retry_after: Duration::from_secs(60),
                });
            }

            if is_retryable_status(status) && attempt < MAX_RETRIES {
                let text = response.text().await.unwrap_or_default();
                debug!(attempt, status, "complete: retryable error");
                last_error = Some(LlmError::ApiError { status, message: text });
                continue;
            }

            if !response.status().is_success() {
                debug!(%status, "complete: API error");
                let text = response.text().await.unwrap_or_default();
                return Err(LlmError::ApiError { status, message: text });
            }

            debug!("complete: success");
            let api_response: GeminiResponse = response.json().await?;
            return Ok(CompletionResponse {
                content: api_response.text(),
                stop_reason: api_response.finish_reason().unwrap_or(StopReason::EndTurn),
                usage: api_response.usage().unwrap_or_default(),
            });
        }

        Err(last_error.unwrap_or_else(|| LlmError::InvalidResponse("Max retries exceeded".to_string())))
    }

    async fn stream(
        &self,
        request: CompletionRequest,
        chunk_tx: mpsc::Sender<StreamChunk>,
    ) -> Result<CompletionResponse, LlmError> {
        debug!(%self.model, %request.max_tokens, "stream: called");
        let key = self.key()?.to_string();
        let url = format!("{}?alt=sse", self.url("streamGenerateContent"));
        let body = self.build_request_body(&request);

        let http_request = self
            .http
            .post(url)
            .header("x-goog-api-key", key.clone())
            .header("content-type", "application/json")
            .json(&body);

        let mut es = EventSource::new(http_request).map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        let mut full_content = String::new();
        let mut stop_reason = StopReason::EndTurn;
        let mut usage = TokenUsage::default();

        while let Some(event) = es.next().await {
            match event {
                Ok(Event::Open) => {
                    debug!("stream: Event::Open");
                }
                Ok(Event::Message(msg)) => {
                    let data: GeminiResponse = serde_json::from_str(&msg.data).map_err(LlmError::Json)?;

                    if let Some(text) = data.text() {
                        full_content.push_str(&text);
                        let _ = chunk_tx.send(StreamChunk::TextDelta(text)).await;
                    }
                    if let Some(u) = data.usage() {
                        usage = u;
                    }
                    if let Some(reason) = data.finish_reason() {
                        debug!(?reason, "stream: finish reason received");
                        stop_reason = reason;
                        break;
                    }
                }
                Err(reqwest_eventsource::Error::StreamEnded) => {
                    debug!("stream: stream ended");
                    break;
                }
                Err(reqwest_eventsource::Error::InvalidStatusCode(status, response)) => {
                    let text = response.text().await.unwrap_or_default();
                    es.close();
                    let _ = chunk_tx.send(StreamChunk::Error(text.clone())).await;
                    return Err(LlmError::ApiError {
                        status: status.as_u16(),
                        message: text,
                    });
                }
                Err(e) => {
                    debug!(%e, "stream: Event error");
                    es.close();
                    let _ = chunk_tx.send(StreamChunk::Error(e.to_string())).await;
                    return Err(LlmError::InvalidResponse(e.to_string()));
                }
            }
        }
        es.close();

        debug!("stream: complete");
        let _ = chunk_tx
            .send(StreamChunk::MessageDone {
                stop_reason: stop_reason.clone(),
                usage: usage.clone(),
            })
            .await;

        Ok(CompletionResponse {
            content: if full_content.is_empty() { None } else { Some(full_content) },
            stop_reason,
            usage,
        })
    }
}

// Gemini API response types (shared by blocking and SSE responses)

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    usage_metadata: Option<GeminiUsage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsage {
    #[serde(default)]
    prompt_token_count: u64,
    #[serde(default)]
    candidates_token_count: u64,
}
