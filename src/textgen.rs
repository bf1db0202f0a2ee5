//! Client for the text-generation-webui HTTP API.
//!
//! This module provides typed access to the three endpoints the pipeline
//! uses: raw generation, chat, and model info. Responses are deserialized
//! into explicit schemas; a missing field surfaces as a schema violation
//! instead of an unchecked lookup failure.

use crate::error::{OptionExt, Result, TriageError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Request timeout in seconds
const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Fixed retry budget for failed requests
const MAX_RETRIES: u32 = 2;

// Sampling parameters, llama-precise preset
const TOP_P: f64 = 0.1;
const TOP_K: u32 = 40;
const TEMPERATURE: f64 = 0.7;
const REPETITION_PENALTY: f64 = 1.18;
const TYPICAL_P: f64 = 1.0;
const MAX_NEW_TOKENS: u32 = 3;

/// Seam between the pipeline and the generation service.
///
/// The batch scorer is generic over this trait so tests can inject a stub
/// that replays a scripted sequence of replies.
#[allow(async_fn_in_trait)]
pub trait TextGenerator {
    /// Send one prompt to the raw-generation endpoint and return the reply text.
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Raw-generation request body with the fixed sampling parameters
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    prompt: &'a str,
    top_p: f64,
    top_k: u32,
    temperature: f64,
    repetition_penalty: f64,
    typical_p: f64,
    max_new_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    results: Vec<GenerateResult>,
}

#[derive(Debug, Deserialize)]
struct GenerateResult {
    text: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    results: Vec<ChatResult>,
}

#[derive(Debug, Deserialize)]
struct ChatResult {
    history: ChatHistory,
}

#[derive(Debug, Deserialize)]
struct ChatHistory {
    /// Conversation turns as [user, assistant] pairs
    visible: Vec<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct InfoResponse {
    result: InfoResult,
}

#[derive(Debug, Deserialize)]
struct InfoResult {
    model_name: String,
    #[serde(rename = "shared.settings")]
    settings: InfoSettings,
}

#[derive(Debug, Deserialize)]
struct InfoSettings {
    context: String,
}

/// Identity of the currently loaded model, from the info endpoint
#[derive(Debug, Clone)]
pub struct ModelInfo {
    pub model_name: String,
    pub context: String,
}

/// HTTP client for a single text-generation-webui instance.
///
/// One outbound call at a time; no state is retained between calls beyond
/// the connection pool.
pub struct TextgenClient {
    client: reqwest::Client,
    base_url: String,
}

impl TextgenClient {
    /// Create a client for the service at `base_url` (e.g. `http://127.0.0.1:5000`).
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url)
            .map_err(|e| TriageError::Config(format!("Invalid API address '{}': {}", base_url, e)))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| TriageError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    /// Generate a completion for an already fully rendered prompt.
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let request = GenerateRequest {
            prompt,
            top_p: TOP_P,
            top_k: TOP_K,
            temperature: TEMPERATURE,
            repetition_penalty: REPETITION_PENALTY,
            typical_p: TYPICAL_P,
            max_new_tokens: MAX_NEW_TOKENS,
        };

        debug!(base = %self.base_url, "calling raw-generate endpoint");
        let response: GenerateResponse = self.post_json("/api/v1/generate", &request).await?;

        let text = response
            .results
            .into_iter()
            .next()
            .ok_or_schema("generate response carried no results")?
            .text;

        debug!(output = %text, "raw-generate reply");
        Ok(text)
    }

    /// Send one user message to the chat endpoint and return the assistant's
    /// reply (the last message of the visible conversation history).
    pub async fn chat(&self, user_input: &str) -> Result<String> {
        debug!(base = %self.base_url, "calling chat endpoint");
        let body = serde_json::json!({ "user_input": user_input });
        let response: ChatResponse = self.post_json("/api/v1/chat", &body).await?;

        let history = response
            .results
            .into_iter()
            .next()
            .ok_or_schema("chat response carried no results")?
            .history;

        let reply = history
            .visible
            .last()
            .and_then(|turn| turn.last())
            .ok_or_schema("chat history carried no visible turns")?;

        debug!(output = %reply, "chat reply");
        Ok(reply.clone())
    }

    /// Query the info endpoint for the active model and its system context.
    pub async fn model_info(&self) -> Result<ModelInfo> {
        let body = serde_json::json!({ "action": "info" });
        let response: InfoResponse = self.post_json("/api/v1/model", &body).await?;

        Ok(ModelInfo {
            model_name: response.result.model_name,
            context: response.result.settings.context,
        })
    }

    /// POST a JSON body and deserialize the JSON reply.
    ///
    /// Network errors and non-2xx statuses are retried with exponential
    /// backoff up to the fixed budget; schema violations are not.
    async fn post_json<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let mut backoff = Duration::from_millis(500);
        let mut attempt = 0;

        loop {
            match self.do_post(&url, body).await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    let retryable = matches!(e, TriageError::Network(_) | TriageError::Api { .. });
                    if !retryable || attempt >= MAX_RETRIES {
                        return Err(e);
                    }
                    warn!(
                        url = %url,
                        attempt = attempt + 1,
                        error = %e,
                        "Request failed, retrying"
                    );
                    tokio::time::sleep(backoff).await;
                    backoff *= 2;
                    attempt += 1;
                }
            }
        }
    }

    async fn do_post<B: Serialize, T: DeserializeOwned>(&self, url: &str, body: &B) -> Result<T> {
        let response = self.client.post(url).json(body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(TriageError::Api {
                code: status.as_u16() as i32,
                message: format!("{} - {}", status, message),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| TriageError::Schema(format!("Unexpected response shape: {}", e)))
    }
}

impl TextGenerator for TextgenClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        TextgenClient::generate(self, prompt).await
    }
}

/// Classify a free-text reply into a boolean decision.
///
/// Prefix test, not exact match: the reply is trimmed and lowercased, and
/// anything starting with "yes" counts as affirmative.
pub fn is_affirmative(raw_reply: &str) -> bool {
    raw_reply.trim().to_lowercase().starts_with("yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_affirmative_prefix() {
        assert!(is_affirmative("Yes, clearly."));
        assert!(is_affirmative("  YES"));
        assert!(!is_affirmative("no."));
        assert!(!is_affirmative(""));
        assert!(!is_affirmative("maybe yes"));
    }

    #[test]
    fn test_generate_response_shape() {
        let json = r#"{"results": [{"text": "yes"}]}"#;
        let parsed: GenerateResponse = serde_json::from_str(json).expect("parse failed");
        assert_eq!(parsed.results[0].text, "yes");
    }

    #[test]
    fn test_chat_response_shape() {
        let json = r#"{"results": [{"history": {"visible": [["hello", "hi"], ["is it?", "Yes it is"]]}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(json).expect("parse failed");
        let history = &parsed.results[0].history;
        let reply = history
            .visible
            .last()
            .and_then(|turn| turn.last())
            .expect("empty history");
        assert_eq!(reply, "Yes it is");
    }

    #[test]
    fn test_info_response_shape() {
        let json = r#"{"result": {"model_name": "vicuna-13b-cocktail", "shared.settings": {"context": "A chat."}}}"#;
        let parsed: InfoResponse = serde_json::from_str(json).expect("parse failed");
        assert_eq!(parsed.result.model_name, "vicuna-13b-cocktail");
        assert_eq!(parsed.result.settings.context, "A chat.");
    }

    #[test]
    fn test_missing_field_is_schema_error() {
        let json = r#"{"results": [{}]}"#;
        let parsed: std::result::Result<GenerateResponse, _> = serde_json::from_str(json);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_new_rejects_bad_address() {
        assert!(TextgenClient::new("not a url").is_err());
    }
}
