//! OpenAI-compatible client for chat completions and embeddings
//!
//! Every network call to the language model goes through [`OpenAiClient`].
//! Requests are retried on 429 and 5xx responses with exponential backoff.

use crate::config::{Config, LlmConfig};
use crate::error::{Result, ResumeScoutError};
use crate::extraction::enhancement::{Completer, Embedder};
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;

/// One initial request plus three retries.
const MAX_ATTEMPTS: u32 = 4;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    api_base: String,
    chat_model: String,
    embedding_model: String,
    max_tokens: u32,
    temperature: f32,
}

impl OpenAiClient {
    pub fn new(api_key: String, llm: &LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(llm.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key,
            api_base: llm.api_base.trim_end_matches('/').to_string(),
            chat_model: llm.chat_model.clone(),
            embedding_model: llm.embedding_model.clone(),
            max_tokens: llm.max_tokens,
            temperature: llm.temperature,
        })
    }

    /// `None` when no API key is configured.
    pub fn from_config(config: &Config) -> Result<Option<Self>> {
        match config.llm_api_key() {
            Some(key) => Ok(Some(Self::new(key, &config.llm)?)),
            None => Ok(None),
        }
    }

    pub async fn chat(&self, system: &str, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.chat_model,
            messages: vec![
                ChatMessage { role: "system", content: system },
                ChatMessage { role: "user", content: prompt },
            ],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let response: ChatResponse = self.post_with_retry("chat/completions", &request).await?;

        if let Some(usage) = &response.usage {
            debug!(
                "Chat call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| ResumeScoutError::LlmInference("Model returned empty content".to_string()))
    }

    /// Chat call whose answer is deserialized as JSON. Code fences are stripped first.
    pub async fn chat_json<T: DeserializeOwned>(&self, system: &str, prompt: &str) -> Result<T> {
        let text = self.chat(system, prompt).await?;
        Ok(serde_json::from_str(strip_json_fences(&text))?)
    }

    pub async fn embeddings(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }

        let request = EmbeddingRequest {
            model: &self.embedding_model,
            input: inputs,
        };
        let mut response: EmbeddingResponse = self.post_with_retry("embeddings", &request).await?;

        if response.data.len() != inputs.len() {
            return Err(ResumeScoutError::Embedding(format!(
                "Requested {} embeddings, received {}",
                inputs.len(),
                response.data.len()
            )));
        }

        response.data.sort_by_key(|d| d.index);
        Ok(response.data.into_iter().map(|d| d.embedding).collect())
    }

    async fn post_with_retry<B: Serialize, R: DeserializeOwned>(&self, path: &str, body: &B) -> Result<R> {
        let url = format!("{}/{}", self.api_base, path);
        let mut last_error: Option<ResumeScoutError> = None;

        for attempt in 0..MAX_ATTEMPTS {
            if attempt > 0 {
                let delay = retry_delay(attempt);
                warn!(
                    "Request to {} failed (attempt {}), retrying after {}ms",
                    path,
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self
                .client
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(body)
                .send()
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    last_error = Some(ResumeScoutError::Network(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("API returned {}: {}", status, body);
                last_error = Some(ResumeScoutError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(ResumeScoutError::Api {
                    status: status.as_u16(),
                    message: api_error_message(body),
                });
            }

            return Ok(response.json().await?);
        }

        Err(last_error.unwrap_or_else(|| {
            ResumeScoutError::LlmInference(format!("Gave up after {} attempts", MAX_ATTEMPTS))
        }))
    }
}

#[async_trait]
impl Completer for OpenAiClient {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String> {
        self.chat(system, prompt).await
    }
}

#[async_trait]
impl Embedder for OpenAiClient {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.embeddings(texts).await
    }
}

fn api_error_message(body: String) -> String {
    serde_json::from_str::<ApiErrorEnvelope>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body)
}

/// Backoff before retry `attempt` (1-based): 1s, 2s, 4s.
fn retry_delay(attempt: u32) -> Duration {
    Duration::from_millis(1000 * (1 << (attempt - 1)))
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let inner = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"));

    match inner {
        Some(stripped) => stripped
            .trim_start()
            .strip_suffix("```")
            .map(str::trim)
            .unwrap_or_else(|| stripped.trim_start()),
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_schedule() {
        let delays: Vec<u64> = (1..MAX_ATTEMPTS).map(|a| retry_delay(a).as_secs()).collect();
        assert_eq!(delays, vec![1, 2, 4]);
    }

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"match_score\": 70}\n```";
        assert_eq!(strip_json_fences(input), "{\"match_score\": 70}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n[1, 2]\n```";
        assert_eq!(strip_json_fences(input), "[1, 2]");
    }

    #[test]
    fn test_strip_json_fences_unterminated_and_plain() {
        assert_eq!(strip_json_fences("```json\n{}"), "{}");
        assert_eq!(strip_json_fences("  {\"a\": 1} "), "{\"a\": 1}");
    }

    #[test]
    fn test_api_error_message_prefers_error_body() {
        let body = r#"{"error": {"message": "Invalid API key", "type": "auth"}}"#.to_string();
        assert_eq!(api_error_message(body), "Invalid API key");
        assert_eq!(api_error_message("Bad gateway".to_string()), "Bad gateway");
    }

    #[test]
    fn test_chat_response_tolerates_missing_usage() {
        let json = r#"{"choices": [{"message": {"role": "assistant", "content": " hi "}}]}"#;
        let response: ChatResponse = serde_json::from_str(json).unwrap();
        assert!(response.usage.is_none());
        assert_eq!(response.choices[0].message.content.as_deref(), Some(" hi "));
    }

    #[test]
    fn test_embedding_response_shape() {
        let json = r#"{"data": [{"embedding": [0.5, 0.25], "index": 1}, {"embedding": [1.0, 0.0], "index": 0}]}"#;
        let mut response: EmbeddingResponse = serde_json::from_str(json).unwrap();
        response.data.sort_by_key(|d| d.index);
        assert_eq!(response.data[0].embedding, vec![1.0, 0.0]);
    }

    #[test]
    fn test_from_config_without_key_is_none() {
        let mut config = Config::default();
        config.llm.api_key_env = "RESUME_SCOUT_TEST_NO_LLM_KEY".to_string();
        assert!(OpenAiClient::from_config(&config).unwrap().is_none());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let mut llm = Config::default().llm;
        llm.api_base = "http://localhost:8080/v1/".to_string();
        let client = OpenAiClient::new("key".to_string(), &llm).unwrap();
        assert_eq!(client.api_base, "http://localhost:8080/v1");
    }
}
