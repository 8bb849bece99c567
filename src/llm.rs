use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::SummarizerBackend;
use crate::error::{AppError, Result};

/// Output length bounds for one summarization call, in model tokens (words for chat backends).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryLength {
    pub min_length: u32,
    pub max_length: u32,
}

impl SummaryLength {
    /// Bounds for summarizing a single chunk.
    pub const MAP_PASS: SummaryLength = SummaryLength {
        min_length: 30,
        max_length: 150,
    };

    /// Bounds for summarizing the joined chunk summaries.
    pub const REDUCE_PASS: SummaryLength = SummaryLength {
        min_length: 100,
        max_length: 300,
    };
}

/// An abstractive summarization model.
///
/// Implementations must decode deterministically and keep no memory between
/// calls. Over-length input is truncated by the model, not rejected.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, text: &str, length: SummaryLength) -> Result<String>;

    fn model_name(&self) -> &str;
}

/// Build the configured backend. Called once at startup; the result is shared across requests.
pub fn build_summarizer(backend: &SummarizerBackend) -> Arc<dyn Summarizer> {
    match backend {
        SummarizerBackend::HuggingFace {
            api_token,
            model,
            api_base,
        } => Arc::new(HuggingFaceSummarizer::new(api_token, model, api_base)),
        SummarizerBackend::OpenRouter {
            api_key,
            model,
            api_base,
        } => Arc::new(OpenRouterSummarizer::new(api_key, model, api_base)),
    }
}

#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: InferenceParameters,
    options: InferenceOptions,
}

#[derive(Serialize)]
struct InferenceParameters {
    min_length: u32,
    max_length: u32,
    do_sample: bool,
    truncation: bool,
}

#[derive(Serialize)]
struct InferenceOptions {
    wait_for_model: bool,
}

#[derive(Deserialize)]
struct SummaryOutput {
    summary_text: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Summaries(Vec<SummaryOutput>),
    Failure { error: String },
}

/// Hosted sequence-to-sequence summarization model (BART by default).
pub struct HuggingFaceSummarizer {
    client: Client,
    api_token: String,
    model: String,
    endpoint: String,
}

impl HuggingFaceSummarizer {
    pub fn new(api_token: &str, model: &str, api_base: &str) -> Self {
        Self {
            client: Client::new(),
            api_token: api_token.to_string(),
            model: model.to_string(),
            endpoint: format!("{}/models/{}", api_base.trim_end_matches('/'), model),
        }
    }
}

#[async_trait]
impl Summarizer for HuggingFaceSummarizer {
    async fn summarize(&self, text: &str, length: SummaryLength) -> Result<String> {
        let body = InferenceRequest {
            inputs: text,
            parameters: InferenceParameters {
                min_length: length.min_length,
                max_length: length.max_length,
                do_sample: false,
                truncation: true,
            },
            options: InferenceOptions {
                wait_for_model: true,
            },
        };

        let res = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Summarization(format!("inference request failed: {}", e)))?;

        let status = res.status();
        let raw = res
            .text()
            .await
            .map_err(|e| AppError::Summarization(format!("failed to read inference response: {}", e)))?;

        let parsed: Option<InferenceResponse> = serde_json::from_str(&raw).ok();
        match (status.is_success(), parsed) {
            (true, Some(InferenceResponse::Summaries(outputs))) => outputs
                .into_iter()
                .next()
                .map(|output| output.summary_text.trim().to_string())
                .ok_or_else(|| AppError::Summarization("model returned no summary".to_string())),
            (_, Some(InferenceResponse::Failure { error })) => Err(AppError::Summarization(
                format!("model error (HTTP {}): {}", status.as_u16(), error),
            )),
            (false, _) => Err(AppError::Summarization(format!(
                "inference endpoint returned HTTP {}: {}",
                status.as_u16(),
                raw
            ))),
            (true, None) => Err(AppError::Summarization(
                "Invalid response format from model".to_string(),
            )),
        }
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f32,
    max_tokens: u32,
}

/// Chat-completion model prompted to act as a summarizer.
pub struct OpenRouterSummarizer {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl OpenRouterSummarizer {
    pub fn new(api_key: &str, model: &str, api_base: &str) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            endpoint: format!("{}/chat/completions", api_base.trim_end_matches('/')),
        }
    }
}

fn build_prompt(content: &str, length: SummaryLength) -> String {
    let mut result = String::with_capacity(content.len() + 200);
    result.push_str(&format!(
        "Summarize the following text in plain prose of between {} and {} words. \
         Respond with the summary only, without headings or commentary:\n\n",
        length.min_length, length.max_length
    ));
    result.push_str(content);
    result
}

#[async_trait]
impl Summarizer for OpenRouterSummarizer {
    async fn summarize(&self, text: &str, length: SummaryLength) -> Result<String> {
        let body = ChatRequest {
            model: self.model.clone(),
            messages: vec![Message {
                role: "user".into(),
                content: build_prompt(text, length),
            }],
            temperature: 0.0,
            // Roughly two tokens per word leaves room for the upper bound.
            max_tokens: length.max_length * 2,
        };

        let res = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Summarization(format!("LLM request failed: {}", e)))?;

        let status = res.status();
        if !status.is_success() {
            let detail = res.text().await.unwrap_or_default();
            return Err(AppError::Summarization(format!(
                "LLM API returned HTTP {}: {}",
                status.as_u16(),
                detail
            )));
        }

        let json: serde_json::Value = res
            .json()
            .await
            .map_err(|e| AppError::Summarization(format!("failed to decode LLM response: {}", e)))?;
        let reply = json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| AppError::Summarization("Invalid response format from LLM".to_string()))?
            .trim()
            .to_string();

        Ok(reply)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
