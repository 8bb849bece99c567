use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;

use crate::chunk::chunk_words;
use crate::config::PipelineConfig;
use crate::error::{AppError, ErrorKind, Result};
use crate::extract::extract_text;
use crate::fetch::{Fetcher, HttpClient};
use crate::llm::Summarizer;
use crate::normalize::normalize_text;
use crate::summarize::HierarchicalSummarizer;
use crate::validate::validate_url;

/// Outcome of one pipeline run.
///
/// On success `error` is `None` and both text fields are set. On failure `error`
/// holds the message; `extracted_text` is still filled in when only the
/// summarization stage failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryResult {
    pub url: String,
    pub extracted_text: String,
    pub summary: String,
    pub error: Option<String>,
    pub error_kind: Option<ErrorKind>,
}

impl SummaryResult {
    fn empty(url: &str) -> Self {
        Self {
            url: url.to_string(),
            extracted_text: String::new(),
            summary: String::new(),
            error: None,
            error_kind: None,
        }
    }

    fn fail(mut self, err: AppError) -> Self {
        self.error_kind = Some(err.kind());
        self.error = Some(err.to_string());
        self
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// validate → fetch → extract → normalize → chunk → summarize, one stage at a time.
pub struct Pipeline {
    fetcher: Fetcher,
    summarizer: HierarchicalSummarizer,
    max_chunk_words: usize,
}

impl Pipeline {
    pub fn new(
        http: Arc<dyn HttpClient>,
        model: Arc<dyn Summarizer>,
        config: &PipelineConfig,
    ) -> Self {
        Self {
            fetcher: Fetcher::new(http, config.user_agent.clone(), config.fetch_timeout),
            summarizer: HierarchicalSummarizer::new(model),
            max_chunk_words: config.max_chunk_words,
        }
    }

    /// Run the whole pipeline for `url`. Never fails; errors land in the result.
    pub async fn summarize(&self, url: &str) -> SummaryResult {
        let result = SummaryResult::empty(url);
        let start = Instant::now();

        let text = match self.extract_stage(url).await {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(url, error = %err, "extraction failed");
                return result.fail(err);
            }
        };

        let mut result = SummaryResult {
            extracted_text: text,
            ..result
        };

        let chunks = chunk_words(&result.extracted_text, self.max_chunk_words);
        tracing::info!(url, chunks = chunks.len(), "summarizing");

        match self.summarizer.summarize(&chunks).await {
            Ok(summary) => {
                tracing::info!(url, elapsed = ?start.elapsed(), "summary complete");
                result.summary = summary;
                result
            }
            Err(err) => {
                tracing::warn!(url, error = %err, "summarization failed");
                result.fail(err)
            }
        }
    }

    async fn extract_stage(&self, url: &str) -> Result<String> {
        let url = validate_url(url)?;

        tracing::info!(url = %url, "fetching page");
        let html = self.fetcher.fetch_html(&url).await?;

        let raw_text = extract_text(&html)?;
        let text = normalize_text(&raw_text);
        if text.is_empty() {
            return Err(AppError::NoContentFound);
        }

        tracing::info!(
            url = %url,
            words = text.split_whitespace().count(),
            "extracted page text"
        );
        Ok(text)
    }
}
