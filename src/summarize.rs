use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::llm::{SummaryLength, Summarizer};

/// Two-pass summarization: each chunk on its own, then once more over the joined partials.
pub struct HierarchicalSummarizer {
    model: Arc<dyn Summarizer>,
}

impl HierarchicalSummarizer {
    pub fn new(model: Arc<dyn Summarizer>) -> Self {
        Self { model }
    }

    /// Summarize `chunks` in order. Any failed model call aborts the whole run.
    ///
    /// A single chunk still goes through the reduce pass.
    pub async fn summarize(&self, chunks: &[String]) -> Result<String> {
        if chunks.is_empty() {
            return Err(AppError::Summarization("no text to summarize".to_string()));
        }

        let mut partials = Vec::with_capacity(chunks.len());
        for (index, chunk) in chunks.iter().enumerate() {
            let partial = self
                .model
                .summarize(chunk, SummaryLength::MAP_PASS)
                .await
                .map_err(into_summarization_error)?;
            tracing::debug!(
                chunk = index + 1,
                of = chunks.len(),
                summary_chars = partial.len(),
                "summarized chunk"
            );
            partials.push(partial);
        }

        let combined = partials.join(" ");
        tracing::debug!(
            chars = combined.len(),
            model = self.model.model_name(),
            "running reduce pass"
        );

        self.model
            .summarize(&combined, SummaryLength::REDUCE_PASS)
            .await
            .map_err(into_summarization_error)
    }
}

fn into_summarization_error(err: AppError) -> AppError {
    match err {
        AppError::Summarization(_) => err,
        other => AppError::Summarization(other.to_string()),
    }
}
