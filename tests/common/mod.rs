#![allow(dead_code)]

use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use async_trait::async_trait;
use url::Url;
use web_summarizer::error::{AppError, Result};
use web_summarizer::fetch::{HttpClient, HttpResponse, TransportError};
use web_summarizer::llm::{SummaryLength, Summarizer};

static INIT: Once = Once::new();

pub fn init_test_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .with_test_writer()
            .try_init();
    });
}

/// Serves one canned outcome and records every request URL.
pub struct MockHttp {
    outcome: Mutex<Option<std::result::Result<HttpResponse, TransportError>>>,
    pub requests: Mutex<Vec<String>>,
}

impl MockHttp {
    pub fn html(body: &str) -> Arc<Self> {
        Self::with(Ok(HttpResponse {
            status: 200,
            content_type: Some("text/html; charset=utf-8".to_string()),
            body: body.as_bytes().to_vec(),
        }))
    }

    pub fn with(outcome: std::result::Result<HttpResponse, TransportError>) -> Arc<Self> {
        Arc::new(Self {
            outcome: Mutex::new(Some(outcome)),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl HttpClient for MockHttp {
    async fn get(
        &self,
        url: &Url,
        _headers: &[(&str, &str)],
        _timeout: Duration,
    ) -> std::result::Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(url.to_string());
        self.outcome
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Err(TransportError::Other("mock already used".to_string())))
    }
}

/// Returns its input cut down to the first `words` words.
pub struct TruncatingSummarizer {
    words: usize,
    fail: bool,
    pub calls: Mutex<Vec<(String, SummaryLength)>>,
}

impl TruncatingSummarizer {
    pub fn new(words: usize) -> Arc<Self> {
        Arc::new(Self {
            words,
            fail: false,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            words: 0,
            fail: true,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Summarizer for TruncatingSummarizer {
    async fn summarize(&self, text: &str, length: SummaryLength) -> Result<String> {
        self.calls.lock().unwrap().push((text.to_string(), length));
        if self.fail {
            return Err(AppError::Summarization("model unavailable".to_string()));
        }
        Ok(text
            .split_whitespace()
            .take(self.words)
            .collect::<Vec<_>>()
            .join(" "))
    }

    fn model_name(&self) -> &str {
        "truncating-mock"
    }
}
