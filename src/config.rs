use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use crate::error::{AppError, Result};

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3";
pub const DEFAULT_MAX_CHUNK_WORDS: usize = 1024;
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

const DEFAULT_HF_MODEL: &str = "facebook/bart-large-cnn";
const DEFAULT_HF_API_BASE: &str = "https://api-inference.huggingface.co";
const DEFAULT_OPENROUTER_MODEL: &str = "deepseek/deepseek-chat-v3-0324";
const DEFAULT_OPENROUTER_API_BASE: &str = "https://openrouter.ai/api/v1";

/// Which hosted model answers the summarization calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummarizerBackend {
    HuggingFace {
        api_token: String,
        model: String,
        api_base: String,
    },
    OpenRouter {
        api_key: String,
        model: String,
        api_base: String,
    },
}

/// Knobs for a single pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub fetch_timeout: Duration,
    pub user_agent: String,
    pub max_chunk_words: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_chunk_words: DEFAULT_MAX_CHUNK_WORDS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_addr: SocketAddr,
    pub request_timeout: Duration,
    pub backend: SummarizerBackend,
    pub pipeline: PipelineConfig,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port: u16 = parse_or(&lookup, "PORT", 3000)?;
        let ip = IpAddr::from_str(&host)
            .map_err(|e| AppError::Config(format!("Invalid host address: {}", e)))?;

        let request_timeout = Duration::from_secs(parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 90)?);

        let max_chunk_words: usize =
            parse_or(&lookup, "MAX_CHUNK_WORDS", DEFAULT_MAX_CHUNK_WORDS)?;
        if max_chunk_words == 0 {
            return Err(AppError::Config("MAX_CHUNK_WORDS must be at least 1".to_string()));
        }

        let pipeline = PipelineConfig {
            fetch_timeout: Duration::from_secs(parse_or(
                &lookup,
                "FETCH_TIMEOUT_SECS",
                DEFAULT_FETCH_TIMEOUT_SECS,
            )?),
            user_agent: lookup("USER_AGENT").unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            max_chunk_words,
        };

        let backend = load_backend(&lookup)?;

        Ok(Config {
            server_addr: SocketAddr::new(ip, port),
            request_timeout,
            backend,
            pipeline,
        })
    }
}

fn load_backend<F>(lookup: &F) -> Result<SummarizerBackend>
where
    F: Fn(&str) -> Option<String>,
{
    let name = lookup("SUMMARIZER_BACKEND").unwrap_or_else(|| "huggingface".to_string());

    match name.trim().to_ascii_lowercase().as_str() {
        "huggingface" | "hf" => Ok(SummarizerBackend::HuggingFace {
            api_token: required(lookup, "HF_API_TOKEN")?,
            model: lookup("HF_MODEL").unwrap_or_else(|| DEFAULT_HF_MODEL.to_string()),
            api_base: lookup("HF_API_BASE").unwrap_or_else(|| DEFAULT_HF_API_BASE.to_string()),
        }),
        "openrouter" => Ok(SummarizerBackend::OpenRouter {
            api_key: required(lookup, "OPENROUTER_API_KEY")?,
            model: lookup("OPENROUTER_MODEL")
                .unwrap_or_else(|| DEFAULT_OPENROUTER_MODEL.to_string()),
            api_base: lookup("OPENROUTER_API_BASE")
                .unwrap_or_else(|| DEFAULT_OPENROUTER_API_BASE.to_string()),
        }),
        other => Err(AppError::Config(format!("Unknown summarizer backend: {}", other))),
    }
}

fn required<F>(lookup: &F, key: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| AppError::Config(format!("{} is not set", key)))
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| AppError::Config(format!("Invalid {}: {}", key, e))),
        None => Ok(default),
    }
}
