use serde::Serialize;

/// Stable, machine-readable classification of a pipeline failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidUrl,
    NetworkError,
    UnsupportedContentType,
    ExtractionError,
    NoContentFound,
    SummarizationError,
    ConfigError,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid URL format: {0}")]
    InvalidUrl(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Non-HTML content: {0}")]
    UnsupportedContentType(String),

    /// Reserved for extractors that can fail on a parsed page. The built-in
    /// one never does: parsing is error-tolerant and bytes decode lossily, so a
    /// page without prose surfaces as `NoContentFound`.
    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("No text content found")]
    NoContentFound,

    #[error("Summarization error: {0}")]
    Summarization(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::InvalidUrl(_) => ErrorKind::InvalidUrl,
            AppError::Network(_) => ErrorKind::NetworkError,
            AppError::UnsupportedContentType(_) => ErrorKind::UnsupportedContentType,
            AppError::Extraction(_) => ErrorKind::ExtractionError,
            AppError::NoContentFound => ErrorKind::NoContentFound,
            AppError::Summarization(_) => ErrorKind::SummarizationError,
            AppError::Config(_) => ErrorKind::ConfigError,
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_stage_prefix() {
        let err = AppError::Summarization("model overloaded".into());
        assert_eq!(err.to_string(), "Summarization error: model overloaded");
        assert_eq!(err.kind(), ErrorKind::SummarizationError);

        let err = AppError::Network("request timed out".into());
        assert!(err.to_string().starts_with("Network error"));
    }

    #[test]
    fn kind_serializes_as_snake_case() {
        let json = serde_json::to_string(&ErrorKind::UnsupportedContentType).unwrap();
        assert_eq!(json, "\"unsupported_content_type\"");
    }
}
