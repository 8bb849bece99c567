use url::Url;

use crate::error::{AppError, Result};

const SUPPORTED_SCHEMES: &[&str] = &["http", "https"];

/// Parse `raw` and accept it only when it names a web scheme and a non-empty host.
///
/// Pure: no DNS lookup or connection is attempted here.
pub fn validate_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidUrl("URL is empty".to_string()));
    }

    let url = Url::parse(trimmed).map_err(|e| AppError::InvalidUrl(e.to_string()))?;

    if !SUPPORTED_SCHEMES.contains(&url.scheme()) {
        return Err(AppError::InvalidUrl(format!(
            "unsupported scheme '{}'",
            url.scheme()
        )));
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(AppError::InvalidUrl("missing host".to_string())),
    }
}
