use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, ClientBuilder};
use url::Url;

use crate::error::{AppError, Result};

const HTML_CONTENT_TYPES: &[&str] = &["text/html", "application/xhtml+xml"];

/// What came back from a single GET.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("{0}")]
    Other(String),
}

/// Outbound HTTP capability used by the [`Fetcher`].
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get(
        &self,
        url: &Url,
        headers: &[(&str, &str)],
        timeout: Duration,
    ) -> std::result::Result<HttpResponse, TransportError>;
}

/// reqwest-backed client. Certificate verification stays on; redirects are followed.
pub struct ReqwestHttpClient {
    client: Client,
}

impl ReqwestHttpClient {
    pub fn new() -> Result<Self> {
        let client = ClientBuilder::new()
            .connect_timeout(Duration::from_secs(5))
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(
        &self,
        url: &Url,
        headers: &[(&str, &str)],
        timeout: Duration,
    ) -> std::result::Result<HttpResponse, TransportError> {
        let mut request = self.client.get(url.clone()).timeout(timeout);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request.send().await.map_err(transport_error)?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await.map_err(transport_error)?.to_vec();

        Ok(HttpResponse {
            status,
            content_type,
            body,
        })
    }
}

fn transport_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connect(err.to_string())
    } else {
        TransportError::Other(err.to_string())
    }
}

/// Single-attempt page fetcher: one GET, no retries.
pub struct Fetcher {
    http: Arc<dyn HttpClient>,
    user_agent: String,
    timeout: Duration,
}

impl Fetcher {
    pub fn new(http: Arc<dyn HttpClient>, user_agent: impl Into<String>, timeout: Duration) -> Self {
        Self {
            http,
            user_agent: user_agent.into(),
            timeout,
        }
    }

    /// GET `url` and return the raw body if the server answered 2xx with an HTML document.
    pub async fn fetch_html(&self, url: &Url) -> Result<Vec<u8>> {
        let headers = [(USER_AGENT.as_str(), self.user_agent.as_str())];

        let response = self
            .http
            .get(url, &headers, self.timeout)
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        if !(200..300).contains(&response.status) {
            return Err(AppError::Network(format!(
                "server responded with HTTP status {}",
                response.status
            )));
        }

        match response.content_type.as_deref() {
            Some(content_type) if is_html(content_type) => {
                tracing::debug!(url = %url, bytes = response.body.len(), "fetched HTML body");
                Ok(response.body)
            }
            Some(content_type) => Err(AppError::UnsupportedContentType(content_type.to_string())),
            None => Err(AppError::UnsupportedContentType(
                "missing Content-Type header".to_string(),
            )),
        }
    }
}

fn is_html(content_type: &str) -> bool {
    let content_type = content_type.to_ascii_lowercase();
    HTML_CONTENT_TYPES
        .iter()
        .any(|html| content_type.contains(html))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct StubHttp {
        response: Mutex<Option<std::result::Result<HttpResponse, TransportError>>>,
        seen_headers: Mutex<Vec<(String, String)>>,
    }

    impl StubHttp {
        fn returning(response: std::result::Result<HttpResponse, TransportError>) -> Arc<Self> {
            Arc::new(Self {
                response: Mutex::new(Some(response)),
                seen_headers: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl HttpClient for StubHttp {
        async fn get(
            &self,
            _url: &Url,
            headers: &[(&str, &str)],
            _timeout: Duration,
        ) -> std::result::Result<HttpResponse, TransportError> {
            self.seen_headers
                .lock()
                .unwrap()
                .extend(headers.iter().map(|(k, v)| (k.to_string(), v.to_string())));
            self.response.lock().unwrap().take().expect("called once")
        }
    }

    fn page(status: u16, content_type: Option<&str>) -> HttpResponse {
        HttpResponse {
            status,
            content_type: content_type.map(str::to_string),
            body: b"<html><body><p>hi</p></body></html>".to_vec(),
        }
    }

    fn url() -> Url {
        Url::parse("https://example.com/post").unwrap()
    }

    #[tokio::test]
    async fn returns_body_and_sends_user_agent() {
        let http = StubHttp::returning(Ok(page(200, Some("text/html; charset=utf-8"))));
        let fetcher = Fetcher::new(http.clone(), "TestAgent/1.0", Duration::from_secs(10));

        let body = fetcher.fetch_html(&url()).await.unwrap();
        assert!(body.starts_with(b"<html>"));

        let headers = http.seen_headers.lock().unwrap();
        assert_eq!(headers.as_slice(), &[("user-agent".to_string(), "TestAgent/1.0".to_string())]);
    }

    #[tokio::test]
    async fn non_success_status_is_a_network_error() {
        let http = StubHttp::returning(Ok(page(404, Some("text/html"))));
        let fetcher = Fetcher::new(http, "ua", Duration::from_secs(10));

        let err = fetcher.fetch_html(&url()).await.unwrap_err();
        assert!(matches!(err, AppError::Network(ref msg) if msg.contains("404")));
    }

    #[tokio::test]
    async fn timeout_is_a_network_error() {
        let http = StubHttp::returning(Err(TransportError::Timeout));
        let fetcher = Fetcher::new(http, "ua", Duration::from_secs(10));

        let err = fetcher.fetch_html(&url()).await.unwrap_err();
        assert_eq!(err.to_string(), "Network error: request timed out");
    }

    #[tokio::test]
    async fn rejects_non_html_content() {
        let http = StubHttp::returning(Ok(page(200, Some("application/pdf"))));
        let fetcher = Fetcher::new(http, "ua", Duration::from_secs(10));
        let err = fetcher.fetch_html(&url()).await.unwrap_err();
        assert!(matches!(err, AppError::UnsupportedContentType(_)));

        let http = StubHttp::returning(Ok(page(200, None)));
        let fetcher = Fetcher::new(http, "ua", Duration::from_secs(10));
        let err = fetcher.fetch_html(&url()).await.unwrap_err();
        assert!(matches!(err, AppError::UnsupportedContentType(_)));
    }

    #[test]
    fn html_detection_is_case_insensitive() {
        assert!(is_html("Text/HTML; charset=ISO-8859-1"));
        assert!(is_html("application/xhtml+xml"));
        assert!(!is_html("application/json"));
    }
}
