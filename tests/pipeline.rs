mod common;

use std::time::Duration;

use common::{MockHttp, TruncatingSummarizer, init_test_tracing};
use web_summarizer::config::PipelineConfig;
use web_summarizer::error::ErrorKind;
use web_summarizer::fetch::{HttpResponse, TransportError};
use web_summarizer::llm::SummaryLength;
use web_summarizer::pipeline::Pipeline;

const TWO_PARAGRAPHS: &str = "<html><body>\
    <p>First paragraph text.</p>\
    <p>Second paragraph text.</p>\
    </body></html>";

fn config(max_chunk_words: usize) -> PipelineConfig {
    PipelineConfig {
        fetch_timeout: Duration::from_secs(10),
        user_agent: "test-agent".to_string(),
        max_chunk_words,
    }
}

#[tokio::test]
async fn summarizes_two_paragraph_page_with_map_then_reduce() {
    init_test_tracing();
    let http = MockHttp::html(TWO_PARAGRAPHS);
    let model = TruncatingSummarizer::new(2);
    let pipeline = Pipeline::new(http.clone(), model.clone(), &config(4));

    let result = pipeline.summarize("https://example.com/post").await;

    assert_eq!(result.error, None);
    assert_eq!(result.error_kind, None);
    assert_eq!(result.url, "https://example.com/post");
    assert_eq!(
        result.extracted_text,
        "First paragraph text. Second paragraph text."
    );
    assert_eq!(result.summary, "First paragraph");
    assert_eq!(http.request_count(), 1);

    // Two chunks of at most four words, one map call each, then a single reduce call.
    let calls = model.calls.lock().unwrap();
    assert_eq!(
        *calls,
        vec![
            ("First paragraph text. Second".to_string(), SummaryLength::MAP_PASS),
            ("paragraph text.".to_string(), SummaryLength::MAP_PASS),
            ("First paragraph paragraph text.".to_string(), SummaryLength::REDUCE_PASS),
        ]
    );
}

#[tokio::test]
async fn invalid_urls_never_touch_the_network() {
    init_test_tracing();
    for raw in ["", "example.com/article", "https://", "file:///etc/passwd"] {
        let http = MockHttp::html(TWO_PARAGRAPHS);
        let model = TruncatingSummarizer::new(5);
        let pipeline = Pipeline::new(http.clone(), model.clone(), &config(1024));

        let result = pipeline.summarize(raw).await;

        assert_eq!(result.error_kind, Some(ErrorKind::InvalidUrl), "input {:?}", raw);
        assert!(result.error.is_some());
        assert_eq!(http.request_count(), 0);
        assert_eq!(model.call_count(), 0);
    }
}

#[tokio::test]
async fn fetch_timeout_leaves_text_fields_empty() {
    init_test_tracing();
    let http = MockHttp::with(Err(TransportError::Timeout));
    let model = TruncatingSummarizer::new(5);
    let pipeline = Pipeline::new(http, model.clone(), &config(1024));

    let result = pipeline.summarize("https://slow.example.com/").await;

    let error = result.error.expect("timeout should be reported");
    assert!(error.contains("Network error"), "got {:?}", error);
    assert_eq!(result.error_kind, Some(ErrorKind::NetworkError));
    assert_eq!(result.extracted_text, "");
    assert_eq!(result.summary, "");
    assert_eq!(model.call_count(), 0);
}

#[tokio::test]
async fn http_error_status_is_a_network_failure() {
    let http = MockHttp::with(Ok(HttpResponse {
        status: 503,
        content_type: Some("text/html".to_string()),
        body: b"<p>Service Unavailable</p>".to_vec(),
    }));
    let pipeline = Pipeline::new(http, TruncatingSummarizer::new(5), &config(1024));

    let result = pipeline.summarize("https://example.com/").await;
    assert_eq!(result.error_kind, Some(ErrorKind::NetworkError));
    assert!(result.error.unwrap().contains("503"));
}

#[tokio::test]
async fn non_html_response_is_rejected() {
    let http = MockHttp::with(Ok(HttpResponse {
        status: 200,
        content_type: Some("application/json".to_string()),
        body: br#"{"hello":"world"}"#.to_vec(),
    }));
    let pipeline = Pipeline::new(http, TruncatingSummarizer::new(5), &config(1024));

    let result = pipeline.summarize("https://api.example.com/data").await;
    assert_eq!(result.error_kind, Some(ErrorKind::UnsupportedContentType));
    assert_eq!(result.error.as_deref(), Some("Non-HTML content: application/json"));
}

#[tokio::test]
async fn page_of_pure_boilerplate_has_no_content() {
    let http = MockHttp::html(
        "<html><body><nav>Home | About</nav><script>track()</script><footer>(c) 2024</footer></body></html>",
    );
    let model = TruncatingSummarizer::new(5);
    let pipeline = Pipeline::new(http, model.clone(), &config(1024));

    let result = pipeline.summarize("https://example.com/").await;
    assert_eq!(result.error_kind, Some(ErrorKind::NoContentFound));
    assert_eq!(result.error.as_deref(), Some("No text content found"));
    assert_eq!(model.call_count(), 0);
}

#[tokio::test]
async fn only_reference_markers_counts_as_no_content() {
    let http = MockHttp::html("<html><body><p>[1]</p><p>[citation needed]</p></body></html>");
    let pipeline = Pipeline::new(http, TruncatingSummarizer::new(5), &config(1024));

    let result = pipeline.summarize("https://example.com/").await;
    assert_eq!(result.error_kind, Some(ErrorKind::NoContentFound));
}

#[tokio::test]
async fn summarization_failure_keeps_extracted_text() {
    init_test_tracing();
    let http = MockHttp::html(TWO_PARAGRAPHS);
    let model = TruncatingSummarizer::failing();
    let pipeline = Pipeline::new(http, model.clone(), &config(1024));

    let result = pipeline.summarize("https://example.com/post").await;

    assert_eq!(
        result.extracted_text,
        "First paragraph text. Second paragraph text."
    );
    assert_eq!(result.summary, "");
    assert_eq!(result.error_kind, Some(ErrorKind::SummarizationError));
    assert_eq!(
        result.error.as_deref(),
        Some("Summarization error: model unavailable")
    );
    assert_eq!(model.call_count(), 1);
}

#[tokio::test]
async fn citation_markers_are_stripped_from_extracted_text() {
    let http = MockHttp::html(
        "<html><body><p>Rust was first released in 2015.[1] It is fast.[citation needed]</p></body></html>",
    );
    let pipeline = Pipeline::new(http, TruncatingSummarizer::new(50), &config(1024));

    let result = pipeline.summarize("https://example.com/rust").await;
    assert!(result.is_success());
    assert_eq!(
        result.extracted_text,
        "Rust was first released in 2015. It is fast."
    );
}
