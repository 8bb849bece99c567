use axum::{
    Router,
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use tower_http::cors::{Any, CorsLayer};

use crate::AppState;
use crate::api::models::SummarizeRequest;
use crate::api::response;
use crate::pipeline::SummaryResult;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/api/summarize", post(summarize_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(app_state)
}

async fn summarize_handler(
    State(state): State<AppState>,
    Json(req): Json<SummarizeRequest>,
) -> impl IntoResponse {
    tracing::info!(url = %req.url, "processing summarize request");
    let start_time = std::time::Instant::now();

    // Inference calls carry no timeout of their own; bound the whole request here.
    let result = tokio::time::timeout(
        state.config.request_timeout,
        state.pipeline.summarize(&req.url),
    )
    .await;

    let elapsed = start_time.elapsed();
    tracing::info!(url = %req.url, ?elapsed, "request finished");

    match result {
        Ok(summary) => envelope(summary),
        Err(_) => {
            tracing::warn!(url = %req.url, ?elapsed, "request timed out");
            response::error::<SummaryResult>(
                StatusCode::REQUEST_TIMEOUT,
                "Request processing timed out".to_string(),
                None,
            )
        }
    }
}

fn envelope(
    summary: SummaryResult,
) -> (StatusCode, Json<response::ApiResponse<SummaryResult>>) {
    match (summary.error.clone(), summary.error_kind) {
        (None, _) => response::success(summary),
        (Some(message), kind) => {
            let status = kind
                .map(response::status_for)
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            response::error(status, message, Some(summary))
        }
    }
}
