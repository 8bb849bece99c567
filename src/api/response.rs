use axum::Json;
use axum::http::StatusCode;
use chrono::Utc;
use serde::Serialize;

use crate::error::ErrorKind;

#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub data: Option<T>,
    pub meta: ResponseMeta,
}

#[derive(Serialize)]
pub struct ResponseMeta {
    pub status: String,
    pub status_code: u16,
    pub timestamp: String,
    pub message: Option<String>,
}

pub fn success<T: Serialize>(data: T) -> (StatusCode, Json<ApiResponse<T>>) {
    respond(StatusCode::OK, Some(data), None)
}

/// Failure envelope. `data` may still carry a partial result.
pub fn error<T>(
    status: StatusCode,
    message: String,
    data: Option<T>,
) -> (StatusCode, Json<ApiResponse<T>>) {
    respond(status, data, Some(message))
}

fn respond<T>(
    status: StatusCode,
    data: Option<T>,
    message: Option<String>,
) -> (StatusCode, Json<ApiResponse<T>>) {
    let meta = ResponseMeta {
        status: if status.is_success() { "success" } else { "error" }.to_string(),
        status_code: status.as_u16(),
        timestamp: Utc::now().to_rfc3339(),
        message,
    };

    (status, Json(ApiResponse { data, meta }))
}

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::InvalidUrl
        | ErrorKind::UnsupportedContentType
        | ErrorKind::NoContentFound => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::NetworkError => StatusCode::BAD_GATEWAY,
        ErrorKind::ExtractionError
        | ErrorKind::SummarizationError
        | ErrorKind::ConfigError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
