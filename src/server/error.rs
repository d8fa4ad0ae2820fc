use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("resource not found")]
    NotFound,
    #[error("request could not be processed: {0}")]
    Unprocessable(String),
    #[error("malformed request: {0}")]
    BadRequest(String),
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type ApiResponse<T> = Result<T, ApiError>;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: u16,
    pub message: &'static str,
}

impl ApiError {
    /// Status sent on the wire, `error` code reported in the body, client message.
    // method-not-allowed reports 405 in the body but goes out as 400
    fn parts(&self) -> (StatusCode, u16, &'static str) {
        match self {
            ApiError::NotFound => (StatusCode::NOT_FOUND, 404, "page not found"),
            ApiError::Unprocessable(_) => (StatusCode::UNPROCESSABLE_ENTITY, 422, "unprocessable"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, 400, "bad request"),
            ApiError::MethodNotAllowed => (StatusCode::BAD_REQUEST, 405, "method not allowed"),
            ApiError::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                500,
                "internal server error",
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = self.parts();
        match &self {
            ApiError::Database(error) => tracing::error!(%error, "Store operation failed"),
            other => tracing::debug!(error = %other, "Request rejected"),
        }
        let body = ErrorBody {
            success: false,
            error,
            message,
        };
        (status, Json(body)).into_response()
    }
}
