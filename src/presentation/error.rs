// Errors surfaced to HTTP clients
use crate::application::record_service::RecordError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("upstream service unavailable")]
    Upstream(#[source] anyhow::Error),

    #[error("failed to encode response")]
    Encoding(StatusCode),
}

impl From<RecordError> for ApiError {
    fn from(err: RecordError) -> Self {
        match err {
            RecordError::Upstream(e) => ApiError::Upstream(e),
            other => ApiError::BadRequest(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(e) => {
                tracing::error!("Upstream failure: {:#}", e);
                StatusCode::BAD_GATEWAY
            }
            ApiError::Encoding(status) => *status,
        };

        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_errors_map_to_status() {
        let response = ApiError::from(RecordError::NotCsv).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = ApiError::from(RecordError::Upstream(anyhow::anyhow!("down"))).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
