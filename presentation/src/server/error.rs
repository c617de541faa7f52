//! HTTP error mapping
//!
//! Every failure leaves the server as
//! `{"error": <code>, "message": <text>, "status": <u16>}`.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use quorum_application::{ReloadError, RunQueryError};
use quorum_domain::DomainError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Query(#[from] RunQueryError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Agent reload failed: {0}")]
    Reload(#[from] ReloadError),

    #[error("Invalid request: {0}")]
    Body(#[from] JsonRejection),
}

impl ApiError {
    /// Taxonomy name carried in the `error` field
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Query(e) => e.code(),
            ApiError::Domain(e) => e.code(),
            ApiError::Reload(_) => "ReloadFailed",
            ApiError::Body(_) => "InvalidRequest",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Query(RunQueryError::Domain(e)) | ApiError::Domain(e) => domain_status(e),
            ApiError::Query(RunQueryError::Protocol(_)) | ApiError::Reload(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Body(_) => StatusCode::BAD_REQUEST,
        }
    }
}

fn domain_status(error: &DomainError) -> StatusCode {
    match error {
        DomainError::InvalidRequest(_)
        | DomainError::UnknownStrategy(_)
        | DomainError::NoAgentsAvailable => StatusCode::BAD_REQUEST,
        DomainError::NoAgentsResponded { .. } => StatusCode::SERVICE_UNAVAILABLE,
        DomainError::InvalidConfig(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({
            "error": self.code(),
            "message": self.to_string(),
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
