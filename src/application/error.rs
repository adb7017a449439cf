// HTTP error mapping: domain errors -> RFC 7807 problem documents

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::{ChatError, SolveError, UploadError};

pub const PROBLEM_CONTENT_TYPE: &str = "application/problem+json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub problem_type: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
}

impl ProblemDetails {
    pub fn new(status: StatusCode, title: &str, detail: impl Into<String>) -> Self {
        Self {
            problem_type: "about:blank".to_string(),
            title: title.to_string(),
            status: status.as_u16(),
            detail: detail.into(),
        }
    }

    pub fn bad_request(title: &str, detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, title, detail)
    }

    pub fn internal(title: &str, detail: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, title, detail)
    }
}

impl IntoResponse for ProblemDetails {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, Json(self)).into_response();
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(PROBLEM_CONTENT_TYPE),
        );
        response
    }
}

/// Every failure a handler can return
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Solve(#[from] SolveError),

    #[error(transparent)]
    Chat(#[from] ChatError),

    #[error(transparent)]
    Upload(#[from] UploadError),

    /// Malformed request body or form
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn to_problem_details(&self) -> ProblemDetails {
        let detail = self.to_string();
        match self {
            ApiError::Solve(_) => ProblemDetails::bad_request("Equation Not Solved", detail),
            ApiError::Chat(ChatError::InvalidConversation(_)) => {
                ProblemDetails::bad_request("Invalid Conversation", detail)
            }
            ApiError::Chat(ChatError::Provider(_)) => {
                ProblemDetails::internal("Language Model Failed", detail)
            }
            ApiError::Upload(_) => ProblemDetails::bad_request("Upload Rejected", detail),
            ApiError::BadRequest(_) => ProblemDetails::bad_request("Invalid Request", detail),
            ApiError::PayloadTooLarge(_) => {
                ProblemDetails::new(StatusCode::PAYLOAD_TOO_LARGE, "Payload Too Large", detail)
            }
            ApiError::Internal(_) => ProblemDetails::internal("Internal Error", detail),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Solve(e) => tracing::debug!(kind = e.kind(), error = %e, "solve failed"),
            ApiError::Chat(ChatError::Provider(_)) | ApiError::Internal(_) => {
                tracing::error!(error = %self, "request failed")
            }
            _ => tracing::debug!(error = %self, "request rejected"),
        }
        self.to_problem_details().into_response()
    }
}
