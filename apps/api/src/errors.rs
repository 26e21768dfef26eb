use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Pipeline stage failures carry the underlying cause verbatim so the user can
/// tell an auth failure from a rate limit or a network problem.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unreadable document: {0}")]
    UnreadableDocument(String),

    #[error("Fact extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("Job description summary failed: {0}")]
    SummarizationFailed(String),

    #[error("Letter drafting failed: {0}")]
    DraftingFailed(String),

    #[error("Fact verification failed: {0}")]
    VerificationFailed(String),

    #[error("Letter revision failed: {0}")]
    RevisionFailed(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Stable machine-readable code, also used as the `code` field of error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::UnreadableDocument(_) => "UNREADABLE_DOCUMENT",
            AppError::ExtractionFailed(_) => "EXTRACTION_FAILED",
            AppError::SummarizationFailed(_) => "SUMMARIZATION_FAILED",
            AppError::DraftingFailed(_) => "DRAFTING_FAILED",
            AppError::VerificationFailed(_) => "VERIFICATION_FAILED",
            AppError::RevisionFailed(_) => "REVISION_FAILED",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::UnreadableDocument(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::ExtractionFailed(_)
            | AppError::SummarizationFailed(_)
            | AppError::DraftingFailed(_)
            | AppError::VerificationFailed(_)
            | AppError::RevisionFailed(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        AppError::Validation(format!("Malformed upload: {err}"))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                "An internal server error occurred".to_string()
            }
            AppError::Validation(_) | AppError::UnreadableDocument(_) => {
                tracing::warn!("{self}");
                self.to_string()
            }
            _ => {
                tracing::error!("{self}");
                self.to_string()
            }
        };

        let body = Json(json!({
            "error": {
                "code": self.code(),
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
