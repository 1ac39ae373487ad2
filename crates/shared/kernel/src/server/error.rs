use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use envstore_storage::StorageError;
use std::borrow::Cow;
use tracing::{error, warn};

/// Failure of a request handler, rendered as an HTTP status.
#[envstore_derive::envstore_error]
pub enum ApiError {
    #[error("Bad request{}: {message}", format_context(.context))]
    BadRequest { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Storage failure{}: {source}", format_context(.context))]
    Storage { source: StorageError, context: Option<Cow<'static, str>> },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::BadRequest { message, .. } => {
                warn!(%message, "Rejected request");
                (StatusCode::BAD_REQUEST, message.to_string()).into_response()
            },
            Self::Storage { source: StorageError::InvalidKey { message, .. }, .. } => {
                warn!(error = %self, "Rejected key");
                (StatusCode::BAD_REQUEST, message.to_string()).into_response()
            },
            Self::Storage { .. } => {
                error!(error = %self, "Storage operation failed");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            },
        }
    }
}
