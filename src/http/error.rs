//! Error rendering for HTTP responses.

use crate::access::services::AccessError;
use crate::container::services::ContainerServiceError;
use crate::error::ErrorKind;
use crate::server_registry::services::ServerRegistryServiceError;
use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Error returned by handlers.
#[derive(Debug)]
pub struct ApiError {
    kind: ErrorKind,
    message: String,
}

impl ApiError {
    /// Creates an error of `kind` with a caller-facing message.
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Returns the error category.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the HTTP status for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self.kind {
            ErrorKind::Validation | ErrorKind::InvalidArgument => StatusCode::BAD_REQUEST,
            ErrorKind::Unauthenticated => StatusCode::UNAUTHORIZED,
            ErrorKind::ServerNotFound | ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::DuplicateName => StatusCode::CONFLICT,
            ErrorKind::Connect | ErrorKind::Upstream | ErrorKind::Pull => StatusCode::BAD_GATEWAY,
            ErrorKind::RegistryUnavailable | ErrorKind::KeyStoreUnavailable => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<ContainerServiceError> for ApiError {
    fn from(err: ContainerServiceError) -> Self {
        Self::new(err.kind(), err.to_string())
    }
}

impl From<ServerRegistryServiceError> for ApiError {
    fn from(err: ServerRegistryServiceError) -> Self {
        Self::new(err.kind(), err.to_string())
    }
}

impl From<AccessError> for ApiError {
    fn from(err: AccessError) -> Self {
        Self::new(err.kind(), err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(ErrorKind::Validation, rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::new(ErrorKind::Validation, rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::warn!(kind = %self.kind, error = %self.message, "request failed");
        }
        (status, Json(json!({ "error": self.message }))).into_response()
    }
}
