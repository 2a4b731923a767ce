//! API key middleware.

use super::{AppState, Backend, error::ApiError};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Header carrying the caller's API key.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Rejects requests that do not carry a valid API key.
pub(super) async fn require_api_key<B: Backend>(
    State(state): State<AppState<B>>,
    request: Request,
    next: Next,
) -> Response {
    let presented = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    match state.access.authenticate(presented.as_deref()).await {
        Ok(_) => next.run(request).await,
        Err(err) => {
            tracing::debug!(uri = %request.uri(), error = %err, "rejected request");
            ApiError::from(err).into_response()
        }
    }
}
