//! Shared-secret authentication middleware
//!
//! Every request must carry `Senha: <shared secret>`. The comparison is a
//! plain string equality check with no rate limiting.

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use super::state::AppState;
use crate::types::RejectError;

/// Name of the header carrying the shared secret
pub const SECRET_HEADER: &str = "senha";

/// Check the header value against the configured secret
pub fn is_authorized(headers: &HeaderMap, expected: &str) -> bool {
    headers
        .get(SECRET_HEADER)
        .is_some_and(|value| value.as_bytes() == expected.as_bytes())
}

/// Authentication middleware, runs before the method and body checks
pub async fn auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, RejectError> {
    if is_authorized(request.headers(), &state.shared_secret) {
        return Ok(next.run(request).await);
    }

    if request.headers().contains_key(SECRET_HEADER) {
        tracing::warn!("Invalid Senha header for {}", request.uri().path());
    } else {
        tracing::warn!("Missing Senha header for {}", request.uri().path());
    }
    Err(RejectError::Unauthorized)
}
