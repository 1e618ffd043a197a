//! Bearer-token resolution for handlers.

use axum::http::{HeaderMap, header};
use skillswap_core::auth::{AuthProvider, Principal};

use crate::{ApiState, error::ApiError};

/// Resolve the request's bearer token to a principal, or fail 401.
pub async fn require_principal<S, A: AuthProvider, M>(
  state: &ApiState<S, A, M>,
  headers: &HeaderMap,
) -> Result<Principal, ApiError> {
  maybe_principal(state, headers)
    .await
    .ok_or(ApiError::Unauthenticated)
}

/// Like [`require_principal`], but anonymous requests yield `None` instead
/// of an error. Used by endpoints that serve public data either way.
pub async fn maybe_principal<S, A: AuthProvider, M>(
  state: &ApiState<S, A, M>,
  headers: &HeaderMap,
) -> Option<Principal> {
  let token = headers
    .get(header::AUTHORIZATION)?
    .to_str()
    .ok()?
    .strip_prefix("Bearer ")?;
  state.auth.resolve(token).await
}
