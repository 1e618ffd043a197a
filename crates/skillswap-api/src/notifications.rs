//! Notification handlers.
//!
//! - `GET /notifications` — the caller's inbox, newest first
//! - `POST /notifications/{id}/read` — mark one read (idempotent)
//! - `POST /notifications/read-all` — mark the whole inbox read

use axum::{
  Json,
  extract::{Path, State},
  http::HeaderMap,
};
use serde::Serialize;
use skillswap_core::{
  Error as CoreError, auth::AuthProvider, notification::Notification,
  store::ExchangeStore,
};
use uuid::Uuid;

use crate::{ApiState, auth, error::ApiError};

pub async fn list<S: ExchangeStore, A: AuthProvider, M>(
  State(state): State<ApiState<S, A, M>>,
  headers: HeaderMap,
) -> Result<Json<Vec<Notification>>, ApiError> {
  let principal = auth::require_principal(&state, &headers).await?;
  Ok(Json(state.emitter.list_for(&principal.id).await?))
}

/// Marking someone else's notification reports not-found rather than
/// forbidden, so ids cannot be probed across inboxes.
pub async fn mark_read<S: ExchangeStore, A: AuthProvider, M>(
  State(state): State<ApiState<S, A, M>>,
  headers: HeaderMap,
  Path(id): Path<Uuid>,
) -> Result<Json<Notification>, ApiError> {
  let principal = auth::require_principal(&state, &headers).await?;

  let owned = state
    .emitter
    .list_for(&principal.id)
    .await?
    .into_iter()
    .any(|n| n.notification_id == id);
  if !owned {
    return Err(CoreError::NotificationNotFound(id).into());
  }

  Ok(Json(state.emitter.mark_read(id).await?))
}

#[derive(Debug, Serialize)]
pub struct MarkAllReadResponse {
  pub updated: usize,
}

pub async fn mark_all_read<S: ExchangeStore, A: AuthProvider, M>(
  State(state): State<ApiState<S, A, M>>,
  headers: HeaderMap,
) -> Result<Json<MarkAllReadResponse>, ApiError> {
  let principal = auth::require_principal(&state, &headers).await?;
  let updated = state.emitter.mark_all_read(&principal.id).await?;
  Ok(Json(MarkAllReadResponse { updated }))
}
