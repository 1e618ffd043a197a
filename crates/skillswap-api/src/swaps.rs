//! Swap handlers.
//!
//! - `GET /swaps` — the caller's board (incoming / outgoing / history)
//! - `POST /swaps` — create a request; the caller is the requester
//! - `POST /swaps/{id}/accept` / `/reject` / `/cancel` — status transitions

use axum::{
  Json,
  extract::{Path, State},
  http::{HeaderMap, StatusCode},
};
use serde::Deserialize;
use skillswap_core::{
  UserId,
  auth::AuthProvider,
  store::ExchangeStore,
  swap::{NewSwap, SwapBoard, SwapRequest, SwapStatus},
};
use uuid::Uuid;

use crate::{ApiState, auth, error::ApiError};

pub async fn board<S: ExchangeStore, A: AuthProvider, M>(
  State(state): State<ApiState<S, A, M>>,
  headers: HeaderMap,
) -> Result<Json<SwapBoard>, ApiError> {
  let principal = auth::require_principal(&state, &headers).await?;
  Ok(Json(state.ledger.board_for(&principal.id).await?))
}

#[derive(Debug, Deserialize)]
pub struct CreateSwapRequest {
  pub target_id:       UserId,
  pub offered_skill:   String,
  pub requested_skill: String,
  pub message:         Option<String>,
}

pub async fn create<S: ExchangeStore, A: AuthProvider, M>(
  State(state): State<ApiState<S, A, M>>,
  headers: HeaderMap,
  Json(body): Json<CreateSwapRequest>,
) -> Result<(StatusCode, Json<SwapRequest>), ApiError> {
  let principal = auth::require_principal(&state, &headers).await?;
  let swap = state
    .ledger
    .create_swap(NewSwap {
      requester_id:    principal.id,
      target_id:       body.target_id,
      offered_skill:   body.offered_skill,
      requested_skill: body.requested_skill,
      message:         body.message,
    })
    .await?;
  Ok((StatusCode::CREATED, Json(swap)))
}

pub async fn accept<S: ExchangeStore, A: AuthProvider, M>(
  state: State<ApiState<S, A, M>>,
  headers: HeaderMap,
  id: Path<Uuid>,
) -> Result<Json<SwapRequest>, ApiError> {
  transition(state, headers, id, SwapStatus::Accepted).await
}

pub async fn reject<S: ExchangeStore, A: AuthProvider, M>(
  state: State<ApiState<S, A, M>>,
  headers: HeaderMap,
  id: Path<Uuid>,
) -> Result<Json<SwapRequest>, ApiError> {
  transition(state, headers, id, SwapStatus::Rejected).await
}

pub async fn cancel<S: ExchangeStore, A: AuthProvider, M>(
  state: State<ApiState<S, A, M>>,
  headers: HeaderMap,
  id: Path<Uuid>,
) -> Result<Json<SwapRequest>, ApiError> {
  transition(state, headers, id, SwapStatus::Cancelled).await
}

async fn transition<S: ExchangeStore, A: AuthProvider, M>(
  State(state): State<ApiState<S, A, M>>,
  headers: HeaderMap,
  Path(id): Path<Uuid>,
  to: SwapStatus,
) -> Result<Json<SwapRequest>, ApiError> {
  let principal = auth::require_principal(&state, &headers).await?;
  Ok(Json(state.ledger.transition(id, &principal.id, to).await?))
}
