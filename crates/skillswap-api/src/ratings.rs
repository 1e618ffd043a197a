//! Rating submission.
//!
//! `POST /ratings` folds one star rating into the target's aggregate and
//! returns the updated aggregate.

use axum::{Json, extract::State, http::HeaderMap};
use serde::Deserialize;
use skillswap_core::{
  UserId, auth::AuthProvider, profile::RatingAggregate, store::ExchangeStore,
};

use crate::{ApiState, auth, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct SubmitRatingRequest {
  pub target_id: UserId,
  pub stars:     u8,
}

pub async fn submit<S: ExchangeStore, A: AuthProvider, M>(
  State(state): State<ApiState<S, A, M>>,
  headers: HeaderMap,
  Json(body): Json<SubmitRatingRequest>,
) -> Result<Json<RatingAggregate>, ApiError> {
  let principal = auth::require_principal(&state, &headers).await?;
  let aggregate = state
    .aggregator
    .submit_rating(&principal.id, &body.target_id, body.stars)
    .await?;
  Ok(Json(aggregate))
}
