//! Profile handlers.
//!
//! - `GET /profiles` — list public profiles
//! - `POST /profiles` — create the caller's profile (signup)
//! - `GET /profiles/{id}` — fetch one profile
//! - `PATCH /profiles/{id}` — owner-only merge-write

use axum::{
  Json,
  extract::{Path, State},
  http::{HeaderMap, StatusCode},
};
use serde::Deserialize;
use skillswap_core::{
  Error as CoreError, UserId,
  auth::AuthProvider,
  profile::{NewProfile, ProfilePatch, UserProfile},
  store::ExchangeStore,
};

use crate::{ApiState, auth, error::ApiError};

pub async fn list<S: ExchangeStore, A, M>(
  State(state): State<ApiState<S, A, M>>,
) -> Result<Json<Vec<UserProfile>>, ApiError> {
  Ok(Json(state.store.list_public_profiles().await?))
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateProfileRequest {
  pub name:  Option<String>,
  pub email: Option<String>,
}

/// Signup. The profile id is the caller's session id; name and email
/// default to the session's display metadata when the body omits them.
pub async fn create<S: ExchangeStore, A: AuthProvider, M>(
  State(state): State<ApiState<S, A, M>>,
  headers: HeaderMap,
  Json(body): Json<CreateProfileRequest>,
) -> Result<(StatusCode, Json<UserProfile>), ApiError> {
  let principal = auth::require_principal(&state, &headers).await?;
  let profile = state
    .store
    .create_profile(NewProfile {
      id:    principal.id,
      name:  body.name.unwrap_or(principal.name),
      email: body.email.or(principal.email),
    })
    .await?;
  Ok((StatusCode::CREATED, Json(profile)))
}

/// A private profile is visible only to its owner; to anyone else it does
/// not exist.
pub async fn get_one<S: ExchangeStore, A: AuthProvider, M>(
  State(state): State<ApiState<S, A, M>>,
  headers: HeaderMap,
  Path(id): Path<String>,
) -> Result<Json<UserProfile>, ApiError> {
  let id = UserId::new(id);
  let profile = state
    .store
    .get_profile(&id)
    .await?
    .ok_or_else(|| CoreError::ProfileNotFound(id.clone()))?;

  if !profile.is_public {
    let caller = auth::maybe_principal(&state, &headers).await;
    if caller.map(|p| p.id) != Some(id.clone()) {
      return Err(CoreError::ProfileNotFound(id).into());
    }
  }

  Ok(Json(profile))
}

pub async fn update<S: ExchangeStore, A: AuthProvider, M>(
  State(state): State<ApiState<S, A, M>>,
  headers: HeaderMap,
  Path(id): Path<String>,
  Json(patch): Json<ProfilePatch>,
) -> Result<Json<UserProfile>, ApiError> {
  let principal = auth::require_principal(&state, &headers).await?;
  let id = UserId::new(id);
  if principal.id != id {
    return Err(CoreError::Unauthorized { actor: principal.id }.into());
  }
  Ok(Json(state.store.update_profile(&id, patch).await?))
}
