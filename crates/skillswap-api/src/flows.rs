//! Generative-text flow handlers.
//!
//! - `POST /flows/extract-skills` — skill names from a free-text query
//! - `POST /flows/suggest-skills` — skills the caller could offer
//! - `POST /flows/autocomplete-skills` — suggestions for a partial query
//! - `POST /flows/chat` — one assistant conversation turn
//!
//! All are best-effort: a model failure yields the flow layer's own fallback
//! (an empty list, or the canned chat reply), never an error.

use std::collections::HashMap;

use axum::{Json, extract::State, http::HeaderMap};
use serde::{Deserialize, Serialize};
use skillswap_core::{
  Error as CoreError, auth::AuthProvider, store::ExchangeStore,
};
use skillswap_flows::{ChatTurn, SkillModel, SuggestionContext};

use crate::{ApiState, auth, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
  pub query: String,
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
  pub skills: Vec<String>,
}

pub async fn extract<S, A: AuthProvider, M: SkillModel>(
  State(state): State<ApiState<S, A, M>>,
  headers: HeaderMap,
  Json(body): Json<ExtractRequest>,
) -> Result<Json<ExtractResponse>, ApiError> {
  auth::require_principal(&state, &headers).await?;
  let skills = state.flows.extract_skills(&body.query).await;
  Ok(Json(ExtractResponse { skills }))
}

#[derive(Debug, Deserialize)]
pub struct AutocompleteRequest {
  pub query: String,
}

#[derive(Debug, Serialize)]
pub struct AutocompleteResponse {
  pub suggestions: Vec<String>,
}

pub async fn autocomplete<S, A: AuthProvider, M: SkillModel>(
  State(state): State<ApiState<S, A, M>>,
  headers: HeaderMap,
  Json(body): Json<AutocompleteRequest>,
) -> Result<Json<AutocompleteResponse>, ApiError> {
  auth::require_principal(&state, &headers).await?;
  let suggestions = state.flows.autocomplete_skills(&body.query).await;
  Ok(Json(AutocompleteResponse { suggestions }))
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
  #[serde(default)]
  pub history: Vec<ChatTurn>,
  pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
  pub reply: String,
}

pub async fn chat<S, A: AuthProvider, M: SkillModel>(
  State(state): State<ApiState<S, A, M>>,
  headers: HeaderMap,
  Json(body): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
  auth::require_principal(&state, &headers).await?;
  let reply = state.flows.chat(&body.history, &body.message).await;
  Ok(Json(ChatResponse { reply }))
}

#[derive(Debug, Serialize)]
pub struct SuggestResponse {
  pub suggested_skills: Vec<String>,
}

/// Suggestions are computed from the caller's own profile, their swap
/// history, and the skills most offered across public profiles.
pub async fn suggest<S: ExchangeStore, A: AuthProvider, M: SkillModel>(
  State(state): State<ApiState<S, A, M>>,
  headers: HeaderMap,
) -> Result<Json<SuggestResponse>, ApiError> {
  let principal = auth::require_principal(&state, &headers).await?;

  let profile = state
    .store
    .get_profile(&principal.id)
    .await?
    .ok_or_else(|| CoreError::ProfileNotFound(principal.id.clone()))?;
  let swaps = state.store.list_involving(&principal.id).await?;
  let public = state.store.list_public_profiles().await?;

  let context = SuggestionContext {
    profile_summary: format!(
      "Offers: {}. Wants: {}.",
      profile.skills_offered.join(", "),
      profile.skills_wanted.join(", "),
    ),
    swap_history:    summarize_swaps(&swaps),
    trending_skills: trending(&public).join(", "),
  };

  let suggested_skills = state.flows.suggest_skills(&context).await;
  Ok(Json(SuggestResponse { suggested_skills }))
}

fn summarize_swaps(swaps: &[skillswap_core::swap::SwapRequest]) -> String {
  if swaps.is_empty() {
    return "no swaps yet".to_owned();
  }
  swaps
    .iter()
    .map(|s| {
      format!("{} offered for {} ({})", s.offered_skill, s.requested_skill, s.status)
    })
    .collect::<Vec<_>>()
    .join("; ")
}

/// The most frequently offered skills across public profiles, most common
/// first, capped at ten.
fn trending(profiles: &[skillswap_core::profile::UserProfile]) -> Vec<String> {
  let mut counts: HashMap<&str, usize> = HashMap::new();
  for profile in profiles {
    for skill in &profile.skills_offered {
      *counts.entry(skill.as_str()).or_default() += 1;
    }
  }
  let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
  ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
  ranked.into_iter().take(10).map(|(skill, _)| skill.to_owned()).collect()
}
