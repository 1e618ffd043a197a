//! Profile search.
//!
//! `GET /search?skills=Guitar,Spanish` matches explicit skill names.
//! `GET /search?q=someone who teaches guitar` first runs the free-text query
//! through skill extraction, then matches the extracted names. An extraction
//! that yields no skills returns an empty result set, not an error.

use axum::{
  Json,
  extract::{Query, State},
};
use serde::Deserialize;
use skillswap_core::{profile::UserProfile, store::ExchangeStore};
use skillswap_flows::SkillModel;

use crate::{ApiState, error::ApiError};

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
  /// Comma-separated skill names, matched as-is (case-insensitive).
  pub skills: Option<String>,
  /// Free-text query, converted to skill names by the extraction flow.
  pub q:      Option<String>,
}

pub async fn handler<S: ExchangeStore, A, M: SkillModel>(
  State(state): State<ApiState<S, A, M>>,
  Query(params): Query<SearchParams>,
) -> Result<Json<Vec<UserProfile>>, ApiError> {
  let skills: Vec<String> = match (params.skills, params.q) {
    (Some(list), _) => list
      .split(',')
      .map(str::trim)
      .filter(|s| !s.is_empty())
      .map(str::to_owned)
      .collect(),
    (None, Some(query)) => state.flows.extract_skills(&query).await,
    (None, None) => {
      return Err(ApiError::BadRequest(
        "expected a `skills` or `q` parameter".to_owned(),
      ));
    }
  };

  if skills.is_empty() {
    return Ok(Json(Vec::new()));
  }
  Ok(Json(state.store.search_offering(&skills).await?))
}
