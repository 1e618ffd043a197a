//! API error type and its HTTP mapping.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use skillswap_core::Error as CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
  #[error("missing or invalid bearer token")]
  Unauthenticated,

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error(transparent)]
  Core(#[from] CoreError),
}

impl ApiError {
  fn status(&self) -> StatusCode {
    match self {
      Self::Unauthenticated => StatusCode::UNAUTHORIZED,
      Self::BadRequest(_) => StatusCode::BAD_REQUEST,
      Self::Core(e) => match e {
        CoreError::ProfileNotFound(_)
        | CoreError::SwapNotFound(_)
        | CoreError::NotificationNotFound(_) => StatusCode::NOT_FOUND,
        CoreError::Unauthorized { .. } => StatusCode::FORBIDDEN,
        CoreError::IllegalTransition { .. } | CoreError::DuplicateRating { .. } => {
          StatusCode::CONFLICT
        }
        CoreError::SelfSwap
        | CoreError::EmptySkill
        | CoreError::InvalidStars(_) => StatusCode::BAD_REQUEST,
        CoreError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        CoreError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
      },
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      tracing::error!(error = %self, "request failed");
    }
    (status, Json(json!({ "error": self.to_string() }))).into_response()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn core_errors_map_to_expected_statuses() {
    let cases: Vec<(ApiError, StatusCode)> = vec![
      (ApiError::Unauthenticated, StatusCode::UNAUTHORIZED),
      (
        ApiError::Core(CoreError::ProfileNotFound("x".into())),
        StatusCode::NOT_FOUND,
      ),
      (
        ApiError::Core(CoreError::Unauthorized { actor: "x".into() }),
        StatusCode::FORBIDDEN,
      ),
      (
        ApiError::Core(CoreError::SelfSwap),
        StatusCode::BAD_REQUEST,
      ),
      (
        ApiError::Core(CoreError::InvalidStars(9)),
        StatusCode::BAD_REQUEST,
      ),
      (
        ApiError::Core(CoreError::DuplicateRating {
          rater:  "a".into(),
          target: "b".into(),
        }),
        StatusCode::CONFLICT,
      ),
      (
        ApiError::Core(CoreError::StoreUnavailable("down".into())),
        StatusCode::SERVICE_UNAVAILABLE,
      ),
    ];
    for (error, expected) in cases {
      assert_eq!(error.status(), expected, "{error}");
    }
  }
}
