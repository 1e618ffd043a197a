//! Error type for `skillswap-flows`.
//!
//! These never cross the flow boundary — the public operations fall back to
//! empty results — but the internal fallible paths are typed so tests can
//! pin down failure modes.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("model request failed: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("model returned status {0}")]
  Status(u16),

  #[error("model response carried no completion text")]
  MissingContent,

  #[error("model output did not match the expected schema: {0}")]
  Schema(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
