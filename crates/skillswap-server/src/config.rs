//! Runtime configuration, deserialised from `config.toml`.

use std::{
  collections::HashMap,
  path::{Path, PathBuf},
};

use anyhow::Context as _;
use serde::Deserialize;
use skillswap_core::{
  UserId,
  auth::{Principal, StaticTokens},
  rating::RatingPolicy,
};

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,

  /// Duplicate-rater policy; defaults to folding repeats into the mean.
  #[serde(default)]
  pub rating_policy: RatingPolicy,

  /// Text-model backing the skill flows. When absent the flow endpoints
  /// stay mounted but always return empty results.
  pub model: Option<ModelConfig>,

  /// Out-of-band provisioned sessions.
  #[serde(default)]
  pub sessions: Vec<SessionConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
  pub endpoint: String,
  pub api_key:  String,
  pub name:     String,
}

/// One bearer token and the principal it resolves to.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
  pub token:     String,
  pub id:        String,
  pub name:      String,
  pub email:     Option<String>,
  pub photo_url: Option<String>,
}

impl ServerConfig {
  /// Load from `path`, with `SKILLSWAP_*` environment variables layered on
  /// top. A missing file is fine as long as the environment covers the
  /// required fields.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path.to_path_buf()).required(false))
      .add_source(config::Environment::with_prefix("SKILLSWAP"))
      .build()
      .context("failed to read config file")?;
    settings
      .try_deserialize()
      .context("failed to deserialise ServerConfig")
  }

  pub fn session_tokens(&self) -> StaticTokens {
    let tokens: HashMap<String, Principal> = self
      .sessions
      .iter()
      .map(|s| {
        (s.token.clone(), Principal {
          id:        UserId::new(&s.id),
          name:      s.name.clone(),
          email:     s.email.clone(),
          photo_url: s.photo_url.clone(),
        })
      })
      .collect();
    StaticTokens::new(tokens)
  }
}
