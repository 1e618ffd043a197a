//! SkillSwap server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), opens an
//! in-process SQLite store, and serves the exchange API over HTTP.

mod config;

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use skillswap_api::ApiState;
use skillswap_flows::{ChatCompletionsModel, Flows, SkillModel};
use skillswap_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;

#[derive(Parser)]
#[command(author, version, about = "SkillSwap exchange server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

/// The configured model backend. `Disabled` keeps the flow endpoints mounted
/// with their empty-result fallback.
enum ModelBackend {
  Chat(ChatCompletionsModel),
  Disabled,
}

impl SkillModel for ModelBackend {
  async fn complete(&self, prompt: &str) -> skillswap_flows::Result<String> {
    match self {
      Self::Chat(model) => model.complete(prompt).await,
      Self::Disabled => Err(skillswap_flows::Error::MissingContent),
    }
  }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = ServerConfig::load(&cli.config)?;

  // Expand `~` in store path.
  let store_path = expand_tilde(&settings.store_path);

  // Open SQLite store.
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let model = match &settings.model {
    Some(m) => ModelBackend::Chat(
      ChatCompletionsModel::new(m.endpoint.clone(), m.api_key.clone(), m.name.clone())
        .context("failed to build model client")?,
    ),
    None => {
      tracing::warn!("no model configured; skill flows will return empty results");
      ModelBackend::Disabled
    }
  };

  let state = ApiState::new(
    Arc::new(store),
    Arc::new(settings.session_tokens()),
    Arc::new(Flows::new(model)),
    settings.rating_policy,
  );

  let app = skillswap_api::api_router(state).layer(TraceLayer::new_for_http());
  let address = format!("{}:{}", settings.host, settings.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
