//! The pluggable text-model capability and its HTTP implementation.

use std::{future::Future, time::Duration};

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A text-completion capability: one prompt in, one completion out.
///
/// Implementations wrap whatever hosted model serves the deployment; tests
/// substitute a canned stub.
pub trait SkillModel: Send + Sync {
  fn complete<'a>(
    &'a self,
    prompt: &'a str,
  ) -> impl Future<Output = Result<String>> + Send + 'a;
}

// ─── Chat-completions client ─────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
  model:       &'a str,
  messages:    Vec<ChatMessage<'a>>,
  temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
  role:    &'a str,
  content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
  choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
  message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
  content: Option<String>,
}

/// [`SkillModel`] backed by an OpenAI-compatible chat-completions endpoint.
#[derive(Debug, Clone)]
pub struct ChatCompletionsModel {
  client:   Client,
  endpoint: String,
  api_key:  String,
  model:    String,
}

impl ChatCompletionsModel {
  pub fn new(
    endpoint: impl Into<String>,
    api_key: impl Into<String>,
    model: impl Into<String>,
  ) -> Result<Self> {
    let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
    Ok(Self {
      client,
      endpoint: endpoint.into(),
      api_key:  api_key.into(),
      model:    model.into(),
    })
  }
}

impl SkillModel for ChatCompletionsModel {
  async fn complete(&self, prompt: &str) -> Result<String> {
    let request = ChatRequest {
      model:       &self.model,
      messages:    vec![ChatMessage { role: "user", content: prompt }],
      // Structured extraction wants determinism, not creativity.
      temperature: 0.0,
    };

    let response = self
      .client
      .post(&self.endpoint)
      .bearer_auth(&self.api_key)
      .json(&request)
      .send()
      .await?;

    let status = response.status();
    if !status.is_success() {
      return Err(Error::Status(status.as_u16()));
    }

    let body: ChatResponse = response.json().await?;
    body
      .choices
      .into_iter()
      .next()
      .and_then(|choice| choice.message.content)
      .filter(|content| !content.trim().is_empty())
      .ok_or(Error::MissingContent)
  }
}
