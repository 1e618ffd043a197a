//! Generative-text flows for SkillSwap.
//!
//! Fixed-prompt operations wrapping a pluggable text model: extracting skill
//! names from a free-text search query, suggesting skills a user could
//! offer, autocompleting a partial skill query, and answering a conversation
//! turn as the platform assistant. All are best-effort — any transport,
//! schema, or parse failure is logged and yields a fallback value (an empty
//! list, or a canned apology for chat), never an error into the caller.
//!
//! The model itself is an external collaborator. Only its input/output
//! contract lives here; see [`model::SkillModel`].

#![allow(async_fn_in_trait)]

mod autocomplete;
mod chatbot;
mod extract;
mod parse;
mod suggest;

pub mod error;
pub mod model;

pub use chatbot::{CHAT_FALLBACK, ChatRole, ChatTurn};
pub use error::{Error, Result};
pub use extract::EXTRACT_SYSTEM_PROMPT;
pub use model::{ChatCompletionsModel, SkillModel};
pub use suggest::SuggestionContext;

/// The flow surface, generic over the backing model.
#[derive(Debug, Clone)]
pub struct Flows<M> {
  model: M,
}

impl<M: SkillModel> Flows<M> {
  pub fn new(model: M) -> Self { Self { model } }

  /// Extract skill names from a free-text search query.
  ///
  /// Best-effort: returns an empty list when the model fails or produces
  /// output that does not match the schema.
  pub async fn extract_skills(&self, query: &str) -> Vec<String> {
    match extract::try_extract(&self.model, query).await {
      Ok(skills) => skills,
      Err(e) => {
        tracing::warn!(error = %e, "skill extraction failed; returning no skills");
        Vec::new()
      }
    }
  }

  /// Suggest skills the user could offer, given profile and history context.
  ///
  /// Best-effort with the same empty-list fallback as
  /// [`extract_skills`](Self::extract_skills).
  pub async fn suggest_skills(&self, context: &SuggestionContext) -> Vec<String> {
    match suggest::try_suggest(&self.model, context).await {
      Ok(skills) => skills,
      Err(e) => {
        tracing::warn!(error = %e, "skill suggestion failed; returning no skills");
        Vec::new()
      }
    }
  }

  /// Autocomplete a partial skill query, returning at most five suggestions.
  pub async fn autocomplete_skills(&self, query: &str) -> Vec<String> {
    match autocomplete::try_autocomplete(&self.model, query).await {
      Ok(suggestions) => suggestions,
      Err(e) => {
        tracing::warn!(error = %e, "skill autocomplete failed; returning no suggestions");
        Vec::new()
      }
    }
  }

  /// Answer one conversation turn as the platform assistant.
  ///
  /// A model failure yields [`CHAT_FALLBACK`] so the conversation degrades
  /// politely rather than erroring.
  pub async fn chat(&self, history: &[ChatTurn], message: &str) -> String {
    match chatbot::try_chat(&self.model, history, message).await {
      Ok(reply) => reply,
      Err(e) => {
        tracing::warn!(error = %e, "chat turn failed; returning fallback reply");
        CHAT_FALLBACK.to_owned()
      }
    }
  }
}

#[cfg(test)]
mod tests;
