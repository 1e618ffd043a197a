//! Single conversation turns with the platform assistant.

use serde::{Deserialize, Serialize};

use crate::{Result, model::SkillModel};

/// Who produced a turn in the conversation history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
  User,
  Model,
}

/// One prior turn of the conversation, oldest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
  pub role:    ChatRole,
  pub content: String,
}

/// Canned reply when the model cannot be reached; the conversation degrades
/// politely instead of surfacing an error.
pub const CHAT_FALLBACK: &str =
  "I'm sorry, I'm having trouble connecting. Please try again in a moment.";

const CHAT_PROMPT: &str = r#"You are a helpful and friendly assistant for the SkillSwap platform. Your name is 'SwapBot'.

Your goal is to assist users with their questions about the platform, help them find skills, or just have a pleasant conversation.
Keep your responses concise and helpful.

Here is the conversation history:
"#;

/// The reply is free text, not JSON; no schema validation applies.
pub async fn try_chat<M: SkillModel>(
  model: &M,
  history: &[ChatTurn],
  message: &str,
) -> Result<String> {
  let mut prompt = String::from(CHAT_PROMPT);
  for turn in history {
    let role = match turn.role {
      ChatRole::User => "user",
      ChatRole::Model => "model",
    };
    prompt.push_str(role);
    prompt.push_str(": ");
    prompt.push_str(&turn.content);
    prompt.push('\n');
  }
  prompt.push_str("user: ");
  prompt.push_str(message);
  prompt.push_str("\nmodel:");

  model.complete(&prompt).await
}
