//! Flow tests against a canned stub model.

use crate::{
  CHAT_FALLBACK, ChatRole, ChatTurn, Error, Flows, Result, SuggestionContext,
  model::{ChatCompletionsModel, SkillModel},
};

/// Returns a fixed completion, or a fixed failure.
struct StubModel {
  response: Result<&'static str, &'static str>,
}

impl StubModel {
  fn ok(response: &'static str) -> Self {
    Self { response: Ok(response) }
  }

  fn failing() -> Self {
    Self { response: Err("model offline") }
  }
}

impl SkillModel for StubModel {
  async fn complete(&self, _prompt: &str) -> crate::Result<String> {
    match self.response {
      Ok(text) => Ok(text.to_owned()),
      Err(_) => Err(Error::Status(503)),
    }
  }
}

#[tokio::test]
async fn extract_parses_schema_valid_output() {
  let flows = Flows::new(StubModel::ok(
    r#"{"skills": ["Generative AI", "Deep Learning"]}"#,
  ));
  let skills = flows.extract_skills("find me AI people").await;
  assert_eq!(skills, &["Generative AI", "Deep Learning"]);
}

#[tokio::test]
async fn extract_tolerates_fenced_output() {
  let flows =
    Flows::new(StubModel::ok("```json\n{\"skills\": [\"C++\"]}\n```"));
  let skills = flows.extract_skills("c++").await;
  assert_eq!(skills, &["C++"]);
}

#[tokio::test]
async fn extract_falls_back_to_empty_on_model_failure() {
  let flows = Flows::new(StubModel::failing());
  assert!(flows.extract_skills("python").await.is_empty());
}

#[tokio::test]
async fn extract_falls_back_to_empty_on_schema_mismatch() {
  let flows = Flows::new(StubModel::ok("I suggest learning Python!"));
  assert!(flows.extract_skills("python").await.is_empty());
}

#[tokio::test]
async fn suggest_parses_schema_valid_output() {
  let flows = Flows::new(StubModel::ok(
    r#"{"suggested_skills": ["Photography", "Video Editing"]}"#,
  ));
  let context = SuggestionContext {
    profile_summary: "Offers: Photography. Wants: Spanish.".into(),
    swap_history:    "1 accepted swap".into(),
    trending_skills: "Video Editing, Rust".into(),
  };
  let skills = flows.suggest_skills(&context).await;
  assert_eq!(skills, &["Photography", "Video Editing"]);
}

#[tokio::test]
async fn suggest_falls_back_to_empty_on_failure() {
  let flows = Flows::new(StubModel::failing());
  assert!(
    flows
      .suggest_skills(&SuggestionContext::default())
      .await
      .is_empty()
  );
}

#[tokio::test]
async fn autocomplete_parses_a_bare_array() {
  let flows = Flows::new(StubModel::ok(r#"["Guitar", "Guitar Repair"]"#));
  let suggestions = flows.autocomplete_skills("guit").await;
  assert_eq!(suggestions, &["Guitar", "Guitar Repair"]);
}

#[tokio::test]
async fn autocomplete_caps_suggestions_at_five() {
  let flows = Flows::new(StubModel::ok(
    r#"["A", "B", "C", "D", "E", "F", "G"]"#,
  ));
  assert_eq!(flows.autocomplete_skills("a").await.len(), 5);
}

#[tokio::test]
async fn autocomplete_falls_back_to_empty_on_failure() {
  let flows = Flows::new(StubModel::failing());
  assert!(flows.autocomplete_skills("rust").await.is_empty());
}

/// Echoes the prompt back, so the rendered conversation can be inspected.
struct EchoModel;

impl SkillModel for EchoModel {
  async fn complete(&self, prompt: &str) -> crate::Result<String> {
    Ok(prompt.to_owned())
  }
}

#[tokio::test]
async fn chat_renders_history_then_the_new_message() {
  let flows = Flows::new(EchoModel);
  let history = [
    ChatTurn {
      role:    ChatRole::User,
      content: "hi".into(),
    },
    ChatTurn {
      role:    ChatRole::Model,
      content: "hello!".into(),
    },
  ];

  let prompt = flows.chat(&history, "find me a guitar teacher").await;
  let history_at = prompt.find("user: hi\nmodel: hello!\n").unwrap();
  let message_at = prompt
    .find("user: find me a guitar teacher\nmodel:")
    .unwrap();
  assert!(history_at < message_at);
}

#[tokio::test]
async fn chat_falls_back_to_the_canned_reply_on_failure() {
  let flows = Flows::new(StubModel::failing());
  assert_eq!(flows.chat(&[], "hello").await, CHAT_FALLBACK);
}

#[test]
fn chat_completions_client_builds() {
  assert!(ChatCompletionsModel::new("http://localhost:0", "key", "model").is_ok());
}
