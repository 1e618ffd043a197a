//! Skill autocomplete suggestions for a partial search query.

use crate::{Result, model::SkillModel, parse::schema_validated};

/// Suggestion cap, restated in the prompt and enforced on the output.
const MAX_SUGGESTIONS: usize = 5;

const AUTOCOMPLETE_PROMPT: &str = r#"You are a helpful AI assistant that provides skill autocomplete suggestions based on the user's query.

Provide a maximum of 5 skill suggestions that are relevant to the query. The suggestions should be suitable for inclusion in a skill search user interface, and can be skills that are similar or related to the query.

Respond with only a JSON array of strings, no other text.

Given the following query:
"#;

pub async fn try_autocomplete<M: SkillModel>(
  model: &M,
  query: &str,
) -> Result<Vec<String>> {
  let prompt = format!("{AUTOCOMPLETE_PROMPT}\"{query}\"");
  let completion = model.complete(&prompt).await?;
  let suggestions: Vec<String> = schema_validated(&completion)?;
  Ok(suggestions.into_iter().take(MAX_SUGGESTIONS).collect())
}
