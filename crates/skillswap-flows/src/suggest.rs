//! Skill suggestions from profile and history context.

use serde::Deserialize;

use crate::{Result, model::SkillModel, parse::schema_validated};

/// The context a suggestion is computed from. All fields are free-text
/// summaries prepared by the caller.
#[derive(Debug, Clone, Default)]
pub struct SuggestionContext {
  pub profile_summary: String,
  pub swap_history:    String,
  pub trending_skills: String,
}

const SUGGEST_PROMPT: &str = r#"You are a skill suggestion expert. You will suggest skills to the user based on their profile content, swap history, and trending skills.

Please suggest skills that the user might want to offer, so they can easily expand their profile and increase their chances of finding a relevant swap.

Ensure the suggested skills are relevant to the user's profile and swap history. Consider skills that are currently trending and in demand.

Respond with only a JSON object of the form {"suggested_skills": ["...", "..."]}, no other text.
"#;

#[derive(Debug, Deserialize)]
struct SuggestOutput {
  suggested_skills: Vec<String>,
}

pub async fn try_suggest<M: SkillModel>(
  model: &M,
  context: &SuggestionContext,
) -> Result<Vec<String>> {
  let prompt = format!(
    "{SUGGEST_PROMPT}\nUser Profile Content: {}\n\nSwap History: {}\n\nTrending Skills: {}\n",
    context.profile_summary, context.swap_history, context.trending_skills,
  );
  let completion = model.complete(&prompt).await?;
  let output: SuggestOutput = schema_validated(&completion)?;
  Ok(output.suggested_skills)
}
