//! Skill extraction from free-text search queries.

use serde::Deserialize;

use crate::{Result, model::SkillModel, parse::schema_validated};

/// Fixed prompt for turning a search query into structured skill names.
pub const EXTRACT_SYSTEM_PROMPT: &str = r#"You are an expert at parsing user search queries on a skill-swapping platform.
Your task is to extract the names of professional skills from the user's query.

- The user is searching for people who are offering skills.
- If the query is already a skill (e.g., "Python", "Graphic Design"), return that skill directly.
- If multiple skills are mentioned (e.g., separated by 'or', 'and', or commas), extract all of them.
- Return the skills as a JSON object with a "skills" key containing an array of strings.
- Capitalize the first letter of each word in the skill name (e.g., "generative ai" becomes "Generative AI").
- For programming languages with special characters like "C++" or "C#", preserve their original casing and format.
- If the query does not seem to contain a specific skill, interpret the user's intent and provide the most likely skill they are looking for. If you cannot determine a skill, return an empty array.

Respond with only the JSON object, no other text.

Now convert the following user query:
"#;

#[derive(Debug, Deserialize)]
struct ExtractOutput {
  skills: Vec<String>,
}

pub async fn try_extract<M: SkillModel>(model: &M, query: &str) -> Result<Vec<String>> {
  let prompt = format!("{EXTRACT_SYSTEM_PROMPT}\"{query}\"");
  let completion = model.complete(&prompt).await?;
  let output: ExtractOutput = schema_validated(&completion)?;
  Ok(output.skills)
}
