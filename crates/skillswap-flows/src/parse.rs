//! Schema validation of model output.

use serde::de::DeserializeOwned;

use crate::Result;

/// Deserialize a model completion into `T`, tolerating the markdown code
/// fences chat models habitually wrap JSON in.
pub fn schema_validated<T: DeserializeOwned>(completion: &str) -> Result<T> {
  Ok(serde_json::from_str(strip_fences(completion))?)
}

fn strip_fences(text: &str) -> &str {
  let trimmed = text.trim();
  let Some(inner) = trimmed.strip_prefix("```") else {
    return trimmed;
  };
  // Drop an optional language tag ("json") after the opening fence.
  let inner = inner
    .strip_prefix("json")
    .unwrap_or(inner)
    .strip_suffix("```")
    .unwrap_or(inner);
  inner.trim()
}

#[cfg(test)]
mod tests {
  use serde::Deserialize;

  use super::schema_validated;

  #[derive(Deserialize)]
  struct Skills {
    skills: Vec<String>,
  }

  #[test]
  fn accepts_plain_json() {
    let parsed: Skills = schema_validated(r#"{"skills": ["Python"]}"#).unwrap();
    assert_eq!(parsed.skills, &["Python"]);
  }

  #[test]
  fn accepts_fenced_json() {
    let fenced = "```json\n{\"skills\": [\"Generative AI\", \"C++\"]}\n```";
    let parsed: Skills = schema_validated(fenced).unwrap();
    assert_eq!(parsed.skills, &["Generative AI", "C++"]);
  }

  #[test]
  fn rejects_prose() {
    let result: crate::Result<Skills> =
      schema_validated("Here are some skills you might like!");
    assert!(result.is_err());
  }
}
