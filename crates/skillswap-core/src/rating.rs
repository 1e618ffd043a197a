//! Rating entries and the duplicate-rater policy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result, profile::UserId};

/// Whether one user may rate the same target more than once.
///
/// Resolved inside the same atomic unit as the aggregate update, so a repeat
/// rating can never half-apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingPolicy {
  /// Repeat ratings fold into the aggregate like any other.
  #[default]
  AllowRepeat,
  /// A second rating from the same rater fails with
  /// [`Error::DuplicateRating`].
  RejectRepeat,
}

/// An append-only record of one submitted rating.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingEntry {
  pub rating_id:  Uuid,
  pub rater_id:   UserId,
  pub target_id:  UserId,
  pub stars:      u8,
  pub created_at: DateTime<Utc>,
}

/// Check that a star value is in the accepted `1..=5` range.
pub fn validate_stars(stars: u8) -> Result<()> {
  if (1..=5).contains(&stars) {
    Ok(())
  } else {
    Err(Error::InvalidStars(stars))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn stars_must_be_one_through_five() {
    assert!(validate_stars(1).is_ok());
    assert!(validate_stars(5).is_ok());
    assert!(matches!(validate_stars(0).unwrap_err(), Error::InvalidStars(0)));
    assert!(matches!(validate_stars(6).unwrap_err(), Error::InvalidStars(6)));
  }
}
