//! User profiles — the public record each user curates about themselves.
//!
//! A profile is mutated only by its owner, with one exception: the rating
//! aggregate, which is updated on behalf of other users through the
//! [`RatingAggregator`](crate::aggregator::RatingAggregator).

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─── UserId ──────────────────────────────────────────────────────────────────

/// An opaque, externally issued user identifier.
///
/// The authentication collaborator mints these; the core never parses or
/// generates them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
  pub fn new(id: impl Into<String>) -> Self { Self(id.into()) }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for UserId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for UserId {
  fn from(s: &str) -> Self { Self(s.to_owned()) }
}

impl From<String> for UserId {
  fn from(s: String) -> Self { Self(s) }
}

// ─── Rating aggregate ────────────────────────────────────────────────────────

/// The running mean and count of star ratings a user has received.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RatingAggregate {
  pub average: f64,
  pub count:   u32,
}

impl RatingAggregate {
  /// Fold one more star rating into the aggregate.
  ///
  /// `average` stays the arithmetic mean of every rating folded in so far.
  /// Backends must apply this inside a single atomic read-modify-write
  /// against the stored aggregate; see
  /// [`ExchangeStore::apply_rating`](crate::store::ExchangeStore::apply_rating).
  pub fn record(self, stars: u8) -> Self {
    let count = self.count + 1;
    let average =
      (self.average * f64::from(self.count) + f64::from(stars)) / f64::from(count);
    Self { average, count }
  }
}

// ─── UserProfile ─────────────────────────────────────────────────────────────

/// A user's public profile record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
  pub id:             UserId,
  pub name:           String,
  pub email:          Option<String>,
  pub location:       Option<String>,
  pub photo_url:      Option<String>,
  /// Skill names the user offers. Unordered set semantics, case-sensitive.
  pub skills_offered: Vec<String>,
  /// Skill names the user wants to learn.
  pub skills_wanted:  Vec<String>,
  /// Free-form availability tags, e.g. "weekends", "evenings".
  pub availability:   Vec<String>,
  pub is_public:      bool,
  pub rating:         RatingAggregate,
  pub created_at:     DateTime<Utc>,
}

// ─── NewProfile ──────────────────────────────────────────────────────────────

/// Input to [`ExchangeStore::create_profile`](crate::store::ExchangeStore::create_profile).
///
/// Created at signup: skill lists start empty, the rating aggregate starts
/// zeroed, and `created_at` is set by the store.
#[derive(Debug, Clone)]
pub struct NewProfile {
  pub id:    UserId,
  pub name:  String,
  pub email: Option<String>,
}

// ─── ProfilePatch ────────────────────────────────────────────────────────────

/// An owner-only merge-write against a profile. `None` fields are left
/// unchanged. The rating aggregate is deliberately absent — it is only ever
/// mutated through the aggregator.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfilePatch {
  pub name:           Option<String>,
  pub location:       Option<String>,
  pub photo_url:      Option<String>,
  pub skills_offered: Option<Vec<String>>,
  pub skills_wanted:  Option<Vec<String>>,
  pub availability:   Option<Vec<String>>,
  pub is_public:      Option<bool>,
}

#[cfg(test)]
mod tests {
  use super::RatingAggregate;

  #[test]
  fn record_from_zero() {
    let agg = RatingAggregate::default().record(4);
    assert_eq!(agg.count, 1);
    assert!((agg.average - 4.0).abs() < f64::EPSILON);
  }

  #[test]
  fn record_keeps_arithmetic_mean() {
    let agg = RatingAggregate::default().record(5).record(3).record(4);
    assert_eq!(agg.count, 3);
    assert!((agg.average - 4.0).abs() < f64::EPSILON);
  }

  #[test]
  fn zero_count_means_zero_average() {
    let agg = RatingAggregate::default();
    assert_eq!(agg.count, 0);
    assert_eq!(agg.average, 0.0);
  }
}
