//! Error taxonomy for the exchange core.
//!
//! Every component surfaces typed failures to its caller; none retries
//! internally. A failed mutation leaves no partial state behind.

use thiserror::Error;
use uuid::Uuid;

use crate::{profile::UserId, swap::SwapStatus};

#[derive(Debug, Error)]
pub enum Error {
  #[error("profile not found: {0}")]
  ProfileNotFound(UserId),

  #[error("swap not found: {0}")]
  SwapNotFound(Uuid),

  #[error("notification not found: {0}")]
  NotificationNotFound(Uuid),

  /// The requested status change has no edge in the swap state machine.
  #[error("illegal transition for swap {swap}: {from} -> {to}")]
  IllegalTransition {
    swap: Uuid,
    from: SwapStatus,
    to:   SwapStatus,
  },

  /// The actor is not permitted to perform the requested mutation.
  #[error("user {actor} is not authorized for this action")]
  Unauthorized { actor: UserId },

  #[error("a swap must involve two distinct users")]
  SelfSwap,

  #[error("offered and requested skills must be non-empty")]
  EmptySkill,

  #[error("star rating must be between 1 and 5, got {0}")]
  InvalidStars(u8),

  /// Raised only under [`RatingPolicy::RejectRepeat`](crate::rating::RatingPolicy).
  #[error("user {rater} has already rated {target}")]
  DuplicateRating { rater: UserId, target: UserId },

  /// Transient infrastructure failure. The caller decides whether to retry.
  #[error("store unavailable: {0}")]
  StoreUnavailable(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
