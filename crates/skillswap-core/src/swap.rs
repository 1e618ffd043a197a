//! Swap requests and their status state machine.
//!
//! A swap is a bartered exchange proposal between two users, each offering
//! one skill and requesting another. Swaps are never deleted; history is
//! status-filtered, not erased.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result, profile::UserId};

// ─── Status ──────────────────────────────────────────────────────────────────

/// The lifecycle status of a swap request.
///
/// ```text
/// pending ──▶ accepted
///        ├──▶ rejected
///        └──▶ cancelled
/// ```
///
/// `Completed` is a reserved terminal state: stored records may carry it, but
/// no operation currently produces it. The trigger for completion (user
/// action, timeout, inference) is an open extension point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwapStatus {
  Pending,
  Accepted,
  Rejected,
  Cancelled,
  Completed,
}

impl SwapStatus {
  pub fn is_pending(self) -> bool { matches!(self, Self::Pending) }
}

impl fmt::Display for SwapStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      Self::Pending => "pending",
      Self::Accepted => "accepted",
      Self::Rejected => "rejected",
      Self::Cancelled => "cancelled",
      Self::Completed => "completed",
    };
    f.write_str(s)
  }
}

// ─── Participant role ────────────────────────────────────────────────────────

/// Which side of a swap a user is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
  Requester,
  Target,
}

// ─── SwapRequest ─────────────────────────────────────────────────────────────

/// A persisted swap request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapRequest {
  pub swap_id:         Uuid,
  pub requester_id:    UserId,
  pub target_id:       UserId,
  pub offered_skill:   String,
  pub requested_skill: String,
  pub message:         Option<String>,
  pub status:          SwapStatus,
  /// Server-assigned timestamp; never changes after creation.
  pub created_at:      DateTime<Utc>,
}

impl SwapRequest {
  /// The denormalized participant pair, for membership queries.
  pub fn involved_users(&self) -> [&UserId; 2] {
    [&self.requester_id, &self.target_id]
  }

  pub fn role_of(&self, user: &UserId) -> Option<Role> {
    if *user == self.requester_id {
      Some(Role::Requester)
    } else if *user == self.target_id {
      Some(Role::Target)
    } else {
      None
    }
  }

  /// The other participant, from `user`'s perspective.
  pub fn counterpart_of(&self, user: &UserId) -> Option<&UserId> {
    match self.role_of(user)? {
      Role::Requester => Some(&self.target_id),
      Role::Target => Some(&self.requester_id),
    }
  }

  /// Check that `actor` may move this swap to `to`.
  ///
  /// Only a `pending` swap can move: the target may accept or reject it, the
  /// requester may cancel it. A non-participant, or the wrong participant
  /// for the requested status, fails [`Error::Unauthorized`]; any other
  /// combination fails [`Error::IllegalTransition`].
  pub fn validate_transition(&self, actor: &UserId, to: SwapStatus) -> Result<()> {
    let role = self.role_of(actor).ok_or_else(|| Error::Unauthorized {
      actor: actor.clone(),
    })?;

    if !self.status.is_pending() {
      return Err(Error::IllegalTransition {
        swap: self.swap_id,
        from: self.status,
        to,
      });
    }

    match (role, to) {
      (Role::Target, SwapStatus::Accepted | SwapStatus::Rejected) => Ok(()),
      (Role::Requester, SwapStatus::Cancelled) => Ok(()),
      // The right kind of edge, attempted from the wrong side.
      (_, SwapStatus::Accepted | SwapStatus::Rejected | SwapStatus::Cancelled) => {
        Err(Error::Unauthorized { actor: actor.clone() })
      }
      // No edge into `pending` or `completed` exists.
      (_, SwapStatus::Pending | SwapStatus::Completed) => {
        Err(Error::IllegalTransition {
          swap: self.swap_id,
          from: self.status,
          to,
        })
      }
    }
  }
}

// ─── NewSwap ─────────────────────────────────────────────────────────────────

/// Input to [`SwapLedger::create_swap`](crate::ledger::SwapLedger::create_swap).
/// `created_at` is always set by the store; it is not accepted from callers.
#[derive(Debug, Clone, Deserialize)]
pub struct NewSwap {
  pub requester_id:    UserId,
  pub target_id:       UserId,
  pub offered_skill:   String,
  pub requested_skill: String,
  pub message:         Option<String>,
}

impl NewSwap {
  pub fn validate(&self) -> Result<()> {
    if self.requester_id == self.target_id {
      return Err(Error::SelfSwap);
    }
    if self.offered_skill.trim().is_empty() || self.requested_skill.trim().is_empty() {
      return Err(Error::EmptySkill);
    }
    Ok(())
  }
}

// ─── SwapBoard ───────────────────────────────────────────────────────────────

/// A user's swaps, partitioned the way the swaps screen presents them.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SwapBoard {
  /// Pending swaps where the user is the target.
  pub incoming: Vec<SwapRequest>,
  /// Pending swaps where the user is the requester.
  pub outgoing: Vec<SwapRequest>,
  /// Everything non-pending, newest first.
  pub history:  Vec<SwapRequest>,
}

impl SwapBoard {
  /// Partition `swaps` from `user`'s perspective. Swaps not involving the
  /// user are dropped.
  pub fn partition(user: &UserId, swaps: Vec<SwapRequest>) -> Self {
    let mut board = Self::default();
    for swap in swaps {
      match (swap.role_of(user), swap.status.is_pending()) {
        (Some(Role::Target), true) => board.incoming.push(swap),
        (Some(Role::Requester), true) => board.outgoing.push(swap),
        (Some(_), false) => board.history.push(swap),
        (None, _) => {}
      }
    }
    board.history.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    board
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
