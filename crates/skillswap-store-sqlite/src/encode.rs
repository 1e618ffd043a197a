//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. Skill lists and
//! availability tags are stored as compact JSON arrays. UUIDs are stored as
//! hyphenated lowercase strings.

use chrono::{DateTime, Utc};
use skillswap_core::{
  Error, Result, UserId,
  notification::{Notification, NotificationKind, NotificationPayload},
  profile::{RatingAggregate, UserProfile},
  swap::{SwapRequest, SwapStatus},
};
use uuid::Uuid;

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> {
  Uuid::parse_str(s).map_err(|e| corrupt(format!("bad uuid {s:?}: {e}")))
}

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| corrupt(format!("bad timestamp {s:?}: {e}")))
}

// ─── SwapStatus ──────────────────────────────────────────────────────────────

pub fn encode_status(s: SwapStatus) -> &'static str {
  match s {
    SwapStatus::Pending => "pending",
    SwapStatus::Accepted => "accepted",
    SwapStatus::Rejected => "rejected",
    SwapStatus::Cancelled => "cancelled",
    SwapStatus::Completed => "completed",
  }
}

pub fn decode_status(s: &str) -> Result<SwapStatus> {
  match s {
    "pending" => Ok(SwapStatus::Pending),
    "accepted" => Ok(SwapStatus::Accepted),
    "rejected" => Ok(SwapStatus::Rejected),
    "cancelled" => Ok(SwapStatus::Cancelled),
    "completed" => Ok(SwapStatus::Completed),
    other => Err(corrupt(format!("unknown swap status: {other:?}"))),
  }
}

// ─── NotificationKind ────────────────────────────────────────────────────────

pub fn encode_kind(k: NotificationKind) -> &'static str {
  match k {
    NotificationKind::SwapRequest => "swap_request",
    NotificationKind::SwapUpdate => "swap_update",
    NotificationKind::SystemMessage => "system_message",
  }
}

pub fn decode_kind(s: &str) -> Result<NotificationKind> {
  match s {
    "swap_request" => Ok(NotificationKind::SwapRequest),
    "swap_update" => Ok(NotificationKind::SwapUpdate),
    "system_message" => Ok(NotificationKind::SystemMessage),
    other => Err(corrupt(format!("unknown notification kind: {other:?}"))),
  }
}

// ─── String lists ────────────────────────────────────────────────────────────

pub fn encode_list(items: &[String]) -> Result<String> {
  Ok(serde_json::to_string(items)?)
}

pub fn decode_list(s: &str) -> Result<Vec<String>> {
  Ok(serde_json::from_str(s)?)
}

// ─── Errors ──────────────────────────────────────────────────────────────────

/// A value read back from the store failed to decode. Surfaced as a store
/// fault: the record exists but cannot be served.
fn corrupt(detail: String) -> Error { Error::StoreUnavailable(detail) }

/// Map a backend transport failure onto the shared taxonomy.
pub fn database(e: tokio_rusqlite::Error) -> Error {
  Error::StoreUnavailable(format!("database error: {e}"))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `profiles` row.
pub struct RawProfile {
  pub user_id:        String,
  pub name:           String,
  pub email:          Option<String>,
  pub location:       Option<String>,
  pub photo_url:      Option<String>,
  pub skills_offered: String,
  pub skills_wanted:  String,
  pub availability:   String,
  pub is_public:      bool,
  pub rating_average: f64,
  pub rating_count:   i64,
  pub created_at:     String,
}

impl RawProfile {
  pub fn into_profile(self) -> Result<UserProfile> {
    Ok(UserProfile {
      id:             UserId::new(self.user_id),
      name:           self.name,
      email:          self.email,
      location:       self.location,
      photo_url:      self.photo_url,
      skills_offered: decode_list(&self.skills_offered)?,
      skills_wanted:  decode_list(&self.skills_wanted)?,
      availability:   decode_list(&self.availability)?,
      is_public:      self.is_public,
      rating:         RatingAggregate {
        average: self.rating_average,
        count:   self.rating_count as u32,
      },
      created_at:     decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `swaps` row.
pub struct RawSwap {
  pub swap_id:         String,
  pub requester_id:    String,
  pub target_id:       String,
  pub offered_skill:   String,
  pub requested_skill: String,
  pub message:         Option<String>,
  pub status:          String,
  pub created_at:      String,
}

impl RawSwap {
  pub fn into_swap(self) -> Result<SwapRequest> {
    Ok(SwapRequest {
      swap_id:         decode_uuid(&self.swap_id)?,
      requester_id:    UserId::new(self.requester_id),
      target_id:       UserId::new(self.target_id),
      offered_skill:   self.offered_skill,
      requested_skill: self.requested_skill,
      message:         self.message,
      status:          decode_status(&self.status)?,
      created_at:      decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `notifications` row.
pub struct RawNotification {
  pub notification_id: String,
  pub recipient_id:    String,
  pub kind:            String,
  pub message:         String,
  pub link:            Option<String>,
  pub read:            bool,
  pub created_at:      String,
}

impl RawNotification {
  pub fn into_notification(self) -> Result<Notification> {
    Ok(Notification {
      notification_id: decode_uuid(&self.notification_id)?,
      recipient_id:    UserId::new(self.recipient_id),
      kind:            decode_kind(&self.kind)?,
      payload:         NotificationPayload {
        message: self.message,
        link:    self.link,
      },
      read:            self.read,
      created_at:      decode_dt(&self.created_at)?,
    })
  }
}
