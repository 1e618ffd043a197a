//! Notification records.
//!
//! Notifications are append-only: once created, only the `read` flag may
//! change, and only from `false` to `true`. They are never deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::profile::UserId;

/// What kind of event a notification reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
  SwapRequest,
  SwapUpdate,
  SystemMessage,
}

/// The user-facing content of a notification. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPayload {
  pub message: String,
  pub link:    Option<String>,
}

/// A persisted notification, owned by its recipient for read-state purposes
/// only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
  pub notification_id: Uuid,
  pub recipient_id:    UserId,
  pub kind:            NotificationKind,
  pub payload:         NotificationPayload,
  pub read:            bool,
  pub created_at:      DateTime<Utc>,
}

/// Input to [`ExchangeStore::insert_notification`](crate::store::ExchangeStore::insert_notification).
/// Always starts unread; `created_at` is set by the store.
#[derive(Debug, Clone)]
pub struct NewNotification {
  pub recipient_id: UserId,
  pub kind:         NotificationKind,
  pub payload:      NotificationPayload,
}

impl NewNotification {
  pub fn new(
    recipient_id: UserId,
    kind: NotificationKind,
    message: impl Into<String>,
    link: Option<String>,
  ) -> Self {
    Self {
      recipient_id,
      kind,
      payload: NotificationPayload { message: message.into(), link },
    }
  }
}
