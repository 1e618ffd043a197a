//! The notification emitter — append notifications, flip read flags.

use std::sync::Arc;

use uuid::Uuid;

use crate::{
  Result,
  notification::{NewNotification, Notification, NotificationKind},
  profile::UserId,
  store::ExchangeStore,
};

pub struct NotificationEmitter<S> {
  store: Arc<S>,
}

impl<S> Clone for NotificationEmitter<S> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store) }
  }
}

impl<S: ExchangeStore> NotificationEmitter<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  /// Append a notification. Fails only if the underlying store is
  /// unreachable; the caller decides whether to retry.
  pub async fn emit(
    &self,
    recipient: UserId,
    kind: NotificationKind,
    message: impl Into<String>,
    link: Option<String>,
  ) -> Result<Notification> {
    self
      .store
      .insert_notification(NewNotification::new(recipient, kind, message, link))
      .await
  }

  /// A recipient's notifications, newest first.
  pub async fn list_for(&self, recipient: &UserId) -> Result<Vec<Notification>> {
    self.store.list_notifications(recipient).await
  }

  /// Mark one notification read. Idempotent.
  pub async fn mark_read(&self, id: Uuid) -> Result<Notification> {
    self.store.mark_read(id).await
  }

  /// Mark all of a recipient's notifications read. Idempotent; returns how
  /// many records actually changed.
  pub async fn mark_all_read(&self, recipient: &UserId) -> Result<usize> {
    self.store.mark_all_read(recipient).await
  }
}
