//! Subscription lifecycle: open, deliver, close.

use std::sync::Arc;

use skillswap_core::{
  UserId,
  notification::Notification,
  store::{ExchangeStore, StoreEvent},
};
use tokio::{
  sync::{broadcast, mpsc},
  task::JoinHandle,
};

use crate::views::{SwapBoardView, build_swap_board};

/// Delivery buffer per subscription. A slow consumer only ever delays its
/// own views; fresh views supersede stale ones anyway.
const VIEW_BUFFER: usize = 16;

/// A live subscription's close handle.
///
/// Closing — explicitly via [`close`](Self::close) or implicitly by drop —
/// stops delivery and releases the background task. A delivery racing the
/// close is discarded, never an error.
pub struct SubscriptionHandle {
  task: JoinHandle<()>,
}

impl SubscriptionHandle {
  pub fn close(self) {
    self.task.abort();
  }
}

impl Drop for SubscriptionHandle {
  fn drop(&mut self) {
    self.task.abort();
  }
}

/// Factory for live subscriptions over any [`ExchangeStore`].
pub struct LiveViews<S> {
  store: Arc<S>,
}

impl<S> Clone for LiveViews<S> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store) }
  }
}

impl<S: ExchangeStore + 'static> LiveViews<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  /// Open a live swap board for `user`.
  ///
  /// Delivers an initial snapshot, then a rebuilt board after every
  /// committed swap write involving the user and after profile writes for
  /// any counterpart currently on the board (their display identity may
  /// have changed).
  pub fn open_swap_board(
    &self,
    user: UserId,
  ) -> (mpsc::Receiver<SwapBoardView>, SubscriptionHandle) {
    let store = Arc::clone(&self.store);
    let (tx, rx) = mpsc::channel(VIEW_BUFFER);

    let task = tokio::spawn(async move {
      // Subscribe before the initial snapshot so no committed write falls
      // between snapshot and tail.
      let mut feed = store.subscribe();

      let mut counterparts: Vec<UserId> = Vec::new();
      if !deliver_board(store.as_ref(), &user, &tx, &mut counterparts).await {
        return;
      }

      loop {
        let relevant = match feed.recv().await {
          Ok(StoreEvent::SwapWritten(swap)) => {
            swap.involved_users().contains(&&user)
          }
          Ok(StoreEvent::ProfileWritten(id)) => counterparts.contains(&id),
          Ok(_) => false,
          // Fell behind the feed: resynchronise from the store.
          Err(broadcast::error::RecvError::Lagged(skipped)) => {
            tracing::debug!(user = %user, skipped, "swap feed lagged; rebuilding");
            true
          }
          Err(broadcast::error::RecvError::Closed) => break,
        };

        if relevant
          && !deliver_board(store.as_ref(), &user, &tx, &mut counterparts).await
        {
          break;
        }
      }
    });

    (rx, SubscriptionHandle { task })
  }

  /// Open a live notification feed for `user`: the full inbox, newest
  /// first, redelivered after every append or read-flag change for this
  /// recipient.
  pub fn open_notification_feed(
    &self,
    user: UserId,
  ) -> (mpsc::Receiver<Vec<Notification>>, SubscriptionHandle) {
    let store = Arc::clone(&self.store);
    let (tx, rx) = mpsc::channel(VIEW_BUFFER);

    let task = tokio::spawn(async move {
      let mut feed = store.subscribe();

      if !deliver_inbox(store.as_ref(), &user, &tx).await {
        return;
      }

      loop {
        let relevant = match feed.recv().await {
          Ok(StoreEvent::NotificationWritten(n)) => n.recipient_id == user,
          Ok(StoreEvent::NotificationsMarkedRead { recipient }) => {
            recipient == user
          }
          Ok(_) => false,
          Err(broadcast::error::RecvError::Lagged(skipped)) => {
            tracing::debug!(
              user = %user,
              skipped,
              "notification feed lagged; rebuilding"
            );
            true
          }
          Err(broadcast::error::RecvError::Closed) => break,
        };

        if relevant && !deliver_inbox(store.as_ref(), &user, &tx).await {
          break;
        }
      }
    });

    (rx, SubscriptionHandle { task })
  }
}

/// Build and send the board. Returns `false` when the subscriber is gone.
/// A transient store failure skips this delivery; the next relevant event
/// triggers another rebuild.
async fn deliver_board<S: ExchangeStore>(
  store: &S,
  user: &UserId,
  tx: &mpsc::Sender<SwapBoardView>,
  counterparts: &mut Vec<UserId>,
) -> bool {
  match build_swap_board(store, user).await {
    Ok(view) => {
      *counterparts = view.counterpart_ids();
      tx.send(view).await.is_ok()
    }
    Err(e) => {
      tracing::warn!(user = %user, error = %e, "failed to rebuild swap board");
      true
    }
  }
}

async fn deliver_inbox<S: ExchangeStore>(
  store: &S,
  user: &UserId,
  tx: &mpsc::Sender<Vec<Notification>>,
) -> bool {
  match store.list_notifications(user).await {
    Ok(inbox) => tx.send(inbox).await.is_ok(),
    Err(e) => {
      tracing::warn!(user = %user, error = %e, "failed to rebuild inbox");
      true
    }
  }
}
