//! The swap ledger — creates swaps and enforces status transitions.
//!
//! The ledger takes its store capability explicitly at construction; there is
//! no ambient global handle. It never retries: a rejected transition leaves
//! the caller to re-fetch and re-decide.

use std::sync::Arc;

use uuid::Uuid;

use crate::{
  Error, Result,
  notification::{NewNotification, NotificationKind},
  profile::UserId,
  store::ExchangeStore,
  swap::{NewSwap, SwapBoard, SwapRequest, SwapStatus},
};

/// Display-name placeholder when the requester's profile is missing.
const UNKNOWN_REQUESTER: &str = "A user";

pub struct SwapLedger<S> {
  store: Arc<S>,
}

impl<S> Clone for SwapLedger<S> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store) }
  }
}

impl<S: ExchangeStore> SwapLedger<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  /// Create a swap in state `pending` and notify the target.
  ///
  /// Requires `requester != target` and non-empty skills. Emits exactly one
  /// `swap_request` notification addressed to the target, using the
  /// requester's display name (or a placeholder when their profile is
  /// missing).
  pub async fn create_swap(&self, input: NewSwap) -> Result<SwapRequest> {
    input.validate()?;

    let requester_name = self
      .store
      .get_profile(&input.requester_id)
      .await?
      .map(|p| p.name)
      .unwrap_or_else(|| UNKNOWN_REQUESTER.to_owned());

    let swap = self.store.insert_swap(input).await?;

    self
      .store
      .insert_notification(NewNotification::new(
        swap.target_id.clone(),
        NotificationKind::SwapRequest,
        format!("{requester_name} sent you a swap request."),
        Some("/swaps".to_owned()),
      ))
      .await?;

    Ok(swap)
  }

  /// Move a pending swap to `to` on behalf of `actor`.
  ///
  /// Legal only for target → accepted/rejected and requester → cancelled;
  /// see [`SwapRequest::validate_transition`]. The write is a compare-and-set
  /// against `pending`, so a transition that lost the race to the other
  /// participant fails [`Error::IllegalTransition`] instead of overwriting.
  ///
  /// Transitions do not emit notifications; both parties observe the change
  /// through their live subscriptions.
  pub async fn transition(
    &self,
    swap_id: Uuid,
    actor: &UserId,
    to: SwapStatus,
  ) -> Result<SwapRequest> {
    let swap = self
      .store
      .get_swap(swap_id)
      .await?
      .ok_or(Error::SwapNotFound(swap_id))?;

    swap.validate_transition(actor, to)?;

    self.store.set_swap_status(swap_id, SwapStatus::Pending, to).await
  }

  /// Every swap involving `user`, partitioned into
  /// incoming-pending / outgoing-pending / history.
  pub async fn board_for(&self, user: &UserId) -> Result<SwapBoard> {
    let swaps = self.store.list_involving(user).await?;
    Ok(SwapBoard::partition(user, swaps))
  }
}
