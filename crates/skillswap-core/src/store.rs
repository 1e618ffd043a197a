//! The `ExchangeStore` trait and the store change feed.
//!
//! The trait is implemented by storage backends (e.g.
//! `skillswap-store-sqlite`). Higher layers (the ledger, aggregator, emitter,
//! live views, and the HTTP API) depend on this abstraction, not on any
//! concrete backend.
//!
//! All methods return `Send` futures so the trait can be used in
//! multi-threaded async runtimes (e.g. tokio with `axum`). Backends surface
//! the shared error taxonomy directly: infrastructure faults map to
//! [`Error::StoreUnavailable`](crate::Error::StoreUnavailable).

use std::future::Future;

use tokio::sync::broadcast;
use uuid::Uuid;

use crate::{
  Result,
  notification::{NewNotification, Notification},
  profile::{NewProfile, ProfilePatch, RatingAggregate, UserId, UserProfile},
  rating::RatingPolicy,
  swap::{NewSwap, SwapRequest, SwapStatus},
};

// ─── Change feed ─────────────────────────────────────────────────────────────

/// A committed write, published on the store's broadcast feed.
///
/// Events for a single record are published in commit order; no ordering is
/// guaranteed across records. Subscribers that fall behind see
/// [`broadcast::error::RecvError::Lagged`] and must resynchronise by
/// re-reading the store.
#[derive(Debug, Clone)]
pub enum StoreEvent {
  /// A swap was created or its status changed.
  SwapWritten(SwapRequest),
  /// A notification was appended.
  NotificationWritten(Notification),
  /// One or more of a recipient's notifications were marked read.
  NotificationsMarkedRead { recipient: UserId },
  /// A profile was created or patched (rating updates included).
  ProfileWritten(UserId),
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over an exchange store backend.
///
/// Swap and notification writes are append-only apart from the narrow
/// mutations the domain defines (swap status, notification read flag). The
/// rating aggregate is the only field mutated on behalf of non-owners, and
/// only via [`apply_rating`](ExchangeStore::apply_rating).
pub trait ExchangeStore: Send + Sync {
  // ── Profiles ──────────────────────────────────────────────────────────

  /// Create a profile at signup: empty skill lists, zeroed rating,
  /// store-assigned `created_at`.
  fn create_profile(
    &self,
    input: NewProfile,
  ) -> impl Future<Output = Result<UserProfile>> + Send + '_;

  /// Point read. Returns `None` if not found.
  fn get_profile<'a>(
    &'a self,
    id: &'a UserId,
  ) -> impl Future<Output = Result<Option<UserProfile>>> + Send + 'a;

  /// Owner-only merge-write. `None` patch fields are left unchanged.
  /// The rating aggregate cannot be touched through this path.
  fn update_profile<'a>(
    &'a self,
    id: &'a UserId,
    patch: ProfilePatch,
  ) -> impl Future<Output = Result<UserProfile>> + Send + 'a;

  /// All profiles with the public-visibility flag set.
  fn list_public_profiles(
    &self,
  ) -> impl Future<Output = Result<Vec<UserProfile>>> + Send + '_;

  /// Public profiles offering any of `skills`, compared case-insensitively
  /// against each profile's offered list.
  fn search_offering<'a>(
    &'a self,
    skills: &'a [String],
  ) -> impl Future<Output = Result<Vec<UserProfile>>> + Send + 'a;

  /// Fold `stars` into the target's rating aggregate as a single atomic
  /// read-modify-write, recording the rating entry and enforcing `policy`
  /// inside the same atomic unit.
  ///
  /// Under N concurrent calls against one target, all N land exactly once
  /// in some serial order. Fails [`Error::ProfileNotFound`] without change
  /// if the target does not exist.
  ///
  /// [`Error::ProfileNotFound`]: crate::Error::ProfileNotFound
  fn apply_rating<'a>(
    &'a self,
    rater: &'a UserId,
    target: &'a UserId,
    stars: u8,
    policy: RatingPolicy,
  ) -> impl Future<Output = Result<RatingAggregate>> + Send + 'a;

  // ── Swaps ─────────────────────────────────────────────────────────────

  /// Persist a new swap in state `pending` with a store-assigned timestamp.
  /// Input validation is the ledger's job; backends store what they are
  /// given.
  fn insert_swap(
    &self,
    input: NewSwap,
  ) -> impl Future<Output = Result<SwapRequest>> + Send + '_;

  /// Point read. Returns `None` if not found.
  fn get_swap(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<SwapRequest>>> + Send + '_;

  /// Compare-and-set the swap's status: succeeds only while the stored
  /// status is still `expected_from`, otherwise fails
  /// [`Error::IllegalTransition`] with the actual stored status. This is
  /// what rejects a transition that lost the race to the other participant.
  ///
  /// [`Error::IllegalTransition`]: crate::Error::IllegalTransition
  fn set_swap_status(
    &self,
    id: Uuid,
    expected_from: SwapStatus,
    to: SwapStatus,
  ) -> impl Future<Output = Result<SwapRequest>> + Send + '_;

  /// All swaps where the user is requester or target, any status.
  fn list_involving<'a>(
    &'a self,
    user: &'a UserId,
  ) -> impl Future<Output = Result<Vec<SwapRequest>>> + Send + 'a;

  // ── Notifications ─────────────────────────────────────────────────────

  /// Pure append. Notifications start unread.
  fn insert_notification(
    &self,
    input: NewNotification,
  ) -> impl Future<Output = Result<Notification>> + Send + '_;

  /// All of a recipient's notifications, newest first.
  fn list_notifications<'a>(
    &'a self,
    recipient: &'a UserId,
  ) -> impl Future<Output = Result<Vec<Notification>>> + Send + 'a;

  /// Set `read = true`. Idempotent: marking an already-read notification is
  /// a no-op, not an error. Fails [`Error::NotificationNotFound`] if the
  /// record is absent.
  ///
  /// [`Error::NotificationNotFound`]: crate::Error::NotificationNotFound
  fn mark_read(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Notification>> + Send + '_;

  /// Mark all of a recipient's unread notifications read in one batch.
  /// Returns how many records changed; zero is not an error.
  fn mark_all_read<'a>(
    &'a self,
    recipient: &'a UserId,
  ) -> impl Future<Output = Result<usize>> + Send + 'a;

  // ── Change feed ───────────────────────────────────────────────────────

  /// Subscribe to committed writes. Each receiver sees every event
  /// published after the call, subject to the broadcast channel's lag
  /// semantics.
  fn subscribe(&self) -> broadcast::Receiver<StoreEvent>;
}
