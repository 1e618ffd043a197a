//! Integration tests for `SqliteStore` against an in-memory database.

use std::sync::Arc;

use skillswap_core::{
  Error,
  aggregator::RatingAggregator,
  emitter::NotificationEmitter,
  ledger::SwapLedger,
  notification::NotificationKind,
  profile::{NewProfile, ProfilePatch, UserId},
  rating::RatingPolicy,
  store::{ExchangeStore, StoreEvent},
  swap::{NewSwap, SwapStatus},
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> Arc<SqliteStore> {
  Arc::new(
    SqliteStore::open_in_memory()
      .await
      .expect("in-memory store"),
  )
}

async fn signup(s: &SqliteStore, id: &str, name: &str) -> UserId {
  let profile = s
    .create_profile(NewProfile {
      id:    id.into(),
      name:  name.into(),
      email: None,
    })
    .await
    .unwrap();
  profile.id
}

fn guitar_for_spanish(requester: &UserId, target: &UserId) -> NewSwap {
  NewSwap {
    requester_id:    requester.clone(),
    target_id:       target.clone(),
    offered_skill:   "Guitar".into(),
    requested_skill: "Spanish".into(),
    message:         Some("Weekly session?".into()),
  }
}

// ─── Profiles ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_profile() {
  let s = store().await;
  let alice = signup(&s, "alice", "Alice").await;

  let fetched = s.get_profile(&alice).await.unwrap().unwrap();
  assert_eq!(fetched.name, "Alice");
  assert!(fetched.skills_offered.is_empty());
  assert!(fetched.is_public);
  assert_eq!(fetched.rating.count, 0);
  assert_eq!(fetched.rating.average, 0.0);
}

#[tokio::test]
async fn get_profile_missing_returns_none() {
  let s = store().await;
  let result = s.get_profile(&"ghost".into()).await.unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn patch_merges_and_preserves_untouched_fields() {
  let s = store().await;
  let alice = signup(&s, "alice", "Alice").await;

  s.update_profile(&alice, ProfilePatch {
    location: Some("Lisbon".into()),
    skills_offered: Some(vec!["Guitar".into(), "Photography".into()]),
    ..Default::default()
  })
  .await
  .unwrap();

  let updated = s
    .update_profile(&alice, ProfilePatch {
      skills_wanted: Some(vec!["Spanish".into()]),
      ..Default::default()
    })
    .await
    .unwrap();

  assert_eq!(updated.name, "Alice");
  assert_eq!(updated.location.as_deref(), Some("Lisbon"));
  assert_eq!(updated.skills_offered, &["Guitar", "Photography"]);
  assert_eq!(updated.skills_wanted, &["Spanish"]);
}

#[tokio::test]
async fn patch_missing_profile_errors() {
  let s = store().await;
  let err = s
    .update_profile(&"ghost".into(), ProfilePatch::default())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::ProfileNotFound(_)));
}

#[tokio::test]
async fn search_matches_offered_skills_case_insensitively() {
  let s = store().await;
  let alice = signup(&s, "alice", "Alice").await;
  let bob = signup(&s, "bob", "Bob").await;
  signup(&s, "carol", "Carol").await;

  s.update_profile(&alice, ProfilePatch {
    skills_offered: Some(vec!["Generative AI".into()]),
    ..Default::default()
  })
  .await
  .unwrap();
  s.update_profile(&bob, ProfilePatch {
    skills_offered: Some(vec!["C++".into()]),
    ..Default::default()
  })
  .await
  .unwrap();

  let hits = s
    .search_offering(&["generative ai".into()])
    .await
    .unwrap();
  assert_eq!(hits.len(), 1);
  assert_eq!(hits[0].id, alice);

  let hits = s.search_offering(&["c++".into()]).await.unwrap();
  assert_eq!(hits.len(), 1);
  assert_eq!(hits[0].id, bob);
}

#[tokio::test]
async fn search_skips_private_profiles() {
  let s = store().await;
  let alice = signup(&s, "alice", "Alice").await;

  s.update_profile(&alice, ProfilePatch {
    skills_offered: Some(vec!["Guitar".into()]),
    is_public: Some(false),
    ..Default::default()
  })
  .await
  .unwrap();

  let hits = s.search_offering(&["guitar".into()]).await.unwrap();
  assert!(hits.is_empty());
}

// ─── Swap ledger ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_swap_is_pending_and_notifies_target_once() {
  let s = store().await;
  let alice = signup(&s, "alice", "Alice").await;
  let bob = signup(&s, "bob", "Bob").await;
  let ledger = SwapLedger::new(Arc::clone(&s));

  let swap = ledger
    .create_swap(guitar_for_spanish(&alice, &bob))
    .await
    .unwrap();
  assert_eq!(swap.status, SwapStatus::Pending);

  let inbox = s.list_notifications(&bob).await.unwrap();
  assert_eq!(inbox.len(), 1);
  assert_eq!(inbox[0].kind, NotificationKind::SwapRequest);
  assert_eq!(inbox[0].payload.message, "Alice sent you a swap request.");
  assert_eq!(inbox[0].payload.link.as_deref(), Some("/swaps"));
  assert!(!inbox[0].read);

  // The requester gets nothing.
  assert!(s.list_notifications(&alice).await.unwrap().is_empty());
}

#[tokio::test]
async fn create_swap_with_unknown_requester_uses_placeholder_name() {
  let s = store().await;
  let bob = signup(&s, "bob", "Bob").await;
  let ledger = SwapLedger::new(Arc::clone(&s));

  ledger
    .create_swap(guitar_for_spanish(&"stranger".into(), &bob))
    .await
    .unwrap();

  let inbox = s.list_notifications(&bob).await.unwrap();
  assert_eq!(inbox[0].payload.message, "A user sent you a swap request.");
}

#[tokio::test]
async fn create_swap_validates_inputs() {
  let s = store().await;
  let alice = signup(&s, "alice", "Alice").await;
  let ledger = SwapLedger::new(Arc::clone(&s));

  let err = ledger
    .create_swap(guitar_for_spanish(&alice, &alice))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::SelfSwap));

  let mut empty = guitar_for_spanish(&alice, &"bob".into());
  empty.requested_skill = "".into();
  let err = ledger.create_swap(empty).await.unwrap_err();
  assert!(matches!(err, Error::EmptySkill));

  // Nothing was persisted or notified.
  assert!(s.list_involving(&alice).await.unwrap().is_empty());
}

#[tokio::test]
async fn accept_succeeds_once_then_is_illegal() {
  let s = store().await;
  let alice = signup(&s, "alice", "Alice").await;
  let bob = signup(&s, "bob", "Bob").await;
  let ledger = SwapLedger::new(Arc::clone(&s));

  let swap = ledger
    .create_swap(guitar_for_spanish(&alice, &bob))
    .await
    .unwrap();

  let accepted = ledger
    .transition(swap.swap_id, &bob, SwapStatus::Accepted)
    .await
    .unwrap();
  assert_eq!(accepted.status, SwapStatus::Accepted);

  let err = ledger
    .transition(swap.swap_id, &bob, SwapStatus::Accepted)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::IllegalTransition { .. }));
}

#[tokio::test]
async fn cancel_by_target_is_unauthorized() {
  let s = store().await;
  let alice = signup(&s, "alice", "Alice").await;
  let bob = signup(&s, "bob", "Bob").await;
  let ledger = SwapLedger::new(Arc::clone(&s));

  let swap = ledger
    .create_swap(guitar_for_spanish(&alice, &bob))
    .await
    .unwrap();

  let err = ledger
    .transition(swap.swap_id, &bob, SwapStatus::Cancelled)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Unauthorized { .. }));

  // The swap is untouched.
  let stored = s.get_swap(swap.swap_id).await.unwrap().unwrap();
  assert_eq!(stored.status, SwapStatus::Pending);
}

#[tokio::test]
async fn transition_on_missing_swap_errors() {
  let s = store().await;
  let ledger = SwapLedger::new(Arc::clone(&s));

  let err = ledger
    .transition(Uuid::new_v4(), &"bob".into(), SwapStatus::Accepted)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::SwapNotFound(_)));
}

#[tokio::test]
async fn board_moves_accepted_swap_from_pending_to_history_for_both() {
  let s = store().await;
  let alice = signup(&s, "alice", "Alice").await;
  let bob = signup(&s, "bob", "Bob").await;
  let ledger = SwapLedger::new(Arc::clone(&s));

  let swap = ledger
    .create_swap(guitar_for_spanish(&alice, &bob))
    .await
    .unwrap();

  let alice_board = ledger.board_for(&alice).await.unwrap();
  assert_eq!(alice_board.outgoing.len(), 1);
  assert!(alice_board.history.is_empty());
  let bob_board = ledger.board_for(&bob).await.unwrap();
  assert_eq!(bob_board.incoming.len(), 1);

  ledger
    .transition(swap.swap_id, &bob, SwapStatus::Accepted)
    .await
    .unwrap();

  let alice_board = ledger.board_for(&alice).await.unwrap();
  assert!(alice_board.outgoing.is_empty());
  assert_eq!(alice_board.history.len(), 1);
  assert_eq!(alice_board.history[0].status, SwapStatus::Accepted);

  let bob_board = ledger.board_for(&bob).await.unwrap();
  assert!(bob_board.incoming.is_empty());
  assert_eq!(bob_board.history.len(), 1);
  assert_eq!(bob_board.history[0].status, SwapStatus::Accepted);
}

// ─── Rating aggregator ───────────────────────────────────────────────────────

#[tokio::test]
async fn concurrent_ratings_all_land_exactly_once() {
  let s = store().await;
  let target = signup(&s, "target", "Tess").await;
  for rater in ["r1", "r2", "r3"] {
    signup(&s, rater, rater).await;
  }
  let aggregator =
    RatingAggregator::new(Arc::clone(&s), RatingPolicy::AllowRepeat);

  let mut handles = Vec::new();
  for (rater, stars) in [("r1", 5u8), ("r2", 3), ("r3", 4)] {
    let aggregator = aggregator.clone();
    let target = target.clone();
    handles.push(tokio::spawn(async move {
      aggregator
        .submit_rating(&rater.into(), &target, stars)
        .await
    }));
  }
  for handle in handles {
    handle.await.unwrap().unwrap();
  }

  let profile = s.get_profile(&target).await.unwrap().unwrap();
  assert_eq!(profile.rating.count, 3);
  assert!((profile.rating.average - 4.0).abs() < 1e-9);
}

#[tokio::test]
async fn rating_missing_target_applies_no_change() {
  let s = store().await;
  signup(&s, "rater", "Rae").await;
  let aggregator =
    RatingAggregator::new(Arc::clone(&s), RatingPolicy::AllowRepeat);

  let err = aggregator
    .submit_rating(&"rater".into(), &"ghost".into(), 5)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::ProfileNotFound(_)));
}

#[tokio::test]
async fn rating_rejects_out_of_range_stars() {
  let s = store().await;
  let target = signup(&s, "target", "Tess").await;
  let aggregator =
    RatingAggregator::new(Arc::clone(&s), RatingPolicy::AllowRepeat);

  for stars in [0u8, 6] {
    let err = aggregator
      .submit_rating(&"rater".into(), &target, stars)
      .await
      .unwrap_err();
    assert!(matches!(err, Error::InvalidStars(_)));
  }

  let profile = s.get_profile(&target).await.unwrap().unwrap();
  assert_eq!(profile.rating.count, 0);
}

#[tokio::test]
async fn reject_repeat_policy_blocks_second_rating() {
  let s = store().await;
  let target = signup(&s, "target", "Tess").await;
  signup(&s, "rater", "Rae").await;
  let aggregator =
    RatingAggregator::new(Arc::clone(&s), RatingPolicy::RejectRepeat);

  aggregator
    .submit_rating(&"rater".into(), &target, 5)
    .await
    .unwrap();
  let err = aggregator
    .submit_rating(&"rater".into(), &target, 1)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::DuplicateRating { .. }));

  // The failed repeat left the aggregate untouched.
  let profile = s.get_profile(&target).await.unwrap().unwrap();
  assert_eq!(profile.rating.count, 1);
  assert!((profile.rating.average - 5.0).abs() < 1e-9);
}

#[tokio::test]
async fn allow_repeat_policy_folds_both_ratings() {
  let s = store().await;
  let target = signup(&s, "target", "Tess").await;
  let aggregator =
    RatingAggregator::new(Arc::clone(&s), RatingPolicy::AllowRepeat);

  aggregator
    .submit_rating(&"rater".into(), &target, 5)
    .await
    .unwrap();
  aggregator
    .submit_rating(&"rater".into(), &target, 3)
    .await
    .unwrap();

  let profile = s.get_profile(&target).await.unwrap().unwrap();
  assert_eq!(profile.rating.count, 2);
  assert!((profile.rating.average - 4.0).abs() < 1e-9);
}

// ─── Notifications ───────────────────────────────────────────────────────────

#[tokio::test]
async fn emit_and_list_newest_first() {
  let s = store().await;
  let bob = signup(&s, "bob", "Bob").await;
  let emitter = NotificationEmitter::new(Arc::clone(&s));

  emitter
    .emit(bob.clone(), NotificationKind::SystemMessage, "first", None)
    .await
    .unwrap();
  // Distinct timestamps so the DESC ordering is observable.
  tokio::time::sleep(std::time::Duration::from_millis(5)).await;
  emitter
    .emit(
      bob.clone(),
      NotificationKind::SwapUpdate,
      "second",
      Some("/swaps".into()),
    )
    .await
    .unwrap();

  let inbox = emitter.list_for(&bob).await.unwrap();
  assert_eq!(inbox.len(), 2);
  assert_eq!(inbox[0].payload.message, "second");
  assert_eq!(inbox[1].payload.message, "first");
}

#[tokio::test]
async fn mark_read_is_idempotent() {
  let s = store().await;
  let bob = signup(&s, "bob", "Bob").await;
  let emitter = NotificationEmitter::new(Arc::clone(&s));

  let n = emitter
    .emit(bob.clone(), NotificationKind::SystemMessage, "hello", None)
    .await
    .unwrap();

  let first = emitter.mark_read(n.notification_id).await.unwrap();
  assert!(first.read);

  // Second call is a no-op, not an error.
  let second = emitter.mark_read(n.notification_id).await.unwrap();
  assert!(second.read);
}

#[tokio::test]
async fn mark_read_missing_errors() {
  let s = store().await;
  let emitter = NotificationEmitter::new(Arc::clone(&s));
  let err = emitter.mark_read(Uuid::new_v4()).await.unwrap_err();
  assert!(matches!(err, Error::NotificationNotFound(_)));
}

#[tokio::test]
async fn mark_all_read_twice_is_idempotent() {
  let s = store().await;
  let bob = signup(&s, "bob", "Bob").await;
  let emitter = NotificationEmitter::new(Arc::clone(&s));

  emitter
    .emit(bob.clone(), NotificationKind::SystemMessage, "a", None)
    .await
    .unwrap();
  emitter
    .emit(bob.clone(), NotificationKind::SystemMessage, "b", None)
    .await
    .unwrap();

  assert_eq!(emitter.mark_all_read(&bob).await.unwrap(), 2);
  assert_eq!(emitter.mark_all_read(&bob).await.unwrap(), 0);

  let inbox = emitter.list_for(&bob).await.unwrap();
  assert!(inbox.iter().all(|n| n.read));
}

// ─── Change feed ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn committed_writes_appear_on_the_change_feed() {
  let s = store().await;
  let alice = signup(&s, "alice", "Alice").await;
  let bob = signup(&s, "bob", "Bob").await;
  let ledger = SwapLedger::new(Arc::clone(&s));

  let mut feed = s.subscribe();

  let swap = ledger
    .create_swap(guitar_for_spanish(&alice, &bob))
    .await
    .unwrap();

  // Swap insert, then the swap_request notification.
  match feed.recv().await.unwrap() {
    StoreEvent::SwapWritten(written) => {
      assert_eq!(written.swap_id, swap.swap_id);
      assert_eq!(written.status, SwapStatus::Pending);
    }
    other => panic!("unexpected event: {other:?}"),
  }
  match feed.recv().await.unwrap() {
    StoreEvent::NotificationWritten(n) => assert_eq!(n.recipient_id, bob),
    other => panic!("unexpected event: {other:?}"),
  }

  ledger
    .transition(swap.swap_id, &bob, SwapStatus::Accepted)
    .await
    .unwrap();
  match feed.recv().await.unwrap() {
    StoreEvent::SwapWritten(written) => {
      assert_eq!(written.status, SwapStatus::Accepted);
    }
    other => panic!("unexpected event: {other:?}"),
  }
}
