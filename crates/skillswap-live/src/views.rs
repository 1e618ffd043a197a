//! Derived read models pushed to subscribers.

use std::collections::HashMap;

use serde::Serialize;
use skillswap_core::{
  Result, UserId,
  store::ExchangeStore,
  swap::{Role, SwapRequest},
};

/// Display name used when a counterpart's profile cannot be found. Mirrors
/// the placeholder the swaps screen shows; a missing profile degrades the
/// card, never the whole view.
pub const UNKNOWN_USER: &str = "Unknown User";

/// The resolved identity of the other party on a swap.
#[derive(Debug, Clone, Serialize)]
pub struct Participant {
  pub id:        UserId,
  pub name:      String,
  pub photo_url: Option<String>,
}

/// One swap, annotated with the counterpart's display identity from the
/// subscriber's perspective.
#[derive(Debug, Clone, Serialize)]
pub struct SwapCard {
  pub swap:        SwapRequest,
  pub counterpart: Participant,
}

/// A user's swaps, partitioned and counterpart-resolved, as the swaps screen
/// presents them.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SwapBoardView {
  pub incoming: Vec<SwapCard>,
  pub outgoing: Vec<SwapCard>,
  pub history:  Vec<SwapCard>,
}

impl SwapBoardView {
  /// Every counterpart id currently on the board. Used to decide whether a
  /// profile write is relevant to this subscription.
  pub fn counterpart_ids(&self) -> Vec<UserId> {
    self
      .incoming
      .iter()
      .chain(&self.outgoing)
      .chain(&self.history)
      .map(|card| card.counterpart.id.clone())
      .collect()
  }
}

/// Build the board for `user`: list, partition, resolve counterparts.
///
/// Profiles are fetched once per distinct counterpart; a missing profile
/// yields the [`UNKNOWN_USER`] placeholder.
pub async fn build_swap_board<S: ExchangeStore>(
  store: &S,
  user: &UserId,
) -> Result<SwapBoardView> {
  let swaps = store.list_involving(user).await?;

  let mut participants: HashMap<UserId, Participant> = HashMap::new();
  for swap in &swaps {
    let Some(counterpart) = swap.counterpart_of(user) else {
      continue;
    };
    if participants.contains_key(counterpart) {
      continue;
    }
    let participant = match store.get_profile(counterpart).await? {
      Some(profile) => Participant {
        id:        profile.id,
        name:      profile.name,
        photo_url: profile.photo_url,
      },
      None => Participant {
        id:        counterpart.clone(),
        name:      UNKNOWN_USER.to_owned(),
        photo_url: None,
      },
    };
    participants.insert(counterpart.clone(), participant);
  }

  let mut view = SwapBoardView::default();
  let mut history: Vec<SwapCard> = Vec::new();

  for swap in swaps {
    let Some(role) = swap.role_of(user) else { continue };
    let Some(counterpart) = swap.counterpart_of(user) else { continue };
    let Some(participant) = participants.get(counterpart) else { continue };
    let card = SwapCard {
      counterpart: participant.clone(),
      swap,
    };
    match (role, card.swap.status.is_pending()) {
      (Role::Target, true) => view.incoming.push(card),
      (Role::Requester, true) => view.outgoing.push(card),
      (_, false) => history.push(card),
    }
  }

  history.sort_by(|a, b| b.swap.created_at.cmp(&a.swap.created_at));
  view.history = history;
  Ok(view)
}
