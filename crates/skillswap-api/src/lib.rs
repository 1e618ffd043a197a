//! JSON REST + SSE API for the SkillSwap exchange.
//!
//! Exposes an axum [`Router`] backed by any
//! [`skillswap_core::store::ExchangeStore`]. TLS and transport concerns are
//! the caller's responsibility; session tokens are resolved through the
//! injected [`AuthProvider`].
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", skillswap_api::api_router(state))
//! ```

pub mod auth;
pub mod error;
pub mod events;
pub mod flows;
pub mod notifications;
pub mod profiles;
pub mod ratings;
pub mod search;
pub mod swaps;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, patch, post},
};
use skillswap_core::{
  aggregator::RatingAggregator, auth::AuthProvider, emitter::NotificationEmitter,
  ledger::SwapLedger, rating::RatingPolicy, store::ExchangeStore,
};
use skillswap_flows::{Flows, SkillModel};
use skillswap_live::LiveViews;

pub use error::ApiError;

/// Shared handler state: the store plus the domain services built over it,
/// the auth collaborator, and the generative-text flows.
pub struct ApiState<S, A, M> {
  pub store:      Arc<S>,
  pub ledger:     SwapLedger<S>,
  pub aggregator: RatingAggregator<S>,
  pub emitter:    NotificationEmitter<S>,
  pub live:       LiveViews<S>,
  pub auth:       Arc<A>,
  pub flows:      Arc<Flows<M>>,
}

impl<S, A, M> Clone for ApiState<S, A, M> {
  fn clone(&self) -> Self {
    Self {
      store:      Arc::clone(&self.store),
      ledger:     self.ledger.clone(),
      aggregator: self.aggregator.clone(),
      emitter:    self.emitter.clone(),
      live:       self.live.clone(),
      auth:       Arc::clone(&self.auth),
      flows:      Arc::clone(&self.flows),
    }
  }
}

impl<S: ExchangeStore + 'static, A, M> ApiState<S, A, M> {
  pub fn new(
    store: Arc<S>,
    auth: Arc<A>,
    flows: Arc<Flows<M>>,
    rating_policy: RatingPolicy,
  ) -> Self {
    Self {
      ledger:     SwapLedger::new(Arc::clone(&store)),
      aggregator: RatingAggregator::new(Arc::clone(&store), rating_policy),
      emitter:    NotificationEmitter::new(Arc::clone(&store)),
      live:       LiveViews::new(Arc::clone(&store)),
      store,
      auth,
      flows,
    }
  }
}

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S, A, M>(state: ApiState<S, A, M>) -> Router<()>
where
  S: ExchangeStore + 'static,
  A: AuthProvider + 'static,
  M: SkillModel + 'static,
{
  Router::new()
    // Profiles
    .route(
      "/profiles",
      get(profiles::list::<S, A, M>).post(profiles::create::<S, A, M>),
    )
    .route("/profiles/{id}", get(profiles::get_one::<S, A, M>))
    .route("/profiles/{id}", patch(profiles::update::<S, A, M>))
    // Search
    .route("/search", get(search::handler::<S, A, M>))
    // Swaps
    .route(
      "/swaps",
      get(swaps::board::<S, A, M>).post(swaps::create::<S, A, M>),
    )
    .route("/swaps/{id}/accept", post(swaps::accept::<S, A, M>))
    .route("/swaps/{id}/reject", post(swaps::reject::<S, A, M>))
    .route("/swaps/{id}/cancel", post(swaps::cancel::<S, A, M>))
    // Ratings
    .route("/ratings", post(ratings::submit::<S, A, M>))
    // Notifications
    .route("/notifications", get(notifications::list::<S, A, M>))
    .route(
      "/notifications/{id}/read",
      post(notifications::mark_read::<S, A, M>),
    )
    .route(
      "/notifications/read-all",
      post(notifications::mark_all_read::<S, A, M>),
    )
    // Live views over SSE
    .route("/events/swaps", get(events::swaps::<S, A, M>))
    .route(
      "/events/notifications",
      get(events::notifications::<S, A, M>),
    )
    // Generative-text flows
    .route("/flows/extract-skills", post(flows::extract::<S, A, M>))
    .route("/flows/suggest-skills", post(flows::suggest::<S, A, M>))
    .route(
      "/flows/autocomplete-skills",
      post(flows::autocomplete::<S, A, M>),
    )
    .route("/flows/chat", post(flows::chat::<S, A, M>))
    .with_state(state)
}
