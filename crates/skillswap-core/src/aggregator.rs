//! The rating aggregator — atomic incremental updates to rating aggregates.

use std::sync::Arc;

use crate::{
  Result,
  profile::{RatingAggregate, UserId},
  rating::{RatingPolicy, validate_stars},
  store::ExchangeStore,
};

pub struct RatingAggregator<S> {
  store:  Arc<S>,
  policy: RatingPolicy,
}

impl<S> Clone for RatingAggregator<S> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), policy: self.policy }
  }
}

impl<S: ExchangeStore> RatingAggregator<S> {
  pub fn new(store: Arc<S>, policy: RatingPolicy) -> Self {
    Self { store, policy }
  }

  pub fn policy(&self) -> RatingPolicy { self.policy }

  /// Fold `stars` into `target`'s aggregate.
  ///
  /// The update executes as a single atomic read-modify-write in the
  /// backend, so concurrent raters never lose each other's updates. Fails
  /// without change if `target` has no profile, if `stars` is out of range,
  /// or if the configured policy rejects a repeat rating.
  pub async fn submit_rating(
    &self,
    rater: &UserId,
    target: &UserId,
    stars: u8,
  ) -> Result<RatingAggregate> {
    validate_stars(stars)?;
    self.store.apply_rating(rater, target, stars, self.policy).await
  }
}
