//! Live view synchronization for the SkillSwap exchange.
//!
//! A subscription is a scoped acquisition: [`LiveViews::open_swap_board`] and
//! [`LiveViews::open_notification_feed`] return a receiver plus a
//! [`SubscriptionHandle`] that must be closed (or dropped) on every exit
//! path. Each subscription tails the store's change feed and pushes a fresh
//! derived view after every committed write matching its predicate; the
//! subscriber never polls.

mod subscription;
mod views;

pub use subscription::{LiveViews, SubscriptionHandle};
pub use views::{Participant, SwapBoardView, SwapCard};
