//! Core types and trait definitions for the SkillSwap exchange.
//!
//! This crate is deliberately free of HTTP and database dependencies (its
//! only async dependency is `tokio::sync` for the store change feed). All
//! other crates depend on it; it depends on nothing proprietary.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod aggregator;
pub mod auth;
pub mod emitter;
pub mod error;
pub mod ledger;
pub mod notification;
pub mod profile;
pub mod rating;
pub mod store;
pub mod swap;

pub use error::{Error, Result};
pub use profile::UserId;
