//! The authentication collaborator boundary.
//!
//! Session issuance and credential lifecycle live entirely outside this
//! repository. The core consumes an opaque principal: an externally issued
//! id plus display metadata. Nothing here validates passwords or mints
//! tokens.

use std::{collections::HashMap, future::Future};

use serde::{Deserialize, Serialize};

use crate::profile::UserId;

/// The session identity handed to the core by the auth provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
  pub id:        UserId,
  pub name:      String,
  pub email:     Option<String>,
  pub photo_url: Option<String>,
}

/// Resolves an opaque bearer token to a session principal.
///
/// Implementations wrap whatever identity service issued the token; the core
/// treats both token and principal as opaque inputs.
pub trait AuthProvider: Send + Sync {
  fn resolve<'a>(
    &'a self,
    token: &'a str,
  ) -> impl Future<Output = Option<Principal>> + Send + 'a;
}

/// A fixed token table. Suitable for tests and single-tenant deployments
/// where sessions are provisioned out of band.
#[derive(Debug, Clone, Default)]
pub struct StaticTokens {
  tokens: HashMap<String, Principal>,
}

impl StaticTokens {
  pub fn new(tokens: HashMap<String, Principal>) -> Self { Self { tokens } }

  pub fn insert(&mut self, token: impl Into<String>, principal: Principal) {
    self.tokens.insert(token.into(), principal);
  }
}

impl AuthProvider for StaticTokens {
  async fn resolve(&self, token: &str) -> Option<Principal> {
    self.tokens.get(token).cloned()
  }
}
