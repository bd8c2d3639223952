//! Trait seams of the Enseada console.
//!
//! - `Authorizer`: the client-side permission predicate (pure, never fails)
//! - `ProfileSource`: where the logged-in user and their capabilities come from
//!
//! Page controllers and the session store depend on these traits only, so the
//! HTTP client and the glob checker can be swapped for in-memory fakes.

use async_trait::async_trait;

use enseada_contracts::{
    error::EnseadaResult,
    permission::Permission,
    user::{Capabilities, User},
};

/// Decides whether a requested `(object, action)` pair is covered by a
/// permission set.
///
/// Implementations must be pure: identical inputs always yield the same
/// answer, and a missing `user` always yields `false`. The result is a UX
/// hint only; the server re-checks every request.
pub trait Authorizer: Send + Sync {
    fn check(
        &self,
        object: &str,
        action: &str,
        permissions: &[Permission],
        user: Option<&User>,
    ) -> bool;
}

/// Loads the current identity and its resolved capabilities.
///
/// Called once per login transition by the session store.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    /// `GET /api/v1beta1/users/me`
    async fn current_user(&self) -> EnseadaResult<User>;

    /// `GET /api/v1beta1/users/me/capabilities`
    async fn capabilities(&self) -> EnseadaResult<Capabilities>;
}
