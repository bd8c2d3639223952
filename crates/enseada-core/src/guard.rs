//! Guarded execution of page operations.
//!
//! A `Guard` binds an `Authorizer` to one snapshot of the user's permissions
//! and identity. Operations wrapped by `Guard::run` are never started when the
//! authorizer denies the required permission; the caller receives
//! `EnseadaError::Forbidden` instead.

use std::future::Future;

use tracing::{debug, warn};

use enseada_contracts::{
    error::{EnseadaError, EnseadaResult},
    permission::Permission,
    user::User,
};

use crate::traits::Authorizer;

pub struct Guard<'a, A: Authorizer + ?Sized> {
    authorizer: &'a A,
    permissions: &'a [Permission],
    user: Option<&'a User>,
}

impl<'a, A: Authorizer + ?Sized> Guard<'a, A> {
    pub fn new(authorizer: &'a A, permissions: &'a [Permission], user: Option<&'a User>) -> Self {
        Self {
            authorizer,
            permissions,
            user,
        }
    }

    /// Return true if `object`/`action` is allowed for the bound snapshot.
    pub fn allows(&self, object: &str, action: &str) -> bool {
        self.authorizer
            .check(object, action, self.permissions, self.user)
    }

    /// Fail with `Forbidden` carrying `permission` unless it is allowed.
    pub fn require(&self, permission: &Permission) -> EnseadaResult<()> {
        if self.allows(&permission.object, &permission.action) {
            return Ok(());
        }

        warn!(
            object = %permission.object,
            action = %permission.action,
            user = self.user.map(|u| u.username.as_str()).unwrap_or("<anonymous>"),
            "client-side permission check denied action"
        );
        Err(EnseadaError::Forbidden {
            permission: permission.clone(),
        })
    }

    /// Run `op` only if `permission` (when given) is allowed.
    ///
    /// The future is dropped unpolled on denial, so no request is sent.
    pub async fn run<F, T>(&self, permission: Option<&Permission>, op: F) -> EnseadaResult<T>
    where
        F: Future<Output = EnseadaResult<T>>,
    {
        if let Some(permission) = permission {
            self.require(permission)?;
            debug!(permission = %permission, "guard passed");
        }
        op.await
    }
}
