//! The client-side permission predicate.
//!
//! Evaluation order:
//!
//! 1. No user → deny.
//! 2. User named `root` → allow, before any pattern matching.
//! 3. Empty permission set → deny.
//! 4. Allow iff some permission's `object` pattern matches the requested
//!    object and its `action` pattern matches the requested action.
//!
//! The permission fields are the patterns; the requested values are the
//! candidates. Swapping them would let a concrete grant authorize a wildcard
//! request.

use tracing::trace;

use enseada_contracts::{permission::Permission, user::User};
use enseada_core::traits::Authorizer;

use crate::pattern::Pattern;

/// Glob-based `Authorizer`. Stateless; construct freely.
#[derive(Debug, Clone, Copy, Default)]
pub struct PermissionChecker;

impl PermissionChecker {
    pub fn new() -> Self {
        Self
    }
}

impl Authorizer for PermissionChecker {
    fn check(
        &self,
        object: &str,
        action: &str,
        permissions: &[Permission],
        user: Option<&User>,
    ) -> bool {
        let allowed = evaluate(object, action, permissions, user);
        trace!(
            object,
            action,
            permissions = permissions.len(),
            user = user.map(|u| u.username.as_str()).unwrap_or("<none>"),
            allowed,
            "permission check"
        );
        allowed
    }
}

fn evaluate(object: &str, action: &str, permissions: &[Permission], user: Option<&User>) -> bool {
    let Some(user) = user else {
        return false;
    };
    if user.is_root() {
        return true;
    }
    permissions.iter().any(|p| covers(p, object, action))
}

/// Return true if `permission` authorizes `object`/`action`.
pub fn covers(permission: &Permission, object: &str, action: &str) -> bool {
    Pattern::compile(&permission.object).matches(object)
        && Pattern::compile(&permission.action).matches(action)
}

/// Free-function form of [`PermissionChecker::check`].
pub fn check(object: &str, action: &str, permissions: &[Permission], user: Option<&User>) -> bool {
    PermissionChecker.check(object, action, permissions, user)
}
