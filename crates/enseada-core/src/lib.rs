//! # enseada-core
//!
//! The seams of the Enseada console.
//!
//! This crate provides:
//! - The `Authorizer` and `ProfileSource` traits
//! - The `Guard` that runs an operation only after the authorizer allows it
//!
//! ## Usage
//!
//! ```rust,ignore
//! use enseada_core::{Guard, traits::Authorizer};
//!
//! let guard = Guard::new(&checker, &caps.permissions, Some(&user));
//! let page = guard.run(Some(&Permission::new("users", "read")), users.list(params)).await?;
//! ```

pub mod guard;
pub mod traits;

pub use guard::Guard;

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use enseada_contracts::{error::EnseadaError, permission::Permission, user::User};

    use crate::{traits::Authorizer, Guard};

    /// Exact-match authorizer; enough to exercise the guard.
    struct ExactMatch;

    impl Authorizer for ExactMatch {
        fn check(
            &self,
            object: &str,
            action: &str,
            permissions: &[Permission],
            user: Option<&User>,
        ) -> bool {
            user.is_some()
                && permissions
                    .iter()
                    .any(|p| p.object == object && p.action == action)
        }
    }

    fn perms() -> Vec<Permission> {
        vec![Permission::new("users", "read")]
    }

    #[test]
    fn require_allows_granted_permission() {
        let perms = perms();
        let user = User::new("alice");
        let guard = Guard::new(&ExactMatch, &perms, Some(&user));

        assert!(guard.allows("users", "read"));
        assert!(guard.require(&Permission::new("users", "read")).is_ok());
    }

    #[test]
    fn require_denied_carries_permission() {
        let perms = perms();
        let user = User::new("alice");
        let guard = Guard::new(&ExactMatch, &perms, Some(&user));

        match guard.require(&Permission::new("users", "delete")) {
            Err(EnseadaError::Forbidden { permission }) => {
                assert_eq!(permission, Permission::new("users", "delete"));
            }
            other => panic!("expected Forbidden, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn run_skips_operation_on_denial() {
        let perms = perms();
        let guard = Guard::new(&ExactMatch, &perms, None);
        let calls = AtomicUsize::new(0);

        let result = guard
            .run(Some(&Permission::new("users", "read")), async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .await;

        assert!(matches!(result, Err(EnseadaError::Forbidden { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn run_without_permission_is_unguarded() {
        let guard = Guard::new(&ExactMatch, &[], None);
        let value = guard.run(None, async { Ok(42) }).await.unwrap();
        assert_eq!(value, 42);
    }

    #[tokio::test]
    async fn run_propagates_operation_error() {
        let perms = perms();
        let user = User::new("alice");
        let guard = Guard::new(&ExactMatch, &perms, Some(&user));

        let result: Result<(), _> = guard
            .run(Some(&Permission::new("users", "read")), async {
                Err(EnseadaError::Http {
                    status: 500,
                    message: "boom".to_string(),
                })
            })
            .await;

        assert!(matches!(result, Err(EnseadaError::Http { status: 500, .. })));
    }
}
