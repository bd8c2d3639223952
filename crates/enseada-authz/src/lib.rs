//! # enseada-authz
//!
//! The permission checker used by the Enseada console to decide, before
//! issuing a request, whether the logged-in user may perform an action.
//!
//! ## Overview
//!
//! [`PermissionChecker`] implements the
//! [`Authorizer`](enseada_core::traits::Authorizer) trait. A permission is a
//! pair of case-insensitive glob patterns (see [`pattern`]); a request is
//! allowed when any granted permission matches both its object and action.
//! A missing user always denies and the `root` user always allows.
//!
//! The check is a fail-fast UX guard. The registry server enforces the same
//! permissions on every request.

pub mod checker;
pub mod pattern;

pub use checker::{check, covers, PermissionChecker};
pub use pattern::Pattern;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use enseada_contracts::{permission::Permission, user::User};
    use enseada_core::traits::Authorizer;

    use crate::PermissionChecker;

    fn alice() -> User {
        User::new("alice")
    }

    fn root() -> User {
        User::new("root")
    }

    fn check(object: &str, action: &str, permissions: &[Permission], user: Option<&User>) -> bool {
        PermissionChecker::new().check(object, action, permissions, user)
    }

    // ── 1. fail-closed defaults ───────────────────────────────────────────────

    #[test]
    fn empty_permissions_deny_regular_user() {
        let user = alice();
        assert!(!check("users", "read", &[], Some(&user)));
        assert!(!check("oci_repos", "delete", &[], Some(&user)));
    }

    #[test]
    fn missing_user_denies_regardless_of_permissions() {
        let perms = vec![Permission::new("*", "*")];
        assert!(!check("users", "read", &perms, None));
        assert!(!check("anything", "anything", &[], None));
    }

    // ── 2. root bypass ────────────────────────────────────────────────────────

    #[test]
    fn root_bypasses_with_no_permissions() {
        let user = root();
        assert!(check("anything", "anything", &[], Some(&user)));
    }

    #[test]
    fn root_bypass_is_exact_username() {
        let user = User::new("Root");
        assert!(!check("anything", "anything", &[], Some(&user)));
    }

    // ── 3. literal and case-insensitive grants ────────────────────────────────

    #[test]
    fn literal_grant() {
        let perms = vec![Permission::new("users", "read")];
        let user = alice();

        assert!(check("users", "read", &perms, Some(&user)));
        assert!(!check("users", "write", &perms, Some(&user)));
        assert!(check("Users", "READ", &perms, Some(&user)));
        assert!(!check("groups", "read", &perms, Some(&user)));
    }

    #[test]
    fn instance_scoped_object() {
        let perms = vec![Permission::new("users:*", "update")];
        let user = alice();

        assert!(check("users:42", "update", &perms, Some(&user)));
        assert!(!check("users", "update", &perms, Some(&user)));
    }

    // ── 4. wildcards ──────────────────────────────────────────────────────────

    #[test]
    fn wildcard_grant() {
        let perms = vec![Permission::new("oci_repos*", "*")];
        let user = alice();

        assert!(check("oci_repos_42", "delete", &perms, Some(&user)));
        assert!(check("oci_repos", "read", &perms, Some(&user)));
        assert!(!check("maven_repos", "read", &perms, Some(&user)));
    }

    #[test]
    fn matching_direction_is_permission_pattern_against_request() {
        // A concrete grant must not authorize a wildcard-looking request.
        let perms = vec![Permission::new("oci_repos_42", "*")];
        let user = alice();

        assert!(!check("oci_repos*", "read", &perms, Some(&user)));
        assert!(check("oci_repos_42", "read", &perms, Some(&user)));
    }

    #[test]
    fn any_matching_permission_allows_regardless_of_order() {
        let user = alice();
        let mut perms = vec![
            Permission::new("maven_repos", "read"),
            Permission::new("users", "read"),
            Permission::new("clients", "*"),
        ];

        assert!(check("clients", "delete", &perms, Some(&user)));
        perms.reverse();
        assert!(check("clients", "delete", &perms, Some(&user)));
    }

    #[test]
    fn object_and_action_must_match_the_same_permission() {
        let perms = vec![
            Permission::new("users", "read"),
            Permission::new("clients", "delete"),
        ];
        let user = alice();

        assert!(!check("users", "delete", &perms, Some(&user)));
    }

    // ── 5. purity ─────────────────────────────────────────────────────────────

    #[test]
    fn repeated_calls_are_identical() {
        let perms = vec![Permission::new("users", "re?d")];
        let user = alice();
        let first = check("users", "read", &perms, Some(&user));

        for _ in 0..10 {
            assert_eq!(check("users", "read", &perms, Some(&user)), first);
        }
        assert!(first);
    }

    #[test]
    fn free_function_agrees_with_checker() {
        let perms = vec![Permission::new("users", "read")];
        let user = alice();
        assert_eq!(
            crate::check("users", "read", &perms, Some(&user)),
            check("users", "read", &perms, Some(&user))
        );
        assert!(crate::covers(&perms[0], "USERS", "Read"));
    }
}
