//! OAuth scopes requested by the console at login.

/// A named group of scopes, mirroring the registry's API areas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeGroup {
    pub name: &'static str,
    pub scopes: &'static [&'static str],
}

/// Every scope group, in request order.
pub const SCOPE_GROUPS: &[ScopeGroup] = &[
    ScopeGroup {
        name: "users",
        scopes: &["profile", "users:read", "users:manage"],
    },
    ScopeGroup {
        name: "rbac",
        scopes: &["roles", "permissions"],
    },
    ScopeGroup {
        name: "tokens",
        scopes: &["pats:read", "pats:manage"],
    },
    ScopeGroup {
        name: "oauth",
        scopes: &["clients:read", "clients:manage"],
    },
    ScopeGroup {
        name: "containers",
        scopes: &[
            "oci:repos:read",
            "oci:repos:manage",
            "oci:repos:delete",
            "oci:image:push",
            "oci:image:pull",
        ],
    },
    ScopeGroup {
        name: "maven",
        scopes: &[
            "maven:repos:read",
            "maven:repos:manage",
            "maven:repos:delete",
            "maven:repos:push",
            "maven:repos:pull",
        ],
    },
];

/// The space-separated scope string sent in the authorization request.
pub fn requested_scope() -> String {
    SCOPE_GROUPS
        .iter()
        .flat_map(|g| g.scopes.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Look up a scope group by name.
pub fn group(name: &str) -> Option<&'static ScopeGroup> {
    SCOPE_GROUPS.iter().find(|g| g.name == name)
}
