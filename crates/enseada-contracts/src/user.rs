//! Identity and resolved capabilities of the logged-in user.

use serde::{Deserialize, Serialize};

use crate::permission::Permission;

/// Username that bypasses every permission check.
pub const ROOT_USERNAME: &str = "root";

/// The authenticated identity returned by `GET /api/v1beta1/users/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl User {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            enabled: true,
        }
    }

    pub fn is_root(&self) -> bool {
        self.username == ROOT_USERNAME
    }
}

/// The user's resolved permission set and role names, as returned by
/// `GET /api/v1beta1/users/me/capabilities`.
///
/// Order carries no meaning: only membership decides an authorization
/// outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    #[serde(default)]
    pub permissions: Vec<Permission>,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl Capabilities {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}
