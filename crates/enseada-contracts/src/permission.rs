//! Permission grants.
//!
//! A `Permission` pairs an object pattern with an action pattern. When a
//! permission is evaluated, its fields are the patterns and the requested
//! object and action are the candidates matched against them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A granted `(object, action)` pair.
///
/// Both fields are case-insensitive glob patterns, e.g.
/// `{ object: "oci_repos*", action: "*" }`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Permission {
    /// Principal the permission is attached to. Present on the
    /// `users/{name}/permissions` endpoints, absent on capabilities.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub object: String,
    pub action: String,
}

impl Permission {
    pub fn new(object: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            subject: None,
            object: object.into(),
            action: action.into(),
        }
    }

    /// Attach a subject, as the permission management endpoints expect.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.object, self.action)
    }
}
