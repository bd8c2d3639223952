//! Catalogue of the registry's REST collections and their item models.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use enseada_contracts::{
    error::{EnseadaError, EnseadaResult},
    permission::Permission,
    user::User,
};

use crate::http::HttpClient;
use crate::profile::ProfileApi;
use crate::service::Service;

/// A role, as listed by `roles` and `users/{id}/roles`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub role: String,
}

impl Role {
    pub fn new(role: impl Into<String>) -> Self {
        Self { role: role.into() }
    }
}

/// An OAuth client registered with the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthClient {
    pub client_id: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub allowed_scopes: String,
    #[serde(default)]
    pub allowed_redirect_uris: Vec<String>,
}

/// A personal access token owned by the current user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalAccessToken {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub scope: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revoked_at: Option<DateTime<Utc>>,
}

/// A container image repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OciRepo {
    pub group: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl OciRepo {
    pub fn id(&self) -> String {
        format!("{}/{}", self.group, self.name)
    }
}

/// A Maven repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MavenRepo {
    pub group_id: String,
    pub artifact_id: String,
    #[serde(default)]
    pub public: bool,
}

impl MavenRepo {
    pub fn id(&self) -> String {
        format!("{}/{}", self.group_id, self.artifact_id)
    }
}

/// The collections exposed by the registry API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Roles,
    OAuthClients,
    Pats,
    OciRepos,
    MavenRepos,
}

impl Collection {
    pub const ALL: [Collection; 6] = [
        Collection::Users,
        Collection::Roles,
        Collection::OAuthClients,
        Collection::Pats,
        Collection::OciRepos,
        Collection::MavenRepos,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Roles => "roles",
            Collection::OAuthClients => "clients",
            Collection::Pats => "pats",
            Collection::OciRepos => "oci",
            Collection::MavenRepos => "maven",
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Collection::Users => "/api/v1beta1/users",
            Collection::Roles => "/api/v1beta1/roles",
            Collection::OAuthClients => "/api/v1beta1/clients",
            Collection::Pats => "/api/oauth/v1beta1/pats",
            Collection::OciRepos => "/api/oci/v1beta1/repositories",
            Collection::MavenRepos => "/api/maven/v1beta1/repositories",
        }
    }

    /// The permission object the server checks for this collection.
    /// Personal access tokens are scoped to their owner and have none.
    pub fn object(&self) -> Option<&'static str> {
        match self {
            Collection::Users => Some("users"),
            Collection::Roles => Some("roles"),
            Collection::OAuthClients => Some("clients"),
            Collection::Pats => None,
            Collection::OciRepos => Some("oci_repos"),
            Collection::MavenRepos => Some("maven_repos"),
        }
    }

    pub fn permission(&self, action: &str) -> Option<Permission> {
        self.object().map(|object| Permission::new(object, action))
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Collection {
    type Err = EnseadaError;

    fn from_str(s: &str) -> EnseadaResult<Self> {
        Collection::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| EnseadaError::ConfigError {
                reason: format!(
                    "unknown collection '{}'; expected one of: {}",
                    s,
                    Collection::ALL.map(|c| c.name()).join(", ")
                ),
            })
    }
}

/// Typed entry points to every collection.
#[derive(Clone)]
pub struct Registry {
    http: HttpClient,
}

impl Registry {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    pub fn profile(&self) -> ProfileApi {
        ProfileApi::new(self.http.clone())
    }

    /// Untyped access to any collection.
    pub fn collection<T: DeserializeOwned>(&self, collection: Collection) -> Service<T> {
        let service = Service::new(collection.path(), self.http.clone());
        match collection {
            Collection::Users => service
                .with_association("permissions", "/api/v1beta1/users/{id}/permissions")
                .with_association("roles", "/api/v1beta1/users/{id}/roles"),
            Collection::Roles => {
                service.with_association("permissions", "/api/v1beta1/roles/{id}/permissions")
            }
            _ => service,
        }
    }

    pub fn users(&self) -> Service<User> {
        self.collection(Collection::Users)
    }

    pub fn roles(&self) -> Service<Role> {
        self.collection(Collection::Roles)
    }

    pub fn oauth_clients(&self) -> Service<OAuthClient> {
        self.collection(Collection::OAuthClients)
    }

    pub fn pats(&self) -> Service<PersonalAccessToken> {
        self.collection(Collection::Pats)
    }

    pub fn oci_repos(&self) -> Service<OciRepo> {
        self.collection(Collection::OciRepos)
    }

    pub fn maven_repos(&self) -> Service<MavenRepo> {
        self.collection(Collection::MavenRepos)
    }
}
