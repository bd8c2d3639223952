//! The logged-in user's profile endpoints.

use async_trait::async_trait;
use tracing::debug;

use enseada_contracts::{
    error::EnseadaResult,
    user::{Capabilities, User},
};
use enseada_core::traits::ProfileSource;

use crate::http::{decode, HttpClient};

pub const ME_PATH: &str = "/api/v1beta1/users/me";
pub const CAPABILITIES_PATH: &str = "/api/v1beta1/users/me/capabilities";

/// `ProfileSource` backed by the registry's REST API.
#[derive(Clone)]
pub struct ProfileApi {
    http: HttpClient,
}

impl ProfileApi {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }
}

#[async_trait]
impl ProfileSource for ProfileApi {
    async fn current_user(&self) -> EnseadaResult<User> {
        let user: User = decode(self.http.get(ME_PATH, &[]).await?).await?;
        debug!(username = %user.username, "loaded current user");
        Ok(user)
    }

    async fn capabilities(&self) -> EnseadaResult<Capabilities> {
        let caps: Capabilities = decode(self.http.get(CAPABILITIES_PATH, &[]).await?).await?;
        debug!(
            permissions = caps.permissions.len(),
            roles = caps.roles.len(),
            "loaded capabilities"
        );
        Ok(caps)
    }
}
