//! Client-side session state: the logged-in user and their capabilities.
//!
//! `SessionStore` populates its cache on `UserLoaded` and drops it on
//! sign-out, unload or token expiry. Fetches are serialized so at most one is
//! in flight; each fetch is tagged with the login generation it started in
//! and its result is discarded if the session ended meanwhile.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use enseada_authz::PermissionChecker;
use enseada_contracts::{
    error::{EnseadaError, EnseadaResult},
    permission::Permission,
    user::{Capabilities, User},
};
use enseada_core::{
    traits::{Authorizer, ProfileSource},
    Guard,
};

use crate::events::OidcEvent;

#[derive(Debug, Default)]
struct SessionState {
    /// Bumped on every eviction.
    generation: u64,
    user: Option<User>,
    capabilities: Option<Capabilities>,
    loaded_at: Option<DateTime<Utc>>,
}

/// An owned copy of the session at one instant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub user: Option<User>,
    pub capabilities: Option<Capabilities>,
    pub loaded_at: Option<DateTime<Utc>>,
}

impl SessionSnapshot {
    pub fn permissions(&self) -> &[Permission] {
        self.capabilities
            .as_ref()
            .map(|c| c.permissions.as_slice())
            .unwrap_or(&[])
    }

    /// A guard over this snapshot.
    pub fn guard<'a, A: Authorizer + ?Sized>(&'a self, authorizer: &'a A) -> Guard<'a, A> {
        Guard::new(authorizer, self.permissions(), self.user.as_ref())
    }
}

pub struct SessionStore<S, A = PermissionChecker> {
    source: S,
    authorizer: A,
    state: RwLock<SessionState>,
    load_lock: Mutex<()>,
}

impl<S: ProfileSource> SessionStore<S, PermissionChecker> {
    pub fn new(source: S) -> Self {
        Self::with_authorizer(source, PermissionChecker::new())
    }
}

impl<S: ProfileSource, A: Authorizer> SessionStore<S, A> {
    pub fn with_authorizer(source: S, authorizer: A) -> Self {
        Self {
            source,
            authorizer,
            state: RwLock::new(SessionState::default()),
            load_lock: Mutex::new(()),
        }
    }

    pub fn authorizer(&self) -> &A {
        &self.authorizer
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    // The state is only ever replaced field by field, so a poisoned lock
    // still holds a consistent value.
    fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    /// React to an OIDC lifecycle event.
    ///
    /// Only `UserLoaded` can fail: fetch errors are returned to the caller
    /// and the cache stays empty.
    pub async fn handle(&self, event: OidcEvent) -> EnseadaResult<()> {
        match &event {
            OidcEvent::UserLoaded => {
                debug!("OIDC user is loaded");
                self.load().await
            }
            OidcEvent::UserUnloaded | OidcEvent::UserSignedOut | OidcEvent::AccessTokenExpired => {
                self.clear(&event);
                Ok(())
            }
            OidcEvent::AccessTokenExpiring => {
                warn!("access token will expire");
                Ok(())
            }
            OidcEvent::SilentRenewError { reason } => {
                error!(reason = %reason, "silent token renewal failed");
                Ok(())
            }
            OidcEvent::OidcError { context, message } => {
                error!(context = %context, message = %message, "OIDC client error");
                Ok(())
            }
        }
    }

    /// Fetch the current user and capabilities unless already cached.
    pub async fn load(&self) -> EnseadaResult<()> {
        let generation = self.read().generation;
        let _in_flight = self.load_lock.lock().await;

        {
            let state = self.read();
            if state.generation != generation {
                debug!(generation, "session ended before load started; skipping");
                return Ok(());
            }
            if state.capabilities.is_some() {
                debug!(generation, "capabilities already cached");
                return Ok(());
            }
        }

        let user = self.source.current_user().await?;
        let capabilities = self.source.capabilities().await?;

        let mut state = self.write();
        if state.generation != generation {
            warn!(
                username = %user.username,
                "session ended while loading capabilities; discarding result"
            );
            return Ok(());
        }

        info!(
            username = %user.username,
            permissions = capabilities.permissions.len(),
            roles = capabilities.roles.len(),
            "session capabilities loaded"
        );
        state.user = Some(user);
        state.capabilities = Some(capabilities);
        state.loaded_at = Some(Utc::now());
        Ok(())
    }

    fn clear(&self, event: &OidcEvent) {
        let mut state = self.write();
        state.generation += 1;
        let username = state.user.take().map(|u| u.username);
        state.capabilities = None;
        state.loaded_at = None;
        info!(
            event = %event,
            username = username.as_deref().unwrap_or("<none>"),
            generation = state.generation,
            "session cleared"
        );
    }

    pub fn is_authenticated(&self) -> bool {
        let state = self.read();
        state.user.is_some() && state.capabilities.is_some()
    }

    pub fn current_user(&self) -> Option<User> {
        self.read().user.clone()
    }

    pub fn capabilities(&self) -> Option<Capabilities> {
        self.read().capabilities.clone()
    }

    pub fn permissions(&self) -> Vec<Permission> {
        self.read()
            .capabilities
            .as_ref()
            .map(|c| c.permissions.clone())
            .unwrap_or_default()
    }

    pub fn roles(&self) -> Vec<String> {
        self.read()
            .capabilities
            .as_ref()
            .map(|c| c.roles.clone())
            .unwrap_or_default()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.read();
        SessionSnapshot {
            user: state.user.clone(),
            capabilities: state.capabilities.clone(),
            loaded_at: state.loaded_at,
        }
    }

    /// Evaluate `object`/`action` against the cached session.
    pub fn check(&self, object: &str, action: &str) -> bool {
        let state = self.read();
        let permissions = state
            .capabilities
            .as_ref()
            .map(|c| c.permissions.as_slice())
            .unwrap_or(&[]);
        self.authorizer
            .check(object, action, permissions, state.user.as_ref())
    }

    /// `Forbidden` unless the cached session allows `permission`.
    pub fn require(&self, permission: &Permission) -> EnseadaResult<()> {
        if self.check(&permission.object, &permission.action) {
            Ok(())
        } else {
            Err(EnseadaError::Forbidden {
                permission: permission.clone(),
            })
        }
    }
}
