//! Login lifecycle notifications delivered by the OIDC client.

use std::fmt;

/// An event raised by the OIDC client library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OidcEvent {
    /// A user session was established or silently renewed.
    UserLoaded,
    /// The stored user was removed from session storage.
    UserUnloaded,
    /// The access token is about to expire.
    AccessTokenExpiring,
    /// The access token has expired.
    AccessTokenExpired,
    /// Silent renewal failed.
    SilentRenewError { reason: String },
    /// The user signed out at the provider.
    UserSignedOut,
    /// Any other error reported by the OIDC client.
    OidcError { context: String, message: String },
}

impl OidcEvent {
    /// Return true if the event ends the cached session.
    pub fn evicts(&self) -> bool {
        matches!(
            self,
            OidcEvent::UserUnloaded | OidcEvent::UserSignedOut | OidcEvent::AccessTokenExpired
        )
    }
}

impl fmt::Display for OidcEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OidcEvent::UserLoaded => f.write_str("user loaded"),
            OidcEvent::UserUnloaded => f.write_str("user unloaded"),
            OidcEvent::AccessTokenExpiring => f.write_str("access token expiring"),
            OidcEvent::AccessTokenExpired => f.write_str("access token expired"),
            OidcEvent::SilentRenewError { reason } => write!(f, "silent renew error: {}", reason),
            OidcEvent::UserSignedOut => f.write_str("user signed out"),
            OidcEvent::OidcError { context, message } => {
                write!(f, "OIDC error at {}: {}", context, message)
            }
        }
    }
}
