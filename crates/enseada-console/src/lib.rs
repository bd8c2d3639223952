//! # enseada-console
//!
//! Headless state for the Enseada administrative console.
//!
//! - [`session::SessionStore`] caches the logged-in user and capabilities,
//!   driven by [`events::OidcEvent`]s from the OIDC client.
//! - [`pages`] holds the list, detail and create controllers that views
//!   render. Each checks its required permission through a
//!   [`Guard`](enseada_core::Guard) before touching the API.
//!
//! ```rust,ignore
//! let session = SessionStore::new(registry.profile());
//! session.handle(OidcEvent::UserLoaded).await?;
//!
//! let snapshot = session.snapshot();
//! let mut users = ListPage::new("user", registry.users(), |u| u.username.clone())
//!     .with_permission(Permission::new("users", "read"));
//! users.load(&snapshot.guard(session.authorizer())).await?;
//! ```

pub mod events;
pub mod pages;
pub mod session;

pub use events::OidcEvent;
pub use pages::{CreateForm, ListPage, ShowPage};
pub use session::{SessionSnapshot, SessionStore};

// ── Tests ─────────────────────────────────────────────────────────────────────
