//! # enseada-client
//!
//! A thin REST client for the Enseada registry API.
//!
//! - [`config::ConsoleConfig`]: TOML configuration (base URL, token, OIDC)
//! - [`http::HttpClient`]: bearer-authenticated JSON requests
//! - [`service::Service`]: generic CRUD over one collection
//! - [`profile::ProfileApi`]: `users/me` and `users/me/capabilities`
//! - [`registry::Registry`]: typed entry points to every collection
//!
//! The client performs no authorization itself; callers gate requests with
//! an `enseada_core::Guard` first.

pub mod config;
pub mod http;
pub mod profile;
pub mod registry;
pub mod service;

pub use config::ConsoleConfig;
pub use http::{AccessTokenProvider, HttpClient, StaticToken};
pub use profile::ProfileApi;
pub use registry::{Collection, Registry, Role};
pub use service::Service;

// ── Tests ─────────────────────────────────────────────────────────────────────
