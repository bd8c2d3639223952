//! Console configuration loaded from TOML.
//!
//! ```toml
//! base_url = "https://registry.example.com"
//! access_token = "…"          # optional; ENSEADA_TOKEN overrides it
//! page_limit = 25
//!
//! [oidc]
//! client_id = "enseada"
//! redirect_path = "/dashboard/auth/callback"
//! ```

use std::path::Path;

use reqwest::Url;
use serde::{Deserialize, Serialize};

use enseada_contracts::{
    error::{EnseadaError, EnseadaResult},
    page::DEFAULT_LIMIT,
    scope,
};

/// Environment variable that overrides `access_token`.
pub const TOKEN_ENV: &str = "ENSEADA_TOKEN";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Origin of the registry, e.g. `https://registry.example.com`.
    pub base_url: String,

    #[serde(default)]
    pub access_token: Option<String>,

    /// Page size used by list pages.
    #[serde(default = "default_page_limit")]
    pub page_limit: usize,

    #[serde(default)]
    pub oidc: OidcConfig,
}

fn default_page_limit() -> usize {
    DEFAULT_LIMIT
}

/// Login parameters of the console's OAuth client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OidcConfig {
    pub client_id: String,
    pub redirect_path: String,
    pub metadata_path: String,
    pub response_type: String,
    pub automatic_silent_renew: bool,
}

impl Default for OidcConfig {
    fn default() -> Self {
        Self {
            client_id: "enseada".to_string(),
            redirect_path: "/dashboard/auth/callback".to_string(),
            metadata_path: "/.well-known/oauth-authorization-server".to_string(),
            response_type: "code".to_string(),
            automatic_silent_renew: true,
        }
    }
}

/// Fully resolved settings handed to the OIDC client library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OidcSettings {
    pub authority: String,
    pub metadata_url: String,
    pub client_id: String,
    pub redirect_uri: String,
    pub response_type: String,
    pub scope: String,
    pub automatic_silent_renew: bool,
}

impl ConsoleConfig {
    /// Parse and validate a TOML document.
    ///
    /// Returns `EnseadaError::ConfigError` if the TOML is malformed, the base
    /// URL is not an absolute http(s) URL, or `page_limit` is zero.
    pub fn from_toml_str(s: &str) -> EnseadaResult<Self> {
        let config: ConsoleConfig = toml::from_str(s).map_err(|e| EnseadaError::ConfigError {
            reason: format!("failed to parse console config TOML: {}", e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read the file at `path` and parse it with [`Self::from_toml_str`].
    pub fn from_file(path: &Path) -> EnseadaResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| EnseadaError::ConfigError {
            reason: format!("failed to read config file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    fn validate(&self) -> EnseadaResult<()> {
        let url = self.base_url()?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(EnseadaError::ConfigError {
                reason: format!("base_url '{}' must use http or https", self.base_url),
            });
        }
        if self.page_limit == 0 {
            return Err(EnseadaError::ConfigError {
                reason: "page_limit must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    pub fn base_url(&self) -> EnseadaResult<Url> {
        Url::parse(&self.base_url).map_err(|e| EnseadaError::ConfigError {
            reason: format!("invalid base_url '{}': {}", self.base_url, e),
        })
    }

    /// The access token, preferring `ENSEADA_TOKEN` over the file value.
    pub fn access_token(&self) -> EnseadaResult<String> {
        self.access_token_with(std::env::var(TOKEN_ENV).ok())
    }

    fn access_token_with(&self, env: Option<String>) -> EnseadaResult<String> {
        env.filter(|t| !t.trim().is_empty())
            .or_else(|| self.access_token.clone())
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| EnseadaError::NotAuthenticated {
                reason: format!("no access token configured; set {} or access_token", TOKEN_ENV),
            })
    }

    pub fn oidc_settings(&self) -> OidcSettings {
        let authority = self.base_url.trim_end_matches('/').to_string();
        OidcSettings {
            metadata_url: format!("{}{}", authority, self.oidc.metadata_path),
            redirect_uri: format!("{}{}", authority, self.oidc.redirect_path),
            client_id: self.oidc.client_id.clone(),
            response_type: self.oidc.response_type.clone(),
            scope: scope::requested_scope(),
            automatic_silent_renew: self.oidc.automatic_silent_renew,
            authority,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_uses_defaults() {
        let config = ConsoleConfig::from_toml_str(r#"base_url = "https://registry.test""#).unwrap();
        assert_eq!(config.page_limit, 25);
        assert_eq!(config.oidc, OidcConfig::default());
        assert!(config.access_token.is_none());
    }

    #[test]
    fn oidc_settings_are_derived_from_base_url() {
        let config = ConsoleConfig::from_toml_str(
            r#"
            base_url = "https://registry.test/"

            [oidc]
            client_id = "console"
            "#,
        )
        .unwrap();

        let settings = config.oidc_settings();
        assert_eq!(settings.authority, "https://registry.test");
        assert_eq!(
            settings.metadata_url,
            "https://registry.test/.well-known/oauth-authorization-server"
        );
        assert_eq!(settings.redirect_uri, "https://registry.test/dashboard/auth/callback");
        assert_eq!(settings.client_id, "console");
        assert_eq!(settings.response_type, "code");
        assert!(settings.scope.starts_with("profile "));
        assert!(settings.automatic_silent_renew);
    }

    #[test]
    fn env_token_overrides_file_token() {
        let config = ConsoleConfig::from_toml_str(
            r#"
            base_url = "http://localhost:9623"
            access_token = "from-file"
            "#,
        )
        .unwrap();

        assert_eq!(config.access_token_with(None).unwrap(), "from-file");
        assert_eq!(
            config.access_token_with(Some("from-env".to_string())).unwrap(),
            "from-env"
        );
        assert_eq!(config.access_token_with(Some("  ".to_string())).unwrap(), "from-file");
    }

    #[test]
    fn missing_token_is_not_authenticated() {
        let config = ConsoleConfig::from_toml_str(r#"base_url = "http://localhost""#).unwrap();
        assert!(matches!(
            config.access_token_with(None),
            Err(EnseadaError::NotAuthenticated { .. })
        ));
    }

    #[test]
    fn malformed_toml_is_config_error() {
        match ConsoleConfig::from_toml_str("this is not valid toml ][[[") {
            Err(EnseadaError::ConfigError { reason }) => {
                assert!(reason.contains("failed to parse console config TOML"), "{reason}");
            }
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            ConsoleConfig::from_toml_str(r#"base_url = "not a url""#),
            Err(EnseadaError::ConfigError { .. })
        ));
        assert!(matches!(
            ConsoleConfig::from_toml_str(r#"base_url = "ftp://registry.test""#),
            Err(EnseadaError::ConfigError { .. })
        ));
        assert!(matches!(
            ConsoleConfig::from_toml_str(
                r#"
                base_url = "https://registry.test"
                page_limit = 0
                "#
            ),
            Err(EnseadaError::ConfigError { .. })
        ));
    }
}
