//! Bearer-authenticated JSON HTTP client.
//!
//! Every request carries `Authorization: Bearer <token>` and
//! `Content-Type: application/json`. Paths starting with `/` resolve against
//! the base URL; anything else must be an absolute URL. Responses with a
//! status of 400 or above become `EnseadaError::Http`.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, Response, Url};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use enseada_contracts::error::{EnseadaError, EnseadaResult};

use crate::config::ConsoleConfig;

/// Supplies the access token for each request.
///
/// Called once per request so implementations can refresh transparently.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    async fn access_token(&self) -> EnseadaResult<String>;
}

/// A fixed token, e.g. a personal access token from the config file.
#[derive(Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

#[async_trait]
impl AccessTokenProvider for StaticToken {
    async fn access_token(&self) -> EnseadaResult<String> {
        Ok(self.0.clone())
    }
}

pub type Query = [(String, String)];

#[derive(Clone)]
pub struct HttpClient {
    base_url: Url,
    client: reqwest::Client,
    tokens: Arc<dyn AccessTokenProvider>,
}

impl HttpClient {
    pub fn new(base_url: &str, tokens: Arc<dyn AccessTokenProvider>) -> EnseadaResult<Self> {
        let base_url = Url::parse(base_url).map_err(|e| EnseadaError::ConfigError {
            reason: format!("invalid base URL '{}': {}", base_url, e),
        })?;
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| EnseadaError::Transport {
                reason: format!("failed to build HTTP client: {}", e),
            })?;
        Ok(Self {
            base_url,
            client,
            tokens,
        })
    }

    /// Build a client for the configured registry using the configured token.
    pub fn from_config(config: &ConsoleConfig) -> EnseadaResult<Self> {
        let token = config.access_token()?;
        Self::new(&config.base_url, Arc::new(StaticToken::new(token)))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve `url` against the base URL and append `query`.
    pub fn build_url(&self, url: &str, query: &Query) -> EnseadaResult<Url> {
        let parsed = if url.starts_with('/') {
            self.base_url.join(url)
        } else {
            Url::parse(url)
        };
        let mut uri = parsed.map_err(|e| EnseadaError::ConfigError {
            reason: format!("invalid request URL '{}': {}", url, e),
        })?;

        if !query.is_empty() {
            let mut pairs = uri.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(uri)
    }

    pub async fn get(&self, url: &str, query: &Query) -> EnseadaResult<Response> {
        self.request::<()>(Method::GET, url, None, query).await
    }

    pub async fn head(&self, url: &str) -> EnseadaResult<Response> {
        self.request::<()>(Method::HEAD, url, None, &[]).await
    }

    pub async fn post<B: Serialize + ?Sized>(&self, url: &str, body: Option<&B>) -> EnseadaResult<Response> {
        self.request(Method::POST, url, body, &[]).await
    }

    pub async fn put<B: Serialize + ?Sized>(&self, url: &str, body: Option<&B>) -> EnseadaResult<Response> {
        self.request(Method::PUT, url, body, &[]).await
    }

    pub async fn delete<B: Serialize + ?Sized>(&self, url: &str, body: Option<&B>) -> EnseadaResult<Response> {
        self.request(Method::DELETE, url, body, &[]).await
    }

    pub async fn request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: &str,
        body: Option<&B>,
        query: &Query,
    ) -> EnseadaResult<Response> {
        let uri = self.build_url(url, query)?;
        let token = self.tokens.access_token().await?;

        debug!(method = %method, url = %uri, "sending request");

        let mut req = self
            .client
            .request(method.clone(), uri.clone())
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .header(CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            req = req.json(body);
        }

        let res = req.send().await.map_err(|e| EnseadaError::Transport {
            reason: format!("{} {} failed: {}", method, uri, e),
        })?;

        let status = res.status();
        if status.as_u16() >= 400 {
            let text = res.text().await.unwrap_or_default();
            let message = if text.trim().is_empty() {
                status.canonical_reason().unwrap_or("error").to_string()
            } else {
                text.trim().to_string()
            };
            warn!(method = %method, url = %uri, status = status.as_u16(), "request failed");
            return Err(EnseadaError::Http {
                status: status.as_u16(),
                message,
            });
        }
        Ok(res)
    }
}

/// Decode a JSON response body.
pub async fn decode<T: DeserializeOwned>(res: Response) -> EnseadaResult<T> {
    let url = res.url().clone();
    res.json::<T>().await.map_err(|e| EnseadaError::Decode {
        reason: format!("{}: {}", url, e),
    })
}
