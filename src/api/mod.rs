//! Subsonic client core: configuration and the authenticated request
//! executor every typed operation is built on.

pub mod models;

mod library;
mod playlists;

use crate::auth::AuthToken;
use crate::cache::{CacheStats, ResponseCache};
use crate::error::{ClientError, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;
use tracing::debug;

const DEFAULT_APP_NAME: &str = "NaviTone";
const DEFAULT_API_VERSION: &str = "1.16.1";
const DEFAULT_TIMEOUT_SECONDS: u64 = 15;

/// Connection settings for one server. Immutable once the client is built.
#[derive(Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub username: String,
    pub password: String,
    pub app_name: String,
    pub api_version: String,
    pub verify_ssl: bool,
    pub timeout_seconds: u64,
    pub enable_cache: bool,
}

impl ClientConfig {
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            username: username.into(),
            password: password.into(),
            app_name: DEFAULT_APP_NAME.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            verify_ssl: true,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            enable_cache: true,
        }
    }

    pub fn verify_ssl(mut self, verify: bool) -> Self {
        self.verify_ssl = verify;
        self
    }

    pub fn timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    pub fn enable_cache(mut self, enabled: bool) -> Self {
        self.enable_cache = enabled;
        self
    }

    pub fn app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = name.into();
        self
    }

    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("app_name", &self.app_name)
            .field("api_version", &self.api_version)
            .field("verify_ssl", &self.verify_ssl)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("enable_cache", &self.enable_cache)
            .finish()
    }
}

/// Minimal Subsonic API client compatible with Navidrome.
pub struct SubsonicClient {
    config: ClientConfig,
    http: reqwest::Client,
    cache: Option<ResponseCache>,
}

impl SubsonicClient {
    /// Build a client from `config`. Caching (when enabled) uses the
    /// process-wide shared cache; see [`Self::with_cache`] to inject an
    /// isolated one.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let cache = config.enable_cache.then(ResponseCache::shared);
        Self::build(config, cache)
    }

    /// Build a client that uses the supplied cache handle instead of the
    /// shared instance. `enable_cache = false` still bypasses it.
    pub fn with_cache(config: ClientConfig, cache: ResponseCache) -> Result<Self> {
        let cache = config.enable_cache.then_some(cache);
        Self::build(config, cache)
    }

    fn build(config: ClientConfig, cache: Option<ResponseCache>) -> Result<Self> {
        if config.base_url.is_empty() {
            return Err(ClientError::InvalidConfig("base URL is empty".to_string()));
        }
        if !config.base_url.starts_with("http://") && !config.base_url.starts_with("https://") {
            return Err(ClientError::InvalidConfig(
                "base URL must start with http:// or https://".to_string(),
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .danger_accept_invalid_certs(!config.verify_ssl)
            .build()
            .map_err(|e| ClientError::InvalidConfig(e.to_string()))?;

        Ok(Self {
            config,
            http,
            cache,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Clear every cached listing for this client's cache handle.
    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.clear();
        }
    }

    pub fn cache_stats(&self) -> CacheStats {
        match &self.cache {
            Some(cache) => CacheStats {
                enabled: true,
                entries: cache.len(),
            },
            None => CacheStats {
                enabled: false,
                entries: 0,
            },
        }
    }

    pub(crate) fn cache(&self) -> Option<&ResponseCache> {
        self.cache.as_ref()
    }

    fn auth_pairs(&self) -> Vec<(String, String)> {
        let auth = AuthToken::generate(&self.config.password);
        vec![
            ("u".to_string(), self.config.username.clone()),
            ("t".to_string(), auth.token),
            ("s".to_string(), auth.salt),
            ("v".to_string(), self.config.api_version.clone()),
            ("c".to_string(), self.config.app_name.clone()),
            ("f".to_string(), "json".to_string()),
        ]
    }

    /// Execute one authenticated call and return the validated envelope
    /// payload. At-most-once: no retry, no backoff.
    ///
    /// `song_ids` exist because the wire format wants one `songId` pair per
    /// id rather than a delimited value; they go after all other
    /// parameters, preserving input order.
    pub(crate) async fn request(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
        method: Method,
        song_ids: Option<&[String]>,
    ) -> Result<serde_json::Value> {
        let mut pairs = self.auth_pairs();
        for (key, value) in params {
            pairs.push((key.to_string(), value.to_string()));
        }
        if let Some(ids) = song_ids {
            for id in ids {
                pairs.push(("songId".to_string(), id.clone()));
            }
        }

        let encoded = pairs
            .iter()
            .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&");
        let url = format!("{}/rest/{}", self.config.base_url, endpoint);

        debug!(endpoint, method = %method, "subsonic request");

        let response = if method == Method::GET {
            self.http.get(format!("{url}?{encoded}")).send().await
        } else {
            self.http
                .post(&url)
                .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(encoded)
                .send()
                .await
        }
        .map_err(|e| ClientError::Network {
            endpoint: endpoint.to_string(),
            source: e,
        })?;

        let body = response.text().await.map_err(|e| ClientError::Network {
            endpoint: endpoint.to_string(),
            source: e,
        })?;

        let payload: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| ClientError::Protocol {
                endpoint: endpoint.to_string(),
                detail: format!("body is not valid JSON: {e}"),
            })?;

        let Some(envelope) = payload.get("subsonic-response") else {
            return Err(ClientError::Protocol {
                endpoint: endpoint.to_string(),
                detail: "missing 'subsonic-response' envelope".to_string(),
            });
        };

        let status = envelope
            .get("status")
            .and_then(|s| s.as_str())
            .unwrap_or_default();
        if status != "ok" {
            let code = envelope
                .pointer("/error/code")
                .and_then(|c| c.as_i64())
                .unwrap_or(0);
            let message = envelope
                .pointer("/error/message")
                .and_then(|m| m.as_str())
                .unwrap_or("Unknown error")
                .to_string();
            return Err(ClientError::Subsonic { code, message });
        }

        Ok(envelope.clone())
    }

    pub(crate) async fn get(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<serde_json::Value> {
        self.request(endpoint, params, Method::GET, None).await
    }

    pub(crate) async fn post(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
        song_ids: Option<&[String]>,
    ) -> Result<serde_json::Value> {
        self.request(endpoint, params, Method::POST, song_ids).await
    }
}

/// Pull one payload field out of the envelope; an absent field is treated
/// as an empty result, matching upstream behavior for empty catalogs.
pub(crate) fn extract<T>(envelope: &serde_json::Value, field: &str, endpoint: &str) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    extract_opt(envelope, field, endpoint).map(Option::unwrap_or_default)
}

pub(crate) fn extract_opt<T>(
    envelope: &serde_json::Value,
    field: &str,
    endpoint: &str,
) -> Result<Option<T>>
where
    T: DeserializeOwned,
{
    match envelope.get(field) {
        None => Ok(None),
        Some(value) => serde_json::from_value(value.clone())
            .map(Some)
            .map_err(|e| ClientError::Protocol {
                endpoint: endpoint.to_string(),
                detail: format!("unexpected shape for '{field}': {e}"),
            }),
    }
}
