//! REST client for the Dokan backend.
//!
//! One [`ApiClient`] covers the storefront and admin endpoints. Requests carry
//! the stored bearer token when there is one. The catalog and the shipping
//! settings are cached with `moka` for the configured TTL.

mod admin;
mod auth;
mod cache;
mod cart;
mod catalog;
mod invoices;
mod orders;
mod reviews;
mod seller;
mod shipping;

use std::sync::Arc;

use moka::future::Cache;
use reqwest::{Method, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::config::ClientConfig;
use crate::error::{ApiError, Result};
use crate::token::{FileTokenStore, TokenStore};

pub use cache::{CacheKey, CacheValue};

const USER_AGENT: &str = concat!("dokan/", env!("CARGO_PKG_VERSION"));
const CACHE_CAPACITY: u64 = 1000;
const LOG_BODY_CHARS: usize = 500;

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the Dokan REST backend.
///
/// Cheap to clone; clones share the HTTP pool, the cache and the token store.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base_url: Url,
    tokens: Arc<dyn TokenStore>,
    token_override: Option<SecretString>,
    cache: Cache<CacheKey, CacheValue>,
}

/// Error body shape used by the backend.
#[derive(serde::Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl ApiClient {
    /// Create a client that persists its token at `config.token_path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let tokens = Arc::new(FileTokenStore::new(config.token_path.clone()));
        Self::with_token_store(config, tokens)
    }

    /// Create a client with a caller-supplied token store.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_token_store(config: &ClientConfig, tokens: Arc<dyn TokenStore>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(USER_AGENT)
            .build()?;

        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(config.cache_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                http,
                base_url: config.api_url.clone(),
                tokens,
                token_override: config.api_token.clone(),
                cache,
            }),
        })
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Whether a bearer token is available for requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the token store cannot be read.
    pub fn is_authenticated(&self) -> Result<bool> {
        Ok(self.bearer_token()?.is_some())
    }

    /// Drop every cached response.
    pub fn clear_cache(&self) {
        self.inner.cache.invalidate_all();
    }

    fn bearer_token(&self) -> Result<Option<SecretString>> {
        if let Some(token) = &self.inner.token_override {
            return Ok(Some(token.clone()));
        }
        Ok(self.inner.tokens.load()?)
    }

    fn tokens(&self) -> &dyn TokenStore {
        self.inner.tokens.as_ref()
    }

    async fn cached(&self, key: &CacheKey) -> Option<CacheValue> {
        let value = self.inner.cache.get(key).await;
        if value.is_some() {
            debug!(?key, "Cache hit");
        }
        value
    }

    async fn cache_insert(&self, key: CacheKey, value: CacheValue) {
        self.inner.cache.insert(key, value).await;
    }

    async fn cache_invalidate(&self, key: &CacheKey) {
        self.inner.cache.invalidate(key).await;
    }

    // =========================================================================
    // Request plumbing
    // =========================================================================

    /// Build an endpoint URL from path segments and query pairs.
    ///
    /// Segments are percent-encoded, so ids can be passed as-is.
    fn endpoint(&self, segments: &[&str], query: &[(&str, String)]) -> Result<Url> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = self.endpoint(segments, query)?;
        let request = self.inner.http.get(url.clone());
        self.execute(request, &url).await
    }

    async fn send<B, T>(&self, method: Method, segments: &[&str], body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(segments, &[])?;
        let request = self.inner.http.request(method, url.clone()).json(body);
        self.execute(request, &url).await
    }

    async fn delete<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        let url = self.endpoint(segments, &[])?;
        let request = self.inner.http.delete(url.clone());
        self.execute(request, &url).await
    }

    /// Send a request and decode the JSON response.
    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder, url: &Url) -> Result<T> {
        let request = match self.bearer_token()? {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();

        let retry_after = (status == StatusCode::TOO_MANY_REQUESTS).then(|| {
            response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1)
        });

        // Body as text first for better error diagnostics
        let text = response.text().await?;

        if let Some(retry_after) = retry_after {
            return Err(ApiError::RateLimited {
                retry_after,
                message: server_message(&text),
            });
        }

        if !status.is_success() {
            return Err(error_for_status(status, &text, url));
        }

        let body = if text.trim().is_empty() { "{}" } else { text.as_str() };
        serde_json::from_str(body).map_err(|e| {
            tracing::error!(
                error = %e,
                path = url.path(),
                body = %truncate(&text),
                "Failed to parse backend response"
            );
            ApiError::Parse(e)
        })
    }
}

/// The server's `message` (or `error`) from an error body, if it sent one.
fn server_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message.or(b.error))
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
}

fn error_for_status(status: StatusCode, body: &str, url: &Url) -> ApiError {
    let message = server_message(body);

    match status {
        StatusCode::UNAUTHORIZED => ApiError::Unauthorized(message),
        StatusCode::NOT_FOUND => {
            debug!(path = url.path(), "Backend returned 404");
            ApiError::NotFound {
                path: url.path().to_string(),
                message,
            }
        }
        _ => {
            if status.is_server_error() {
                tracing::error!(
                    status = %status,
                    path = url.path(),
                    body = %truncate(body),
                    "Backend returned server error"
                );
            } else {
                tracing::warn!(status = %status, path = url.path(), ?message, "Request rejected");
            }
            ApiError::Api {
                status: status.as_u16(),
                message,
            }
        }
    }
}

fn truncate(body: &str) -> String {
    body.chars().take(LOG_BODY_CHARS).collect()
}
