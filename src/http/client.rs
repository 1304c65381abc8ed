use crate::api::errors::{normalize_error_body, ApiError};
use crate::config::BackendConfig;
use crate::observability::ApiMetrics;
use governor::{DefaultDirectRateLimiter, Jitter, Quota, RateLimiter};
use moka::future::Cache;
use reqwest::{Client, RequestBuilder, Url};
use serde::Serialize;
use serde_json::Value;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Rate-limited HTTP client holding the backend's cookie session
#[derive(Debug, Clone)]
pub struct RateLimitedHttpClient {
    client: Client,
    base_url: Url,
    rate_limiter: Arc<DefaultDirectRateLimiter>,
    cache: Cache<String, Value>,
    metrics: Arc<ApiMetrics>,
}

impl RateLimitedHttpClient {
    pub fn new(config: &BackendConfig) -> Result<Self, ApiError> {
        Self::with_metrics(config, Arc::new(ApiMetrics::new()))
    }

    pub fn with_metrics(config: &BackendConfig, metrics: Arc<ApiMetrics>) -> Result<Self, ApiError> {
        let base_url = parse_base_url(&config.base_url)?;

        let per_second = NonZeroU32::new(config.rate_limit.requests_per_second).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(config.rate_limit.burst_capacity).unwrap_or(per_second);
        let rate_limiter = Arc::new(RateLimiter::direct(Quota::per_second(per_second).allow_burst(burst)));

        // The session cookie set by login lives in this jar for the life of the client
        let client = Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(config.timeout_seconds.max(1)))
            .build()?;

        let cache = Cache::builder()
            .max_capacity(100)
            .time_to_live(Duration::from_secs(config.state_cache_ttl_seconds))
            .build();

        Ok(Self {
            client,
            base_url,
            rate_limiter,
            cache,
            metrics,
        })
    }

    pub fn metrics(&self) -> &ApiMetrics {
        &self.metrics
    }

    pub fn url(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|err| ApiError::InvalidUrl {
                url: format!("{}{}", self.base_url, path),
                reason: err.to_string(),
            })
    }

    /// GET a JSON body, served from the cache when `cache_key` is set and fresh
    pub async fn get_json(
        &self,
        path: &str,
        query: &[(&str, String)],
        cache_key: Option<&str>,
    ) -> Result<Value, ApiError> {
        if let Some(key) = cache_key {
            if let Some(cached) = self.cache.get(key).await {
                self.metrics.record_cache_hit();
                debug!("Cache hit for key: {}", key);
                return Ok(cached);
            }
            self.metrics.record_cache_miss();
        }

        let request = self.client.get(self.url(path)?).query(query);
        let value = self.send(path, request).await?;

        if let Some(key) = cache_key {
            self.cache.insert(key.to_string(), value.clone()).await;
            debug!("Cached response for {}", key);
        }

        Ok(value)
    }

    pub async fn post_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        let request = self.client.post(self.url(path)?).json(body);
        self.send(path, request).await
    }

    async fn send(&self, path: &str, request: RequestBuilder) -> Result<Value, ApiError> {
        self.rate_limiter
            .until_ready_with_jitter(Jitter::up_to(Duration::from_millis(20)))
            .await;
        self.metrics.record_request();
        debug!(path = path, "Sending backend request");

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                self.metrics.record_error();
                warn!(path = path, error = %err, "Backend request failed");
                return Err(err.into());
            }
        };

        let status = response.status();
        let body = response.text().await.inspect_err(|_| self.metrics.record_error())?;

        if !status.is_success() {
            self.metrics.record_error();
            let message = normalize_error_body(status.as_u16(), &body);
            warn!(path = path, status = status.as_u16(), %message, "Backend returned an error");
            return Err(ApiError::Http {
                status: status.as_u16(),
                message,
            });
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&body).map_err(|err| {
            self.metrics.record_error();
            ApiError::decode(path, err)
        })
    }

    pub fn clear_cache(&self) {
        self.cache.invalidate_all();
        info!("HTTP client cache cleared");
    }
}

/// Parse the configured base URL, forcing a trailing slash so relative
/// joins keep any path prefix such as `/api/proxy`.
fn parse_base_url(raw: &str) -> Result<Url, ApiError> {
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };
    Url::parse(&normalized).map_err(|err| ApiError::InvalidUrl {
        url: raw.to_string(),
        reason: err.to_string(),
    })
}
