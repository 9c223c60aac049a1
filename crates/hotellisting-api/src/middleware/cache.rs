//! `Cache-Control` headers for read endpoints.

use axum::http::header::CACHE_CONTROL;
use axum::http::{HeaderValue, Response};
use tower_http::set_header::{MakeHeaderValue, SetResponseHeaderLayer};

use hotellisting_core::config::CacheConfig;

/// Produces the `Cache-Control` value for successful responses only, so
/// errors are never cached by clients or proxies.
#[derive(Debug, Clone)]
pub struct CachePolicy {
    value: Option<HeaderValue>,
}

impl CachePolicy {
    /// Build the policy; `None` when caching is disabled.
    pub fn new(config: &CacheConfig) -> Self {
        let value = config
            .enabled
            .then(|| format!("public, max-age={}", config.max_age_seconds))
            .and_then(|v| HeaderValue::from_str(&v).ok());
        Self { value }
    }
}

impl<B> MakeHeaderValue<Response<B>> for CachePolicy {
    fn make_header_value(&mut self, response: &Response<B>) -> Option<HeaderValue> {
        if response.status().is_success() {
            self.value.clone()
        } else {
            None
        }
    }
}

/// Layer applied to GET routes. Handlers that set their own
/// `Cache-Control` keep it.
pub type CacheLayer = SetResponseHeaderLayer<CachePolicy>;

/// Builds the cache header layer from configuration.
pub fn build_cache_layer(config: &CacheConfig) -> CacheLayer {
    SetResponseHeaderLayer::if_not_present(CACHE_CONTROL, CachePolicy::new(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn response(status: StatusCode) -> Response<()> {
        let mut response = Response::new(());
        *response.status_mut() = status;
        response
    }

    #[test]
    fn test_success_gets_max_age() {
        let mut policy = CachePolicy::new(&CacheConfig::default());
        let value = policy.make_header_value(&response(StatusCode::OK));
        assert_eq!(value.unwrap(), "public, max-age=120");
    }

    #[test]
    fn test_errors_are_not_cached() {
        let mut policy = CachePolicy::new(&CacheConfig::default());
        assert!(policy.make_header_value(&response(StatusCode::NOT_FOUND)).is_none());
    }

    #[test]
    fn test_disabled_policy_emits_nothing() {
        let mut policy = CachePolicy::new(&CacheConfig {
            enabled: false,
            max_age_seconds: 60,
        });
        assert!(policy.make_header_value(&response(StatusCode::OK)).is_none());
    }
}
