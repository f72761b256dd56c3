use std::time::Duration;

use carpool_directions::{
    directions_error::DirectionsError, directions_provider::DirectionsProvider,
    route_geometry::RouteGeometry, route_request::RouteRequest,
};
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::{
    config::MatchConfig,
    route_cache::{RouteCache, RouteKey},
};

/// Per-fetch policy, derived from a [`MatchConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FetchOptions {
    pub timeout: Duration,
    pub cache_ttl: Option<Duration>,
    pub transient_retries: u32,
    pub retry_backoff: Duration,
}

impl From<&MatchConfig> for FetchOptions {
    fn from(config: &MatchConfig) -> Self {
        FetchOptions {
            timeout: config.fetch_timeout(),
            cache_ttl: config.cache_ttl(),
            transient_retries: config.transient_retries,
            retry_backoff: config.retry_backoff(),
        }
    }
}

/// Wraps a [`DirectionsProvider`] with a route cache, per-call timeouts and
/// retries of transient failures. Only successful routes are cached.
pub struct RouteClient<P> {
    provider: P,
    cache: RouteCache,
}

impl<P: DirectionsProvider> RouteClient<P> {
    pub fn new(provider: P) -> Self {
        RouteClient {
            provider,
            cache: RouteCache::default(),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn cache(&self) -> &RouteCache {
        &self.cache
    }

    pub fn cached_route(
        &self,
        request: &RouteRequest,
        ttl: Option<Duration>,
    ) -> Option<RouteGeometry> {
        self.cache.get(&RouteKey::new(request), ttl)
    }

    /// Fetches a route, holding a `limiter` permit only while the provider
    /// call is in flight.
    pub async fn get_route(
        &self,
        request: &RouteRequest,
        options: &FetchOptions,
        limiter: &Semaphore,
    ) -> Result<RouteGeometry, DirectionsError> {
        let key = RouteKey::new(request);
        if let Some(route) = self.cache.get(&key, options.cache_ttl) {
            debug!(provider = self.provider.name(), "Route cache hit");
            return Ok(route);
        }

        let mut attempt = 0;
        loop {
            let result = {
                let _permit = limiter
                    .acquire()
                    .await
                    .map_err(|_| DirectionsError::Cancelled)?;

                match tokio::time::timeout(options.timeout, self.provider.get_route(request)).await
                {
                    Ok(result) => result,
                    Err(_) => Err(DirectionsError::Timeout(options.timeout)),
                }
            };

            match result {
                Ok(route) => {
                    debug!(
                        provider = self.provider.name(),
                        distance_km = route.distance_km,
                        legs = route.legs.len(),
                        "Fetched route"
                    );
                    self.cache.insert(key, route.clone());
                    return Ok(route);
                }
                Err(error) if error.is_transient() && attempt < options.transient_retries => {
                    let backoff = options
                        .retry_backoff
                        .saturating_mul(2u32.saturating_pow(attempt));
                    attempt += 1;
                    warn!(
                        provider = self.provider.name(),
                        attempt,
                        ?backoff,
                        "Transient routing error, retrying: {error}"
                    );
                    tokio::time::sleep(backoff).await;
                }
                Err(error) => return Err(error),
            }
        }
    }
}
