use std::time::Duration;

use carpool_directions::{route_geometry::RouteGeometry, route_request::RouteRequest};
use fxhash::FxHashMap;
use parking_lot::RwLock;
use tokio::time::Instant;

/// Coordinates are rounded to 5 decimals (~1 m) when building keys.
const KEY_PRECISION: f64 = 1e5;

/// Rounded origin, ordered waypoints and destination of a route request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteKey {
    points: Vec<(i64, i64)>,
}

impl RouteKey {
    pub fn new(request: &RouteRequest) -> Self {
        let points = request
            .points()
            .map(|point| {
                (
                    (point.latitude * KEY_PRECISION).round() as i64,
                    (point.longitude * KEY_PRECISION).round() as i64,
                )
            })
            .collect();

        RouteKey { points }
    }
}

struct CachedRoute {
    route: RouteGeometry,
    inserted_at: Instant,
}

impl CachedRoute {
    fn is_fresh(&self, ttl: Option<Duration>) -> bool {
        ttl.is_none_or(|ttl| self.inserted_at.elapsed() <= ttl)
    }
}

/// In-memory route cache shared by concurrent fetches. Expiry is checked on
/// read against the TTL supplied by the caller.
#[derive(Default)]
pub struct RouteCache {
    entries: RwLock<FxHashMap<RouteKey, CachedRoute>>,
}

impl RouteCache {
    /// Returns the cached route if it is younger than `ttl`. A stale entry is
    /// removed.
    pub fn get(&self, key: &RouteKey, ttl: Option<Duration>) -> Option<RouteGeometry> {
        {
            let entries = self.entries.read();
            match entries.get(key) {
                Some(cached) if cached.is_fresh(ttl) => return Some(cached.route.clone()),
                Some(_) => {}
                None => return None,
            }
        }

        let mut entries = self.entries.write();
        if entries.get(key).is_some_and(|cached| !cached.is_fresh(ttl)) {
            entries.remove(key);
        }

        None
    }

    pub fn insert(&self, key: RouteKey, route: RouteGeometry) {
        self.entries.write().insert(
            key,
            CachedRoute {
                route,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Drops entries older than `ttl` and returns how many were removed.
    pub fn purge_expired(&self, ttl: Duration) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, cached| cached.is_fresh(Some(ttl)));
        before - entries.len()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
