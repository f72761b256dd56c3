use std::{
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};

use carpool_directions::{
    as_the_crow_flies::AsTheCrowFlies,
    directions_error::{DirectionsError, DirectionsStatus},
    directions_provider::DirectionsProvider,
    geopoint::GeoPoint,
    route_geometry::{Leg, RouteGeometry},
    route_request::RouteRequest,
};

/// Counts a call as in flight until dropped, including on cancellation.
struct InFlight<'a> {
    current: &'a AtomicUsize,
}

impl<'a> InFlight<'a> {
    fn enter(current: &'a AtomicUsize, peak: &AtomicUsize) -> Self {
        let now = current.fetch_add(1, Ordering::SeqCst) + 1;
        peak.fetch_max(now, Ordering::SeqCst);
        InFlight { current }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.current.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Scripted provider backed by straight-line routes.
pub struct MockProvider {
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    transient_failures: AtomicUsize,
    direct_failure: Option<DirectionsStatus>,
    waypoint_failure: Option<DirectionsStatus>,
    delay: Option<Duration>,
    slow_origin: Option<(GeoPoint, Duration)>,
    waypoint_distance_scale: f64,
    inner: AsTheCrowFlies,
}

impl Default for MockProvider {
    fn default() -> Self {
        MockProvider {
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
            transient_failures: AtomicUsize::new(0),
            direct_failure: None,
            waypoint_failure: None,
            delay: None,
            slow_origin: None,
            waypoint_distance_scale: 1.0,
            inner: AsTheCrowFlies::default(),
        }
    }
}

impl MockProvider {
    /// The first `count` calls fail with `OVER_QUERY_LIMIT`.
    pub fn with_transient_failures(self, count: usize) -> Self {
        self.transient_failures.store(count, Ordering::SeqCst);
        self
    }

    /// Routes without waypoints fail with `status`.
    pub fn with_direct_failure(mut self, status: DirectionsStatus) -> Self {
        self.direct_failure = Some(status);
        self
    }

    /// Routes with waypoints fail with `status`.
    pub fn with_waypoint_failure(mut self, status: DirectionsStatus) -> Self {
        self.waypoint_failure = Some(status);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Only requests starting at `origin` are delayed.
    pub fn with_slow_origin(mut self, origin: GeoPoint, delay: Duration) -> Self {
        self.slow_origin = Some((origin, delay));
        self
    }

    /// Multiplies leg distances and durations of routes with waypoints, e.g.
    /// to make them shorter than the direct route.
    pub fn with_waypoint_distance_scale(mut self, scale: f64) -> Self {
        self.waypoint_distance_scale = scale;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of calls that were running at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

impl DirectionsProvider for MockProvider {
    async fn get_route(&self, request: &RouteRequest) -> Result<RouteGeometry, DirectionsError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let _in_flight = InFlight::enter(&self.in_flight, &self.peak_in_flight);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let slow = self.slow_origin.filter(|(origin, _)| *origin == request.origin);
        if let Some((_, delay)) = slow {
            tokio::time::sleep(delay).await;
        }

        let remaining = self.transient_failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.transient_failures.store(remaining - 1, Ordering::SeqCst);
            return Err(DirectionsError::status(DirectionsStatus::OverQueryLimit, None));
        }

        let has_waypoints = !request.waypoints.is_empty();
        let failure = if has_waypoints {
            self.waypoint_failure
        } else {
            self.direct_failure
        };
        if let Some(status) = failure {
            return Err(DirectionsError::status(status, None));
        }

        let route = self.inner.route(request)?;
        if !has_waypoints {
            return Ok(route);
        }

        let legs = route
            .legs
            .into_iter()
            .map(|leg| Leg {
                distance_km: leg.distance_km * self.waypoint_distance_scale,
                duration_min: leg.duration_min * self.waypoint_distance_scale,
                ..leg
            })
            .collect::<Vec<_>>();

        Ok(RouteGeometry::from_legs(route.polyline, legs))
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
