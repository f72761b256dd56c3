use carpool_directions::{
    directions_error::DirectionsError, directions_provider::DirectionsProvider,
    route_geometry::RouteGeometry, route_request::RouteRequest,
};
use tokio::sync::Semaphore;
use tracing::{instrument, warn};

use crate::{
    candidate::{CandidateRoute, PassengerQuery},
    match_result::RouteStatus,
    route_client::{FetchOptions, RouteClient},
};

const LEG_LABELS: [&str; 4] = [
    "Driver start",
    "Passenger pickup",
    "Passenger dropoff",
    "Driver destination",
];

/// The candidate's own trip, without the passenger.
pub fn original_request(candidate: &CandidateRoute) -> RouteRequest {
    RouteRequest::new(candidate.pickup, candidate.dropoff)
}

/// The candidate's trip through the passenger's pickup and dropoff.
pub fn recommended_request(candidate: &CandidateRoute, query: &PassengerQuery) -> RouteRequest {
    original_request(candidate).with_waypoints(vec![query.pickup, query.dropoff])
}

/// Renames the legs of a recommended route. Any leg count other than three
/// means the provider did not route through both waypoints.
pub fn label_legs(mut route: RouteGeometry) -> Result<RouteGeometry, DirectionsError> {
    let expected = LEG_LABELS.len() - 1;
    if route.legs.len() != expected {
        return Err(DirectionsError::MalformedResponse(format!(
            "expected {expected} legs on the recommended route, got {}",
            route.legs.len()
        )));
    }

    for (leg, labels) in route.legs.iter_mut().zip(LEG_LABELS.windows(2)) {
        leg.from_label = labels[0].to_string();
        leg.to_label = labels[1].to_string();
    }

    Ok(route)
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DetourEvaluation {
    pub original_route: Option<RouteGeometry>,
    pub recommended_route: Option<RouteGeometry>,
    pub detour_distance_km: Option<f64>,
    pub detour_duration_min: Option<f64>,
    /// Set when at least one route could not be fetched.
    pub error: Option<String>,
}

impl DetourEvaluation {
    pub fn failed(error: impl Into<String>) -> Self {
        DetourEvaluation {
            error: Some(error.into()),
            ..DetourEvaluation::default()
        }
    }

    pub fn route_status(&self) -> RouteStatus {
        match &self.error {
            Some(error) => RouteStatus::Degraded {
                error: error.clone(),
            },
            None => RouteStatus::Resolved,
        }
    }
}

fn difference(recommended: f64, original: f64, clamp: bool) -> f64 {
    let detour = recommended - original;
    if clamp { detour.max(0.0) } else { detour }
}

/// Fetches the original and recommended routes concurrently. Fetch failures
/// are reported in the evaluation, never as an error of the request.
#[instrument(skip_all, fields(candidate = %candidate.id))]
pub async fn evaluate_detour<P: DirectionsProvider>(
    candidate: &CandidateRoute,
    query: &PassengerQuery,
    route_client: &RouteClient<P>,
    options: &FetchOptions,
    limiter: &Semaphore,
    clamp_negative_detour: bool,
) -> DetourEvaluation {
    let original_request = original_request(candidate);
    let recommended_request = recommended_request(candidate, query);

    let (original, recommended) = futures::join!(
        route_client.get_route(&original_request, options, limiter),
        route_client.get_route(&recommended_request, options, limiter)
    );
    let recommended = recommended.and_then(label_legs);

    let mut errors = Vec::new();
    let original_route = original
        .inspect_err(|error| errors.push(format!("original route: {error}")))
        .ok();
    let recommended_route = recommended
        .inspect_err(|error| errors.push(format!("recommended route: {error}")))
        .ok();

    let (detour_distance_km, detour_duration_min) = match (&original_route, &recommended_route) {
        (Some(original), Some(recommended)) => (
            Some(difference(
                recommended.distance_km,
                original.distance_km,
                clamp_negative_detour,
            )),
            Some(difference(
                recommended.duration_min,
                original.duration_min,
                clamp_negative_detour,
            )),
        ),
        _ => (None, None),
    };

    let error = if errors.is_empty() {
        None
    } else {
        let error = errors.join("; ");
        warn!("Route resolution degraded: {error}");
        Some(error)
    };

    DetourEvaluation {
        original_route,
        recommended_route,
        detour_distance_km,
        detour_duration_min,
        error,
    }
}
