use geo::{Distance, Haversine};

use crate::{
    directions_error::{DirectionsError, DirectionsStatus},
    directions_provider::DirectionsProvider,
    geopoint::GeoPoint,
    polyline,
    route_geometry::{Leg, RouteGeometry},
    route_request::RouteRequest,
};

pub const DEFAULT_SPEED_KMH: f64 = 40.0;

/// Straight-line routes at a constant speed. Needs no network access.
#[derive(Debug, Clone, Copy)]
pub struct AsTheCrowFlies {
    speed_kmh: f64,
}

impl Default for AsTheCrowFlies {
    fn default() -> Self {
        AsTheCrowFlies {
            speed_kmh: DEFAULT_SPEED_KMH,
        }
    }
}

impl AsTheCrowFlies {
    pub fn new(speed_kmh: f64) -> Self {
        AsTheCrowFlies { speed_kmh }
    }

    pub fn route(&self, request: &RouteRequest) -> Result<RouteGeometry, DirectionsError> {
        if self.speed_kmh.is_nan() || self.speed_kmh <= 0.0 {
            return Err(DirectionsError::status(
                DirectionsStatus::InvalidRequest,
                Some(format!("speed must be positive, got {}", self.speed_kmh)),
            ));
        }

        let points: Vec<GeoPoint> = request.points().copied().collect();
        let haversine = Haversine;

        let legs = points
            .windows(2)
            .enumerate()
            .map(|(index, pair)| {
                let distance_km = haversine.distance(
                    geo_types::Point::from(pair[0]),
                    geo_types::Point::from(pair[1]),
                ) / 1000.0;

                Leg {
                    from_label: request.point_label(index),
                    to_label: request.point_label(index + 1),
                    distance_km,
                    duration_min: distance_km / self.speed_kmh * 60.0,
                }
            })
            .collect();

        Ok(RouteGeometry::from_legs(polyline::encode(&points), legs))
    }
}

impl DirectionsProvider for AsTheCrowFlies {
    async fn get_route(&self, request: &RouteRequest) -> Result<RouteGeometry, DirectionsError> {
        self.route(request)
    }

    fn name(&self) -> &'static str {
        "as_the_crow_flies"
    }
}
