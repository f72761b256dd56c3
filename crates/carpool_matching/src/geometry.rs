//! Planar point-to-route proximity and ordering.
//!
//! Coordinates are treated as a flat plane (longitude as x, latitude as y) and
//! degree distances are converted with a fixed factor. This holds at city
//! scale; no geodesic correction is applied.

use carpool_directions::geopoint::GeoPoint;

pub const KM_PER_DEGREE: f64 = 111.0;
pub const DEFAULT_PROXIMITY_THRESHOLD_KM: f64 = 2.0;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Projection {
    pub distance_km: f64,
    /// Position of the closest point along the route, 0 at the start, 1 at the end.
    pub projection_param: f64,
}

fn degree_distance(a: GeoPoint, b: GeoPoint) -> f64 {
    (a.longitude - b.longitude).hypot(a.latitude - b.latitude)
}

/// Returns the clamped projection parameter of `point` on the segment and the
/// distance in degrees to the projected point.
fn project_on_segment(point: GeoPoint, start: GeoPoint, end: GeoPoint) -> (f64, f64) {
    let dx = end.longitude - start.longitude;
    let dy = end.latitude - start.latitude;
    let length_squared = dx * dx + dy * dy;

    if length_squared == 0.0 {
        return (0.0, degree_distance(point, start));
    }

    let t = ((point.longitude - start.longitude) * dx + (point.latitude - start.latitude) * dy)
        / length_squared;
    let t = t.clamp(0.0, 1.0);

    let projected = GeoPoint::new(start.latitude + t * dy, start.longitude + t * dx);
    (t, degree_distance(point, projected))
}

pub fn evaluate(point: GeoPoint, segment_start: GeoPoint, segment_end: GeoPoint) -> Projection {
    let (projection_param, distance) = project_on_segment(point, segment_start, segment_end);

    Projection {
        distance_km: distance * KM_PER_DEGREE,
        projection_param,
    }
}

pub fn is_on_route(point: GeoPoint, start: GeoPoint, end: GeoPoint, threshold_km: f64) -> bool {
    evaluate(point, start, end).distance_km <= threshold_km
}

/// The pickup must project no later along the route than the dropoff.
pub fn is_valid_order(pickup_param: f64, dropoff_param: f64, tolerance: f64) -> bool {
    pickup_param <= dropoff_param + tolerance
}

/// Strategy used to project passenger points onto a candidate's route.
pub trait RouteProjection {
    fn project(&self, point: GeoPoint) -> Projection;

    fn name(&self) -> &'static str;
}

/// Straight line from the candidate's pickup to its dropoff. Always available.
#[derive(Debug, Clone, Copy)]
pub struct ChordProjection {
    pub start: GeoPoint,
    pub end: GeoPoint,
}

impl RouteProjection for ChordProjection {
    fn project(&self, point: GeoPoint) -> Projection {
        evaluate(point, self.start, self.end)
    }

    fn name(&self) -> &'static str {
        "chord"
    }
}

/// Projection onto a fetched route path. The segment closest to the point
/// wins and the parameter is the fraction of path length before the
/// projected point.
#[derive(Debug, Clone)]
pub struct PolylineProjection {
    path: Vec<GeoPoint>,
    cumulative: Vec<f64>,
    total_length: f64,
}

impl PolylineProjection {
    /// Returns `None` for paths with fewer than two points.
    pub fn new(path: Vec<GeoPoint>) -> Option<Self> {
        if path.len() < 2 {
            return None;
        }

        let mut cumulative = Vec::with_capacity(path.len());
        let mut total_length = 0.0;
        cumulative.push(0.0);
        for pair in path.windows(2) {
            total_length += degree_distance(pair[0], pair[1]);
            cumulative.push(total_length);
        }

        Some(PolylineProjection {
            path,
            cumulative,
            total_length,
        })
    }
}

impl RouteProjection for PolylineProjection {
    fn project(&self, point: GeoPoint) -> Projection {
        let mut best_distance = f64::INFINITY;
        let mut best_position = 0.0;

        for (index, pair) in self.path.windows(2).enumerate() {
            let (t, distance) = project_on_segment(point, pair[0], pair[1]);

            if distance < best_distance {
                let segment_length = self.cumulative[index + 1] - self.cumulative[index];
                best_distance = distance;
                best_position = self.cumulative[index] + t * segment_length;
            }
        }

        let projection_param = if self.total_length > 0.0 {
            (best_position / self.total_length).clamp(0.0, 1.0)
        } else {
            0.0
        };

        Projection {
            distance_km: best_distance * KM_PER_DEGREE,
            projection_param,
        }
    }

    fn name(&self) -> &'static str {
        "polyline"
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeometryMatch {
    pub pickup: Projection,
    pub dropoff: Projection,
    pub pickup_on_route: bool,
    pub dropoff_on_route: bool,
    pub is_valid_order: bool,
}

pub fn evaluate_geometry<R>(
    route: &R,
    pickup: GeoPoint,
    dropoff: GeoPoint,
    threshold_km: f64,
    order_tolerance: f64,
) -> GeometryMatch
where
    R: RouteProjection + ?Sized,
{
    let pickup = route.project(pickup);
    let dropoff = route.project(dropoff);

    GeometryMatch {
        pickup,
        dropoff,
        pickup_on_route: pickup.distance_km <= threshold_km,
        dropoff_on_route: dropoff.distance_km <= threshold_km,
        is_valid_order: is_valid_order(
            pickup.projection_param,
            dropoff.projection_param,
            order_tolerance,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DRIVER_PICKUP: GeoPoint = GeoPoint::new(44.4268, 26.1025);
    const DRIVER_DROPOFF: GeoPoint = GeoPoint::new(44.4515, 26.0853);
    const PASSENGER_PICKUP: GeoPoint = GeoPoint::new(44.4378, 26.0967);
    const PASSENGER_DROPOFF: GeoPoint = GeoPoint::new(44.4450, 26.0880);

    #[test]
    fn test_evaluate_projects_inside_segment() {
        let projection = evaluate(PASSENGER_PICKUP, DRIVER_PICKUP, DRIVER_DROPOFF);

        assert!((projection.projection_param - 0.41).abs() < 0.01);
        assert!(projection.distance_km < 0.2);
    }

    #[test]
    fn test_evaluate_clamps_to_segment_ends() {
        let start = GeoPoint::new(0.0, 0.0);
        let end = GeoPoint::new(0.0, 1.0);

        let before = evaluate(GeoPoint::new(0.0, -1.0), start, end);
        assert_eq!(before.projection_param, 0.0);
        assert!((before.distance_km - KM_PER_DEGREE).abs() < 1e-9);

        let after = evaluate(GeoPoint::new(1.0, 2.0), start, end);
        assert_eq!(after.projection_param, 1.0);
        assert!((after.distance_km - 2.0_f64.sqrt() * KM_PER_DEGREE).abs() < 1e-9);
    }

    #[test]
    fn test_evaluate_degenerate_segment() {
        let point = GeoPoint::new(0.0, 0.0);
        let projection = evaluate(GeoPoint::new(0.01, 0.0), point, point);

        assert_eq!(projection.projection_param, 0.0);
        assert!((projection.distance_km - 1.11).abs() < 1e-9);
    }

    #[test]
    fn test_is_on_route_threshold_is_inclusive() {
        let start = GeoPoint::new(0.0, 0.0);
        let end = GeoPoint::new(0.0, 1.0);
        let point = GeoPoint::new(1.0, 0.5);

        assert!(is_on_route(point, start, end, KM_PER_DEGREE));
        assert!(!is_on_route(point, start, end, KM_PER_DEGREE - 0.001));
        assert!(is_on_route(PASSENGER_PICKUP, DRIVER_PICKUP, DRIVER_DROPOFF, 2.0));
    }

    #[test]
    fn test_is_valid_order() {
        assert!(is_valid_order(0.2, 0.8, 0.0));
        assert!(is_valid_order(0.5, 0.5, 0.0));
        assert!(!is_valid_order(0.8, 0.2, 0.0));
        assert!(is_valid_order(0.55, 0.5, 0.1));
    }

    #[test]
    fn test_reversed_route_is_invalid_order() {
        let forward = ChordProjection {
            start: DRIVER_PICKUP,
            end: DRIVER_DROPOFF,
        };
        let reversed = ChordProjection {
            start: DRIVER_DROPOFF,
            end: DRIVER_PICKUP,
        };

        let forward_match =
            evaluate_geometry(&forward, PASSENGER_PICKUP, PASSENGER_DROPOFF, 2.0, 0.0);
        let reversed_match =
            evaluate_geometry(&reversed, PASSENGER_PICKUP, PASSENGER_DROPOFF, 2.0, 0.0);

        assert!(forward_match.is_valid_order);
        assert!(!reversed_match.is_valid_order);
        assert!(reversed_match.pickup_on_route && reversed_match.dropoff_on_route);
    }

    #[test]
    fn test_polyline_projection_follows_the_path() {
        // An L-shaped route: east along the equator, then north.
        let path = vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 1.0),
            GeoPoint::new(1.0, 1.0),
        ];
        let polyline = PolylineProjection::new(path).unwrap();

        let on_second_leg = polyline.project(GeoPoint::new(0.5, 1.01));
        assert!((on_second_leg.projection_param - 0.75).abs() < 1e-9);
        assert!((on_second_leg.distance_km - 0.01 * KM_PER_DEGREE).abs() < 1e-9);

        // The chord from start to end passes far from the corner.
        let chord = ChordProjection {
            start: GeoPoint::new(0.0, 0.0),
            end: GeoPoint::new(1.0, 1.0),
        };
        let corner = GeoPoint::new(0.0, 1.0);
        assert!(polyline.project(corner).distance_km < 1e-9);
        assert!(chord.project(corner).distance_km > 70.0);
    }

    #[test]
    fn test_polyline_projection_requires_two_points() {
        assert!(PolylineProjection::new(vec![]).is_none());
        assert!(PolylineProjection::new(vec![GeoPoint::new(0.0, 0.0)]).is_none());
    }
}
