use crate::geopoint::GeoPoint;

#[derive(Debug, Clone, PartialEq)]
pub struct RouteRequest {
    pub origin: GeoPoint,
    pub destination: GeoPoint,
    pub waypoints: Vec<GeoPoint>,
}

impl RouteRequest {
    pub fn new(origin: GeoPoint, destination: GeoPoint) -> Self {
        RouteRequest {
            origin,
            destination,
            waypoints: Vec::new(),
        }
    }

    pub fn with_waypoints(mut self, waypoints: Vec<GeoPoint>) -> Self {
        self.waypoints = waypoints;
        self
    }

    /// Origin, waypoints in order, then destination.
    pub fn points(&self) -> impl Iterator<Item = &GeoPoint> {
        std::iter::once(&self.origin)
            .chain(self.waypoints.iter())
            .chain(std::iter::once(&self.destination))
    }

    pub fn num_legs(&self) -> usize {
        self.waypoints.len() + 1
    }

    /// Labels used for provider legs before callers give them a meaning.
    pub fn point_label(&self, index: usize) -> String {
        if index == 0 {
            String::from("origin")
        } else if index > self.waypoints.len() {
            String::from("destination")
        } else {
            format!("waypoint {index}")
        }
    }
}
