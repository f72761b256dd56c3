use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    geopoint::GeoPoint,
    polyline::{self, PolylineError},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Leg {
    pub from_label: String,
    pub to_label: String,
    pub distance_km: f64,
    pub duration_min: f64,
}

/// A route as returned by a directions provider. Distances are in kilometers,
/// durations in minutes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RouteGeometry {
    pub distance_km: f64,
    pub duration_min: f64,
    pub polyline: String,
    pub legs: Vec<Leg>,
}

impl RouteGeometry {
    /// Builds a geometry whose totals are the sum of its legs.
    pub fn from_legs(polyline: String, legs: Vec<Leg>) -> Self {
        let distance_km = legs.iter().map(|leg| leg.distance_km).sum();
        let duration_min = legs.iter().map(|leg| leg.duration_min).sum();

        RouteGeometry {
            distance_km,
            duration_min,
            polyline,
            legs,
        }
    }

    pub fn path(&self) -> Result<Vec<GeoPoint>, PolylineError> {
        polyline::decode(&self.polyline)
    }
}
