use std::future::Future;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    directions_error::DirectionsError, route_geometry::RouteGeometry,
    route_request::RouteRequest,
};

/// A source of driving routes. Implementations report non-OK provider
/// statuses as [`DirectionsError::Status`], never as empty routes.
pub trait DirectionsProvider: Send + Sync {
    /// Returns one leg per consecutive pair of [`RouteRequest::points`].
    fn get_route(
        &self,
        request: &RouteRequest,
    ) -> impl Future<Output = Result<RouteGeometry, DirectionsError>> + Send;

    fn name(&self) -> &'static str;
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum DirectionsProviderKind {
    /// https://developers.google.com/maps/documentation/directions/get-directions
    GoogleDirections,
    Osrm {
        url: String,
    },
    AsTheCrowFlies {
        speed_kmh: f64,
    },
}
