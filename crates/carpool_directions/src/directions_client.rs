use crate::{
    as_the_crow_flies::AsTheCrowFlies,
    directions_error::DirectionsError,
    directions_provider::{DirectionsProvider, DirectionsProviderKind},
    google_directions_api::{GoogleDirectionsClient, GoogleDirectionsClientParams},
    osrm_api::{OsrmRouteClient, OsrmRouteClientParams},
    route_geometry::RouteGeometry,
    route_request::RouteRequest,
};

#[derive(Default)]
pub struct DirectionsCredentials {
    pub google_api_key: Option<String>,
}

/// Dispatches to the provider selected by a [`DirectionsProviderKind`].
pub enum DirectionsClient {
    GoogleDirections(GoogleDirectionsClient),
    Osrm(OsrmRouteClient),
    AsTheCrowFlies(AsTheCrowFlies),
}

impl DirectionsClient {
    pub fn new(
        kind: DirectionsProviderKind,
        credentials: DirectionsCredentials,
    ) -> Result<Self, DirectionsError> {
        match kind {
            DirectionsProviderKind::GoogleDirections => {
                let api_key = credentials
                    .google_api_key
                    .ok_or(DirectionsError::MissingApiKey("google_directions"))?;

                Ok(DirectionsClient::GoogleDirections(
                    GoogleDirectionsClient::new(GoogleDirectionsClientParams::new(api_key)),
                ))
            }
            DirectionsProviderKind::Osrm { url } => Ok(DirectionsClient::Osrm(
                OsrmRouteClient::new(OsrmRouteClientParams { osrm_url: url }),
            )),
            DirectionsProviderKind::AsTheCrowFlies { speed_kmh } => {
                Ok(DirectionsClient::AsTheCrowFlies(AsTheCrowFlies::new(speed_kmh)))
            }
        }
    }
}

impl DirectionsProvider for DirectionsClient {
    async fn get_route(&self, request: &RouteRequest) -> Result<RouteGeometry, DirectionsError> {
        match self {
            DirectionsClient::GoogleDirections(client) => client.fetch_route(request).await,
            DirectionsClient::Osrm(client) => client.fetch_route(request).await,
            DirectionsClient::AsTheCrowFlies(client) => client.route(request),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            DirectionsClient::GoogleDirections(client) => client.name(),
            DirectionsClient::Osrm(client) => client.name(),
            DirectionsClient::AsTheCrowFlies(client) => client.name(),
        }
    }
}
