use serde::Deserialize;
use tracing::debug;

use crate::{
    directions_error::{DirectionsError, DirectionsStatus},
    directions_provider::DirectionsProvider,
    route_geometry::{Leg, RouteGeometry},
    route_request::RouteRequest,
};

pub const OSRM_ROUTE_API_PATH: &str = "/route/v1/driving/";

#[derive(Deserialize)]
struct OsrmLeg {
    /// Meters
    distance: f64,
    /// Seconds
    duration: f64,
}

#[derive(Deserialize)]
struct OsrmRoute {
    geometry: String,
    legs: Vec<OsrmLeg>,
}

#[derive(Deserialize)]
struct OsrmResponse {
    code: String,
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

fn status_from_code(code: &str) -> DirectionsStatus {
    match code {
        "Ok" => DirectionsStatus::Ok,
        "NoRoute" => DirectionsStatus::ZeroResults,
        "NoSegment" => DirectionsStatus::NotFound,
        "TooBig" => DirectionsStatus::MaxWaypointsExceeded,
        "InvalidUrl" | "InvalidService" | "InvalidVersion" | "InvalidOptions"
        | "InvalidQuery" | "InvalidValue" => DirectionsStatus::InvalidRequest,
        _ => DirectionsStatus::UnknownError,
    }
}

pub struct OsrmRouteClientParams {
    pub osrm_url: String,
}

pub struct OsrmRouteClient {
    params: OsrmRouteClientParams,
    client: reqwest::Client,
}

impl OsrmRouteClient {
    pub fn new(params: OsrmRouteClientParams) -> Self {
        Self {
            params,
            client: reqwest::Client::new(),
        }
    }

    fn route_url(&self, request: &RouteRequest) -> String {
        let mut url = self.params.osrm_url.trim_end_matches('/').to_string();
        url.push_str(OSRM_ROUTE_API_PATH);

        let coordinates = request
            .points()
            .map(|point| format!("{},{}", point.longitude, point.latitude))
            .collect::<Vec<_>>()
            .join(";");
        url.push_str(&coordinates);

        url
    }

    pub async fn fetch_route(
        &self,
        request: &RouteRequest,
    ) -> Result<RouteGeometry, DirectionsError> {
        let url = self.route_url(request);
        debug!(%url, "OSRM: requesting route");

        let response = self
            .client
            .get(url)
            .query(&[
                ("overview", "full"),
                ("geometries", "polyline"),
                ("steps", "false"),
            ])
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(DirectionsError::status(DirectionsStatus::OverQueryLimit, None));
        }

        if status.is_server_error() {
            let message = response.text().await.unwrap_or_default();
            return Err(DirectionsError::status(
                DirectionsStatus::UnknownError,
                Some(format!("HTTP {}: {}", status.as_u16(), message)),
            ));
        }

        // OSRM reports request errors as 4xx with a JSON body carrying the code
        let body: OsrmResponse = response.json().await?;
        Self::into_geometry(request, body)
    }

    fn into_geometry(
        request: &RouteRequest,
        body: OsrmResponse,
    ) -> Result<RouteGeometry, DirectionsError> {
        let status = status_from_code(&body.code);
        if status != DirectionsStatus::Ok {
            return Err(DirectionsError::status(status, body.message));
        }

        let route = body.routes.into_iter().next().ok_or_else(|| {
            DirectionsError::status(
                DirectionsStatus::ZeroResults,
                Some(String::from("code Ok without routes")),
            )
        })?;

        if route.legs.len() != request.num_legs() {
            return Err(DirectionsError::MalformedResponse(format!(
                "expected {} legs, got {}",
                request.num_legs(),
                route.legs.len()
            )));
        }

        let legs = route
            .legs
            .into_iter()
            .enumerate()
            .map(|(index, leg)| Leg {
                from_label: request.point_label(index),
                to_label: request.point_label(index + 1),
                distance_km: leg.distance / 1000.0,
                duration_min: leg.duration / 60.0,
            })
            .collect();

        Ok(RouteGeometry::from_legs(route.geometry, legs))
    }
}

impl DirectionsProvider for OsrmRouteClient {
    async fn get_route(&self, request: &RouteRequest) -> Result<RouteGeometry, DirectionsError> {
        self.fetch_route(request).await
    }

    fn name(&self) -> &'static str {
        "osrm"
    }
}
