use serde::Deserialize;
use tracing::debug;

use crate::{
    directions_error::{DirectionsError, DirectionsStatus},
    directions_provider::DirectionsProvider,
    geopoint::GeoPoint,
    route_geometry::{Leg, RouteGeometry},
    route_request::RouteRequest,
};

pub const GOOGLE_DIRECTIONS_API_URL: &str =
    "https://maps.googleapis.com/maps/api/directions/json";

#[derive(Deserialize)]
struct TextValue {
    value: f64,
}

#[derive(Deserialize)]
struct DirectionsLeg {
    /// Meters
    distance: TextValue,
    /// Seconds
    duration: TextValue,
    start_address: Option<String>,
    end_address: Option<String>,
}

#[derive(Deserialize)]
struct OverviewPolyline {
    points: String,
}

#[derive(Deserialize)]
struct DirectionsRoute {
    overview_polyline: OverviewPolyline,
    legs: Vec<DirectionsLeg>,
}

#[derive(Deserialize)]
struct DirectionsResponse {
    status: DirectionsStatus,
    error_message: Option<String>,
    #[serde(default)]
    routes: Vec<DirectionsRoute>,
}

pub struct GoogleDirectionsClientParams {
    pub api_key: String,
    pub base_url: String,
}

impl GoogleDirectionsClientParams {
    pub fn new(api_key: String) -> Self {
        GoogleDirectionsClientParams {
            api_key,
            base_url: String::from(GOOGLE_DIRECTIONS_API_URL),
        }
    }
}

pub struct GoogleDirectionsClient {
    params: GoogleDirectionsClientParams,
    client: reqwest::Client,
}

fn format_point(point: &GeoPoint) -> String {
    format!("{},{}", point.latitude, point.longitude)
}

impl GoogleDirectionsClient {
    pub fn new(params: GoogleDirectionsClientParams) -> Self {
        Self {
            params,
            client: reqwest::Client::new(),
        }
    }

    pub async fn fetch_route(
        &self,
        request: &RouteRequest,
    ) -> Result<RouteGeometry, DirectionsError> {
        let mut query = vec![
            ("origin", format_point(&request.origin)),
            ("destination", format_point(&request.destination)),
            ("mode", String::from("driving")),
            ("key", self.params.api_key.clone()),
        ];

        if !request.waypoints.is_empty() {
            let waypoints = request
                .waypoints
                .iter()
                .map(format_point)
                .collect::<Vec<_>>()
                .join("|");
            query.push(("waypoints", waypoints));
        }

        debug!(
            waypoints = request.waypoints.len(),
            "GoogleDirections: requesting route"
        );

        let response = self
            .client
            .get(&self.params.base_url)
            .query(&query)
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(DirectionsError::status(DirectionsStatus::OverQueryLimit, None));
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(DirectionsError::status(
                DirectionsStatus::UnknownError,
                Some(format!("HTTP {}: {}", status.as_u16(), message)),
            ));
        }

        let body: DirectionsResponse = response.json().await?;
        Self::into_geometry(request, body)
    }

    fn into_geometry(
        request: &RouteRequest,
        body: DirectionsResponse,
    ) -> Result<RouteGeometry, DirectionsError> {
        if body.status != DirectionsStatus::Ok {
            return Err(DirectionsError::status(body.status, body.error_message));
        }

        let route = body.routes.into_iter().next().ok_or_else(|| {
            DirectionsError::status(
                DirectionsStatus::ZeroResults,
                Some(String::from("status OK without routes")),
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
                from_label: leg
                    .start_address
                    .unwrap_or_else(|| request.point_label(index)),
                to_label: leg
                    .end_address
                    .unwrap_or_else(|| request.point_label(index + 1)),
                distance_km: leg.distance.value / 1000.0,
                duration_min: leg.duration.value / 60.0,
            })
            .collect();

        Ok(RouteGeometry::from_legs(route.overview_polyline.points, legs))
    }
}

impl DirectionsProvider for GoogleDirectionsClient {
    async fn get_route(&self, request: &RouteRequest) -> Result<RouteGeometry, DirectionsError> {
        self.fetch_route(request).await
    }

    fn name(&self) -> &'static str {
        "google_directions"
    }
}
