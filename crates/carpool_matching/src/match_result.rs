use carpool_directions::route_geometry::RouteGeometry;
use schemars::JsonSchema;
use serde::Serialize;

/// How far route resolution got for a retained candidate.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum RouteStatus {
    /// Both routes were fetched and the detour is known.
    Resolved,
    /// Routing was attempted but at least one fetch failed.
    Degraded { error: String },
    /// The passenger's points are in the wrong order for this candidate.
    NotAttempted,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct MatchResult {
    pub candidate_ref: String,
    pub owner_rating: f64,
    pub match_score: u8,
    pub pickup_distance_km: Option<f64>,
    pub dropoff_distance_km: Option<f64>,
    pub is_valid_order: bool,
    pub reasons: Vec<String>,
    pub original_route: Option<RouteGeometry>,
    pub recommended_route: Option<RouteGeometry>,
    pub detour_distance_km: Option<f64>,
    pub detour_duration_min: Option<f64>,
    pub route_status: RouteStatus,
}

impl MatchResult {
    pub fn is_resolved(&self) -> bool {
        self.route_status == RouteStatus::Resolved
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self.route_status, RouteStatus::Degraded { .. })
    }
}
