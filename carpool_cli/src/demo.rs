use carpool_directions::as_the_crow_flies::AsTheCrowFlies;
use carpool_matching::{config::MatchConfig, find_matches, fixtures, route_client::RouteClient};
use tracing::info;

use crate::output;

/// Matches the commuter query against the sample drivers with straight-line
/// routes.
pub async fn run(json: bool) -> anyhow::Result<()> {
    let query = fixtures::commuter_query();
    let drivers = fixtures::mock_drivers();
    let route_client = RouteClient::new(AsTheCrowFlies::default());

    info!(drivers = drivers.len(), "Running demo");

    let results = find_matches(&query, &drivers, &MatchConfig::default(), &route_client).await?;
    output::print_results(&results, json)
}
