use std::{fs::File, io::BufReader, path::PathBuf};

use anyhow::Context;
use carpool_directions::{
    as_the_crow_flies::DEFAULT_SPEED_KMH,
    directions_client::{DirectionsClient, DirectionsCredentials},
    directions_provider::DirectionsProviderKind,
};
use carpool_matching::{
    candidate::PassengerQuery, config::MatchConfig, find_matches, normalize::parse_candidates,
    route_client::RouteClient,
};
use clap::{Args, ValueEnum};
use tracing::info;

use crate::{output, parsers};

const GOOGLE_MAPS_API_KEY: &str = "GOOGLE_MAPS_API_KEY";
const OSRM_URL: &str = "OSRM_URL";
const DEFAULT_OSRM_URL: &str = "https://router.project-osrm.org";

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum Provider {
    /// Straight lines at a constant speed, no network access
    Crow,
    Osrm,
    Google,
}

#[derive(Args)]
pub struct MatchArgs {
    /// Passenger query as JSON
    #[arg(short, long)]
    query: PathBuf,

    /// JSON array of ride records
    #[arg(short, long)]
    candidates: PathBuf,

    /// Match config as JSON, missing fields use defaults
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = Provider::Crow)]
    provider: Provider,

    /// Per-fetch timeout (e.g., "10s", "PT2S")
    #[arg(short, long, value_parser = parsers::parse_duration)]
    timeout: Option<jiff::SignedDuration>,

    /// Maximum number of route fetches in flight
    #[arg(long)]
    concurrency: Option<usize>,

    /// Print results as JSON instead of a table
    #[arg(long)]
    json: bool,
}

fn read_json<T: serde::de::DeserializeOwned>(path: &PathBuf) -> anyhow::Result<T> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).with_context(|| format!("Failed to parse {}", path.display()))
}

fn provider_kind(provider: Provider) -> DirectionsProviderKind {
    match provider {
        Provider::Crow => DirectionsProviderKind::AsTheCrowFlies {
            speed_kmh: DEFAULT_SPEED_KMH,
        },
        Provider::Osrm => DirectionsProviderKind::Osrm {
            url: std::env::var(OSRM_URL).unwrap_or_else(|_| String::from(DEFAULT_OSRM_URL)),
        },
        Provider::Google => DirectionsProviderKind::GoogleDirections,
    }
}

pub async fn run(args: MatchArgs) -> anyhow::Result<()> {
    let query: PassengerQuery = read_json(&args.query)?;

    let candidates_json = std::fs::read_to_string(&args.candidates)
        .with_context(|| format!("Failed to open {}", args.candidates.display()))?;
    let candidates = parse_candidates(&candidates_json)
        .with_context(|| format!("Failed to parse {}", args.candidates.display()))?;

    let mut config: MatchConfig = match &args.config {
        Some(path) => read_json(path)?,
        None => MatchConfig::default(),
    };
    if let Some(timeout) = args.timeout {
        config.fetch_timeout = timeout;
    }
    if let Some(concurrency) = args.concurrency {
        config.max_concurrent_fetches = concurrency;
    }

    let credentials = DirectionsCredentials {
        google_api_key: std::env::var(GOOGLE_MAPS_API_KEY).ok(),
    };
    let client = DirectionsClient::new(provider_kind(args.provider), credentials)?;
    let route_client = RouteClient::new(client);

    info!(
        candidates = candidates.len(),
        provider = ?args.provider,
        "Matching passenger query"
    );

    let results = find_matches(&query, &candidates, &config, &route_client).await?;
    output::print_results(&results, args.json)
}
