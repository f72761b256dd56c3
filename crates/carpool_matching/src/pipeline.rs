use carpool_directions::directions_provider::DirectionsProvider;
use futures::StreamExt;
use tokio::{sync::Semaphore, time::Instant};
use tracing::{debug, info, instrument, warn};

use crate::{
    candidate::{CandidateRoute, PassengerQuery},
    config::MatchConfig,
    detour::{self, DetourEvaluation},
    error::{InvalidInputError, MatchError},
    geometry::{ChordProjection, GeometryMatch, PolylineProjection, evaluate_geometry},
    match_result::{MatchResult, RouteStatus},
    route_client::{FetchOptions, RouteClient},
    schedule::evaluate_schedule,
    score::{ScoreBreakdown, compare_results},
};

const DEADLINE_EXCEEDED: &str = "deadline exceeded";

struct ScoredCandidate<'a> {
    candidate: &'a CandidateRoute,
    geometry: GeometryMatch,
    breakdown: ScoreBreakdown,
}

/// Scores one candidate without I/O. A route already in the cache replaces
/// the straight pickup to dropoff chord for projection.
fn score_candidate<'a, P: DirectionsProvider>(
    query: &PassengerQuery,
    candidate: &'a CandidateRoute,
    config: &MatchConfig,
    route_client: &RouteClient<P>,
    options: &FetchOptions,
) -> Result<ScoredCandidate<'a>, InvalidInputError> {
    let cached_path = if config.use_cached_polylines {
        route_client
            .cached_route(&detour::original_request(candidate), options.cache_ttl)
            .and_then(|route| route.path().ok())
            .and_then(PolylineProjection::new)
    } else {
        None
    };

    let geometry = match &cached_path {
        Some(polyline) => evaluate_geometry(
            polyline,
            query.pickup,
            query.dropoff,
            config.proximity_threshold_km,
            config.order_tolerance,
        ),
        None => evaluate_geometry(
            &ChordProjection {
                start: candidate.pickup,
                end: candidate.dropoff,
            },
            query.pickup,
            query.dropoff,
            config.proximity_threshold_km,
            config.order_tolerance,
        ),
    };

    let schedule = evaluate_schedule(&query.schedule, &candidate.schedule, config.time_window_min)?;
    let breakdown = ScoreBreakdown::new(&geometry, &schedule);

    debug!(
        candidate = %candidate.id,
        projection = if cached_path.is_some() { "polyline" } else { "chord" },
        score = breakdown.score(),
        valid_order = geometry.is_valid_order,
        "Scored candidate"
    );

    Ok(ScoredCandidate {
        candidate,
        geometry,
        breakdown,
    })
}

fn build_result(scored: ScoredCandidate<'_>, detour: Option<DetourEvaluation>) -> MatchResult {
    let (detour, route_status) = if !scored.geometry.is_valid_order {
        (DetourEvaluation::default(), RouteStatus::NotAttempted)
    } else {
        let detour = detour.unwrap_or_else(|| DetourEvaluation::failed(DEADLINE_EXCEEDED));
        let status = detour.route_status();
        (detour, status)
    };

    MatchResult {
        candidate_ref: scored.candidate.id.clone(),
        owner_rating: scored.candidate.owner_rating,
        match_score: scored.breakdown.score(),
        pickup_distance_km: Some(scored.geometry.pickup.distance_km),
        dropoff_distance_km: Some(scored.geometry.dropoff.distance_km),
        is_valid_order: scored.geometry.is_valid_order,
        reasons: scored.breakdown.reasons(),
        original_route: detour.original_route,
        recommended_route: detour.recommended_route,
        detour_distance_km: detour.detour_distance_km,
        detour_duration_min: detour.detour_duration_min,
        route_status,
    }
}

/// Matches a passenger against candidate trips and returns the retained
/// candidates ranked best first.
///
/// Invalid input fails the whole request. Routing failures only degrade the
/// affected candidates.
#[instrument(skip_all, fields(candidates = candidates.len()))]
pub async fn find_matches<P: DirectionsProvider>(
    query: &PassengerQuery,
    candidates: &[CandidateRoute],
    config: &MatchConfig,
    route_client: &RouteClient<P>,
) -> Result<Vec<MatchResult>, MatchError> {
    config.validate()?;
    query.validate()?;
    for candidate in candidates {
        candidate.validate()?;
    }

    let options = FetchOptions::from(config);
    if let Some(ttl) = options.cache_ttl {
        let purged = route_client.cache().purge_expired(ttl);
        if purged > 0 {
            debug!(purged, "Purged expired routes");
        }
    }

    let mut retained = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let scored = score_candidate(query, candidate, config, route_client, &options)?;
        if scored
            .breakdown
            .is_included(config.min_score, config.require_geometric_signal)
        {
            retained.push(scored);
        }
    }

    debug!(
        retained = retained.len(),
        excluded = candidates.len() - retained.len(),
        "Filtered candidates"
    );

    let mut detours: Vec<Option<DetourEvaluation>> = vec![None; retained.len()];
    {
        let limiter = Semaphore::new(config.max_concurrent_fetches);
        let limiter = &limiter;
        let options = &options;

        let pending = retained
            .iter()
            .enumerate()
            .filter(|(_, scored)| scored.geometry.is_valid_order)
            .map(|(index, scored)| async move {
                let evaluation = detour::evaluate_detour(
                    scored.candidate,
                    query,
                    route_client,
                    options,
                    limiter,
                    config.clamp_negative_detour,
                )
                .await;
                (index, evaluation)
            });

        let mut evaluations =
            futures::stream::iter(pending).buffer_unordered(config.max_concurrent_fetches);
        // a deadline too far out to represent never expires
        let deadline = config
            .deadline()
            .and_then(|deadline| Instant::now().checked_add(deadline));

        loop {
            let next = match deadline {
                Some(deadline) => {
                    match tokio::time::timeout_at(deadline, evaluations.next()).await {
                        Ok(next) => next,
                        Err(_) => {
                            warn!("Deadline exceeded, dropping unfinished route evaluations");
                            break;
                        }
                    }
                }
                None => evaluations.next().await,
            };

            let Some((index, evaluation)) = next else {
                break;
            };
            detours[index] = Some(evaluation);
        }
    }

    let mut results: Vec<MatchResult> = retained
        .into_iter()
        .zip(detours)
        .map(|(scored, detour)| build_result(scored, detour))
        .collect();
    results.sort_by(|a, b| compare_results(a, b, config.tie_break));

    info!(
        matches = results.len(),
        degraded = results.iter().filter(|result| result.is_degraded()).count(),
        "Matching done"
    );

    Ok(results)
}
