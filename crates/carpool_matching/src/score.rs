use std::cmp::Ordering;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{geometry::GeometryMatch, match_result::MatchResult, schedule::ScheduleMatch};

pub const DEFAULT_MIN_SCORE: u8 = 30;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MatchCriterion {
    PickupOnRoute,
    DropoffOnRoute,
    TimeMatch,
    DayMatch,
}

impl MatchCriterion {
    pub const ALL: [MatchCriterion; 4] = [
        MatchCriterion::PickupOnRoute,
        MatchCriterion::DropoffOnRoute,
        MatchCriterion::TimeMatch,
        MatchCriterion::DayMatch,
    ];

    pub fn weight(&self) -> u8 {
        match self {
            MatchCriterion::PickupOnRoute => 30,
            MatchCriterion::DropoffOnRoute => 30,
            MatchCriterion::TimeMatch => 25,
            MatchCriterion::DayMatch => 15,
        }
    }

    pub fn reason(&self) -> &'static str {
        match self {
            MatchCriterion::PickupOnRoute => "Pickup on route",
            MatchCriterion::DropoffOnRoute => "Dropoff on route",
            MatchCriterion::TimeMatch => "Schedule time matches",
            MatchCriterion::DayMatch => "Travel days overlap",
        }
    }

    pub fn is_geometric(&self) -> bool {
        matches!(
            self,
            MatchCriterion::PickupOnRoute | MatchCriterion::DropoffOnRoute
        )
    }
}

/// The satisfied criteria of one candidate, in [`MatchCriterion::ALL`] order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScoreBreakdown {
    satisfied: Vec<MatchCriterion>,
}

impl ScoreBreakdown {
    pub fn new(geometry: &GeometryMatch, schedule: &ScheduleMatch) -> Self {
        let satisfied = MatchCriterion::ALL
            .into_iter()
            .filter(|criterion| match criterion {
                MatchCriterion::PickupOnRoute => geometry.pickup_on_route,
                MatchCriterion::DropoffOnRoute => geometry.dropoff_on_route,
                MatchCriterion::TimeMatch => schedule.time,
                MatchCriterion::DayMatch => schedule.days,
            })
            .collect();

        ScoreBreakdown { satisfied }
    }

    pub fn satisfied(&self) -> &[MatchCriterion] {
        &self.satisfied
    }

    pub fn score(&self) -> u8 {
        self.satisfied.iter().map(MatchCriterion::weight).sum()
    }

    pub fn reasons(&self) -> Vec<String> {
        self.satisfied
            .iter()
            .map(|criterion| criterion.reason().to_string())
            .collect()
    }

    pub fn has_geometric_signal(&self) -> bool {
        self.satisfied.iter().any(MatchCriterion::is_geometric)
    }

    pub fn is_included(&self, min_score: u8, require_geometric_signal: bool) -> bool {
        self.score() >= min_score && (!require_geometric_signal || self.has_geometric_signal())
    }
}

/// Ordering applied to results with equal scores.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Higher owner rating first, then candidate id ascending.
    #[default]
    RatingThenId,
    IdOnly,
}

/// Total order used to rank results: score descending, then the tie break.
pub fn compare_results(a: &MatchResult, b: &MatchResult, tie_break: TieBreak) -> Ordering {
    let by_score = b.match_score.cmp(&a.match_score);

    match tie_break {
        TieBreak::RatingThenId => by_score
            .then_with(|| b.owner_rating.total_cmp(&a.owner_rating))
            .then_with(|| a.candidate_ref.cmp(&b.candidate_ref)),
        TieBreak::IdOnly => by_score.then_with(|| a.candidate_ref.cmp(&b.candidate_ref)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{geometry::Projection, match_result::RouteStatus};

    fn geometry(pickup_on_route: bool, dropoff_on_route: bool) -> GeometryMatch {
        let projection = Projection {
            distance_km: 0.0,
            projection_param: 0.0,
        };

        GeometryMatch {
            pickup: projection,
            dropoff: projection,
            pickup_on_route,
            dropoff_on_route,
            is_valid_order: true,
        }
    }

    fn result(candidate_ref: &str, match_score: u8, owner_rating: f64) -> MatchResult {
        MatchResult {
            candidate_ref: candidate_ref.to_string(),
            owner_rating,
            match_score,
            pickup_distance_km: None,
            dropoff_distance_km: None,
            is_valid_order: true,
            reasons: vec![],
            original_route: None,
            recommended_route: None,
            detour_distance_km: None,
            detour_duration_min: None,
            route_status: RouteStatus::NotAttempted,
        }
    }

    #[test]
    fn test_weights_sum_to_one_hundred() {
        let total: u8 = MatchCriterion::ALL.iter().map(MatchCriterion::weight).sum();
        assert_eq!(total, 100);
    }

    #[test]
    fn test_score_is_sum_of_satisfied_weights() {
        for pickup in [false, true] {
            for dropoff in [false, true] {
                for time in [false, true] {
                    for days in [false, true] {
                        let breakdown = ScoreBreakdown::new(
                            &geometry(pickup, dropoff),
                            &ScheduleMatch { time, days },
                        );
                        let expected = 30 * u8::from(pickup)
                            + 30 * u8::from(dropoff)
                            + 25 * u8::from(time)
                            + 15 * u8::from(days);

                        assert_eq!(breakdown.score(), expected);
                        assert_eq!(breakdown.reasons().len(), breakdown.satisfied().len());
                    }
                }
            }
        }
    }

    #[test]
    fn test_reasons_follow_criteria_order() {
        let breakdown = ScoreBreakdown::new(
            &geometry(true, false),
            &ScheduleMatch {
                time: false,
                days: true,
            },
        );

        assert_eq!(breakdown.score(), 45);
        assert_eq!(
            breakdown.reasons(),
            vec!["Pickup on route".to_string(), "Travel days overlap".to_string()]
        );
    }

    #[test]
    fn test_inclusion_rule() {
        let schedule_only = ScoreBreakdown::new(
            &geometry(false, false),
            &ScheduleMatch {
                time: true,
                days: true,
            },
        );
        assert_eq!(schedule_only.score(), 40);
        assert!(!schedule_only.is_included(30, true));
        assert!(schedule_only.is_included(30, false));

        let pickup_only = ScoreBreakdown::new(
            &geometry(true, false),
            &ScheduleMatch {
                time: false,
                days: false,
            },
        );
        assert!(pickup_only.is_included(30, true));
        assert!(!pickup_only.is_included(31, true));
    }

    #[test]
    fn test_compare_results_tie_breaks() {
        let mut results = vec![
            result("c", 70, 4.0),
            result("b", 100, 4.5),
            result("a", 100, 4.5),
            result("d", 100, 4.9),
        ];

        results.sort_by(|a, b| compare_results(a, b, TieBreak::RatingThenId));
        let order: Vec<&str> = results.iter().map(|r| r.candidate_ref.as_str()).collect();
        assert_eq!(order, vec!["d", "a", "b", "c"]);

        results.sort_by(|a, b| compare_results(a, b, TieBreak::IdOnly));
        let order: Vec<&str> = results.iter().map(|r| r.candidate_ref.as_str()).collect();
        assert_eq!(order, vec!["a", "b", "d", "c"]);
    }
}
