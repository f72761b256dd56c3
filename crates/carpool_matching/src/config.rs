use std::time::Duration;

use jiff::SignedDuration;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;

use crate::{
    error::InvalidInputError, geometry::DEFAULT_PROXIMITY_THRESHOLD_KM, score::DEFAULT_MIN_SCORE,
    score::TieBreak,
};

/// Tunables for a single matching request. Every field has a default, so a
/// partial JSON document is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct MatchConfig {
    /// Maximum distance from a passenger point to the candidate's route.
    pub proximity_threshold_km: f64,
    pub time_window_min: u16,
    /// Inclusion threshold on the match score.
    pub min_score: u8,
    /// Also require pickup or dropoff to be on route.
    pub require_geometric_signal: bool,
    pub order_tolerance: f64,
    pub max_concurrent_fetches: usize,
    pub fetch_timeout: SignedDuration,
    /// `None` keeps cached routes for the lifetime of the route client.
    pub cache_ttl: Option<SignedDuration>,
    pub transient_retries: u32,
    pub retry_backoff: SignedDuration,
    /// Budget for the whole detour phase. Unfinished candidates are returned
    /// without routes when it expires.
    pub deadline: Option<SignedDuration>,
    pub clamp_negative_detour: bool,
    pub tie_break: TieBreak,
    pub use_cached_polylines: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        MatchConfig {
            proximity_threshold_km: DEFAULT_PROXIMITY_THRESHOLD_KM,
            time_window_min: 30,
            min_score: DEFAULT_MIN_SCORE,
            require_geometric_signal: true,
            order_tolerance: 0.0,
            max_concurrent_fetches: 6,
            fetch_timeout: SignedDuration::from_secs(10),
            cache_ttl: Some(SignedDuration::from_mins(10)),
            transient_retries: 1,
            retry_backoff: SignedDuration::from_millis(250),
            deadline: None,
            clamp_negative_detour: true,
            tie_break: TieBreak::default(),
            use_cached_polylines: true,
        }
    }
}

impl MatchConfig {
    pub fn validate(&self) -> Result<(), InvalidInputError> {
        let invalid = |message: &str| Err(InvalidInputError::Config(message.to_string()));

        if !self.proximity_threshold_km.is_finite() || self.proximity_threshold_km < 0.0 {
            return invalid("proximity_threshold_km must be a non-negative number");
        }

        if !self.order_tolerance.is_finite() || self.order_tolerance < 0.0 {
            return invalid("order_tolerance must be a non-negative number");
        }

        if self.min_score > 100 {
            return invalid("min_score must be at most 100");
        }

        if self.max_concurrent_fetches == 0 {
            return invalid("max_concurrent_fetches must be at least 1");
        }

        if self.max_concurrent_fetches > Semaphore::MAX_PERMITS {
            return invalid("max_concurrent_fetches is too large");
        }

        if !self.fetch_timeout.is_positive() {
            return invalid("fetch_timeout must be positive");
        }

        if self.retry_backoff.is_negative() {
            return invalid("retry_backoff must not be negative");
        }

        if self.cache_ttl.is_some_and(|ttl| ttl.is_negative()) {
            return invalid("cache_ttl must not be negative");
        }

        if self.deadline.is_some_and(|deadline| !deadline.is_positive()) {
            return invalid("deadline must be positive");
        }

        Ok(())
    }

    pub fn fetch_timeout(&self) -> Duration {
        self.fetch_timeout.unsigned_abs()
    }

    pub fn cache_ttl(&self) -> Option<Duration> {
        self.cache_ttl.map(SignedDuration::unsigned_abs)
    }

    pub fn retry_backoff(&self) -> Duration {
        self.retry_backoff.unsigned_abs()
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline.map(SignedDuration::unsigned_abs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(MatchConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: MatchConfig = serde_json::from_str(
            r#"{ "min_score": 60, "fetch_timeout": "PT2S", "tie_break": "id_only" }"#,
        )
        .unwrap();

        assert_eq!(config.min_score, 60);
        assert_eq!(config.fetch_timeout(), Duration::from_secs(2));
        assert_eq!(config.tie_break, TieBreak::IdOnly);
        assert_eq!(config.time_window_min, 30);
        assert_eq!(config.proximity_threshold_km, 2.0);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = MatchConfig {
            max_concurrent_fetches: 0,
            ..MatchConfig::default()
        };
        assert!(matches!(config.validate(), Err(InvalidInputError::Config(_))));

        let config = MatchConfig {
            fetch_timeout: SignedDuration::ZERO,
            ..MatchConfig::default()
        };
        assert!(config.validate().is_err());

        let config = MatchConfig {
            proximity_threshold_km: f64::NAN,
            ..MatchConfig::default()
        };
        assert!(config.validate().is_err());

        let config = MatchConfig {
            min_score: 101,
            ..MatchConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_concurrency_above_semaphore_limit() {
        let config = MatchConfig {
            max_concurrent_fetches: usize::MAX,
            ..MatchConfig::default()
        };
        assert!(matches!(config.validate(), Err(InvalidInputError::Config(_))));

        let config = MatchConfig {
            max_concurrent_fetches: Semaphore::MAX_PERMITS,
            ..MatchConfig::default()
        };
        assert_eq!(config.validate(), Ok(()));
    }
}
