use carpool_directions::geopoint::CoordinateError;
use thiserror::Error;

/// Input that makes the whole matching request unusable.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InvalidInputError {
    #[error("invalid time {0:?}, expected H:MM AM/PM")]
    Time(String),

    #[error("unknown weekday {0:?}")]
    Weekday(String),

    #[error("{context}: {source}")]
    Coordinate {
        context: String,
        #[source]
        source: CoordinateError,
    },

    #[error("candidate {candidate}: {message}")]
    Candidate { candidate: String, message: String },

    #[error("invalid config: {0}")]
    Config(String),
}

#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),
}
