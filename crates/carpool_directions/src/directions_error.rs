use std::{fmt::Display, time::Duration};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Status reported by a directions provider. The serialized names follow the
/// Google Directions API, OSRM codes are mapped onto them.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DirectionsStatus {
    Ok,
    ZeroResults,
    NotFound,
    InvalidRequest,
    MaxWaypointsExceeded,
    MaxRouteLengthExceeded,
    RequestDenied,
    OverQueryLimit,
    #[serde(other)]
    UnknownError,
}

impl DirectionsStatus {
    pub fn class(&self) -> ErrorClass {
        match self {
            DirectionsStatus::OverQueryLimit | DirectionsStatus::UnknownError => {
                ErrorClass::Transient
            }
            _ => ErrorClass::Permanent,
        }
    }
}

impl Display for DirectionsStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                DirectionsStatus::Ok => "OK",
                DirectionsStatus::ZeroResults => "ZERO_RESULTS",
                DirectionsStatus::NotFound => "NOT_FOUND",
                DirectionsStatus::InvalidRequest => "INVALID_REQUEST",
                DirectionsStatus::MaxWaypointsExceeded => "MAX_WAYPOINTS_EXCEEDED",
                DirectionsStatus::MaxRouteLengthExceeded => "MAX_ROUTE_LENGTH_EXCEEDED",
                DirectionsStatus::RequestDenied => "REQUEST_DENIED",
                DirectionsStatus::OverQueryLimit => "OVER_QUERY_LIMIT",
                DirectionsStatus::UnknownError => "UNKNOWN_ERROR",
            }
        )
    }
}

/// Transient errors may succeed when retried, permanent ones never will.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
    Transient,
    Permanent,
}

#[derive(Debug, Error)]
pub enum DirectionsError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Provider returned {status}: {}", .message.as_deref().unwrap_or("no details"))]
    Status {
        status: DirectionsStatus,
        message: Option<String>,
    },

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),

    #[error("Missing API key for {0}")]
    MissingApiKey(&'static str),

    #[error("Request cancelled before it was sent")]
    Cancelled,
}

impl DirectionsError {
    pub fn status(status: DirectionsStatus, message: Option<String>) -> Self {
        DirectionsError::Status { status, message }
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            DirectionsError::Request(error) => {
                if error.is_decode() || error.is_builder() {
                    ErrorClass::Permanent
                } else {
                    ErrorClass::Transient
                }
            }
            DirectionsError::Status { status, .. } => status.class(),
            DirectionsError::Timeout(_) => ErrorClass::Transient,
            DirectionsError::MalformedResponse(_)
            | DirectionsError::MissingApiKey(_)
            | DirectionsError::Cancelled => ErrorClass::Permanent,
        }
    }

    pub fn is_transient(&self) -> bool {
        self.class() == ErrorClass::Transient
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert_eq!(DirectionsStatus::OverQueryLimit.class(), ErrorClass::Transient);
        assert_eq!(DirectionsStatus::UnknownError.class(), ErrorClass::Transient);
        assert_eq!(DirectionsStatus::ZeroResults.class(), ErrorClass::Permanent);
        assert_eq!(DirectionsStatus::RequestDenied.class(), ErrorClass::Permanent);
    }

    #[test]
    fn test_error_classification() {
        assert!(DirectionsError::Timeout(Duration::from_secs(10)).is_transient());
        assert!(!DirectionsError::MalformedResponse(String::from("no legs")).is_transient());
        assert!(
            !DirectionsError::status(DirectionsStatus::RequestDenied, None).is_transient()
        );
    }

    #[test]
    fn test_status_deserializes_google_names() {
        let status: DirectionsStatus = serde_json::from_str("\"ZERO_RESULTS\"").unwrap();
        assert_eq!(status, DirectionsStatus::ZeroResults);

        let status: DirectionsStatus = serde_json::from_str("\"OK\"").unwrap();
        assert_eq!(status, DirectionsStatus::Ok);

        let status: DirectionsStatus = serde_json::from_str("\"SOMETHING_NEW\"").unwrap();
        assert_eq!(status, DirectionsStatus::UnknownError);
    }

    #[test]
    fn test_status_message_display() {
        let error = DirectionsError::status(
            DirectionsStatus::RequestDenied,
            Some(String::from("The provided API key is invalid.")),
        );
        assert_eq!(
            error.to_string(),
            "Provider returned REQUEST_DENIED: The provided API key is invalid."
        );
    }
}
