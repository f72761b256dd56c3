use carpool_directions::geopoint::GeoPoint;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{error::InvalidInputError, schedule::ScheduleSpec};

pub const MAX_OWNER_RATING: f64 = 5.0;

fn validate_point(point: &GeoPoint, context: impl Into<String>) -> Result<(), InvalidInputError> {
    point
        .validate()
        .map_err(|source| InvalidInputError::Coordinate {
            context: context.into(),
            source,
        })
}

/// A driver's offered trip, as supplied by the ride store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CandidateRoute {
    pub id: String,
    pub owner_id: String,
    pub owner_name: String,
    pub owner_rating: f64,
    pub pickup: GeoPoint,
    pub dropoff: GeoPoint,
    pub schedule: ScheduleSpec,
    pub price: f64,
    pub available_seats: u32,
}

impl CandidateRoute {
    pub fn validate(&self) -> Result<(), InvalidInputError> {
        let invalid = |message: String| InvalidInputError::Candidate {
            candidate: self.id.clone(),
            message,
        };

        validate_point(&self.pickup, format!("candidate {} pickup", self.id))?;
        validate_point(&self.dropoff, format!("candidate {} dropoff", self.id))?;
        self.schedule.minutes()?;

        if !(0.0..=MAX_OWNER_RATING).contains(&self.owner_rating) {
            return Err(invalid(format!(
                "owner rating {} is outside [0, {MAX_OWNER_RATING}]",
                self.owner_rating
            )));
        }

        if !self.price.is_finite() || self.price < 0.0 {
            return Err(invalid(format!("price {} must be >= 0", self.price)));
        }

        if self.available_seats == 0 {
            return Err(invalid(String::from("no available seats")));
        }

        Ok(())
    }
}

/// A passenger's desired trip. One per matching request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PassengerQuery {
    pub pickup: GeoPoint,
    pub dropoff: GeoPoint,
    pub schedule: ScheduleSpec,
}

impl PassengerQuery {
    pub fn validate(&self) -> Result<(), InvalidInputError> {
        validate_point(&self.pickup, "passenger pickup")?;
        validate_point(&self.dropoff, "passenger dropoff")?;
        self.schedule.minutes()?;

        Ok(())
    }
}
