//! Conversion of ride store records into [`CandidateRoute`]s.
//!
//! Upstream records disagree on key names and coordinate shapes. They are
//! mapped once here so the matching core only sees canonical types.

use carpool_directions::geopoint::GeoPoint;
use serde::Deserialize;

use crate::{candidate::CandidateRoute, schedule::ScheduleSpec};

/// A coordinate as either `{ "lat": .., "lng": .. }` (with common key
/// variants) or a `[latitude, longitude]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawPoint {
    Object {
        #[serde(alias = "lat")]
        latitude: f64,
        #[serde(alias = "lng", alias = "lon", alias = "long")]
        longitude: f64,
    },
    Pair([f64; 2]),
}

impl From<RawPoint> for GeoPoint {
    fn from(point: RawPoint) -> Self {
        match point {
            RawPoint::Object {
                latitude,
                longitude,
            } => GeoPoint::new(latitude, longitude),
            RawPoint::Pair([latitude, longitude]) => GeoPoint::new(latitude, longitude),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawRideRecord {
    #[serde(alias = "_id", alias = "rideId")]
    pub id: String,
    #[serde(alias = "ownerId", alias = "driverId")]
    pub owner_id: String,
    #[serde(alias = "ownerName", alias = "driverName", default)]
    pub owner_name: String,
    #[serde(alias = "ownerRating", alias = "rating", default)]
    pub owner_rating: f64,
    #[serde(alias = "pickupLocation", alias = "origin")]
    pub pickup: RawPoint,
    #[serde(alias = "dropoffLocation", alias = "destination")]
    pub dropoff: RawPoint,
    pub schedule: ScheduleSpec,
    #[serde(default)]
    pub price: f64,
    #[serde(alias = "availableSeats", alias = "seats")]
    pub available_seats: u32,
}

impl From<RawRideRecord> for CandidateRoute {
    fn from(record: RawRideRecord) -> Self {
        CandidateRoute {
            id: record.id,
            owner_id: record.owner_id,
            owner_name: record.owner_name,
            owner_rating: record.owner_rating,
            pickup: record.pickup.into(),
            dropoff: record.dropoff.into(),
            schedule: record.schedule,
            price: record.price,
            available_seats: record.available_seats,
        }
    }
}

pub fn normalize_records(records: Vec<RawRideRecord>) -> Vec<CandidateRoute> {
    records.into_iter().map(CandidateRoute::from).collect()
}

/// Parses a JSON array of ride records. Range checks happen later, when the
/// candidates are matched.
pub fn parse_candidates(json: &str) -> Result<Vec<CandidateRoute>, serde_json::Error> {
    let records: Vec<RawRideRecord> = serde_json::from_str(json)?;
    Ok(normalize_records(records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{fixtures, schedule::Weekday};

    #[test]
    fn test_parse_mixed_coordinate_shapes() {
        let json = r#"[
            {
                "id": "ride-1",
                "ownerId": "driver-1",
                "ownerName": "John Doe",
                "rating": 4.8,
                "pickupLocation": { "lat": 44.4268, "lng": 26.1025 },
                "dropoffLocation": { "latitude": 44.4515, "longitude": 26.0853 },
                "schedule": { "days": ["mon", "tue", "wed", "thu", "fri"], "time": "7:30 AM" },
                "price": 15.0,
                "availableSeats": 3
            },
            {
                "_id": "ride-3",
                "driverId": "driver-3",
                "owner_name": "Bob Johnson",
                "owner_rating": 4.5,
                "pickup": [44.48, 26.15],
                "dropoff": { "lat": 44.50, "lon": 26.17 },
                "schedule": { "days": ["Monday", "Wednesday", "Friday"], "time": "8:00 AM" },
                "price": 10.0,
                "seats": 1
            }
        ]"#;

        let candidates = parse_candidates(json).unwrap();

        assert_eq!(candidates, vec![fixtures::john_doe(), fixtures::bob_johnson()]);
    }

    #[test]
    fn test_long_key_and_defaults() {
        let record: RawRideRecord = serde_json::from_str(
            r#"{
                "id": "ride-9",
                "owner_id": "driver-9",
                "pickup": { "lat": 1.0, "long": 2.0 },
                "dropoff": [3.0, 4.0],
                "schedule": { "days": ["sat"], "time": "10:00 AM" },
                "available_seats": 2
            }"#,
        )
        .unwrap();

        let candidate = CandidateRoute::from(record);
        assert_eq!(candidate.pickup, GeoPoint::new(1.0, 2.0));
        assert_eq!(candidate.dropoff, GeoPoint::new(3.0, 4.0));
        assert_eq!(candidate.schedule.days.first(), Some(&Weekday::Sat));
        assert_eq!(candidate.price, 0.0);
        assert_eq!(candidate.owner_name, "");
    }

    #[test]
    fn test_rejects_unknown_weekday() {
        let result = parse_candidates(
            r#"[{
                "id": "ride-1",
                "owner_id": "driver-1",
                "pickup": [1.0, 2.0],
                "dropoff": [3.0, 4.0],
                "schedule": { "days": ["someday"], "time": "10:00 AM" },
                "available_seats": 1
            }]"#,
        );

        assert!(result.is_err());
    }
}
