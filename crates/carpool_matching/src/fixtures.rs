//! Sample drivers around central Bucharest, used by the demo command and tests.

use carpool_directions::geopoint::GeoPoint;

use crate::{
    candidate::{CandidateRoute, PassengerQuery},
    schedule::{ScheduleSpec, Weekday},
};

pub fn john_doe() -> CandidateRoute {
    CandidateRoute {
        id: String::from("ride-1"),
        owner_id: String::from("driver-1"),
        owner_name: String::from("John Doe"),
        owner_rating: 4.8,
        pickup: GeoPoint::new(44.4268, 26.1025),
        dropoff: GeoPoint::new(44.4515, 26.0853),
        schedule: ScheduleSpec::new(Weekday::WEEKDAYS, "7:30 AM"),
        price: 15.0,
        available_seats: 3,
    }
}

pub fn jane_smith() -> CandidateRoute {
    CandidateRoute {
        id: String::from("ride-2"),
        owner_id: String::from("driver-2"),
        owner_name: String::from("Jane Smith"),
        owner_rating: 4.9,
        pickup: GeoPoint::new(44.4338, 26.1025),
        dropoff: GeoPoint::new(44.4585, 26.0853),
        schedule: ScheduleSpec::new(Weekday::WEEKDAYS, "7:45 AM"),
        price: 12.5,
        available_seats: 2,
    }
}

pub fn bob_johnson() -> CandidateRoute {
    CandidateRoute {
        id: String::from("ride-3"),
        owner_id: String::from("driver-3"),
        owner_name: String::from("Bob Johnson"),
        owner_rating: 4.5,
        pickup: GeoPoint::new(44.4800, 26.1500),
        dropoff: GeoPoint::new(44.5000, 26.1700),
        schedule: ScheduleSpec::new([Weekday::Mon, Weekday::Wed, Weekday::Fri], "8:00 AM"),
        price: 10.0,
        available_seats: 1,
    }
}

pub fn mock_drivers() -> Vec<CandidateRoute> {
    vec![john_doe(), jane_smith(), bob_johnson()]
}

/// A weekday morning commute that lies along John Doe's and Jane Smith's routes.
pub fn commuter_query() -> PassengerQuery {
    PassengerQuery {
        pickup: GeoPoint::new(44.4378, 26.0967),
        dropoff: GeoPoint::new(44.4450, 26.0880),
        schedule: ScheduleSpec::new(Weekday::WEEKDAYS, "7:30 AM"),
    }
}
