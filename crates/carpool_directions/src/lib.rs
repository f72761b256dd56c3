pub mod as_the_crow_flies;
pub mod directions_client;
pub mod directions_error;
pub mod directions_provider;
pub mod geopoint;
pub mod google_directions_api;
pub mod osrm_api;
pub mod polyline;
pub mod route_geometry;
pub mod route_request;
