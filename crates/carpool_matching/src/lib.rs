pub mod candidate;
pub mod config;
pub mod detour;
pub mod error;
pub mod fixtures;
pub mod geometry;
pub mod match_result;
pub mod normalize;
mod pipeline;
pub mod route_cache;
pub mod route_client;
pub mod schedule;
pub mod score;

pub use pipeline::find_matches;

#[cfg(test)]
pub(crate) mod test_utils;
