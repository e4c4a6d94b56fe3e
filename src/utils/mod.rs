pub mod constants;
pub mod coordinates;

pub use constants::*;
pub use coordinates::{grid_key, haversine_distance, round_tenths};
