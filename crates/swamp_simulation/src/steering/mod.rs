//! Steering engine (чистые функции, без ECS state)
//!
//! - force: rotate, velocity_to_force
//! - behaviors: seek / flee / arrive / separation / cohesion / alignment / anchor
//! - avoidance: веерный поиск цели в обход препятствий (через ShapeCaster)

pub mod avoidance;
pub mod behaviors;
pub mod force;


pub use avoidance::{arrive_with_avoidance, get_avoidance_target, seek_with_avoidance, AvoidanceParams};
pub use behaviors::{alignment, anchor, arrive, cohesion, flee, seek, separation};
pub use force::{rotate, velocity_to_force};
