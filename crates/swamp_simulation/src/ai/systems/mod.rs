//! AI systems (FixedUpdate driver для контроллеров)

pub mod flock;
pub mod patrol;

// Re-export all systems
pub use flock::*;
pub use patrol::*;
