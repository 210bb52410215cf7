//! AI components: FSM-контроллеры мух и змей

pub mod flock;
pub mod patrol;

// Tests (separate files with _tests suffix)
#[cfg(test)]
mod flock_tests;

// Re-export all components
pub use flock::*;
pub use patrol::*;
