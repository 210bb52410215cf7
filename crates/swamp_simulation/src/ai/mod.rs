//! AI module: мухи (flock FSM) и змеи (patrol FSM)
//!
//! Компоненты держат FSM state и параметры, системы раз в fixed step
//! собирают snapshot окружения и вызывают `Controller::tick`.

use bevy::prelude::*;

use crate::driver::{configure_sets, SimulationSet};

pub mod components;
pub mod systems;

// Re-export основных типов
pub use components::{
    Flock, FlockSettings, Fly, FlyAppearance, FlyEvent, FlyParams, FlyState, PatrolPoint, Snake, SnakeAppearance,
    SnakeEvent, SnakeParams, SnakeState,
};

/// AI Plugin
///
/// Регистрирует AI системы в FixedUpdate для детерминизма:
/// 1. fly_update — FSM + flocking/flee/seek для всех мух (SimulationSet::Prey)
/// 2. snake_update — FSM + seek с avoidance для змей (SimulationSet::Patrol)
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        configure_sets(app);

        app.register_type::<Fly>()
            .register_type::<Flock>()
            .register_type::<Snake>()
            .add_systems(FixedUpdate, systems::fly_update.in_set(SimulationSet::Prey))
            .add_systems(FixedUpdate, systems::snake_update.in_set(SimulationSet::Patrol));
    }
}
