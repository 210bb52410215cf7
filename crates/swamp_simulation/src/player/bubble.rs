//! Пузырь (threat object): летит по инерции, лопается по таймеру или об препятствие

use bevy::prelude::*;

use crate::controller::{ContactResponse, Controller};
use crate::physics::EntityTag;

/// Время жизни пузыря по умолчанию (секунды)
pub const BUBBLE_POP_TIME: f32 = 2.0;

#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Bubble {
    elapsed: f32,
    pub pop_time: f32,
}

impl Default for Bubble {
    fn default() -> Self {
        Self::new(BUBBLE_POP_TIME)
    }
}

impl Bubble {
    pub fn new(pop_time: f32) -> Self {
        Self { elapsed: 0.0, pop_time }
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn is_expired(&self) -> bool {
        self.elapsed > self.pop_time
    }
}

/// Контейнер пузырей (parent для всех Bubble)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct ThreatContainer;

impl Controller for Bubble {
    type Input<'a> = ();

    /// Пузырь не рулит — только стареет
    fn tick(&mut self, _input: (), delta: f32) -> Option<Vec2> {
        self.elapsed += delta;
        None
    }

    fn on_collision(&mut self, other: EntityTag) -> ContactResponse {
        match other {
            EntityTag::Obstacle | EntityTag::Patrol => ContactResponse {
                despawn_self: true,
                ..ContactResponse::NONE
            },
            _ => ContactResponse::NONE,
        }
    }
}
