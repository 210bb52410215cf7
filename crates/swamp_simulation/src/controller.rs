//! Controller interface: tick + collision/trigger callbacks
//!
//! Каждый тип агента (муха, змея, лягушка, пузырь) реализует Controller.
//! Driver (AIPlugin / PlayerPlugin) вызывает `tick` ровно раз за fixed step
//! и пробрасывает ContactEvent в `on_collision` / `on_trigger`.

use bevy::prelude::*;

use crate::physics::{EntityTag, PhysicsBody};
use crate::steering::velocity_to_force;

/// Побочные эффекты контакта, которые применяет driver
///
/// Контроллер владеет только своим state; чужой state (здоровье лягушки,
/// despawn пузыря) меняет driver по этому отчёту.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContactResponse {
    /// Сколько здоровья снять с hunter'а
    pub hunter_damage: u32,
    /// Сколько мух засчитать hunter'у
    pub prey_caught: u32,
    /// Удалить себя (пузырь лопнул)
    pub despawn_self: bool,
}

impl ContactResponse {
    pub const NONE: Self = Self {
        hunter_damage: 0,
        prey_caught: 0,
        despawn_self: false,
    };
}

pub trait Controller {
    /// Snapshot окружения на начало тика
    type Input<'a>;

    /// Один fixed step. Возвращает desired velocity (None = не рулим)
    fn tick(&mut self, input: Self::Input<'_>, delta: f32) -> Option<Vec2>;

    fn on_collision(&mut self, _other: EntityTag) -> ContactResponse {
        ContactResponse::NONE
    }

    fn on_trigger(&mut self, _other: EntityTag) -> ContactResponse {
        ContactResponse::NONE
    }
}

/// Desired velocity → ограниченная сила, добавленная к телу
///
/// None от контроллера driver передаёт как `Vec2::ZERO`: тело тормозит
/// с тем же лимитом ускорения.
pub fn apply_desired_velocity(body: &mut PhysicsBody, desired: Vec2, accel_time: f32, max_accel: f32) {
    let force = velocity_to_force(desired, body.velocity, body.mass, accel_time, max_accel);
    body.add_force(force);
}
