//! Тело + headless интеграция
//!
//! Контроллеры только ДОБАВЛЯЮТ силу за тик (`add_force`).
//! `integrate_bodies` применяет v += F/m·dt, p += v·dt и обнуляет силу.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Физическое тело (velocity + mass + накопленная сила)
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct PhysicsBody {
    pub velocity: Vec2,
    pub mass: f32,
    /// Сила за текущий тик (сбрасывается после интеграции)
    pub force: Vec2,
}

impl Default for PhysicsBody {
    fn default() -> Self {
        Self {
            velocity: Vec2::ZERO,
            mass: 1.0,
            force: Vec2::ZERO,
        }
    }
}

impl PhysicsBody {
    pub fn new(mass: f32) -> Self {
        Self { mass, ..default() }
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn add_force(&mut self, force: Vec2) {
        self.force += force;
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }
}

/// Тег сущности для collision/trigger callbacks
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Reflect)]
#[reflect(Component)]
pub enum EntityTag {
    /// Игрок (лягушка)
    Hunter,
    /// Патруль (змея)
    Patrol,
    /// Муха
    Prey,
    /// Пузырь игрока
    Threat,
    /// Стены/камни
    Obstacle,
}

/// Круглый коллайдер агента
///
/// `trigger == true` → контакт приходит как on_trigger, не on_collision.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Collider {
    pub radius: f32,
    pub trigger: bool,
}

impl Collider {
    pub fn solid(radius: f32) -> Self {
        Self { radius, trigger: false }
    }

    pub fn trigger(radius: f32) -> Self {
        Self { radius, trigger: true }
    }
}

/// Система: интеграция velocity → Transform (headless режим)
pub fn integrate_bodies(
    mut bodies: Query<(&mut PhysicsBody, &mut Transform)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (mut body, mut transform) in bodies.iter_mut() {
        integrate_body(&mut body, &mut transform, delta);
    }
}

/// Один шаг semi-implicit Euler (используется системой и тестами)
pub fn integrate_body(body: &mut PhysicsBody, transform: &mut Transform, delta: f32) {
    // mass <= 0 → статичное тело, силу игнорируем
    if body.mass > 0.0 {
        let accel = body.force / body.mass;
        body.velocity += accel * delta;
    }
    body.force = Vec2::ZERO;

    transform.translation += (body.velocity * delta).extend(0.0);
}
