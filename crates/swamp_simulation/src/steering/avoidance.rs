//! Obstacle avoidance: веерный поиск свободного направления
//!
//! Алгоритм (greedy, не оптимальный):
//! 1. Circle cast радиусом агента по прямой к цели. Свободно → цель как есть.
//! 2. Заблокировано → веер: i = 1, 2, 3, … пока есть hit и i ≤ 360 / angle.
//!    Угол кандидата = ceil(i / 2) × angle, на чётных i — со знаком минус
//!    (+angle, −angle, +2·angle, −2·angle, …). Длина кандидата = длина
//!    исходного offset.
//! 3. Возвращаем первый свободный кандидат, а если свободных нет — последний
//!    проверенный.
//!
//! Порядок обхода определяет, в какую сторону агент предпочитает уходить,
//! поэтому он фиксирован.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{ensure_non_negative, ensure_positive, Result};
use crate::physics::{CollisionLayers, ShapeCaster};
use crate::steering::{arrive, rotate, seek};

/// Параметры obstacle avoidance (per patrol entity)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Reflect)]
pub struct AvoidanceParams {
    pub enable: bool,
    /// Какие слои считаются препятствиями
    pub obstacle_mask: CollisionLayers,
    /// Шаг веера в градусах
    pub angle: f32,
    /// Радиус агента (collider radius × scale). Задаётся один раз при спавне.
    #[serde(skip)]
    radius: f32,
}

impl Default for AvoidanceParams {
    fn default() -> Self {
        Self {
            enable: true,
            obstacle_mask: CollisionLayers::OBSTACLE,
            angle: 15.0,
            radius: 0.0,
        }
    }
}

impl AvoidanceParams {
    pub fn new(enable: bool, obstacle_mask: CollisionLayers, angle: f32, agent_radius: f32) -> Result<Self> {
        if enable {
            ensure_positive("avoidance.angle", angle)?;
        }
        ensure_non_negative("avoidance.radius", agent_radius)?;

        Ok(Self {
            enable,
            obstacle_mask,
            angle,
            radius: agent_radius,
        })
    }

    /// Выключенный avoidance (чистый seek/arrive)
    pub fn disabled() -> Self {
        Self {
            enable: false,
            obstacle_mask: CollisionLayers::NONE,
            angle: 0.0,
            radius: 0.0,
        }
    }

    /// Копия с радиусом агента (collider radius × uniform scale)
    pub fn with_agent_radius(self, collider_radius: f32, scale: f32) -> Result<Self> {
        Self::new(self.enable, self.obstacle_mask, self.angle, collider_radius * scale)
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn validate(&self) -> Result<()> {
        Self::new(self.enable, self.obstacle_mask, self.angle, self.radius).map(|_| ())
    }
}

/// Цель с учётом препятствий (см. описание модуля)
pub fn get_avoidance_target<C: ShapeCaster + ?Sized>(
    position: Vec2,
    target: Vec2,
    params: &AvoidanceParams,
    caster: &C,
) -> Vec2 {
    if !params.enable {
        return target;
    }

    let direction = target - position;
    let mut blocked = caster
        .circle_cast(position, params.radius(), direction, direction.length(), params.obstacle_mask)
        .is_some();

    let mut new_target = target;
    let max_iterations = 360.0 / params.angle;
    let mut i: u32 = 1;

    while blocked && (i as f32) <= max_iterations {
        let mut adjusted = (i as f32 / 2.0).ceil() * params.angle;
        if i % 2 == 0 {
            adjusted = -adjusted;
        }

        let candidate = rotate(direction, adjusted);
        new_target = position + candidate;

        blocked = caster
            .circle_cast(position, params.radius(), candidate, candidate.length(), params.obstacle_mask)
            .is_some();
        i += 1;
    }

    new_target
}

/// Seek через avoidance (если включён)
pub fn seek_with_avoidance<C: ShapeCaster + ?Sized>(
    position: Vec2,
    target: Vec2,
    max_speed: f32,
    params: &AvoidanceParams,
    caster: &C,
) -> Vec2 {
    let target = get_avoidance_target(position, target, params, caster);
    seek(position, target, max_speed)
}

/// Arrive через avoidance (если включён)
pub fn arrive_with_avoidance<C: ShapeCaster + ?Sized>(
    position: Vec2,
    target: Vec2,
    arrive_radius: f32,
    max_speed: f32,
    params: &AvoidanceParams,
    caster: &C,
) -> Vec2 {
    let target = get_avoidance_target(position, target, params, caster);
    arrive(position, target, arrive_radius, max_speed)
}
