//! Hunter (лягушка): arrive к точке клика + стрельба пузырями
//!
//! Игрок отдаёт команды через `HunterCommand` events; input polling
//! живёт снаружи симуляции.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::bubble::BUBBLE_POP_TIME;
use crate::constants::{MIN_SPEED_TO_ANIMATE, TARGET_REACHED_TOLERANCE};
use crate::controller::Controller;
use crate::error::{ensure_non_negative, ensure_positive, ensure_range, Result};
use crate::steering;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Reflect)]
pub struct HunterParams {
    pub max_speed: f32,
    pub max_accel: f32,
    pub accel_time: f32,
    /// Arrival radius = clamp(arrive_pct × distance, min, max)
    pub arrive_pct: f32,
    pub min_arrive_radius: f32,
    pub max_arrive_radius: f32,
    /// Смещение точки спавна пузыря вдоль facing
    pub bubble_spawn_offset: f32,
    /// Скорость пузыря вдоль facing (плюс скорость лягушки)
    pub bubble_launch_speed: f32,
    /// Время жизни пузыря (секунды)
    pub bubble_pop_time: f32,
}

impl Default for HunterParams {
    fn default() -> Self {
        Self {
            max_speed: 4.0,
            max_accel: 12.0,
            accel_time: 0.15,
            arrive_pct: 0.3,
            min_arrive_radius: 0.5,
            max_arrive_radius: 3.0,
            bubble_spawn_offset: 0.8,
            bubble_launch_speed: 6.0,
            bubble_pop_time: BUBBLE_POP_TIME,
        }
    }
}

impl HunterParams {
    pub fn validate(&self) -> Result<()> {
        ensure_positive("hunter.max_speed", self.max_speed)?;
        ensure_positive("hunter.max_accel", self.max_accel)?;
        ensure_positive("hunter.accel_time", self.accel_time)?;
        ensure_non_negative("hunter.arrive_pct", self.arrive_pct)?;
        // clamp ниже min не даст arrive radius = 0
        ensure_positive("hunter.min_arrive_radius", self.min_arrive_radius)?;
        ensure_range("hunter.arrive_radius", self.min_arrive_radius, self.max_arrive_radius)?;
        ensure_non_negative("hunter.bubble_spawn_offset", self.bubble_spawn_offset)?;
        ensure_non_negative("hunter.bubble_launch_speed", self.bubble_launch_speed)?;
        ensure_positive("hunter.bubble_pop_time", self.bubble_pop_time)?;
        Ok(())
    }
}

/// Лягушка
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Hunter {
    pub params: HunterParams,
    target: Option<Vec2>,
    arrive_radius: f32,
    /// Единичный вектор взгляда (начально +Y)
    facing: Vec2,
    walking: bool,
    /// Контейнер для выпущенных пузырей
    pub threats: Option<Entity>,
}

impl Hunter {
    pub fn new(params: HunterParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            params,
            target: None,
            arrive_radius: params.min_arrive_radius,
            facing: Vec2::Y,
            walking: false,
            threats: None,
        })
    }

    pub fn with_threats(mut self, container: Entity) -> Self {
        self.threats = Some(container);
        self
    }

    pub fn target(&self) -> Option<Vec2> {
        self.target
    }

    pub fn arrive_radius(&self) -> f32 {
        self.arrive_radius
    }

    pub fn facing(&self) -> Vec2 {
        self.facing
    }

    pub fn is_walking(&self) -> bool {
        self.walking
    }

    /// Команда "иди сюда": цель + динамический arrival radius
    pub fn move_to(&mut self, position: Vec2, target: Vec2) {
        let distance = position.distance(target);
        self.arrive_radius = (self.params.arrive_pct * distance)
            .clamp(self.params.min_arrive_radius, self.params.max_arrive_radius);
        self.target = Some(target);
    }

    /// Команда "стреляй": (позиция спавна, начальная скорость) пузыря
    pub fn fire(&self, position: Vec2, velocity: Vec2) -> (Vec2, Vec2) {
        let spawn = position + self.facing * self.params.bubble_spawn_offset;
        let launch = self.facing * self.params.bubble_launch_speed + velocity;
        (spawn, launch)
    }

    /// Facing следует за velocity, пока лягушка реально идёт
    pub fn update_appearance(&mut self, velocity: Vec2) {
        if velocity.length() > MIN_SPEED_TO_ANIMATE {
            self.walking = true;
            self.facing = velocity.normalize_or_zero();
        } else {
            self.walking = false;
        }
    }
}

/// Вход лягушки на тик: только собственная позиция
pub struct HunterInput {
    pub position: Vec2,
}

impl Controller for Hunter {
    type Input<'a> = HunterInput;

    fn tick(&mut self, input: HunterInput, _delta: f32) -> Option<Vec2> {
        let target = self.target?;

        if input.position.distance(target) > TARGET_REACHED_TOLERANCE {
            Some(steering::arrive(input.position, target, self.arrive_radius, self.params.max_speed))
        } else {
            crate::log(&format!("🐸 Hunter reached ({:.2}, {:.2})", target.x, target.y));
            self.target = None;
            None
        }
    }
}

/// Здоровье и счёт лягушки
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct HunterStats {
    pub health: i32,
    pub prey_caught: u32,
}

impl Default for HunterStats {
    fn default() -> Self {
        Self { health: 3, prey_caught: 0 }
    }
}

impl HunterStats {
    pub fn lose_health(&mut self, amount: u32) {
        self.health -= amount as i32;
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }
}

/// Snapshot лягушки на начало тика (для мух и змей)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HunterSnapshot {
    pub position: Vec2,
    pub velocity: Vec2,
}
