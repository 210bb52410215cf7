//! Конфигурация симуляции (serde, значения по умолчанию — из игровой сцены)

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::ai::components::{FlockSettings, FlyParams, SnakeParams};
use crate::error::{ensure_non_negative, ensure_positive, ConfigError, Result};
use crate::physics::ObstacleShape;
use crate::player::HunterParams;
use crate::steering::AvoidanceParams;

/// Змея на сцене: home (точка спавна) + точка патруля
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnakeSpawn {
    pub home: Vec2,
    pub patrol_point: Vec2,
}

/// Препятствие на сцене
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleSpawn {
    pub center: Vec2,
    pub shape: ObstacleShape,
}

/// Полный конфиг сцены
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub seed: u64,
    pub fixed_hz: f64,

    pub flock: FlockSettings,
    pub fly: FlyParams,
    pub fly_count: usize,
    pub fly_radius: f32,

    pub snake: SnakeParams,
    pub avoidance: AvoidanceParams,
    pub snake_radius: f32,
    pub snake_scale: f32,
    pub snakes: Vec<SnakeSpawn>,

    pub hunter: HunterParams,
    pub hunter_spawn: Vec2,
    pub hunter_radius: f32,

    pub obstacles: Vec<ObstacleSpawn>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            fixed_hz: crate::constants::FIXED_HZ,

            flock: FlockSettings::default(),
            fly: FlyParams::default(),
            fly_count: 20,
            fly_radius: 0.2,

            snake: SnakeParams::default(),
            avoidance: AvoidanceParams::default(),
            snake_radius: 0.4,
            snake_scale: 1.0,
            snakes: vec![
                SnakeSpawn { home: Vec2::new(-8.0, 4.0), patrol_point: Vec2::new(-2.0, 4.0) },
                SnakeSpawn { home: Vec2::new(8.0, -4.0), patrol_point: Vec2::new(2.0, -4.0) },
            ],

            hunter: HunterParams::default(),
            hunter_spawn: Vec2::ZERO,
            hunter_radius: 0.4,

            obstacles: vec![
                ObstacleSpawn { center: Vec2::new(-5.0, 4.0), shape: ObstacleShape::Circle { radius: 0.8 } },
                ObstacleSpawn {
                    center: Vec2::new(5.0, -4.0),
                    shape: ObstacleShape::Rect { half_extents: Vec2::new(0.5, 1.5) },
                },
            ],
        }
    }
}

impl SimulationConfig {
    /// Парсинг JSON + validate (отсутствующие поля берутся из Default)
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.fixed_hz > 0.0) {
            return Err(ConfigError::NonPositive { name: "fixed_hz", value: self.fixed_hz as f32 });
        }

        self.flock.validate()?;
        self.fly.validate()?;
        ensure_non_negative("fly_radius", self.fly_radius)?;

        self.snake.validate()?;
        self.avoidance.validate()?;
        ensure_non_negative("snake_radius", self.snake_radius)?;
        ensure_positive("snake_scale", self.snake_scale)?;

        self.hunter.validate()?;
        ensure_non_negative("hunter_radius", self.hunter_radius)?;

        for obstacle in &self.obstacles {
            match obstacle.shape {
                ObstacleShape::Circle { radius } => ensure_non_negative("obstacle.radius", radius)?,
                ObstacleShape::Rect { half_extents } => {
                    ensure_non_negative("obstacle.half_extents.x", half_extents.x)?;
                    ensure_non_negative("obstacle.half_extents.y", half_extents.y)?;
                }
            }
        }

        Ok(())
    }
}
