//! Patrol entity (змея): FSM с гистерезисом aggro/de-aggro.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::constants::{MIN_SPEED_TO_ANIMATE, TARGET_REACHED_TOLERANCE};
use crate::controller::{ContactResponse, Controller};
use crate::error::{ensure_non_negative, ensure_positive, ConfigError, Result};
use crate::physics::{EntityTag, ShapeCaster};
use crate::player::HunterSnapshot;
use crate::steering::{seek_with_avoidance, AvoidanceParams};

/// FSM состояния змеи
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Reflect)]
pub enum SnakeState {
    #[default]
    PatrolAway,
    PatrolHome,
    Harmless,
    Aggro,
}

/// FSM события змеи
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum SnakeEvent {
    ReachedTarget,
    FrogOutOfRange,
    FrogInRange,
    HitFrog,
    HitBubble,
}

impl SnakeState {
    /// Таблица переходов; None = пара не описана (no-op)
    pub fn transition(self, event: SnakeEvent) -> Option<SnakeState> {
        use SnakeEvent::*;
        use SnakeState::*;

        match (self, event) {
            (PatrolAway, ReachedTarget) => Some(PatrolHome),
            (PatrolAway, FrogInRange) => Some(Aggro),
            (PatrolHome, ReachedTarget) => Some(PatrolAway),
            (PatrolHome, FrogInRange) => Some(Aggro),
            (Harmless, ReachedTarget) => Some(PatrolAway),
            (Aggro, FrogOutOfRange) => Some(PatrolHome),
            (Aggro, HitFrog | HitBubble) => Some(Harmless),
            _ => None,
        }
    }
}

/// Параметры движения и гистерезиса
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Reflect)]
pub struct SnakeParams {
    pub max_speed: f32,
    pub max_accel: f32,
    pub accel_time: f32,
    /// Ближе — начинаем преследование
    pub aggro_range: f32,
    /// Дальше — бросаем преследование (≥ aggro_range)
    pub de_aggro_range: f32,
}

impl Default for SnakeParams {
    fn default() -> Self {
        Self {
            max_speed: 3.0,
            max_accel: 8.0,
            accel_time: 0.25,
            aggro_range: 4.0,
            de_aggro_range: 6.0,
        }
    }
}

impl SnakeParams {
    pub fn validate(&self) -> Result<()> {
        ensure_positive("snake.max_speed", self.max_speed)?;
        ensure_positive("snake.max_accel", self.max_accel)?;
        ensure_positive("snake.accel_time", self.accel_time)?;
        ensure_non_negative("snake.aggro_range", self.aggro_range)?;
        if self.de_aggro_range < self.aggro_range {
            return Err(ConfigError::NoHysteresis {
                aggro: self.aggro_range,
                de_aggro: self.de_aggro_range,
            });
        }
        Ok(())
    }
}

/// Змея: FSM + home + ссылки на waypoint и лягушку
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Snake {
    state: SnakeState,
    pub params: SnakeParams,
    pub avoidance: AvoidanceParams,
    /// Позиция спавна (фиксируется один раз)
    home: Vec2,
    /// Точка патрулирования (цель PatrolAway)
    pub patrol_point: Entity,
    pub hunter: Option<Entity>,
}

impl Snake {
    pub fn new(
        params: SnakeParams,
        avoidance: AvoidanceParams,
        home: Vec2,
        patrol_point: Entity,
    ) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            state: SnakeState::PatrolAway,
            params,
            avoidance,
            home,
            patrol_point,
            hunter: None,
        })
    }

    pub fn with_hunter(mut self, hunter: Entity) -> Self {
        self.hunter = Some(hunter);
        self
    }

    pub fn with_state(mut self, state: SnakeState) -> Self {
        self.state = state;
        self
    }

    pub fn state(&self) -> SnakeState {
        self.state
    }

    pub fn home(&self) -> Vec2 {
        self.home
    }

    pub fn handle_event(&mut self, event: SnakeEvent) -> Option<SnakeState> {
        let next = self.state.transition(event)?;
        crate::log(&format!("🐍 Snake FSM: {:?} → {:?} ({:?})", self.state, next, event));
        self.state = next;
        Some(next)
    }

    /// Цель — чистая функция state
    pub fn target(&self, waypoint: Option<Vec2>, hunter: Option<Vec2>) -> Option<Vec2> {
        match self.state {
            SnakeState::PatrolAway => waypoint,
            SnakeState::PatrolHome | SnakeState::Harmless => Some(self.home),
            SnakeState::Aggro => hunter,
        }
    }
}

/// Маркер точки патрулирования (цель PatrolAway)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct PatrolPoint;

/// Окружение змеи на начало тика
pub struct SnakeInput<'a> {
    pub position: Vec2,
    /// Позиция patrol point (None, если entity пропала)
    pub waypoint: Option<Vec2>,
    pub hunter: Option<HunterSnapshot>,
    pub obstacles: &'a dyn ShapeCaster,
}

impl Controller for Snake {
    type Input<'a> = SnakeInput<'a>;

    fn tick(&mut self, input: SnakeInput<'_>, _delta: f32) -> Option<Vec2> {
        let SnakeInput { position, waypoint, hunter, obstacles } = input;
        let hunter_position = hunter.map(|h| h.position);

        let target = self.target(waypoint, hunter_position);
        let desired = target.map(|target| {
            seek_with_avoidance(position, target, self.params.max_speed, &self.avoidance, obstacles)
        });

        match hunter_position {
            Some(frog) => {
                let distance = position.distance(frog);
                if distance <= self.params.aggro_range {
                    self.handle_event(SnakeEvent::FrogInRange);
                }
                if distance > self.params.de_aggro_range {
                    self.handle_event(SnakeEvent::FrogOutOfRange);
                }
            }
            None => {
                // Лягушка пропала — преследовать некого
                if self.state == SnakeState::Aggro {
                    self.handle_event(SnakeEvent::FrogOutOfRange);
                }
            }
        }

        // Проверяем цель этого тика (до смены state)
        if let Some(target) = target {
            if position.distance(target) <= TARGET_REACHED_TOLERANCE {
                self.handle_event(SnakeEvent::ReachedTarget);
            }
        }

        desired
    }

    fn on_collision(&mut self, other: EntityTag) -> ContactResponse {
        match other {
            EntityTag::Hunter => {
                let hunter_damage = u32::from(self.state == SnakeState::Aggro);
                self.handle_event(SnakeEvent::HitFrog);
                ContactResponse { hunter_damage, ..ContactResponse::NONE }
            }
            EntityTag::Threat => {
                self.handle_event(SnakeEvent::HitBubble);
                ContactResponse::NONE
            }
            _ => ContactResponse::NONE,
        }
    }
}

/// Направления анимации змеи
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum Direction {
    Up,
    Left,
    #[default]
    Down,
    Right,
}

impl Direction {
    /// Квантование bearing (градусы, −180..180) в 4 бина по 90°
    pub fn from_bearing(degrees: f32) -> Self {
        if degrees > -135.0 && degrees <= -45.0 {
            Direction::Down
        } else if degrees > -45.0 && degrees <= 45.0 {
            Direction::Right
        } else if degrees > 45.0 && degrees <= 135.0 {
            Direction::Up
        } else {
            Direction::Left
        }
    }
}

/// Визуальное состояние змеи
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct SnakeAppearance {
    pub facing: Direction,
    pub tint: Color,
}

impl Default for SnakeAppearance {
    fn default() -> Self {
        Self {
            facing: Direction::default(),
            tint: Color::srgb(1.0, 1.0, 1.0),
        }
    }
}

impl SnakeAppearance {
    /// Обновляется только на скорости > MIN_SPEED_TO_ANIMATE
    pub fn update(&mut self, state: SnakeState, velocity: Vec2) {
        if velocity.length() <= MIN_SPEED_TO_ANIMATE {
            return;
        }

        let bearing = velocity.y.atan2(velocity.x).to_degrees();
        self.facing = Direction::from_bearing(bearing);

        self.tint = match state {
            SnakeState::Aggro => Color::srgb(0.5, 0.0, 0.0),
            SnakeState::Harmless => Color::srgb(0.5, 0.5, 0.5),
            _ => Color::srgb(1.0, 1.0, 1.0),
        };
    }
}
