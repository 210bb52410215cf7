//! Flock member (муха): FSM, настройки стаи, snapshot соседей.

use bevy::prelude::*;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::controller::{ContactResponse, Controller};
use crate::error::{ensure_non_negative, ensure_positive, ensure_range, Result};
use crate::physics::EntityTag;
use crate::player::HunterSnapshot;
use crate::steering;

/// FSM состояния мухи
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Reflect)]
pub enum FlyState {
    #[default]
    Flocking,
    Alone,
    Fleeing,
    Dead,
}

/// FSM события мухи
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum FlyEvent {
    JoinedFlock,
    LostFlock,
    ScaredByFrog,
    ScaredByBubble,
    EscapedFrog,
    CaughtByFrog,
    RespawnTimeElapsed,
}

impl FlyState {
    /// Таблица переходов (state, event) → next state
    ///
    /// None = для этой пары перехода нет (no-op). CaughtByFrog проверяется
    /// раньше таблицы и ведёт в Dead из любого состояния.
    pub fn transition(self, event: FlyEvent) -> Option<FlyState> {
        use FlyEvent::*;
        use FlyState::*;

        if event == CaughtByFrog {
            return Some(Dead);
        }

        match (self, event) {
            (Flocking, LostFlock) => Some(Alone),
            (Flocking, ScaredByFrog | ScaredByBubble) => Some(Fleeing),
            (Alone, JoinedFlock) => Some(Flocking),
            (Alone, ScaredByFrog | ScaredByBubble) => Some(Fleeing),
            (Fleeing, EscapedFrog) => Some(Flocking),
            (Dead, RespawnTimeElapsed) => Some(Flocking),
            _ => None,
        }
    }

    pub fn is_alive(self) -> bool {
        self != FlyState::Dead
    }
}

/// Настройки стаи (одни на всю стаю, read-only после создания)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Reflect)]
pub struct FlockSettings {
    pub max_speed: f32,
    pub max_accel: f32,
    pub accel_time: f32,
    pub init_speed_min: f32,
    pub init_speed_max: f32,
    /// Дистанция обнаружения соседей
    pub flock_radius: f32,
    /// Half-extents мягкой границы арены
    pub anchor_dims: Vec2,
    pub separation_weight: f32,
    pub cohesion_weight: f32,
    pub alignment_weight: f32,
    pub anchor_weight: f32,
}

impl Default for FlockSettings {
    fn default() -> Self {
        Self {
            max_speed: 5.0,
            max_accel: 10.0,
            accel_time: 0.2,
            init_speed_min: 1.0,
            init_speed_max: 3.0,
            flock_radius: 4.0,
            anchor_dims: Vec2::new(12.0, 7.0),
            separation_weight: 1.5,
            cohesion_weight: 1.0,
            alignment_weight: 1.0,
            anchor_weight: 2.0,
        }
    }
}

impl FlockSettings {
    pub fn validate(&self) -> Result<()> {
        ensure_positive("flock.max_speed", self.max_speed)?;
        ensure_positive("flock.max_accel", self.max_accel)?;
        ensure_positive("flock.accel_time", self.accel_time)?;
        ensure_non_negative("flock.init_speed_min", self.init_speed_min)?;
        ensure_range("flock.init_speed", self.init_speed_min, self.init_speed_max)?;
        ensure_positive("flock.flock_radius", self.flock_radius)?;
        ensure_non_negative("flock.anchor_dims.x", self.anchor_dims.x)?;
        ensure_non_negative("flock.anchor_dims.y", self.anchor_dims.y)?;
        Ok(())
    }
}

/// Корень стаи. Настройки доступны только на чтение.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Flock {
    settings: FlockSettings,
}

impl Flock {
    pub fn new(settings: FlockSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self { settings })
    }

    pub fn settings(&self) -> &FlockSettings {
        &self.settings
    }
}

/// Параметры fear/respawn одной мухи
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Reflect)]
pub struct FlyParams {
    /// Дальше этого от лягушки (и без пузырей рядом) — перестаём убегать
    pub stop_fleeing_range: f32,
    /// Радиус испуга, когда лягушка стоит
    pub frog_still_flee_range: f32,
    /// Радиус испуга, когда лягушка двигается
    pub frog_moving_flee_range: f32,
    /// Скорость лягушки, начиная с которой она "двигается"
    pub frog_alert_speed: f32,
    pub bubble_flee_range: f32,
    /// Секунд мёртвой до respawn
    pub respawn_time: f32,
    /// Расстояние от центра арены, куда телепортируемся при respawn
    pub respawn_distance: f32,
}

impl Default for FlyParams {
    fn default() -> Self {
        Self {
            stop_fleeing_range: 6.0,
            frog_still_flee_range: 1.5,
            frog_moving_flee_range: 4.0,
            frog_alert_speed: 2.0,
            bubble_flee_range: 3.0,
            respawn_time: 3.0,
            respawn_distance: 20.0,
        }
    }
}

impl FlyParams {
    pub fn validate(&self) -> Result<()> {
        ensure_non_negative("fly.stop_fleeing_range", self.stop_fleeing_range)?;
        ensure_non_negative("fly.frog_still_flee_range", self.frog_still_flee_range)?;
        ensure_non_negative("fly.frog_moving_flee_range", self.frog_moving_flee_range)?;
        ensure_non_negative("fly.frog_alert_speed", self.frog_alert_speed)?;
        ensure_non_negative("fly.bubble_flee_range", self.bubble_flee_range)?;
        ensure_non_negative("fly.respawn_time", self.respawn_time)?;
        ensure_non_negative("fly.respawn_distance", self.respawn_distance)?;
        Ok(())
    }
}

/// Snapshot члена стаи на начало тика
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlockMemberSnapshot {
    pub entity: Entity,
    pub position: Vec2,
    pub velocity: Vec2,
    pub alive: bool,
}

/// Соседи: живые, не я, ближе flock_radius (строго)
pub fn neighbors_of<'a>(
    me: Entity,
    position: Vec2,
    members: &'a [FlockMemberSnapshot],
    flock_radius: f32,
) -> Vec<&'a FlockMemberSnapshot> {
    members
        .iter()
        .filter(|m| m.alive && m.entity != me && m.position.distance(position) < flock_radius)
        .collect()
}

/// Ближайший живой член стаи (любая дистанция)
pub fn nearest_member(me: Entity, position: Vec2, members: &[FlockMemberSnapshot]) -> Option<&FlockMemberSnapshot> {
    members
        .iter()
        .filter(|m| m.alive && m.entity != me)
        .min_by(|a, b| {
            a.position
                .distance_squared(position)
                .total_cmp(&b.position.distance_squared(position))
        })
}

/// Точка respawn: distance × (cos θ, sin θ), θ ∈ [−π, π]
pub fn respawn_position(distance: f32, rng: &mut dyn RngCore) -> Vec2 {
    let angle = rng.gen_range(-std::f32::consts::PI..=std::f32::consts::PI);
    distance * Vec2::new(angle.cos(), angle.sin())
}

/// Переход FSM (для логов и respawn)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlyTransition {
    pub from: FlyState,
    pub to: FlyState,
    pub event: FlyEvent,
}

/// Муха: FSM + ссылки на коллабораторов (DI вместо поиска по имени)
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Fly {
    state: FlyState,
    /// Время с момента смерти (0, пока жива)
    time_dead: f32,
    pub params: FlyParams,
    /// Корень стаи (Flock)
    pub flock: Entity,
    /// Лягушка (может отсутствовать в тестовых сценах)
    pub hunter: Option<Entity>,
    /// Контейнер пузырей
    pub threats: Option<Entity>,
}

impl Fly {
    pub fn new(params: FlyParams, flock: Entity) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            state: FlyState::Flocking,
            time_dead: 0.0,
            params,
            flock,
            hunter: None,
            threats: None,
        })
    }

    pub fn with_hunter(mut self, hunter: Entity) -> Self {
        self.hunter = Some(hunter);
        self
    }

    pub fn with_threats(mut self, container: Entity) -> Self {
        self.threats = Some(container);
        self
    }

    /// Начальное состояние (сцены/тесты)
    pub fn with_state(mut self, state: FlyState) -> Self {
        self.state = state;
        self.time_dead = 0.0;
        self
    }

    pub fn state(&self) -> FlyState {
        self.state
    }

    pub fn time_dead(&self) -> f32 {
        self.time_dead
    }

    /// Обработать событие по таблице переходов
    ///
    /// Повторное событие для уже выполненного условия — безопасный no-op.
    pub fn handle_event(&mut self, event: FlyEvent) -> Option<FlyTransition> {
        let next = self.state.transition(event)?;
        if next == self.state {
            return None;
        }

        let transition = FlyTransition { from: self.state, to: next, event };
        self.state = next;

        // time_dead осмыслен только в Dead
        self.time_dead = 0.0;

        crate::log(&format!("🪰 Fly FSM: {:?} → {:?} ({:?})", transition.from, transition.to, event));
        Some(transition)
    }

    /// Поднять событие; при выходе из Dead — телепорт на точку respawn
    fn raise(&mut self, event: FlyEvent, position: &mut Vec2, rng: &mut dyn RngCore) {
        if let Some(transition) = self.handle_event(event) {
            if transition.from == FlyState::Dead {
                *position = respawn_position(self.params.respawn_distance, rng);
                crate::log_info(&format!("🪰 Fly respawned at ({:.2}, {:.2})", position.x, position.y));
            }
        }
    }
}

/// Окружение мухи на начало тика
pub struct FlyInput<'a> {
    pub me: Entity,
    /// Позиция (меняется только при respawn)
    pub position: &'a mut Vec2,
    pub velocity: Vec2,
    pub settings: &'a FlockSettings,
    /// Все члены моей стаи (включая меня)
    pub members: &'a [FlockMemberSnapshot],
    pub hunter: Option<HunterSnapshot>,
    /// Позиции активных пузырей
    pub threats: &'a [Vec2],
    pub rng: &'a mut dyn RngCore,
}

fn threat_in_range(position: Vec2, threats: &[Vec2], range: f32) -> bool {
    threats.iter().any(|t| t.distance(position) < range)
}

impl Controller for Fly {
    type Input<'a> = FlyInput<'a>;

    fn tick(&mut self, input: FlyInput<'_>, delta: f32) -> Option<Vec2> {
        let FlyInput { me, position, settings, members, hunter, threats, rng, .. } = input;
        let params = self.params;

        // (a) соседи — пересчитываются каждый тик, без кэша
        let neighbors = neighbors_of(me, *position, members, settings.flock_radius);

        // (b) respawn timer
        if self.state == FlyState::Dead {
            self.time_dead += delta;
            if self.time_dead > params.respawn_time {
                self.raise(FlyEvent::RespawnTimeElapsed, position, rng);
            }
        }

        // (c) level-triggered: спамим каждый тик, таблица гасит повторы
        if neighbors.is_empty() {
            self.raise(FlyEvent::LostFlock, position, rng);
        } else {
            self.raise(FlyEvent::JoinedFlock, position, rng);
        }

        // (d) испуг от лягушки / побег
        let pos = *position;
        let stop_range_clear = !threat_in_range(pos, threats, params.stop_fleeing_range);
        match hunter {
            Some(frog) => {
                let distance = pos.distance(frog.position);
                let frog_speed = frog.velocity.length();
                let moving = frog_speed >= params.frog_alert_speed;

                if (moving && distance < params.frog_moving_flee_range)
                    || (!moving && distance < params.frog_still_flee_range)
                {
                    self.raise(FlyEvent::ScaredByFrog, position, rng);
                }

                if distance > params.stop_fleeing_range && stop_range_clear {
                    self.raise(FlyEvent::EscapedFrog, position, rng);
                }
            }
            None => {
                // Лягушки нет — бояться можно только пузырей
                if stop_range_clear {
                    self.raise(FlyEvent::EscapedFrog, position, rng);
                }
            }
        }

        // (e) пузыри
        if threat_in_range(pos, threats, params.bubble_flee_range) {
            self.raise(FlyEvent::ScaredByBubble, position, rng);
        }

        // (f) steering по текущему state
        let pos = *position;
        match self.state {
            FlyState::Flocking => {
                let anchor = settings.anchor_weight * steering::anchor(pos, settings.anchor_dims);

                // Flocking без соседей (например, сразу после EscapedFrog) —
                // cohesion/alignment не определены, остаётся только anchor
                let flocking = if neighbors.is_empty() {
                    Vec2::ZERO
                } else {
                    let positions: Vec<Vec2> = neighbors.iter().map(|n| n.position).collect();
                    let velocities: Vec<Vec2> = neighbors.iter().map(|n| n.velocity).collect();

                    settings.separation_weight * steering::separation(pos, &positions, settings.max_speed)
                        + settings.cohesion_weight * steering::cohesion(pos, &positions, settings.max_speed)
                        + settings.alignment_weight * steering::alignment(&velocities, settings.max_speed)
                };

                Some((flocking + anchor).normalize_or_zero() * settings.max_speed)
            }

            FlyState::Alone => Some(
                nearest_member(me, pos, members)
                    .map(|nearest| steering::seek(pos, nearest.position, settings.max_speed))
                    .unwrap_or(Vec2::ZERO),
            ),

            FlyState::Fleeing => {
                let threat = hunter.map(|h| h.position).or_else(|| {
                    threats
                        .iter()
                        .copied()
                        .min_by(|a, b| a.distance_squared(pos).total_cmp(&b.distance_squared(pos)))
                });
                Some(
                    threat
                        .map(|t| steering::flee(pos, t, settings.max_speed))
                        .unwrap_or(Vec2::ZERO),
                )
            }

            FlyState::Dead => None,
        }
    }

    fn on_trigger(&mut self, other: EntityTag) -> ContactResponse {
        if other != EntityTag::Hunter {
            return ContactResponse::NONE;
        }

        // Мёртвую муху второй раз не засчитываем
        let prey_caught = u32::from(self.state.is_alive());
        self.handle_event(FlyEvent::CaughtByFrog);

        ContactResponse { prey_caught, ..ContactResponse::NONE }
    }
}

/// Визуальное состояние мухи (чистая функция от state + velocity)
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct FlyAppearance {
    pub visible: bool,
    pub color: Color,
    pub flip_x: bool,
}

impl Default for FlyAppearance {
    fn default() -> Self {
        Self {
            visible: true,
            color: Color::srgb(1.0, 1.0, 1.0),
            flip_x: false,
        }
    }
}

impl FlyAppearance {
    pub fn update(&mut self, state: FlyState, velocity: Vec2) {
        self.flip_x = velocity.x > 0.0;

        match state {
            FlyState::Flocking => {
                self.visible = true;
                self.color = Color::srgb(1.0, 1.0, 1.0);
            }
            FlyState::Alone => {
                self.visible = true;
                self.color = Color::srgb(0.6, 0.6, 1.0);
            }
            FlyState::Fleeing => {
                self.visible = true;
                self.color = Color::srgb(1.0, 1.0, 0.0);
            }
            FlyState::Dead => {
                // Цвет не трогаем — спрайт просто скрыт
                self.visible = false;
            }
        }
    }
}
