//! Spawn helpers: собирают entity из компонентов и связывают коллабораторов
//!
//! Вместо поиска singleton'ов по имени все ссылки (лягушка, контейнер
//! пузырей, стая, точка патруля) передаются явно при спавне.

use bevy::prelude::*;
use rand::{Rng, RngCore};

use crate::ai::components::{Flock, FlockSettings, Fly, FlyAppearance, FlyParams, PatrolPoint, Snake, SnakeAppearance, SnakeParams};
use crate::config::{ObstacleSpawn, SimulationConfig, SnakeSpawn};
use crate::error::Result;
use crate::physics::{Collider, CollisionLayers, EntityTag, Obstacle, PhysicsBody};
use crate::player::{Hunter, HunterParams, HunterStats, ThreatContainer};
use crate::steering::AvoidanceParams;
use crate::DeterministicRng;

/// Entity handles собранной сцены
#[derive(Resource, Debug, Clone)]
pub struct SceneHandles {
    pub hunter: Entity,
    pub threats: Entity,
    pub flock: Entity,
    pub flies: Vec<Entity>,
    pub snakes: Vec<Entity>,
    pub obstacles: Vec<Entity>,
}

pub fn spawn_flock(world: &mut World, settings: FlockSettings) -> Result<Entity> {
    let flock = Flock::new(settings)?;
    Ok(world.spawn((flock, Transform::default())).id())
}

/// Случайное направление, скорость ∈ [init_speed_min, init_speed_max]
pub fn initial_fly_velocity(settings: &FlockSettings, rng: &mut dyn RngCore) -> Vec2 {
    let angle = rng.gen_range(-std::f32::consts::PI..=std::f32::consts::PI);
    let speed = rng.gen_range(settings.init_speed_min..=settings.init_speed_max);
    speed * Vec2::new(angle.cos(), angle.sin())
}

pub fn spawn_fly(world: &mut World, fly: Fly, position: Vec2, velocity: Vec2, radius: f32) -> Entity {
    world
        .spawn((
            fly,
            FlyAppearance::default(),
            Transform::from_translation(position.extend(0.0)),
            PhysicsBody::default().with_velocity(velocity),
            // Муху ловят, а не толкают
            Collider::trigger(radius),
            EntityTag::Prey,
        ))
        .id()
}

pub fn spawn_hunter(world: &mut World, params: HunterParams, position: Vec2, radius: f32, threats: Entity) -> Result<Entity> {
    let hunter = Hunter::new(params)?.with_threats(threats);
    let entity = world
        .spawn((
            hunter,
            HunterStats::default(),
            Transform::from_translation(position.extend(0.0)),
            PhysicsBody::default(),
            Collider::solid(radius),
            EntityTag::Hunter,
        ))
        .id();
    crate::log(&format!("🐸 Hunter spawned: {:?}", entity));
    Ok(entity)
}

pub fn spawn_threat_container(world: &mut World) -> Entity {
    world.spawn((ThreatContainer, Transform::default())).id()
}

pub fn spawn_patrol_point(world: &mut World, position: Vec2) -> Entity {
    world.spawn((PatrolPoint, Transform::from_translation(position.extend(0.0)))).id()
}

/// Змея + её точка патруля; avoidance radius = collider radius × scale
pub fn spawn_snake(
    world: &mut World,
    params: SnakeParams,
    avoidance: AvoidanceParams,
    spawn: SnakeSpawn,
    collider_radius: f32,
    scale: f32,
    hunter: Option<Entity>,
) -> Result<Entity> {
    let avoidance = avoidance.with_agent_radius(collider_radius, scale)?;
    let patrol_point = spawn_patrol_point(world, spawn.patrol_point);

    let mut snake = Snake::new(params, avoidance, spawn.home, patrol_point)?;
    if let Some(hunter) = hunter {
        snake = snake.with_hunter(hunter);
    }

    let entity = world
        .spawn((
            snake,
            SnakeAppearance::default(),
            Transform::from_translation(spawn.home.extend(0.0)),
            PhysicsBody::default(),
            Collider::solid(collider_radius * scale),
            EntityTag::Patrol,
        ))
        .id();
    crate::log(&format!("🐍 Snake spawned: {:?} home ({:.1}, {:.1})", entity, spawn.home.x, spawn.home.y));
    Ok(entity)
}

pub fn spawn_obstacle(world: &mut World, spawn: ObstacleSpawn) -> Entity {
    world
        .spawn((
            Obstacle { shape: spawn.shape, layers: CollisionLayers::OBSTACLE },
            Transform::from_translation(spawn.center.extend(0.0)),
            EntityTag::Obstacle,
        ))
        .id()
}

/// Полная сцена из конфига (конфиг валидируется здесь же)
pub fn spawn_scene(world: &mut World, config: &SimulationConfig) -> Result<SceneHandles> {
    config.validate()?;

    let obstacles = config.obstacles.iter().map(|o| spawn_obstacle(world, *o)).collect();

    let threats = spawn_threat_container(world);
    let hunter = spawn_hunter(world, config.hunter, config.hunter_spawn, config.hunter_radius, threats)?;

    let mut snakes = Vec::with_capacity(config.snakes.len());
    for spawn in &config.snakes {
        snakes.push(spawn_snake(
            world,
            config.snake,
            config.avoidance,
            *spawn,
            config.snake_radius,
            config.snake_scale,
            Some(hunter),
        )?);
    }

    let flock = spawn_flock(world, config.flock)?;
    let template = Fly::new(config.fly, flock)?.with_hunter(hunter).with_threats(threats);

    // Позиции/скорости берём из seeded RNG до спавна (world занят)
    let placements: Vec<(Vec2, Vec2)> = {
        let mut rng = world.resource_mut::<DeterministicRng>();
        let half = config.flock.anchor_dims;
        (0..config.fly_count)
            .map(|_| {
                let position = Vec2::new(rng.rng.gen_range(-half.x..=half.x), rng.rng.gen_range(-half.y..=half.y));
                let velocity = initial_fly_velocity(&config.flock, &mut rng.rng);
                (position, velocity)
            })
            .collect()
    };

    let flies = placements
        .into_iter()
        .map(|(position, velocity)| spawn_fly(world, template.clone(), position, velocity, config.fly_radius))
        .collect();

    crate::log_info(&format!(
        "🌿 Scene spawned: {} flies, {} snakes, {} obstacles",
        config.fly_count,
        config.snakes.len(),
        config.obstacles.len()
    ));

    Ok(SceneHandles { hunter, threats, flock, flies, snakes, obstacles })
}

/// Flock-only сцена без лягушки (для сценариев без коллабораторов)
pub fn spawn_flock_only(world: &mut World, settings: FlockSettings, params: FlyParams, positions: &[Vec2]) -> Result<(Entity, Vec<Entity>)> {
    let flock = spawn_flock(world, settings)?;
    let template = Fly::new(params, flock)?;
    let flies = positions
        .iter()
        .map(|p| spawn_fly(world, template.clone(), *p, Vec2::ZERO, 0.2))
        .collect();
    Ok((flock, flies))
}
