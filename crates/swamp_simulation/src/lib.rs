//! Swamp Simulation Core
//!
//! ECS-симуляция на Bevy 0.16: стая мух (flocking), патрульные змеи и
//! лягушка игрока. Всё крутится в FixedUpdate, физика headless.
//!
//! Слои:
//! - steering = чистая математика desired velocity
//! - ai / player = FSM-контроллеры поверх steering
//! - physics = body, контакты, circle cast
//! - driver = порядок фаз тика + доставка контактов

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod config;
pub mod constants;
pub mod controller;
pub mod driver;
pub mod error;
pub mod logger;
pub mod physics;
pub mod player;
pub mod scene;
pub mod steering;


// Re-export базовых типов для удобства
pub use ai::{
    AIPlugin, Flock, FlockSettings, Fly, FlyAppearance, FlyEvent, FlyParams, FlyState, PatrolPoint, Snake,
    SnakeAppearance, SnakeEvent, SnakeParams, SnakeState,
};
pub use config::SimulationConfig;
pub use controller::{ContactResponse, Controller};
pub use driver::SimulationSet;
pub use error::{ConfigError, Result};
pub use logger::{init_logger, log, log_error, log_info, log_warning, set_log_level, LogLevel, LogPrinter};
pub use physics::{
    Collider, CollisionLayers, ContactEvent, ContactKind, EntityTag, Obstacle, ObstacleField, PhysicsBody,
    PhysicsPlugin, ShapeCaster,
};
pub use player::{Bubble, Hunter, HunterCommand, HunterParams, HunterStats, PlayerPlugin, ThreatContainer};
pub use scene::{spawn_scene, SceneHandles};

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<physics::ContactEvent>()
            .add_event::<HunterCommand>()
            .add_plugins((PhysicsPlugin, PlayerPlugin, AIPlugin))
            .add_systems(FixedUpdate, driver::dispatch_contacts.after(physics::detect_contacts).in_set(SimulationSet::Contacts));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(constants::FIXED_HZ))
        .add_plugins(SimulationPlugin);

    app
}

/// App + сцена из конфига
pub fn create_app_from_config(config: &SimulationConfig) -> Result<(App, SceneHandles)> {
    config.validate()?;

    let mut app = create_headless_app(config.seed);
    app.insert_resource(Time::<Fixed>::from_hz(config.fixed_hz));

    let handles = spawn_scene(app.world_mut(), config)?;
    app.insert_resource(handles.clone());

    Ok((app, handles))
}

/// Ровно один fixed step, независимо от реального времени
///
/// Тесты и headless бинарь двигают Time<Fixed> вручную: `app.update()`
/// зависит от wall clock и может выполнить 0 или несколько шагов.
pub fn run_fixed_tick(app: &mut App) {
    let world = app.world_mut();
    let timestep = world.resource::<Time<Fixed>>().timestep();
    world.resource_mut::<Time<Fixed>>().advance_by(timestep);
    world.run_schedule(FixedUpdate);

    // First (и event_update_system) здесь не запускается: буферы событий
    // переключаем сами, иначе они растут весь срок жизни App
    world.resource_mut::<bevy::ecs::event::Events<ContactEvent>>().update();
    world.resource_mut::<bevy::ecs::event::Events<HunterCommand>>().update();
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    // Собираем все компоненты в детерминированный формат
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
