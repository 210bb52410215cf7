//! Headless симуляция болота
//!
//! Собирает сцену из конфига по умолчанию (или JSON из первого аргумента),
//! гоняет fixed-тики и печатает сводку.

use bevy::prelude::*;
use swamp_simulation::{
    create_app_from_config, init_logger, log_error, set_log_level, LogLevel, run_fixed_tick, Fly, FlyState, HunterCommand, HunterStats, SimulationConfig,
    Snake,
};

const TICK_COUNT: usize = 1000;

fn load_config() -> swamp_simulation::Result<SimulationConfig> {
    match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .map_err(|e| swamp_simulation::ConfigError::Parse(format!("{}: {}", path, e)))?;
            SimulationConfig::from_json_str(&json)
        }
        None => Ok(SimulationConfig::default()),
    }
}

fn main() {
    init_logger();
    // FSM-переходы сотни мух на Debug — слишком шумно для сводки
    set_log_level(LogLevel::Info);

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            log_error(&format!("config: {}", e));
            std::process::exit(1);
        }
    };

    println!("Starting swamp headless simulation (seed: {})", config.seed);

    let (mut app, handles) = match create_app_from_config(&config) {
        Ok(result) => result,
        Err(e) => {
            log_error(&format!("scene: {}", e));
            std::process::exit(1);
        }
    };

    // Скриптованный "игрок": ходит между двумя точками и постреливает
    let waypoints = [Vec2::new(6.0, 3.0), Vec2::new(-6.0, -3.0)];

    for tick in 0..TICK_COUNT {
        if tick % 200 == 0 {
            let target = waypoints[(tick / 200) % waypoints.len()];
            app.world_mut().send_event(HunterCommand::MoveTo { hunter: handles.hunter, target });
        }
        if tick % 90 == 45 {
            app.world_mut().send_event(HunterCommand::Fire { hunter: handles.hunter });
        }

        run_fixed_tick(&mut app);

        if tick % 100 == 0 {
            let entity_count = app.world().entities().len();
            println!("Tick {}: {} entities", tick, entity_count);
        }
    }

    let world = app.world_mut();

    let mut fly_states = [0usize; 4];
    for fly in world.query::<&Fly>().iter(world) {
        let slot = match fly.state() {
            FlyState::Flocking => 0,
            FlyState::Alone => 1,
            FlyState::Fleeing => 2,
            FlyState::Dead => 3,
        };
        fly_states[slot] += 1;
    }

    let snake_states: Vec<String> = world.query::<&Snake>().iter(world).map(|s| format!("{:?}", s.state())).collect();

    println!(
        "Flies: flocking {}, alone {}, fleeing {}, dead {}",
        fly_states[0], fly_states[1], fly_states[2], fly_states[3]
    );
    println!("Snakes: {}", snake_states.join(", "));

    if let Some(stats) = world.get::<HunterStats>(handles.hunter) {
        println!("Hunter: health {}, prey caught {}", stats.health, stats.prey_caught);
    }

    println!("Simulation complete!");
}
