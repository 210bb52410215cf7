//! Flocking integration test
//!
//! Headless App, один fixed tick за шаг:
//! - муха без соседей в радиусе уходит в Alone
//! - стая держится вместе, скорость не превышает лимит
//! - лягушка ловит муху через trigger-контакт, муха респавнится

use bevy::prelude::*;
use swamp_simulation::scene::{spawn_flock_only, spawn_hunter, spawn_threat_container};
use swamp_simulation::*;

fn fly_state(app: &App, entity: Entity) -> FlyState {
    app.world().get::<Fly>(entity).expect("fly exists").state()
}

#[test]
fn test_fly_with_distant_neighbor_becomes_alone() {
    let mut app = create_headless_app(1);
    let settings = FlockSettings { flock_radius: 10.0, ..default() };

    let (_, flies) = spawn_flock_only(
        app.world_mut(),
        settings,
        FlyParams::default(),
        &[Vec2::ZERO, Vec2::new(50.0, 0.0)],
    )
    .expect("valid flock");

    assert_eq!(fly_state(&app, flies[0]), FlyState::Flocking);

    run_fixed_tick(&mut app);

    assert_eq!(fly_state(&app, flies[0]), FlyState::Alone);
    assert_eq!(fly_state(&app, flies[1]), FlyState::Alone);
}

#[test]
fn test_alone_flies_seek_each_other_and_rejoin() {
    let mut app = create_headless_app(2);
    let settings = FlockSettings { flock_radius: 3.0, ..default() };

    let (_, flies) = spawn_flock_only(
        app.world_mut(),
        settings,
        FlyParams::default(),
        &[Vec2::new(-4.0, 0.0), Vec2::new(4.0, 0.0)],
    )
    .expect("valid flock");

    run_fixed_tick(&mut app);
    assert_eq!(fly_state(&app, flies[0]), FlyState::Alone);

    // Seek друг к другу: рано или поздно снова в радиусе
    let mut rejoined = false;
    for _ in 0..128 {
        run_fixed_tick(&mut app);
        if fly_state(&app, flies[0]) == FlyState::Flocking && fly_state(&app, flies[1]) == FlyState::Flocking {
            rejoined = true;
            break;
        }
    }

    assert!(rejoined, "alone flies never found each other");
}

#[test]
fn test_flock_speed_stays_bounded() {
    let mut app = create_headless_app(3);
    let settings = FlockSettings::default();
    let positions: Vec<Vec2> = (0..12).map(|i| Vec2::new((i % 4) as f32, (i / 4) as f32)).collect();

    let (_, flies) = spawn_flock_only(app.world_mut(), settings, FlyParams::default(), &positions).expect("valid flock");

    for _ in 0..300 {
        run_fixed_tick(&mut app);
    }

    for fly in flies {
        let body = app.world().get::<PhysicsBody>(fly).expect("body");
        // Управляемое тело не разгоняется сильно выше max_speed
        assert!(body.speed() <= settings.max_speed * 1.1, "speed {} too high", body.speed());

        let position = app.world().get::<Transform>(fly).expect("transform").translation.truncate();
        assert!(!position.is_nan());
    }
}

#[test]
fn test_hunter_catches_fly_and_fly_respawns() {
    let mut app = create_headless_app(4);
    let params = FlyParams { respawn_time: 0.25, ..default() };

    let threats = spawn_threat_container(app.world_mut());
    let hunter = spawn_hunter(app.world_mut(), HunterParams::default(), Vec2::ZERO, 0.4, threats).expect("valid hunter");
    let (_, flies) = spawn_flock_only(
        app.world_mut(),
        FlockSettings::default(),
        params,
        &[Vec2::new(0.3, 0.0), Vec2::new(8.0, 0.0)],
    )
    .expect("valid flock");

    run_fixed_tick(&mut app);

    assert_eq!(fly_state(&app, flies[0]), FlyState::Dead);
    let stats = app.world().get::<HunterStats>(hunter).expect("stats");
    assert_eq!(stats.prey_caught, 1);
    assert!(!app.world().get::<FlyAppearance>(flies[0]).expect("appearance").visible);

    // Respawn на окружности radius = respawn_distance
    for _ in 0..32 {
        run_fixed_tick(&mut app);
    }

    assert_ne!(fly_state(&app, flies[0]), FlyState::Dead);
    let position = app.world().get::<Transform>(flies[0]).expect("transform").translation.truncate();
    assert!(position.length() > params.respawn_distance - 2.0, "respawned at {:?}", position);

    // Мёртвую муху не засчитывают повторно
    assert_eq!(app.world().get::<HunterStats>(hunter).expect("stats").prey_caught, 1);
}
