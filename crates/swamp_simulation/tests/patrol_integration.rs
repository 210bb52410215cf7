//! Patrol integration test
//!
//! Змея + лягушка в headless App:
//! - три HitFrog в Aggro снимают ровно 3 здоровья
//! - реальный контакт в Aggro ранит лягушку и успокаивает змею
//! - змея патрулирует между home и точкой патруля

use bevy::prelude::*;
use swamp_simulation::config::SnakeSpawn;
use swamp_simulation::scene::{spawn_hunter, spawn_snake, spawn_threat_container};
use swamp_simulation::steering::AvoidanceParams;
use swamp_simulation::*;

struct Arena {
    app: App,
    hunter: Entity,
    snake: Entity,
}

fn arena(hunter_at: Vec2, snake: SnakeSpawn) -> Arena {
    let mut app = create_headless_app(7);
    let threats = spawn_threat_container(app.world_mut());
    let hunter = spawn_hunter(app.world_mut(), HunterParams::default(), hunter_at, 0.4, threats).expect("valid hunter");
    let snake = spawn_snake(
        app.world_mut(),
        SnakeParams::default(),
        AvoidanceParams::disabled(),
        snake,
        0.4,
        1.0,
        Some(hunter),
    )
    .expect("valid snake");

    Arena { app, hunter, snake }
}

fn set_snake_state(app: &mut App, snake: Entity, state: SnakeState) {
    let mut component = app.world_mut().get_mut::<Snake>(snake).expect("snake exists");
    let updated = component.clone().with_state(state);
    *component = updated;
}

fn snake_state(app: &App, snake: Entity) -> SnakeState {
    app.world().get::<Snake>(snake).expect("snake exists").state()
}

fn health(app: &App, hunter: Entity) -> i32 {
    app.world().get::<HunterStats>(hunter).expect("stats").health
}

#[test]
fn test_three_hits_in_aggro_drain_health() {
    // Лягушка дальше aggro range: в Aggro змею переводим вручную
    let Arena { mut app, hunter, snake } = arena(
        Vec2::new(5.0, 0.0),
        SnakeSpawn { home: Vec2::ZERO, patrol_point: Vec2::new(-10.0, 0.0) },
    );
    assert_eq!(health(&app, hunter), 3);

    for expected in [2, 1, 0] {
        set_snake_state(&mut app, snake, SnakeState::Aggro);
        app.world_mut().send_event(ContactEvent {
            entity: snake,
            other: hunter,
            other_tag: EntityTag::Hunter,
            kind: ContactKind::Collision,
        });

        run_fixed_tick(&mut app);

        assert_eq!(health(&app, hunter), expected);
        // Harmless уже дома → в том же тике снова PatrolAway
        assert_eq!(snake_state(&app, snake), SnakeState::PatrolAway);
    }

    // Змея уже не в Aggro (PatrolAway): контакт не ранит
    app.world_mut().send_event(ContactEvent {
        entity: snake,
        other: hunter,
        other_tag: EntityTag::Hunter,
        kind: ContactKind::Collision,
    });
    run_fixed_tick(&mut app);
    assert_eq!(health(&app, hunter), 0);
}

#[test]
fn test_overlap_in_aggro_hurts_hunter_once() {
    let Arena { mut app, hunter, snake } = arena(
        Vec2::new(0.5, 0.0),
        SnakeSpawn { home: Vec2::ZERO, patrol_point: Vec2::new(-10.0, 0.0) },
    );
    set_snake_state(&mut app, snake, SnakeState::Aggro);

    run_fixed_tick(&mut app);

    assert_eq!(health(&app, hunter), 2);
    assert_ne!(snake_state(&app, snake), SnakeState::Aggro);

    // Контакт продолжается — повторного урона нет
    run_fixed_tick(&mut app);
    assert_eq!(health(&app, hunter), 2);
}

#[test]
fn test_snake_aggroes_on_nearby_hunter() {
    let Arena { mut app, snake, .. } = arena(
        Vec2::new(3.0, 0.0),
        SnakeSpawn { home: Vec2::ZERO, patrol_point: Vec2::new(-10.0, 0.0) },
    );

    run_fixed_tick(&mut app);
    assert_eq!(snake_state(&app, snake), SnakeState::Aggro);

    // Дальше цель = лягушка: разворачиваемся к ней
    for _ in 0..10 {
        run_fixed_tick(&mut app);
    }
    let body = app.world().get::<PhysicsBody>(snake).expect("body");
    assert!(body.velocity.x > 0.0, "snake should chase, velocity {:?}", body.velocity);
}

#[test]
fn test_snake_patrols_between_home_and_waypoint() {
    let Arena { mut app, snake, .. } = arena(
        Vec2::new(0.0, 50.0),
        SnakeSpawn { home: Vec2::ZERO, patrol_point: Vec2::new(4.0, 0.0) },
    );

    let mut visited = vec![snake_state(&app, snake)];
    for _ in 0..64 * 12 {
        run_fixed_tick(&mut app);
        let state = snake_state(&app, snake);
        if visited.last() != Some(&state) {
            visited.push(state);
        }
    }

    assert!(visited.len() >= 3, "patrol should loop, visited {:?}", visited);
    assert_eq!(&visited[..3], &[SnakeState::PatrolAway, SnakeState::PatrolHome, SnakeState::PatrolAway]);
    assert!(!visited.contains(&SnakeState::Aggro));
}

#[test]
fn test_snake_appearance_tints_aggro() {
    let Arena { mut app, snake, .. } = arena(
        Vec2::new(2.0, 2.0),
        SnakeSpawn { home: Vec2::ZERO, patrol_point: Vec2::new(-10.0, 0.0) },
    );

    for _ in 0..64 {
        run_fixed_tick(&mut app);
        if snake_state(&app, snake) != SnakeState::Aggro {
            continue;
        }
        let appearance = app.world().get::<SnakeAppearance>(snake).expect("appearance");
        let speed = app.world().get::<PhysicsBody>(snake).expect("body").speed();
        // Запас на один тик интеграции (appearance видит скорость до неё)
        if speed > 1.2 {
            assert_eq!(appearance.tint, Color::srgb(0.5, 0.0, 0.0));
            return;
        }
    }

    panic!("snake never chased the hunter fast enough to animate");
}
