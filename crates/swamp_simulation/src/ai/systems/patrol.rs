//! Patrol systems

use bevy::prelude::*;

use crate::ai::components::{PatrolPoint, Snake, SnakeAppearance, SnakeInput};
use crate::controller::{apply_desired_velocity, Controller};
use crate::physics::{collect_obstacles, Obstacle, PhysicsBody};
use crate::player::{Hunter, HunterSnapshot};

/// Система: FSM + seek (с avoidance) для всех змей
pub fn snake_update(
    mut snakes: Query<(Entity, &mut Snake, &Transform, &mut PhysicsBody, &mut SnakeAppearance)>,
    waypoints: Query<&Transform, With<PatrolPoint>>,
    hunters: Query<(&Transform, &PhysicsBody), (With<Hunter>, Without<Snake>)>,
    obstacles: Query<(&Transform, &Obstacle)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    // Препятствия статичны внутри тика — одно поле на всех
    let field = collect_obstacles(obstacles.iter());

    for (entity, mut snake, transform, mut body, mut appearance) in snakes.iter_mut() {
        let waypoint = waypoints.get(snake.patrol_point).ok().map(|t| t.translation.truncate());
        if waypoint.is_none() {
            crate::log_warning(&format!("Snake {:?}: patrol point {:?} missing", entity, snake.patrol_point));
        }

        let hunter = snake
            .hunter
            .and_then(|h| hunters.get(h).ok())
            .map(|(t, b)| HunterSnapshot { position: t.translation.truncate(), velocity: b.velocity });

        let desired = snake.tick(
            SnakeInput {
                position: transform.translation.truncate(),
                waypoint,
                hunter,
                obstacles: &field,
            },
            delta,
        );

        let params = snake.params;
        apply_desired_velocity(&mut body, desired.unwrap_or(Vec2::ZERO), params.accel_time, params.max_accel);
        appearance.update(snake.state(), body.velocity);
    }
}
