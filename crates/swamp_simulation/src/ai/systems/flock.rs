//! Flock systems: snapshot стаи → tick каждой мухи → сила

use std::collections::HashMap;

use bevy::prelude::*;

use crate::ai::components::{Flock, FlockMemberSnapshot, Fly, FlyAppearance, FlyInput};
use crate::controller::{apply_desired_velocity, Controller};
use crate::physics::PhysicsBody;
use crate::player::{Bubble, Hunter, HunterSnapshot};
use crate::DeterministicRng;

/// Система: обновление всех мух
///
/// Соседи и угрозы читаются из snapshot'а на начало тика: муха, обработанная
/// раньше, уже могла сдвинуться (respawn), остальные видят её старую позицию.
pub fn fly_update(
    mut flies: Query<(Entity, &mut Fly, &mut Transform, &mut PhysicsBody, &mut FlyAppearance)>,
    flocks: Query<&Flock>,
    hunters: Query<(&Transform, &PhysicsBody), (With<Hunter>, Without<Fly>)>,
    bubbles: Query<(&Transform, &ChildOf), (With<Bubble>, Without<Fly>)>,
    mut rng: ResMut<DeterministicRng>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    let mut members: HashMap<Entity, Vec<FlockMemberSnapshot>> = HashMap::new();
    for (entity, fly, transform, body, _) in flies.iter() {
        members.entry(fly.flock).or_default().push(FlockMemberSnapshot {
            entity,
            position: transform.translation.truncate(),
            velocity: body.velocity,
            alive: fly.state().is_alive(),
        });
    }

    let mut threats: HashMap<Entity, Vec<Vec2>> = HashMap::new();
    for (transform, child_of) in bubbles.iter() {
        threats
            .entry(child_of.parent())
            .or_default()
            .push(transform.translation.truncate());
    }

    for (entity, mut fly, mut transform, mut body, mut appearance) in flies.iter_mut() {
        let Ok(flock) = flocks.get(fly.flock) else {
            crate::log_error(&format!("Fly {:?}: flock {:?} not found, skipping tick", entity, fly.flock));
            continue;
        };
        let settings = *flock.settings();

        let flock_members = members.get(&fly.flock).map(Vec::as_slice).unwrap_or(&[]);
        let hunter = fly
            .hunter
            .and_then(|h| hunters.get(h).ok())
            .map(|(t, b)| HunterSnapshot { position: t.translation.truncate(), velocity: b.velocity });
        let fly_threats = fly
            .threats
            .and_then(|c| threats.get(&c))
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        let mut position = transform.translation.truncate();
        let desired = fly.tick(
            FlyInput {
                me: entity,
                position: &mut position,
                velocity: body.velocity,
                settings: &settings,
                members: flock_members,
                hunter,
                threats: fly_threats,
                rng: &mut rng.rng,
            },
            delta,
        );

        // Respawn телепортирует — пишем позицию обратно
        transform.translation = position.extend(transform.translation.z);

        apply_desired_velocity(&mut body, desired.unwrap_or(Vec2::ZERO), settings.accel_time, settings.max_accel);
        appearance.update(fly.state(), body.velocity);
    }
}
