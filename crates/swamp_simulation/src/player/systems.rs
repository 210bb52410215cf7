//! Player systems: команды, движение лягушки, жизнь пузырей

use bevy::prelude::*;

use super::{Bubble, Hunter, HunterCommand, HunterInput};
use crate::controller::{apply_desired_velocity, Controller};
use crate::physics::{Collider, EntityTag, PhysicsBody};

/// Радиус коллайдера пузыря
pub const BUBBLE_RADIUS: f32 = 0.25;

/// Система: применение HunterCommand (MoveTo / Fire)
pub fn apply_hunter_commands(
    mut commands: Commands,
    mut events: EventReader<HunterCommand>,
    mut hunters: Query<(&mut Hunter, &Transform, &PhysicsBody)>,
) {
    for event in events.read() {
        match *event {
            HunterCommand::MoveTo { hunter, target } => {
                let Ok((mut frog, transform, _)) = hunters.get_mut(hunter) else {
                    crate::log_warning(&format!("MoveTo: hunter {:?} not found", hunter));
                    continue;
                };
                frog.move_to(transform.translation.truncate(), target);
                crate::log(&format!(
                    "🐸 MoveTo ({:.2}, {:.2}), arrive radius {:.2}",
                    target.x,
                    target.y,
                    frog.arrive_radius()
                ));
            }

            HunterCommand::Fire { hunter } => {
                let Ok((frog, transform, body)) = hunters.get(hunter) else {
                    crate::log_warning(&format!("Fire: hunter {:?} not found", hunter));
                    continue;
                };
                let (position, velocity) = frog.fire(transform.translation.truncate(), body.velocity);

                let mut bubble = commands.spawn((
                    Bubble::new(frog.params.bubble_pop_time),
                    Transform::from_translation(position.extend(0.0)),
                    PhysicsBody::default().with_velocity(velocity),
                    Collider::solid(BUBBLE_RADIUS),
                    EntityTag::Threat,
                ));

                // Контейнер стоит в начале координат: локальный Transform = мировой
                match frog.threats {
                    Some(container) => {
                        bubble.insert(ChildOf(container));
                    }
                    None => crate::log_warning("Fire: hunter has no threat container, bubble spawned unparented"),
                }

                crate::log(&format!("🫧 Bubble fired at ({:.2}, {:.2})", position.x, position.y));
            }
        }
    }
}

/// Система: arrive к цели + facing
pub fn hunter_update(
    mut hunters: Query<(&mut Hunter, &Transform, &mut PhysicsBody)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (mut hunter, transform, mut body) in hunters.iter_mut() {
        let desired = hunter.tick(HunterInput { position: transform.translation.truncate() }, delta);

        let params = hunter.params;
        apply_desired_velocity(&mut body, desired.unwrap_or(Vec2::ZERO), params.accel_time, params.max_accel);
        hunter.update_appearance(body.velocity);
    }
}

/// Система: старение пузырей, despawn по таймеру
pub fn bubble_update(
    mut commands: Commands,
    mut bubbles: Query<(Entity, &mut Bubble)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (entity, mut bubble) in bubbles.iter_mut() {
        bubble.tick((), delta);

        if bubble.is_expired() {
            crate::log(&format!("🫧 Bubble {:?} popped after {:.2}s", entity, bubble.elapsed()));
            commands.entity(entity).despawn();
        }
    }
}
