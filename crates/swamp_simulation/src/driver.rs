//! Tick driver: порядок систем в FixedUpdate + доставка контактов контроллерам

use std::collections::HashSet;

use bevy::prelude::*;

use crate::ai::components::{Fly, Snake};
use crate::controller::{ContactResponse, Controller};
use crate::physics::{ContactEvent, ContactKind, EntityTag};
use crate::player::{Bubble, HunterStats};

/// Фазы одного fixed step (выполняются строго по порядку)
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Команды игрока
    Input,
    /// Поиск контактов + callbacks
    Contacts,
    /// Мухи
    Prey,
    /// Змеи
    Patrol,
    /// Лягушка + пузыри
    Player,
    /// Интеграция тел
    Integrate,
}

/// Конфигурирует порядок фаз (вызывается каждым plugin'ом, idempotent)
pub fn configure_sets(app: &mut App) {
    app.configure_sets(
        FixedUpdate,
        (
            SimulationSet::Input,
            SimulationSet::Contacts,
            SimulationSet::Prey,
            SimulationSet::Patrol,
            SimulationSet::Player,
            SimulationSet::Integrate,
        )
            .chain(),
    );
}

fn deliver<C: Controller>(controller: &mut C, kind: ContactKind, other: EntityTag) -> ContactResponse {
    match kind {
        ContactKind::Collision => controller.on_collision(other),
        ContactKind::Trigger => controller.on_trigger(other),
    }
}

/// Система: ContactEvent → on_collision / on_trigger, применение ContactResponse
///
/// Урон и счёт применяются к `other` (это всегда лягушка, если они ненулевые).
pub fn dispatch_contacts(
    mut commands: Commands,
    mut contacts: EventReader<ContactEvent>,
    mut flies: Query<&mut Fly>,
    mut snakes: Query<&mut Snake>,
    mut bubbles: Query<&mut Bubble>,
    mut stats: Query<&mut HunterStats>,
) {
    let mut despawned: HashSet<Entity> = HashSet::new();

    for contact in contacts.read() {
        let ContactEvent { entity, other, other_tag, kind } = *contact;

        // Лопнувший в этом тике пузырь сам больше не реагирует, но вторая
        // сторона контакта свой callback получает (порядок пар не важен)
        if despawned.contains(&entity) {
            continue;
        }

        let response = if let Ok(mut fly) = flies.get_mut(entity) {
            deliver(&mut *fly, kind, other_tag)
        } else if let Ok(mut snake) = snakes.get_mut(entity) {
            deliver(&mut *snake, kind, other_tag)
        } else if let Ok(mut bubble) = bubbles.get_mut(entity) {
            deliver(&mut *bubble, kind, other_tag)
        } else {
            continue;
        };

        if response.hunter_damage > 0 || response.prey_caught > 0 {
            match stats.get_mut(other) {
                Ok(mut hunter) => {
                    if response.hunter_damage > 0 {
                        hunter.lose_health(response.hunter_damage);
                        crate::log_info(&format!("💥 Hunter hit by {:?}, health = {}", entity, hunter.health));
                        if !hunter.is_alive() {
                            crate::log_warning("💀 Hunter health depleted");
                        }
                    }
                    if response.prey_caught > 0 {
                        hunter.prey_caught += response.prey_caught;
                        crate::log_info(&format!("🐸 Prey caught: {}", hunter.prey_caught));
                    }
                }
                Err(_) => crate::log_warning(&format!("Contact response for {:?} has no HunterStats", other)),
            }
        }

        if response.despawn_self {
            crate::log(&format!("🫧 {:?} popped on {:?}", entity, other_tag));
            despawned.insert(entity);
            commands.entity(entity).try_despawn();
        }
    }
}
