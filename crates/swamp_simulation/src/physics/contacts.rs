//! Contact detection (headless замена collision/trigger callbacks движка)
//!
//! ContactEvent отправляется ОДИН РАЗ на начало контакта (enter), обеим
//! сторонам пары. Пока пара перекрывается — повторов нет.

use std::collections::HashSet;

use bevy::prelude::*;

use super::body::{Collider, EntityTag};
use super::obstacles::Obstacle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum ContactKind {
    Collision,
    Trigger,
}

/// Event: начался контакт `entity` с `other`
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct ContactEvent {
    pub entity: Entity,
    pub other: Entity,
    pub other_tag: EntityTag,
    pub kind: ContactKind,
}

/// Пары, которые перекрывались на прошлом тике (ключ: (min, max))
#[derive(Resource, Debug, Default)]
pub struct ActiveContacts {
    pairs: HashSet<(Entity, Entity)>,
}

impl ActiveContacts {
    pub fn contains(&self, a: Entity, b: Entity) -> bool {
        self.pairs.contains(&pair_key(a, b))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

fn pair_key(a: Entity, b: Entity) -> (Entity, Entity) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Система: поиск новых контактов (O(n²), для арены на сотню агентов хватает)
pub fn detect_contacts(
    agents: Query<(Entity, &Transform, &Collider, &EntityTag)>,
    obstacles: Query<(Entity, &Transform, &Obstacle, &EntityTag)>,
    mut active: ResMut<ActiveContacts>,
    mut contacts: EventWriter<ContactEvent>,
) {
    let snapshot: Vec<(Entity, Vec2, Collider, EntityTag)> = agents
        .iter()
        .map(|(e, t, c, tag)| (e, t.translation.truncate(), *c, *tag))
        .collect();

    let mut touching: HashSet<(Entity, Entity)> = HashSet::new();
    let mut began: Vec<(Entity, EntityTag, Entity, EntityTag, ContactKind)> = Vec::new();

    // Агент vs агент
    for (i, &(a, pos_a, col_a, tag_a)) in snapshot.iter().enumerate() {
        for &(b, pos_b, col_b, tag_b) in &snapshot[i + 1..] {
            let reach = col_a.radius + col_b.radius;
            if pos_a.distance_squared(pos_b) > reach * reach {
                continue;
            }

            let key = pair_key(a, b);
            touching.insert(key);
            if !active.pairs.contains(&key) {
                let kind = if col_a.trigger || col_b.trigger {
                    ContactKind::Trigger
                } else {
                    ContactKind::Collision
                };
                began.push((a, tag_a, b, tag_b, kind));
            }
        }
    }

    // Агент vs статичное препятствие (всегда solid)
    for (obstacle_entity, obstacle_transform, obstacle, obstacle_tag) in obstacles.iter() {
        let center = obstacle_transform.translation.truncate();
        for &(a, pos_a, col_a, tag_a) in &snapshot {
            if !obstacle.overlaps_circle(center, pos_a, col_a.radius) {
                continue;
            }

            let key = pair_key(a, obstacle_entity);
            touching.insert(key);
            if !active.pairs.contains(&key) {
                let kind = if col_a.trigger { ContactKind::Trigger } else { ContactKind::Collision };
                began.push((a, tag_a, obstacle_entity, *obstacle_tag, kind));
            }
        }
    }

    for (a, tag_a, b, tag_b, kind) in began {
        contacts.write(ContactEvent { entity: a, other: b, other_tag: tag_b, kind });
        contacts.write(ContactEvent { entity: b, other: a, other_tag: tag_a, kind });
    }

    active.pairs = touching;
}
