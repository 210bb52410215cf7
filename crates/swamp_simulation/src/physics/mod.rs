//! Physics collaborator (headless)
//!
//! Настоящий движок здесь не нужен: steering требует только circle cast,
//! контроллеры — velocity/mass/add_force и contact events.
//! - query: ShapeCaster контракт + CollisionLayers
//! - body: PhysicsBody, Collider, EntityTag, интеграция
//! - obstacles: Obstacle + ObstacleField (аналитический circle cast)
//! - contacts: ContactEvent (enter-only)

use bevy::prelude::*;

use crate::driver::{configure_sets, SimulationSet};

pub mod body;
pub mod contacts;
pub mod obstacles;
pub mod query;


pub use body::{integrate_bodies, integrate_body, Collider, EntityTag, PhysicsBody};
pub use contacts::{detect_contacts, ActiveContacts, ContactEvent, ContactKind};
pub use obstacles::{collect_obstacles, Obstacle, ObstacleField, ObstacleShape};
pub use query::{CastHit, CollisionLayers, ShapeCaster};

/// Physics Plugin (headless): контакты в начале тика, интеграция в конце
pub struct PhysicsPlugin;

impl Plugin for PhysicsPlugin {
    fn build(&self, app: &mut App) {
        configure_sets(app);

        app.add_event::<ContactEvent>()
            .init_resource::<ActiveContacts>()
            .add_systems(FixedUpdate, detect_contacts.in_set(SimulationSet::Contacts))
            .add_systems(FixedUpdate, integrate_bodies.in_set(SimulationSet::Integrate));
    }
}
