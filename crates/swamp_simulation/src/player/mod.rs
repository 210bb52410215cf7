//! Player domain: лягушка, её команды и пузыри
//!
//! Команды игрока приходят как `HunterCommand` events (input polling снаружи).

use bevy::prelude::*;

use crate::driver::{configure_sets, SimulationSet};

pub mod bubble;
pub mod hunter;
pub mod systems;


pub use bubble::{Bubble, ThreatContainer, BUBBLE_POP_TIME};
pub use hunter::{Hunter, HunterInput, HunterParams, HunterSnapshot, HunterStats};
pub use systems::{apply_hunter_commands, bubble_update, hunter_update, BUBBLE_RADIUS};

/// Команда игрока (правый клик / пробел)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum HunterCommand {
    MoveTo { hunter: Entity, target: Vec2 },
    Fire { hunter: Entity },
}

/// Player Plugin: команды → движение лягушки → пузыри
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        configure_sets(app);

        app.add_event::<HunterCommand>()
            .register_type::<Hunter>()
            .add_systems(FixedUpdate, apply_hunter_commands.in_set(SimulationSet::Input))
            .add_systems(FixedUpdate, (hunter_update, bubble_update).chain().in_set(SimulationSet::Player));
    }
}
