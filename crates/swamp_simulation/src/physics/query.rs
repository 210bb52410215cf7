//! Shape-cast контракт (то, что steering требует от физики)

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Bitmask слоёв коллизий (аналог LayerMask)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Reflect)]
pub struct CollisionLayers(pub u32);

impl CollisionLayers {
    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(u32::MAX);
    /// Стены/камни арены
    pub const OBSTACLE: Self = Self(1 << 0);
    /// Вода (блокирует змей, но не пузыри)
    pub const WATER: Self = Self(1 << 1);

    pub fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }
}

/// Результат circle cast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CastHit {
    /// Дистанция вдоль direction до первого касания (0 = старт внутри)
    pub distance: f32,
    pub normal: Vec2,
}

/// Circle cast: круг `radius` из `origin` по `direction` на `max_distance`
///
/// Учитываются только препятствия, чьи слои пересекаются с `filter`.
pub trait ShapeCaster {
    fn circle_cast(
        &self,
        origin: Vec2,
        radius: f32,
        direction: Vec2,
        max_distance: f32,
        filter: CollisionLayers,
    ) -> Option<CastHit>;
}
