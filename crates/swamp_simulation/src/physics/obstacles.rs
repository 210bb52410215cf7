//! Статические препятствия + аналитический circle cast по ним (headless)
//!
//! Круг: ray vs круг радиусом (r_obstacle + r_agent).
//! Прямоугольник: ray vs AABB, расширенный на r_agent (углы не скругляем —
//! чуть консервативнее настоящей суммы Минковского).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::query::{CastHit, CollisionLayers, ShapeCaster};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Reflect)]
pub enum ObstacleShape {
    Circle { radius: f32 },
    Rect { half_extents: Vec2 },
}

/// Препятствие (позиция берётся из Transform)
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Obstacle {
    pub shape: ObstacleShape,
    pub layers: CollisionLayers,
}

impl Obstacle {
    pub fn circle(radius: f32, layers: CollisionLayers) -> Self {
        Self { shape: ObstacleShape::Circle { radius }, layers }
    }

    pub fn rect(half_extents: Vec2, layers: CollisionLayers) -> Self {
        Self { shape: ObstacleShape::Rect { half_extents }, layers }
    }

    /// Пересекается ли круг (point, radius) с препятствием в `center`
    pub fn overlaps_circle(&self, center: Vec2, point: Vec2, radius: f32) -> bool {
        match self.shape {
            ObstacleShape::Circle { radius: own } => {
                center.distance_squared(point) <= (own + radius) * (own + radius)
            }
            ObstacleShape::Rect { half_extents } => {
                let local = point - center;
                let closest = local.clamp(-half_extents, half_extents);
                local.distance_squared(closest) <= radius * radius
            }
        }
    }
}

/// Snapshot препятствий на текущий тик
#[derive(Debug, Clone, Default)]
pub struct ObstacleField {
    obstacles: Vec<(Vec2, Obstacle)>,
}

impl ObstacleField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_obstacle(mut self, center: Vec2, obstacle: Obstacle) -> Self {
        self.obstacles.push((center, obstacle));
        self
    }

    pub fn push(&mut self, center: Vec2, obstacle: Obstacle) {
        self.obstacles.push((center, obstacle));
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }
}

impl FromIterator<(Vec2, Obstacle)> for ObstacleField {
    fn from_iter<T: IntoIterator<Item = (Vec2, Obstacle)>>(iter: T) -> Self {
        Self { obstacles: iter.into_iter().collect() }
    }
}

impl ShapeCaster for ObstacleField {
    fn circle_cast(
        &self,
        origin: Vec2,
        radius: f32,
        direction: Vec2,
        max_distance: f32,
        filter: CollisionLayers,
    ) -> Option<CastHit> {
        let dir = direction.normalize_or_zero();
        let mut best: Option<CastHit> = None;

        for (center, obstacle) in &self.obstacles {
            if !obstacle.layers.intersects(filter) {
                continue;
            }

            let hit = match obstacle.shape {
                ObstacleShape::Circle { radius: own } => {
                    cast_vs_circle(origin, dir, max_distance, *center, own + radius)
                }
                ObstacleShape::Rect { half_extents } => {
                    cast_vs_aabb(origin, dir, max_distance, *center, half_extents + Vec2::splat(radius))
                }
            };

            if let Some(hit) = hit {
                if best.map_or(true, |b| hit.distance < b.distance) {
                    best = Some(hit);
                }
            }
        }

        best
    }
}

fn cast_vs_circle(origin: Vec2, dir: Vec2, max_distance: f32, center: Vec2, radius: f32) -> Option<CastHit> {
    let m = origin - center;
    let c = m.length_squared() - radius * radius;

    // Старт внутри — касание сразу
    if c <= 0.0 {
        return Some(CastHit { distance: 0.0, normal: m.normalize_or_zero() });
    }
    if dir == Vec2::ZERO {
        return None;
    }

    let b = m.dot(dir);
    if b > 0.0 {
        return None;
    }

    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }

    let t = -b - discriminant.sqrt();
    if t > max_distance {
        return None;
    }

    let point = origin + dir * t;
    Some(CastHit { distance: t, normal: (point - center).normalize_or_zero() })
}

fn cast_vs_aabb(origin: Vec2, dir: Vec2, max_distance: f32, center: Vec2, half: Vec2) -> Option<CastHit> {
    let min = center - half;
    let max = center + half;

    if origin.cmpge(min).all() && origin.cmple(max).all() {
        return Some(CastHit { distance: 0.0, normal: (origin - center).normalize_or_zero() });
    }
    if dir == Vec2::ZERO {
        return None;
    }

    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;
    let mut normal = Vec2::ZERO;

    for axis in 0..2 {
        let (o, d, lo, hi) = (origin[axis], dir[axis], min[axis], max[axis]);

        if d.abs() < f32::EPSILON {
            if o < lo || o > hi {
                return None;
            }
            continue;
        }

        let mut t1 = (lo - o) / d;
        let mut t2 = (hi - o) / d;
        let mut sign = -1.0;
        if t1 > t2 {
            std::mem::swap(&mut t1, &mut t2);
            sign = 1.0;
        }

        if t1 > t_enter {
            t_enter = t1;
            normal = Vec2::ZERO;
            normal[axis] = sign;
        }
        t_exit = t_exit.min(t2);

        if t_enter > t_exit {
            return None;
        }
    }

    if t_enter < 0.0 || t_enter > max_distance {
        return None;
    }

    Some(CastHit { distance: t_enter, normal })
}

/// Собрать ObstacleField из мира (snapshot на начало тика)
pub fn collect_obstacles<'a>(
    obstacles: impl IntoIterator<Item = (&'a Transform, &'a Obstacle)>,
) -> ObstacleField {
    obstacles
        .into_iter()
        .map(|(transform, obstacle)| (transform.translation.truncate(), *obstacle))
        .collect()
}
