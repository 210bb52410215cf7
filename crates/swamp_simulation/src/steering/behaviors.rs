//! Steering behaviors
//!
//! Каждая функция возвращает DESIRED VELOCITY (не силу) и не трогает state.
//! Сила получается потом через `velocity_to_force`.

use bevy::prelude::*;

/// Seek: полная скорость к цели. pos == target → Vec2::ZERO
pub fn seek(position: Vec2, target: Vec2, max_speed: f32) -> Vec2 {
    (target - position).normalize_or_zero() * max_speed
}

/// Flee: зеркальный seek
pub fn flee(position: Vec2, threat: Vec2, max_speed: f32) -> Vec2 {
    -seek(position, threat, max_speed)
}

/// Arrive: seek × min(1, d / r)
///
/// Снаружи радиуса — полная скорость, внутри — линейное торможение до нуля.
/// `arrive_radius > 0` проверяется при инициализации.
pub fn arrive(position: Vec2, target: Vec2, arrive_radius: f32, max_speed: f32) -> Vec2 {
    debug_assert!(arrive_radius > 0.0, "arrive_radius must be validated at init");

    let distance = position.distance(target);
    let ramp = (distance / arrive_radius).min(1.0);

    seek(position, target, max_speed) * ramp
}

/// Separation: Σ (pos - n) / d², нормализованная × max_speed
///
/// Сосед в той же точке (d == 0) не даёт вклада.
pub fn separation(position: Vec2, neighbors: &[Vec2], max_speed: f32) -> Vec2 {
    let mut raw = Vec2::ZERO;

    for &neighbor in neighbors {
        let offset = position - neighbor;
        let distance_sq = offset.length_squared();
        if distance_sq <= f32::EPSILON {
            continue;
        }
        raw += offset / distance_sq;
    }

    raw.normalize_or_zero() * max_speed
}

/// Cohesion: seek к центру масс соседей
///
/// Вызывающий обязан передать непустой набор (flock controller проверяет).
pub fn cohesion(position: Vec2, neighbors: &[Vec2], max_speed: f32) -> Vec2 {
    debug_assert!(!neighbors.is_empty(), "cohesion requires neighbors");
    let Some(center) = mean(neighbors) else {
        return Vec2::ZERO;
    };

    (center - position).normalize_or_zero() * max_speed
}

/// Alignment: средняя скорость соседей, нормализованная × max_speed
pub fn alignment(neighbor_velocities: &[Vec2], max_speed: f32) -> Vec2 {
    debug_assert!(!neighbor_velocities.is_empty(), "alignment requires neighbors");
    let Some(average) = mean(neighbor_velocities) else {
        return Vec2::ZERO;
    };

    average.normalize_or_zero() * max_speed
}

/// Anchor: мягкая пружина к арене
///
/// Внутри коробки half_extents — ноль. Вылезли по оси → тянем обратно к 0
/// только по этой оси, пропорционально координате. Не клампится.
pub fn anchor(position: Vec2, half_extents: Vec2) -> Vec2 {
    let mut desired = Vec2::ZERO;

    if position.x.abs() > half_extents.x {
        desired.x -= position.x;
    }
    if position.y.abs() > half_extents.y {
        desired.y -= position.y;
    }

    desired
}

fn mean(points: &[Vec2]) -> Option<Vec2> {
    if points.is_empty() {
        return None;
    }
    let sum: Vec2 = points.iter().copied().sum();
    Some(sum / points.len() as f32)
}
