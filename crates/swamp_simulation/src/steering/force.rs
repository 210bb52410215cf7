//! Vector helpers: поворот и конвертация desired velocity → steering force.

use bevy::prelude::*;

/// Повернуть вектор на угол (градусы, против часовой стрелки)
pub fn rotate(v: Vec2, degrees: f32) -> Vec2 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Desired velocity → сила для PhysicsBody
///
/// a = (desired - current) / accel_time, |a| ≤ max_accel, F = m·a.
/// `accel_time > 0` гарантируется валидацией конфигов (ConfigError).
pub fn velocity_to_force(
    desired_velocity: Vec2,
    current_velocity: Vec2,
    mass: f32,
    accel_time: f32,
    max_accel: f32,
) -> Vec2 {
    debug_assert!(accel_time > 0.0, "accel_time must be validated at init");

    let mut accel = (desired_velocity - current_velocity) / accel_time;

    if accel.length() > max_accel {
        accel = accel.normalize_or_zero() * max_accel;
    }

    mass * accel
}
