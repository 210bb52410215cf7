//! Общие константы симуляции

/// Скорость, ниже которой змея/лягушка не обновляют анимацию и facing
pub const MIN_SPEED_TO_ANIMATE: f32 = 1.0;

/// Дистанция, на которой цель считается достигнутой
/// (лягушка — точка клика, змея — цель текущего state)
pub const TARGET_REACHED_TOLERANCE: f32 = 1.0;

/// Fixed step (Hz) для FixedUpdate
pub const FIXED_HZ: f64 = 64.0;
