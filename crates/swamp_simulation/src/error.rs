//! Ошибки конфигурации
//!
//! Все численные preconditions (accel_time > 0, arrive_radius > 0, гистерезис
//! aggro/de-aggro) проверяются при создании сущности, а не в тике.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// Параметр обязан быть строго положительным
    #[error("{name} must be > 0 (got {value})")]
    NonPositive { name: &'static str, value: f32 },

    /// Параметр не может быть отрицательным
    #[error("{name} must be >= 0 (got {value})")]
    Negative { name: &'static str, value: f32 },

    /// Диапазон [min, max] перевёрнут
    #[error("{name}: min {min} > max {max}")]
    InvertedRange { name: &'static str, min: f32, max: f32 },

    /// de-aggro меньше aggro — нет гистерезиса, state будет флапать на границе
    #[error("de_aggro_range {de_aggro} < aggro_range {aggro} (no hysteresis)")]
    NoHysteresis { aggro: f32, de_aggro: f32 },

    /// Конфиг не распарсился
    #[error("invalid config json: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Helper: `value > 0`, иначе NonPositive
pub(crate) fn ensure_positive(name: &'static str, value: f32) -> Result<()> {
    // NaN тоже отвергаем (сравнение ложно)
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

pub(crate) fn ensure_non_negative(name: &'static str, value: f32) -> Result<()> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { name, value })
    }
}

pub(crate) fn ensure_range(name: &'static str, min: f32, max: f32) -> Result<()> {
    if min <= max {
        Ok(())
    } else {
        Err(ConfigError::InvertedRange { name, min, max })
    }
}
