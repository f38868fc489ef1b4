//! Ошибки генерации карты
//!
//! Генерация детерминирована, поэтому повторять упавший запрос бессмысленно:
//! ошибка на тех же входных данных повторится. Частичных результатов нет —
//! либо возвращается полная сетка, либо ошибка до выделения памяти.

use thiserror::Error;

use crate::terrain::TerrainKind;

#[derive(Debug, Error)]
pub enum MapGenError {
    /// Ширина/высота нулевые, больше допустимого максимума или их произведение
    /// не помещается в лимит тайлов.
    #[error("invalid map dimensions {width}x{height}: {reason}")]
    InvalidDimensions {
        width: u32,
        height: u32,
        reason: String,
    },

    /// Целевая доля террейна отрицательна, не конечна или больше 100.
    #[error("invalid target percentage for {kind}: {value}")]
    InvalidTerrainPercentages { kind: TerrainKind, value: f64 },

    /// Настройки генератора вне допустимых диапазонов.
    #[error("invalid generator settings: {0}")]
    InvalidSettings(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to serialize map: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to write image: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, MapGenError>;
