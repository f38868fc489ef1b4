// src/config.rs
//! Конфигурация генерации карты
//!
//! Этот модуль определяет все параметры, управляющие генерацией:
//! - Запрос на генерацию (размер, сид, идентификатор мира)
//! - Целевые доли типов террейна
//! - Настраиваемые параметры проходов (шум, кластеры, реки, озёра, сглаживание)
//!
//! Все структуры поддерживают сериализацию в TOML/JSON для удобной настройки через конфигурационные файлы.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{MapGenError, Result};
use crate::noise::{MAX_NOISE_OCTAVES, NoiseKind};
use crate::terrain::TerrainKind;

/// Минимальная сторона мира, которую допускает админ-API
pub const WORLD_MIN_DIMENSION: u32 = 100;
/// Максимальная сторона мира, которую допускает админ-API
pub const WORLD_MAX_DIMENSION: u32 = 2000;

/// Предел стороны карты; настройка `max_dimension` может его только понизить
pub const MAX_DIMENSION: u32 = 4096;
/// Предел количества тайлов; настройка `max_tiles` может его только понизить
pub const MAX_TILES: u64 = 16_777_216;
/// Предел радиуса кластеров и озёр
pub const MAX_FEATURE_RADIUS: u32 = 256;

/// Целевые доли террейна в процентах
///
/// Это ориентиры плотности, а не гарантированный результат: проходы
/// перекрываются, а базовый проход сам создаёт горы. `plains` — остаток,
/// отдельным проходом он не рисуется.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerrainPercentages {
    #[serde(default = "default_plains")]
    pub plains: f64,
    #[serde(default = "default_forest")]
    pub forest: f64,
    #[serde(default = "default_mountain")]
    pub mountain: f64,
    #[serde(default = "default_river")]
    pub river: f64,
    #[serde(default = "default_lake")]
    pub lake: f64,
}

fn default_plains() -> f64 {
    60.0
}
fn default_forest() -> f64 {
    15.0
}
fn default_mountain() -> f64 {
    10.0
}
fn default_river() -> f64 {
    10.0
}
fn default_lake() -> f64 {
    5.0
}

impl Default for TerrainPercentages {
    fn default() -> Self {
        Self {
            plains: 60.0,
            forest: 15.0,
            mountain: 10.0,
            river: 10.0,
            lake: 5.0,
        }
    }
}

impl TerrainPercentages {
    /// Целевая доля для типа террейна
    #[must_use]
    pub fn get(&self, kind: TerrainKind) -> f64 {
        match kind {
            TerrainKind::Plains => self.plains,
            TerrainKind::Forest => self.forest,
            TerrainKind::Mountain => self.mountain,
            TerrainKind::River => self.river,
            TerrainKind::Lake => self.lake,
        }
    }

    #[must_use]
    pub fn sum(&self) -> f64 {
        TerrainKind::ALL.iter().map(|&k| self.get(k)).sum()
    }

    /// Целевое количество тайлов: `round(total * pct / 100)`
    #[must_use]
    pub fn target_tiles(&self, kind: TerrainKind, total_tiles: usize) -> usize {
        (total_tiles as f64 * self.get(kind) / 100.0).round() as usize
    }

    /// Отвергает отрицательные, нечисловые и больше 100 значения.
    /// Сумма жёстко не проверяется: при большом отклонении от 100 пишется
    /// только предупреждение.
    pub fn validate(&self) -> Result<()> {
        for kind in TerrainKind::ALL {
            let value = self.get(kind);
            if !value.is_finite() || !(0.0..=100.0).contains(&value) {
                return Err(MapGenError::InvalidTerrainPercentages { kind, value });
            }
        }
        let sum = self.sum();
        if (sum - 100.0).abs() > 1.0 {
            log::warn!("сумма целевых долей террейна {sum:.1}% отличается от 100%");
        }
        Ok(())
    }
}

/// Параметры проходов генератора
///
/// Значения по умолчанию задают эталонное поведение; любые изменения меняют
/// результат для того же сида.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorSettings {
    /// Алгоритм когерентного шума
    #[serde(default)]
    pub noise: NoiseKind,

    /// Масштаб координат для базового прохода
    #[serde(default = "default_noise_scale")]
    pub noise_scale: f64,

    /// Количество октав шума (1 = один масштаб)
    #[serde(default = "default_noise_octaves")]
    pub noise_octaves: u32,

    /// Порог нормированного шума `[0, 1]`, выше которого базовый проход ставит горы
    #[serde(default = "default_mountain_threshold")]
    pub mountain_threshold: f64,

    /// Вероятность, с которой кластер расползается в каждого соседа
    #[serde(default = "default_spread_chance")]
    pub spread_chance: f64,

    /// Радиус лесного кластера `[min, max]`
    #[serde(default = "default_forest_radius")]
    pub forest_radius: (u32, u32),

    /// Радиус горного кластера `[min, max]`
    #[serde(default = "default_mountain_radius")]
    pub mountain_radius: (u32, u32),

    /// Во сколько раз шаг к центру карты вероятнее остальных шагов реки
    #[serde(default = "default_river_bias")]
    pub river_bias: f64,

    /// Радиус озера `[min, max]`
    #[serde(default = "default_lake_radius")]
    pub lake_radius: (u32, u32),

    /// Масштаб шума, искажающего контур озера
    #[serde(default = "default_lake_noise_scale")]
    pub lake_noise_scale: f64,

    /// Количество проходов сглаживания
    #[serde(default = "default_smoothing_passes")]
    pub smoothing_passes: u32,

    /// Сколько клеток из 9 должно совпадать, чтобы перекрасить клетку
    #[serde(default = "default_smoothing_majority")]
    pub smoothing_majority: u32,

    /// Максимальная сторона карты, не больше `MAX_DIMENSION`
    #[serde(default = "default_max_dimension")]
    pub max_dimension: u32,

    /// Максимальное количество тайлов `width * height`, не больше `MAX_TILES`
    #[serde(default = "default_max_tiles")]
    pub max_tiles: u64,
}

fn default_noise_scale() -> f64 {
    0.05
}
fn default_noise_octaves() -> u32 {
    1
}
fn default_mountain_threshold() -> f64 {
    0.7
}
fn default_spread_chance() -> f64 {
    0.6
}
fn default_forest_radius() -> (u32, u32) {
    (3, 7)
}
fn default_mountain_radius() -> (u32, u32) {
    (2, 7)
}
fn default_river_bias() -> f64 {
    3.0
}
fn default_lake_radius() -> (u32, u32) {
    (2, 8)
}
fn default_lake_noise_scale() -> f64 {
    0.1
}
fn default_smoothing_passes() -> u32 {
    2
}
fn default_smoothing_majority() -> u32 {
    6
}
fn default_max_dimension() -> u32 {
    MAX_DIMENSION
}
fn default_max_tiles() -> u64 {
    MAX_TILES
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            noise: NoiseKind::Value,
            noise_scale: default_noise_scale(),
            noise_octaves: default_noise_octaves(),
            mountain_threshold: default_mountain_threshold(),
            spread_chance: default_spread_chance(),
            forest_radius: default_forest_radius(),
            mountain_radius: default_mountain_radius(),
            river_bias: default_river_bias(),
            lake_radius: default_lake_radius(),
            lake_noise_scale: default_lake_noise_scale(),
            smoothing_passes: default_smoothing_passes(),
            smoothing_majority: default_smoothing_majority(),
            max_dimension: default_max_dimension(),
            max_tiles: default_max_tiles(),
        }
    }
}

impl GeneratorSettings {
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(MapGenError::InvalidSettings(msg));

        if !(self.noise_scale.is_finite() && self.noise_scale > 0.0) {
            return invalid(format!("noise_scale must be positive, got {}", self.noise_scale));
        }
        if !(1..=MAX_NOISE_OCTAVES).contains(&self.noise_octaves) {
            return invalid(format!(
                "noise_octaves must be in 1..={MAX_NOISE_OCTAVES}, got {}",
                self.noise_octaves
            ));
        }
        if !(0.0..=1.0).contains(&self.mountain_threshold) {
            return invalid(format!(
                "mountain_threshold must be in [0, 1], got {}",
                self.mountain_threshold
            ));
        }
        if !(0.0..=1.0).contains(&self.spread_chance) {
            return invalid(format!(
                "spread_chance must be in [0, 1], got {}",
                self.spread_chance
            ));
        }
        for (name, (min, max)) in [
            ("forest_radius", self.forest_radius),
            ("mountain_radius", self.mountain_radius),
            ("lake_radius", self.lake_radius),
        ] {
            if min > max {
                return invalid(format!("{name}: min {min} is greater than max {max}"));
            }
            if max > MAX_FEATURE_RADIUS {
                return invalid(format!(
                    "{name}: max {max} exceeds the limit of {MAX_FEATURE_RADIUS}"
                ));
            }
        }
        if !(self.river_bias.is_finite() && self.river_bias >= 1.0) {
            return invalid(format!("river_bias must be >= 1, got {}", self.river_bias));
        }
        if !(self.lake_noise_scale.is_finite() && self.lake_noise_scale > 0.0) {
            return invalid(format!(
                "lake_noise_scale must be positive, got {}",
                self.lake_noise_scale
            ));
        }
        if !(1..=9).contains(&self.smoothing_majority) {
            return invalid(format!(
                "smoothing_majority must be in 1..=9, got {}",
                self.smoothing_majority
            ));
        }
        Ok(())
    }
}

/// Запрос на генерацию карты
///
/// # Пример
/// ```toml
/// # world.toml
/// width = 400
/// height = 300
/// seed = 42
/// world_id = 7
///
/// [terrain_percentages]
/// forest = 20.0
/// lake = 8.0
///
/// [settings]
/// smoothing_passes = 1
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub width: u32,
    pub height: u32,

    /// Сид; если не задан, генератор вытягивает свежий
    #[serde(default)]
    pub seed: Option<u64>,

    /// Непрозрачный идентификатор мира, копируется в каждый тайл
    #[serde(default)]
    pub world_id: u64,

    #[serde(default)]
    pub terrain_percentages: TerrainPercentages,

    #[serde(default)]
    pub settings: GeneratorSettings,
}

impl GenerationRequest {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            seed: None,
            world_id: 0,
            terrain_percentages: TerrainPercentages::default(),
            settings: GeneratorSettings::default(),
        }
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn with_world_id(mut self, world_id: u64) -> Self {
        self.world_id = world_id;
        self
    }

    #[must_use]
    pub fn with_percentages(mut self, percentages: TerrainPercentages) -> Self {
        self.terrain_percentages = percentages;
        self
    }

    /// Загружает запрос из TOML-файла
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Общее количество тайлов с проверкой переполнения и лимитов.
    /// Вызывается до выделения сетки.
    pub fn validate(&self) -> Result<usize> {
        let (width, height) = (self.width, self.height);
        let fail = |reason: String| MapGenError::InvalidDimensions {
            width,
            height,
            reason,
        };

        if width == 0 || height == 0 {
            return Err(fail("width and height must be positive".into()));
        }
        let max = self.settings.max_dimension.min(MAX_DIMENSION);
        if width > max || height > max {
            return Err(fail(format!("each dimension must be at most {max}")));
        }
        let max_tiles = self.settings.max_tiles.min(MAX_TILES);
        let total = u64::from(width)
            .checked_mul(u64::from(height))
            .filter(|&t| t <= max_tiles)
            .ok_or_else(|| fail(format!("tile count exceeds the limit of {max_tiles}")))?;
        let total = usize::try_from(total)
            .map_err(|_| fail("tile count does not fit in memory".into()))?;

        self.terrain_percentages.validate()?;
        self.settings.validate()?;
        Ok(total)
    }

    /// Проверка границ, которые админ-API накладывает на создаваемые миры
    /// (100..=2000 по каждой стороне).
    pub fn validate_world_bounds(&self) -> Result<()> {
        let bounds = WORLD_MIN_DIMENSION..=WORLD_MAX_DIMENSION;
        if bounds.contains(&self.width) && bounds.contains(&self.height) {
            Ok(())
        } else {
            Err(MapGenError::InvalidDimensions {
                width: self.width,
                height: self.height,
                reason: format!(
                    "world size must be between {WORLD_MIN_DIMENSION}x{WORLD_MIN_DIMENSION} \
                     and {WORLD_MAX_DIMENSION}x{WORLD_MAX_DIMENSION}"
                ),
            })
        }
    }
}
