//! Генератор карты: весь конвейер от запроса до списка тайлов
//!
//! Порядок проходов фиксирован: базовый шум → лесные кластеры → горные
//! кластеры → реки → озёра → сглаживание. Каждый проход превращает только
//! равнины, поэтому более поздний проход никогда не стирает то, что поставил
//! более ранний.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;

use image::{ImageBuffer, Rgb, RgbImage};
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::base::apply_base_terrain;
use crate::clusters::{ClusterParams, grow_clusters};
use crate::config::GenerationRequest;
use crate::error::{MapGenError, Result};
use crate::grid::TerrainGrid;
use crate::lakes::{LakeParams, place_lakes};
use crate::noise::NoiseField;
use crate::random::SeededRandom;
use crate::rivers::carve_rivers;
use crate::smoothing::smooth;
use crate::stats::TerrainStats;
use crate::terrain::{TerrainCatalog, TerrainKind};

/// Единственный тип, который перезаписывают проходы с объектами
const REPLACEABLE: TerrainKind = TerrainKind::Plains;

/// Одна клетка готовой карты
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tile {
    pub world_id: u64,
    pub x: u32,
    pub y: u32,
    pub terrain_type: TerrainKind,
}

impl Tile {
    #[must_use]
    pub fn is_occupiable(&self, catalog: &TerrainCatalog) -> bool {
        catalog.get(self.terrain_type).is_occupiable
    }
}

/// Результат генерации
///
/// Тайлы идут построчно (`y` снаружи, `x` внутри), начало координат в левом
/// верхнем углу — в том же порядке их читает просмотр карты по окну.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedMap {
    pub width: u32,
    pub height: u32,
    pub tiles: Vec<Tile>,
    /// Доли типов в процентах, один знак после запятой
    pub stats: BTreeMap<TerrainKind, f64>,
    pub tile_counts: BTreeMap<TerrainKind, usize>,
    pub generation_time_ms: u64,
    /// Сид, с которым карта реально построена
    pub seed: u64,
}

impl GeneratedMap {
    /// Тайл по координатам или `None` за пределами карты
    #[must_use]
    pub fn tile_at(&self, x: u32, y: u32) -> Option<&Tile> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.tiles
            .get(y as usize * self.width as usize + x as usize)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Картинка «один пиксель — один тайл» в цветах каталога
    #[must_use]
    pub fn to_rgb_image(&self, catalog: &TerrainCatalog) -> RgbImage {
        ImageBuffer::from_fn(self.width, self.height, |x, y| {
            let kind = self
                .tile_at(x, y)
                .map_or(TerrainKind::Plains, |t| t.terrain_type);
            Rgb(catalog.get(kind).rgb)
        })
    }

    pub fn save_as_png(&self, path: impl AsRef<Path>) -> Result<()> {
        self.to_rgb_image(TerrainCatalog::standard())
            .save(path)
            .map_err(MapGenError::from)
    }
}

/// Генератор, привязанный к проверенному запросу
#[derive(Debug)]
pub struct MapGenerator {
    request: GenerationRequest,
    total_tiles: usize,
}

impl MapGenerator {
    /// Проверяет запрос до выделения памяти под сетку
    pub fn new(request: GenerationRequest) -> Result<Self> {
        let total_tiles = request.validate()?;
        Ok(Self {
            request,
            total_tiles,
        })
    }

    /// Строит карту. Без сида в запросе вытягивает свежий и возвращает его
    /// в результате.
    #[must_use]
    pub fn generate(&self) -> GeneratedMap {
        let started = Instant::now();
        let seed = self
            .request
            .seed
            .unwrap_or_else(TerrainCatalog::random_seed);

        let grid = self.build_grid(seed);
        let stats = TerrainStats::collect(&grid);
        let tiles = flatten(&grid, self.request.world_id);

        let generation_time_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        let dominant = stats.dominant().map_or("-", TerrainKind::name);
        log::info!(
            "карта {}x{} (сид {seed}) готова за {generation_time_ms} мс, преобладает {dominant}",
            self.request.width,
            self.request.height,
        );

        GeneratedMap {
            width: self.request.width,
            height: self.request.height,
            tiles,
            stats: stats.percentages(),
            tile_counts: stats.counts(),
            generation_time_ms,
            seed,
        }
    }

    /// Все проходы над плотной сеткой для заданного сида
    #[must_use]
    pub fn build_grid(&self, seed: u64) -> TerrainGrid {
        let settings = &self.request.settings;
        let percentages = &self.request.terrain_percentages;
        let total = self.total_tiles;

        let mut rng = SeededRandom::new(seed);
        let noise = NoiseField::new(settings.noise, seed, settings.noise_octaves);
        let mut grid = TerrainGrid::new(
            self.request.width as usize,
            self.request.height as usize,
            TerrainKind::Plains,
        );

        // === 1. Базовый рельеф ===
        let mountains = apply_base_terrain(&mut grid, &noise, settings);
        log::debug!("базовый проход: {mountains} гор из {total} клеток");

        // === 2. Леса и горы ===
        for (kind, radius) in [
            (TerrainKind::Forest, settings.forest_radius),
            (TerrainKind::Mountain, settings.mountain_radius),
        ] {
            grow_clusters(
                &mut grid,
                &mut rng,
                &ClusterParams {
                    kind,
                    replace: REPLACEABLE,
                    target_tiles: percentages.target_tiles(kind, total),
                    radius,
                    spread_chance: settings.spread_chance,
                },
            );
        }

        // === 3. Реки ===
        carve_rivers(
            &mut grid,
            &mut rng,
            REPLACEABLE,
            percentages.target_tiles(TerrainKind::River, total),
            settings.river_bias,
        );

        // === 4. Озёра ===
        place_lakes(
            &mut grid,
            &mut rng,
            &noise,
            &LakeParams {
                replace: REPLACEABLE,
                target_tiles: percentages.target_tiles(TerrainKind::Lake, total),
                radius: settings.lake_radius,
                noise_scale: settings.lake_noise_scale,
            },
        );

        // === 5. Сглаживание ===
        smooth(
            &mut grid,
            settings.smoothing_passes,
            settings.smoothing_majority,
        );

        grid
    }
}

/// Проверяет запрос и строит карту
///
/// # Примеры
/// ```
/// use terragen::{GenerationRequest, generate};
///
/// let map = generate(&GenerationRequest::new(10, 10).with_seed(42)).unwrap();
/// assert_eq!(map.tiles.len(), 100);
/// assert_eq!(map.seed, 42);
///
/// let again = generate(&GenerationRequest::new(10, 10).with_seed(42)).unwrap();
/// assert_eq!(map.tiles, again.tiles);
/// ```
pub fn generate(request: &GenerationRequest) -> Result<GeneratedMap> {
    Ok(MapGenerator::new(request.clone())?.generate())
}

#[cfg(feature = "parallel")]
fn flatten(grid: &TerrainGrid, world_id: u64) -> Vec<Tile> {
    let width = grid.width;
    grid.data
        .par_iter()
        .enumerate()
        .map(|(i, &kind)| make_tile(world_id, i, width, kind))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn flatten(grid: &TerrainGrid, world_id: u64) -> Vec<Tile> {
    let width = grid.width;
    grid.data
        .iter()
        .enumerate()
        .map(|(i, &kind)| make_tile(world_id, i, width, kind))
        .collect()
}

fn make_tile(world_id: u64, i: usize, width: usize, kind: TerrainKind) -> Tile {
    Tile {
        world_id,
        x: (i % width) as u32,
        y: (i / width) as u32,
        terrain_type: kind,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TerrainPercentages;

    #[test]
    fn invalid_request_fails_before_generation() {
        assert!(matches!(
            MapGenerator::new(GenerationRequest::new(0, 100)),
            Err(MapGenError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn raised_limits_fail_before_allocation() {
        let mut request = GenerationRequest::new(u32::MAX, u32::MAX);
        request.settings.max_dimension = u32::MAX;
        request.settings.max_tiles = u64::MAX;
        assert!(matches!(
            MapGenerator::new(request),
            Err(MapGenError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn tiles_are_row_major() {
        let map = MapGenerator::new(GenerationRequest::new(7, 4).with_seed(1))
            .unwrap()
            .generate();
        for (i, tile) in map.tiles.iter().enumerate() {
            assert_eq!(tile.x as usize, i % 7);
            assert_eq!(tile.y as usize, i / 7);
        }
    }

    #[test]
    fn world_id_is_copied_to_tiles() {
        let map = MapGenerator::new(GenerationRequest::new(12, 12).with_seed(3).with_world_id(77))
            .unwrap()
            .generate();
        assert!(map.tiles.iter().all(|t| t.world_id == 77));
    }

    #[test]
    fn tile_at_matches_coordinates() {
        let map = MapGenerator::new(GenerationRequest::new(20, 15).with_seed(8))
            .unwrap()
            .generate();
        let tile = map.tile_at(13, 9).unwrap();
        assert_eq!((tile.x, tile.y), (13, 9));
        assert!(map.tile_at(20, 0).is_none());
        assert!(map.tile_at(0, 15).is_none());
    }

    #[test]
    fn zero_feature_targets_leave_base_terrain() {
        let request = GenerationRequest::new(40, 40)
            .with_seed(5)
            .with_percentages(TerrainPercentages {
                plains: 100.0,
                forest: 0.0,
                mountain: 0.0,
                river: 0.0,
                lake: 0.0,
            });
        let map = MapGenerator::new(request).unwrap().generate();
        assert_eq!(map.tile_counts[&TerrainKind::Forest], 0);
        assert_eq!(map.tile_counts[&TerrainKind::River], 0);
        assert_eq!(map.tile_counts[&TerrainKind::Lake], 0);
    }

    #[test]
    fn image_matches_map_size() {
        let map = MapGenerator::new(GenerationRequest::new(16, 9).with_seed(2))
            .unwrap()
            .generate();
        let img = map.to_rgb_image(TerrainCatalog::standard());
        assert_eq!(img.dimensions(), (16, 9));
        let tile = map.tile_at(4, 5).unwrap();
        assert_eq!(
            img.get_pixel(4, 5).0,
            TerrainCatalog::standard().get(tile.terrain_type).rgb
        );
    }

    #[test]
    fn json_uses_camel_case() {
        let map = MapGenerator::new(GenerationRequest::new(3, 3).with_seed(4))
            .unwrap()
            .generate();
        let json = map.to_json().unwrap();
        assert!(json.contains("\"generationTimeMs\""));
        assert!(json.contains("\"terrainType\""));
        assert!(json.contains("\"worldId\""));
        assert!(json.contains("\"plains\""));
    }
}
