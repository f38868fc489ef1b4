use crate::grid::TerrainGrid;
use crate::noise::NoiseField;
use crate::random::SeededRandom;
use crate::terrain::TerrainKind;

/// Средняя площадь озера в клетках для оценки их количества
pub const AVERAGE_LAKE_SIZE: usize = 60;

/// Параметры прохода озёр
#[derive(Debug, Clone, Copy)]
pub struct LakeParams {
    pub replace: TerrainKind,
    pub target_tiles: usize,
    /// Базовый радиус `[min, max]`
    pub radius: (u32, u32),
    /// Масштаб координат для шума, искажающего контур
    pub noise_scale: f64,
}

/// Количество озёр: `max(1, target / AVERAGE_LAKE_SIZE)`, ноль при нулевой цели
#[must_use]
pub fn lake_count(target_tiles: usize) -> usize {
    if target_tiles == 0 {
        0
    } else {
        (target_tiles / AVERAGE_LAKE_SIZE).max(1)
    }
}

/// Ставит озёра неправильной формы.
///
/// Клетка ограничивающего квадрата попадает в озеро, если расстояние до
/// центра не больше `radius * (0.7 + noise * 0.3)`, где `noise` — значение
/// шума в `[-1, 1]` в этой клетке.
///
/// Возвращает количество поставленных клеток.
pub fn place_lakes(
    grid: &mut TerrainGrid,
    rng: &mut SeededRandom,
    noise: &NoiseField,
    params: &LakeParams,
) -> usize {
    if grid.is_empty() {
        return 0;
    }

    let lakes = lake_count(params.target_tiles);
    let mut placed = 0;

    for _ in 0..lakes {
        let cx = rng.below(grid.width) as i64;
        let cy = rng.below(grid.height) as i64;
        let radius = rng.range_inclusive(params.radius.0, params.radius.1);
        placed += stamp_lake(grid, noise, params, (cx, cy), radius);
    }

    log::debug!(
        "озёра: {lakes} шт., поставлено {placed}/{} клеток",
        params.target_tiles
    );
    placed
}

fn stamp_lake(
    grid: &mut TerrainGrid,
    noise: &NoiseField,
    params: &LakeParams,
    (cx, cy): (i64, i64),
    radius: u32,
) -> usize {
    let r = i64::from(radius);
    let radius = f64::from(radius);
    let mut placed = 0;

    // Квадрат обрезается по карте: радиус может быть больше самой карты
    let rows = (cy - r).max(0)..=(cy + r).min(grid.height as i64 - 1);
    let cols = (cx - r).max(0)..=(cx + r).min(grid.width as i64 - 1);

    for y in rows {
        for x in cols.clone() {
            let Some(idx) = grid.checked_index(x, y) else {
                continue;
            };
            let dx = (x - cx) as f64;
            let dy = (y - cy) as f64;
            let distance = (dx * dx + dy * dy).sqrt();
            let wobble = noise.sample(x as f64 * params.noise_scale, y as f64 * params.noise_scale);

            if distance <= radius * (0.7 + wobble * 0.3)
                && grid.replace(idx, params.replace, TerrainKind::Lake)
            {
                placed += 1;
            }
        }
    }

    placed
}
