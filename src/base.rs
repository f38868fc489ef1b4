use crate::config::GeneratorSettings;
use crate::grid::TerrainGrid;
use crate::noise::NoiseField;
use crate::terrain::TerrainKind;

/// Базовый проход: вся карта — равнины, а там, где нормированный шум выше
/// порога, — горы. Даёт крупные нагорья с мягкими краями до того, как
/// поверх лягут кластеры, реки и озёра.
///
/// Возвращает количество поставленных гор.
pub fn apply_base_terrain(
    grid: &mut TerrainGrid,
    noise: &NoiseField,
    settings: &GeneratorSettings,
) -> usize {
    let width = grid.width;
    let scale = settings.noise_scale;
    let threshold = settings.mountain_threshold;
    let mut mountains = 0;

    for (i, cell) in grid.data.iter_mut().enumerate() {
        let x = (i % width) as f64;
        let y = (i / width) as f64;

        *cell = if noise.sample_normalized(x * scale, y * scale) > threshold {
            mountains += 1;
            TerrainKind::Mountain
        } else {
            TerrainKind::Plains
        };
    }

    mountains
}
