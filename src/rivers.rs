use crate::grid::TerrainGrid;
use crate::random::SeededRandom;
use crate::terrain::TerrainKind;

/// Вверх, вправо, вниз, влево. Порядок важен для воспроизводимости.
const DIRECTIONS: [(i64, i64); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

const MIN_RIVER_LENGTH: usize = 8;

/// Бюджет длины одной реки: полусумма сторон карты
#[must_use]
pub fn river_length(width: usize, height: usize) -> usize {
    ((width + height) / 2).max(MIN_RIVER_LENGTH)
}

/// Количество рек для целевого числа клеток: `max(1, target / length)`.
/// Нулевая цель означает отсутствие рек.
#[must_use]
pub fn river_count(target_tiles: usize, length: usize) -> usize {
    if target_tiles == 0 {
        0
    } else {
        (target_tiles / length.max(1)).max(1)
    }
}

/// Прокладывает реки от краёв карты внутрь.
///
/// Каждая река стартует в случайной точке случайного края и идёт шагами по
/// четырём направлениям. Шаг к центру по оси, на которой до центра дальше,
/// в `bias` раз вероятнее остальных, поэтому реки тянутся к середине карты,
/// но остаются извилистыми. Река заканчивается, выйдя за карту или
/// исчерпав бюджет длины. В реку превращаются только клетки `replace`.
///
/// Возвращает количество поставленных клеток.
pub fn carve_rivers(
    grid: &mut TerrainGrid,
    rng: &mut SeededRandom,
    replace: TerrainKind,
    target_tiles: usize,
    bias: f64,
) -> usize {
    if grid.is_empty() {
        return 0;
    }

    let length = river_length(grid.width, grid.height);
    let rivers = river_count(target_tiles, length);
    let mut placed = 0;

    for _ in 0..rivers {
        let start = edge_start(grid, rng);
        placed += carve_river(grid, rng, start, length, replace, bias);
    }

    log::debug!("реки: {rivers} шт., поставлено {placed}/{target_tiles} клеток");
    placed
}

/// Случайная точка на случайном из четырёх краёв
fn edge_start(grid: &TerrainGrid, rng: &mut SeededRandom) -> (i64, i64) {
    let last_x = grid.width as i64 - 1;
    let last_y = grid.height as i64 - 1;
    match rng.below(4) {
        0 => (rng.below(grid.width) as i64, 0),
        1 => (last_x, rng.below(grid.height) as i64),
        2 => (rng.below(grid.width) as i64, last_y),
        _ => (0, rng.below(grid.height) as i64),
    }
}

fn carve_river(
    grid: &mut TerrainGrid,
    rng: &mut SeededRandom,
    start: (i64, i64),
    length: usize,
    replace: TerrainKind,
    bias: f64,
) -> usize {
    let center_x = (grid.width as f64 - 1.0) / 2.0;
    let center_y = (grid.height as f64 - 1.0) / 2.0;
    let (mut x, mut y) = start;
    let mut placed = 0;

    for _ in 0..length {
        let Some(idx) = grid.checked_index(x, y) else {
            break;
        };
        if grid.replace(idx, replace, TerrainKind::River) {
            placed += 1;
        }

        let weights = step_weights(center_x - x as f64, center_y - y as f64, bias);
        let (dx, dy) = DIRECTIONS[rng.weighted_index(&weights)];
        x += dx;
        y += dy;
    }

    placed
}

/// Веса для `DIRECTIONS`: направление к центру по более дальней оси
/// получает вес `bias`, остальные — 1.
fn step_weights(to_center_x: f64, to_center_y: f64, bias: f64) -> [f64; 4] {
    let mut weights = [1.0; 4];
    let favored = if to_center_x.abs() >= to_center_y.abs() && to_center_x != 0.0 {
        Some(if to_center_x > 0.0 { 1 } else { 3 })
    } else if to_center_y != 0.0 {
        Some(if to_center_y > 0.0 { 2 } else { 0 })
    } else {
        None
    };
    if let Some(i) = favored {
        weights[i] = bias;
    }
    weights
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_and_length() {
        assert_eq!(river_length(200, 100), 150);
        assert_eq!(river_length(4, 4), MIN_RIVER_LENGTH);
        assert_eq!(river_count(0, 150), 0);
        assert_eq!(river_count(10, 150), 1);
        assert_eq!(river_count(4000, 200), 20);
    }

    #[test]
    fn weights_favor_farther_axis() {
        // Центр правее и немного ниже: шаг вправо
        assert_eq!(step_weights(10.0, 2.0, 3.0), [1.0, 3.0, 1.0, 1.0]);
        // Центр выше: шаг вверх
        assert_eq!(step_weights(1.0, -5.0, 3.0), [3.0, 1.0, 1.0, 1.0]);
        // Центр левее
        assert_eq!(step_weights(-4.0, 4.0, 3.0), [1.0, 1.0, 1.0, 3.0]);
        // В центре предпочтений нет
        assert_eq!(step_weights(0.0, 0.0, 3.0), [1.0; 4]);
    }

    #[test]
    fn rivers_start_on_edge() {
        let grid = TerrainGrid::new(30, 20, TerrainKind::Plains);
        let mut rng = SeededRandom::new(4);
        for _ in 0..100 {
            let (x, y) = edge_start(&grid, &mut rng);
            assert!((0..30).contains(&x) && (0..20).contains(&y));
            assert!(x == 0 || y == 0 || x == 29 || y == 19);
        }
    }

    #[test]
    fn river_is_connected_and_bounded_by_length() {
        let mut grid = TerrainGrid::new(50, 50, TerrainKind::Plains);
        let mut rng = SeededRandom::new(12);
        let placed = carve_river(&mut grid, &mut rng, (0, 25), 40, TerrainKind::Plains, 3.0);
        assert!((1..=40).contains(&placed));
        assert_eq!(grid.get(0, 25), TerrainKind::River);
        assert_eq!(placed, grid.count(TerrainKind::River));

        // Каждая клетка реки, кроме одиночной, имеет соседа-реку
        if placed > 1 {
            for y in 0..50 {
                for x in 0..50 {
                    if grid.get(x, y) != TerrainKind::River {
                        continue;
                    }
                    let has_neighbor = DIRECTIONS.iter().any(|&(dx, dy)| {
                        grid.checked_index(x as i64 + dx, y as i64 + dy)
                            .is_some_and(|i| grid.data[i] == TerrainKind::River)
                    });
                    assert!(has_neighbor, "isolated river tile at ({x}, {y})");
                }
            }
        }
    }

    #[test]
    fn rivers_trend_toward_center() {
        let mut grid = TerrainGrid::new(101, 101, TerrainKind::Plains);
        let mut rng = SeededRandom::new(31);
        carve_river(&mut grid, &mut rng, (5, 50), 60, TerrainKind::Plains, 10.0);
        let deepest = (0..101)
            .filter(|&x| (0..101).any(|y| grid.get(x, y) == TerrainKind::River))
            .max()
            .unwrap_or(0);
        assert!(deepest >= 20, "river reached only x = {deepest}");
    }

    #[test]
    fn rivers_only_replace_designated_kind() {
        let mut grid = TerrainGrid::new(40, 40, TerrainKind::Forest);
        let mut rng = SeededRandom::new(2);
        let placed = carve_rivers(&mut grid, &mut rng, TerrainKind::Plains, 200, 3.0);
        assert_eq!(placed, 0);
        assert_eq!(grid.count(TerrainKind::Forest), 1600);
    }

    #[test]
    fn same_seed_same_rivers() {
        let mut a = TerrainGrid::new(64, 48, TerrainKind::Plains);
        let mut b = a.clone();
        carve_rivers(&mut a, &mut SeededRandom::new(5), TerrainKind::Plains, 300, 3.0);
        carve_rivers(&mut b, &mut SeededRandom::new(5), TerrainKind::Plains, 300, 3.0);
        assert_eq!(a, b);
        assert!(a.count(TerrainKind::River) > 0);
    }
}
