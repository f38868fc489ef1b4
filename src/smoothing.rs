use crate::grid::TerrainGrid;
use crate::terrain::TerrainKind;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Клетки, которые сглаживание может перекрасить. Вода и горы не меняются,
/// но своим большинством поглощают случайные вкрапления равнин и леса.
fn is_candidate(kind: TerrainKind) -> bool {
    matches!(kind, TerrainKind::Plains | TerrainKind::Forest)
}

/// Мажоритарный фильтр по окрестности Мура (8 соседей + сама клетка).
///
/// Внутренняя клетка-кандидат перекрашивается в другой тип, если он занимает
/// не меньше `majority` из 9 клеток. Граница шириной в одну клетку не
/// трогается. Все изменения одного прохода считаются по снимку сетки до
/// прохода, поэтому порядок обхода не влияет на результат.
///
/// Возвращает общее количество перекрашенных клеток.
pub fn smooth(grid: &mut TerrainGrid, passes: u32, majority: u32) -> usize {
    let (width, height) = (grid.width, grid.height);
    if width < 3 || height < 3 {
        return 0;
    }

    let mut total = 0;
    for pass in 0..passes {
        let snapshot = grid.data.clone();
        let changed = smooth_pass(&snapshot, &mut grid.data, width, height, majority);
        log::debug!("сглаживание, проход {}: перекрашено {changed} клеток", pass + 1);
        total += changed;
        // Тот же снимок даст тот же результат
        if changed == 0 {
            break;
        }
    }
    total
}

#[cfg(feature = "parallel")]
fn smooth_pass(
    snapshot: &[TerrainKind],
    data: &mut [TerrainKind],
    width: usize,
    height: usize,
    majority: u32,
) -> usize {
    data.par_chunks_mut(width)
        .enumerate()
        .map(|(y, row)| smooth_row(snapshot, row, y, width, height, majority))
        .sum()
}

#[cfg(not(feature = "parallel"))]
fn smooth_pass(
    snapshot: &[TerrainKind],
    data: &mut [TerrainKind],
    width: usize,
    height: usize,
    majority: u32,
) -> usize {
    data.chunks_mut(width)
        .enumerate()
        .map(|(y, row)| smooth_row(snapshot, row, y, width, height, majority))
        .sum()
}

#[allow(clippy::needless_range_loop)]
fn smooth_row(
    snapshot: &[TerrainKind],
    row: &mut [TerrainKind],
    y: usize,
    width: usize,
    height: usize,
    majority: u32,
) -> usize {
    if y == 0 || y == height - 1 {
        return 0;
    }

    let mut changed = 0;
    for x in 1..width - 1 {
        let own = snapshot[y * width + x];
        if !is_candidate(own) {
            continue;
        }
        if let Some(kind) = majority_kind(snapshot, width, x, y, own, majority) {
            row[x] = kind;
            changed += 1;
        }
    }
    changed
}

/// Тип, отличный от `own`, который занимает не меньше `majority` клеток 3×3
fn majority_kind(
    snapshot: &[TerrainKind],
    width: usize,
    x: usize,
    y: usize,
    own: TerrainKind,
    majority: u32,
) -> Option<TerrainKind> {
    let mut counts = [0u32; TerrainKind::ALL.len()];
    for ny in y - 1..=y + 1 {
        let row = &snapshot[ny * width..(ny + 1) * width];
        for &kind in &row[x - 1..=x + 1] {
            counts[kind.index()] += 1;
        }
    }

    TerrainKind::ALL
        .into_iter()
        .find(|&kind| kind != own && counts[kind.index()] >= majority)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_from(rows: &[&str]) -> TerrainGrid {
        let height = rows.len();
        let width = rows[0].len();
        let data = rows
            .iter()
            .flat_map(|row| {
                row.chars().map(|c| match c {
                    'F' => TerrainKind::Forest,
                    'M' => TerrainKind::Mountain,
                    'R' => TerrainKind::River,
                    'L' => TerrainKind::Lake,
                    _ => TerrainKind::Plains,
                })
            })
            .collect();
        TerrainGrid {
            width,
            height,
            data,
        }
    }

    #[test]
    fn isolated_plains_inside_forest_become_forest() {
        let mut grid = grid_from(&["FFFFF", "FFFFF", "FF.FF", "FFFFF", "FFFFF"]);
        assert_eq!(smooth(&mut grid, 1, 6), 1);
        assert_eq!(grid.count(TerrainKind::Forest), 25);
    }

    #[test]
    fn water_and_mountains_are_never_changed() {
        let mut grid = grid_from(&[".....", ".....", "..L..", "..M..", "....."]);
        smooth(&mut grid, 2, 6);
        assert_eq!(grid.get(2, 2), TerrainKind::Lake);
        assert_eq!(grid.get(2, 3), TerrainKind::Mountain);
    }

    #[test]
    fn water_majority_absorbs_plains() {
        let mut grid = grid_from(&["LLLLL", "LLLLL", "LL.LL", "LLLLL", "LLLLL"]);
        smooth(&mut grid, 1, 6);
        assert_eq!(grid.get(2, 2), TerrainKind::Lake);
    }

    #[test]
    fn border_is_untouched() {
        let mut grid = grid_from(&["F.FF", "FFFF", "FFFF", "FF.F"]);
        smooth(&mut grid, 2, 6);
        assert_eq!(grid.get(1, 0), TerrainKind::Plains);
        assert_eq!(grid.get(2, 3), TerrainKind::Plains);
    }

    #[test]
    fn uses_snapshot_not_in_place_updates() {
        let mut grid = grid_from(&["FFFFF", "F....", "FFFF."]);
        smooth(&mut grid, 1, 6);
        // 7 и 6 лесов в окрестности
        assert_eq!(grid.get(1, 1), TerrainKind::Forest);
        assert_eq!(grid.get(2, 1), TerrainKind::Forest);
        // По снимку 5 лесов; при обновлении на месте стало бы 6
        assert_eq!(grid.get(3, 1), TerrainKind::Plains);
    }

    #[test]
    fn below_majority_nothing_changes() {
        let mut grid = grid_from(&["FF...", "F....", ".....", ".....", "....."]);
        let before = grid.clone();
        assert_eq!(smooth(&mut grid, 2, 6), 0);
        assert_eq!(grid, before);
    }

    #[test]
    fn tiny_grids_are_skipped() {
        let mut grid = grid_from(&["F.", ".F"]);
        assert_eq!(smooth(&mut grid, 2, 6), 0);
    }
}
