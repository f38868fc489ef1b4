use std::collections::VecDeque;

use crate::grid::TerrainGrid;
use crate::random::SeededRandom;
use crate::terrain::TerrainKind;

const DIRECTIONS: [(i64, i64); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

/// Запас по количеству кластеров сверх оценки: кластеры перекрываются и
/// натыкаются на уже занятые клетки.
const CLUSTER_HEADROOM: usize = 4;
const MIN_CLUSTERS: usize = 10;

/// Параметры одного прохода кластеров
#[derive(Debug, Clone, Copy)]
pub struct ClusterParams {
    /// Что рисуем
    pub kind: TerrainKind,
    /// Что разрешено перезаписывать
    pub replace: TerrainKind,
    /// Сколько клеток нужно поставить
    pub target_tiles: usize,
    /// Радиус кластера `[min, max]`, выбирается для каждого кластера
    pub radius: (u32, u32),
    /// Вероятность распространения в каждого из 4 соседей
    pub spread_chance: f64,
}

impl ClusterParams {
    /// Верхняя граница числа кластеров: цель, делённая на ожидаемый выход
    /// одного кластера, с запасом. Защищает от бесконечного цикла, когда
    /// заменяемых клеток почти не осталось.
    #[must_use]
    pub fn max_clusters(&self) -> usize {
        let avg_radius = f64::from(self.radius.0 + self.radius.1) / 2.0;
        let expected_yield = ((avg_radius * avg_radius) / 2.0).max(1.0) as usize;
        self.target_tiles.div_ceil(expected_yield) * CLUSTER_HEADROOM + MIN_CLUSTERS
    }
}

/// Выращивает кластеры случайным обходом в ширину, пока не поставлено
/// `target_tiles` клеток или не исчерпан лимит кластеров.
///
/// Возвращает количество поставленных клеток.
pub fn grow_clusters(
    grid: &mut TerrainGrid,
    rng: &mut SeededRandom,
    params: &ClusterParams,
) -> usize {
    if params.target_tiles == 0 || grid.is_empty() {
        return 0;
    }

    let mut walk = ClusterWalk::new(grid.len());
    let mut placed = 0;
    let max_clusters = params.max_clusters();
    let mut clusters = 0;

    while placed < params.target_tiles && clusters < max_clusters {
        clusters += 1;

        let cx = rng.below(grid.width) as i64;
        let cy = rng.below(grid.height) as i64;
        let max_radius = f64::from(rng.range_inclusive(params.radius.0, params.radius.1));

        placed += walk.grow(
            grid,
            rng,
            params,
            (cx, cy),
            max_radius,
            params.target_tiles - placed,
        );
    }

    log::debug!(
        "кластеры {}: поставлено {placed}/{} клеток за {clusters} кластеров",
        params.kind,
        params.target_tiles
    );
    placed
}

/// Состояние обхода, переиспользуемое между кластерами одного прохода
struct ClusterWalk {
    // Метка посещения = номер кластера, чтобы не чистить массив между кластерами
    visited: Vec<u32>,
    stamp: u32,
    queue: VecDeque<(i64, i64)>,
}

impl ClusterWalk {
    fn new(len: usize) -> Self {
        Self {
            visited: vec![0; len],
            stamp: 0,
            queue: VecDeque::new(),
        }
    }

    /// Один кластер с центром `center`. Ставит не больше `budget` клеток.
    fn grow(
        &mut self,
        grid: &mut TerrainGrid,
        rng: &mut SeededRandom,
        params: &ClusterParams,
        center: (i64, i64),
        max_radius: f64,
        budget: usize,
    ) -> usize {
        self.stamp += 1;
        self.queue.clear();
        self.queue.push_back(center);
        let mut placed = 0;

        while let Some((x, y)) = self.queue.pop_front() {
            if placed >= budget {
                break;
            }

            let Some(idx) = grid.checked_index(x, y) else {
                continue;
            };
            if self.visited[idx] == self.stamp {
                continue;
            }
            self.visited[idx] = self.stamp;

            let dx = (x - center.0) as f64;
            let dy = (y - center.1) as f64;
            if (dx * dx + dy * dy).sqrt() > max_radius {
                continue;
            }

            if grid.replace(idx, params.replace, params.kind) {
                placed += 1;
            }

            for &(ox, oy) in &DIRECTIONS {
                if rng.chance(params.spread_chance) {
                    self.queue.push_back((x + ox, y + oy));
                }
            }
        }

        placed
    }
}
