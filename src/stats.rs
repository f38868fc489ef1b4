use std::collections::BTreeMap;

use serde::Serialize;

use crate::grid::TerrainGrid;
use crate::terrain::TerrainKind;

/// Количество клеток каждого типа
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TerrainStats {
    pub total: usize,
    counts: [usize; TerrainKind::ALL.len()],
}

impl TerrainStats {
    #[must_use]
    pub fn collect(grid: &TerrainGrid) -> Self {
        Self::from_kinds(grid.data.iter().copied())
    }

    pub fn from_kinds(kinds: impl IntoIterator<Item = TerrainKind>) -> Self {
        let mut counts = [0; TerrainKind::ALL.len()];
        let mut total = 0;
        for kind in kinds {
            counts[kind.index()] += 1;
            total += 1;
        }
        Self { total, counts }
    }

    #[must_use]
    pub fn count(&self, kind: TerrainKind) -> usize {
        self.counts[kind.index()]
    }

    /// Доля типа в процентах с одним знаком после запятой
    #[must_use]
    pub fn percentage(&self, kind: TerrainKind) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.count(kind) as f64 * 1000.0 / self.total as f64).round() / 10.0
    }

    /// Доли всех пяти типов, включая нулевые
    #[must_use]
    pub fn percentages(&self) -> BTreeMap<TerrainKind, f64> {
        TerrainKind::ALL
            .into_iter()
            .map(|kind| (kind, self.percentage(kind)))
            .collect()
    }

    #[must_use]
    pub fn counts(&self) -> BTreeMap<TerrainKind, usize> {
        TerrainKind::ALL
            .into_iter()
            .map(|kind| (kind, self.count(kind)))
            .collect()
    }

    /// Самый частый тип; при равенстве побеждает тот, что раньше в каталоге
    #[must_use]
    pub fn dominant(&self) -> Option<TerrainKind> {
        if self.total == 0 {
            return None;
        }
        TerrainKind::ALL
            .into_iter()
            .rev()
            .max_by_key(|&kind| self.count(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_and_percentages() {
        let mut grid = TerrainGrid::new(10, 10, TerrainKind::Plains);
        for x in 0..10 {
            grid.set(x, 0, TerrainKind::River);
        }
        grid.set(0, 5, TerrainKind::Lake);

        let stats = TerrainStats::collect(&grid);
        assert_eq!(stats.total, 100);
        assert_eq!(stats.count(TerrainKind::Plains), 89);
        assert_eq!(stats.percentage(TerrainKind::River), 10.0);
        assert_eq!(stats.percentage(TerrainKind::Lake), 1.0);
        assert_eq!(stats.percentage(TerrainKind::Forest), 0.0);
        assert_eq!(stats.dominant(), Some(TerrainKind::Plains));
    }

    #[test]
    fn rounds_to_one_decimal() {
        let kinds = [TerrainKind::Forest]
            .into_iter()
            .chain(std::iter::repeat_n(TerrainKind::Plains, 2));
        let stats = TerrainStats::from_kinds(kinds);
        assert_eq!(stats.percentage(TerrainKind::Forest), 33.3);
        assert_eq!(stats.percentage(TerrainKind::Plains), 66.7);
    }

    #[test]
    fn percentages_include_all_kinds() {
        let stats = TerrainStats::from_kinds([TerrainKind::Lake]);
        let map = stats.percentages();
        assert_eq!(map.len(), 5);
        assert_eq!(map[&TerrainKind::Lake], 100.0);
        let sum: f64 = map.values().sum();
        assert!((sum - 100.0).abs() <= 0.5);
    }

    #[test]
    fn empty_stats() {
        let stats = TerrainStats::from_kinds(std::iter::empty());
        assert_eq!(stats.percentage(TerrainKind::Plains), 0.0);
        assert_eq!(stats.dominant(), None);
    }

    #[test]
    fn tie_prefers_catalog_order() {
        let stats = TerrainStats::from_kinds([TerrainKind::Lake, TerrainKind::Forest]);
        assert_eq!(stats.dominant(), Some(TerrainKind::Forest));
    }
}
