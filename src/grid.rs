use crate::terrain::TerrainKind;

/// Плотная сетка террейна на время генерации.
///
/// Один непрерывный буфер, индекс `y * width + x`; в публичный список тайлов
/// превращается один раз, в конце.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerrainGrid {
    pub width: usize,
    pub height: usize,
    pub data: Vec<TerrainKind>,
}

impl TerrainGrid {
    /// Сетка, целиком заполненная `fill`
    #[must_use]
    pub fn new(width: usize, height: usize, fill: TerrainKind) -> Self {
        Self {
            width,
            height,
            data: vec![fill; width * height],
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[must_use]
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> TerrainKind {
        self.data[self.index(x, y)]
    }

    pub fn set(&mut self, x: usize, y: usize, kind: TerrainKind) {
        let idx = self.index(x, y);
        self.data[idx] = kind;
    }

    /// Индекс клетки для знаковых координат или `None`, если точка вне карты
    #[must_use]
    pub fn checked_index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            None
        } else {
            Some(y as usize * self.width + x as usize)
        }
    }

    /// Заменяет клетку на `to`, только если там сейчас `from`.
    /// Возвращает `true`, если замена произошла.
    pub fn replace(&mut self, idx: usize, from: TerrainKind, to: TerrainKind) -> bool {
        if self.data[idx] == from {
            self.data[idx] = to;
            true
        } else {
            false
        }
    }

    /// Количество клеток данного типа
    #[must_use]
    pub fn count(&self, kind: TerrainKind) -> usize {
        self.data.iter().filter(|&&k| k == kind).count()
    }
}
