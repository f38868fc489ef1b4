//! Типы террейна и их каталог
//!
//! Каталог — неизменяемая статическая таблица: создаётся один раз и передаётся
//! генератору по ссылке.
//!
//! # Примеры
//! ```
//! use terragen::terrain::{TerrainCatalog, TerrainKind};
//!
//! let catalog = TerrainCatalog::standard();
//! let lake = catalog.by_name("lake").unwrap();
//! assert_eq!(lake.kind, TerrainKind::Lake);
//! assert!(!lake.is_occupiable);
//! assert!(catalog.is_water("river"));
//! assert!(!catalog.is_water("forest"));
//! ```

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Тип клетки карты
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum TerrainKind {
    #[default]
    Plains,
    Forest,
    Mountain,
    River,
    Lake,
}

impl TerrainKind {
    /// Все типы в порядке каталога
    pub const ALL: [TerrainKind; 5] = [
        TerrainKind::Plains,
        TerrainKind::Forest,
        TerrainKind::Mountain,
        TerrainKind::River,
        TerrainKind::Lake,
    ];

    /// Машинное имя (`"plains"`, `"forest"`, ...)
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            TerrainKind::Plains => "plains",
            TerrainKind::Forest => "forest",
            TerrainKind::Mountain => "mountain",
            TerrainKind::River => "river",
            TerrainKind::Lake => "lake",
        }
    }

    /// Позиция в `ALL` и в таблице каталога
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for TerrainKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Неизвестное имя террейна
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTerrain(pub String);

impl fmt::Display for UnknownTerrain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown terrain kind: {}", self.0)
    }
}

impl std::error::Error for UnknownTerrain {}

impl FromStr for TerrainKind {
    type Err = UnknownTerrain;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TerrainKind::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| UnknownTerrain(s.to_string()))
    }
}

/// Описание типа террейна
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TerrainInfo {
    /// Стабильный числовой идентификатор (1..=5)
    pub id: u8,
    pub kind: TerrainKind,
    pub name: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    /// Цвет в виде `"#rrggbb"`
    pub color: &'static str,
    #[serde(skip)]
    pub rgb: [u8; 3],
    /// `false` только для воды: на реке и озере нельзя основать поселение
    pub is_occupiable: bool,
}

/// Статическая таблица типов террейна
#[derive(Debug)]
pub struct TerrainCatalog {
    entries: [TerrainInfo; 5],
}

static STANDARD: TerrainCatalog = TerrainCatalog {
    entries: [
        TerrainInfo {
            id: 1,
            kind: TerrainKind::Plains,
            name: "plains",
            display_name: "Plains",
            description: "Fertile land, ideal for farming and settlement",
            color: "#DAA520",
            rgb: [0xDA, 0xA5, 0x20],
            is_occupiable: true,
        },
        TerrainInfo {
            id: 2,
            kind: TerrainKind::Forest,
            name: "forest",
            display_name: "Forest",
            description: "Dense woodland providing timber and cover",
            color: "#228B22",
            rgb: [0x22, 0x8B, 0x22],
            is_occupiable: true,
        },
        TerrainInfo {
            id: 3,
            kind: TerrainKind::Mountain,
            name: "mountain",
            display_name: "Mountains",
            description: "High mountains rich in stone",
            color: "#8B7355",
            rgb: [0x8B, 0x73, 0x55],
            is_occupiable: true,
        },
        TerrainInfo {
            id: 4,
            kind: TerrainKind::River,
            name: "river",
            display_name: "River",
            description: "A river supplying water and a trade route",
            color: "#4682B4",
            rgb: [0x46, 0x82, 0xB4],
            is_occupiable: false,
        },
        TerrainInfo {
            id: 5,
            kind: TerrainKind::Lake,
            name: "lake",
            display_name: "Lake",
            description: "A lake with clean water and fish",
            color: "#1E90FF",
            rgb: [0x1E, 0x90, 0xFF],
            is_occupiable: false,
        },
    ],
};

impl TerrainCatalog {
    /// Стандартный каталог из пяти типов
    #[must_use]
    pub fn standard() -> &'static TerrainCatalog {
        &STANDARD
    }

    #[must_use]
    pub fn get(&self, kind: TerrainKind) -> &TerrainInfo {
        &self.entries[kind.index()]
    }

    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&TerrainInfo> {
        self.entries.iter().find(|t| t.name == name)
    }

    #[must_use]
    pub fn by_id(&self, id: u8) -> Option<&TerrainInfo> {
        self.entries.iter().find(|t| t.id == id)
    }

    pub fn all(&self) -> impl Iterator<Item = &TerrainInfo> {
        self.entries.iter()
    }

    /// Типы, на которых можно селиться
    pub fn occupiable(&self) -> impl Iterator<Item = &TerrainInfo> {
        self.entries.iter().filter(|t| t.is_occupiable)
    }

    /// Водные типы
    pub fn water(&self) -> impl Iterator<Item = &TerrainInfo> {
        self.entries.iter().filter(|t| !t.is_occupiable)
    }

    /// Неизвестное имя водой не считается
    #[must_use]
    pub fn is_water(&self, name: &str) -> bool {
        self.by_name(name).is_some_and(|t| !t.is_occupiable)
    }

    /// Свежий сид в `[0, 1_000_000)` для запросов без явного сида
    #[must_use]
    pub fn random_seed() -> u64 {
        rand::thread_rng().gen_range(0..1_000_000)
    }
}
