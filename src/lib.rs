pub mod base;
pub mod clusters;
pub mod config;
pub mod error;
pub mod generator;
pub mod grid;
pub mod lakes;
pub mod noise;
pub mod random;
pub mod rivers;
pub mod smoothing;
pub mod stats;
pub mod terrain;

pub use config::{GenerationRequest, GeneratorSettings, TerrainPercentages};
pub use error::MapGenError;
pub use generator::{GeneratedMap, MapGenerator, Tile, generate};
pub use terrain::{TerrainCatalog, TerrainInfo, TerrainKind};
