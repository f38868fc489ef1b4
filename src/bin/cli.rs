use clap::Parser;
use std::path::PathBuf;
use terragen::{GenerationRequest, MapGenerator, TerrainCatalog, TerrainKind};

/// Генератор карт территорий для мира
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Путь к конфигурационному файлу в формате TOML
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Ширина карты (перекрывает значение из конфигурации)
    #[arg(long)]
    width: Option<u32>,

    /// Высота карты (перекрывает значение из конфигурации)
    #[arg(long)]
    height: Option<u32>,

    /// Сид; без него берётся случайный
    #[arg(short, long)]
    seed: Option<u64>,

    /// Идентификатор мира, записываемый в тайлы
    #[arg(long)]
    world_id: Option<u64>,

    /// Проверять границы админ-API (100..=2000 по каждой стороне)
    #[arg(long)]
    strict: bool,

    /// Путь для сохранения карты в JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// Путь для сохранения превью в PNG
    #[arg(long)]
    png: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let mut request = match &cli.config {
        Some(path) => {
            println!("🔍 Загрузка конфигурации из {}...", path.display());
            GenerationRequest::from_toml_file(path)?
        }
        None => GenerationRequest::new(1000, 1000),
    };
    if let Some(width) = cli.width {
        request.width = width;
    }
    if let Some(height) = cli.height {
        request.height = height;
    }
    if cli.seed.is_some() {
        request.seed = cli.seed;
    }
    if let Some(world_id) = cli.world_id {
        request.world_id = world_id;
    }
    if cli.strict {
        request.validate_world_bounds()?;
    }

    println!(
        "🌍 Генерация карты (размер: {}×{})...",
        request.width, request.height
    );
    let map = MapGenerator::new(request)?.generate();
    println!(
        "📊 Карта готова: {} тайлов за {} мс, сид {}",
        map.tiles.len(),
        map.generation_time_ms,
        map.seed
    );

    let catalog = TerrainCatalog::standard();
    for kind in TerrainKind::ALL {
        let info = catalog.get(kind);
        println!(
            "   {:<10} {:>8} ({:>5.1}%)",
            info.display_name, map.tile_counts[&kind], map.stats[&kind]
        );
    }

    if let Some(path) = &cli.json {
        println!("💾 Сохранение JSON в {}", path.display());
        std::fs::write(path, map.to_json()?)?;
    }
    if let Some(path) = &cli.png {
        println!("🖼  Сохранение превью в {}", path.display());
        map.save_as_png(path)?;
    }

    println!("\nГотово!");
    Ok(())
}
