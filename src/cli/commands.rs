use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};

use crate::config::catalog::Catalog;
use crate::config::generation::GenerationParams;
use crate::config::simulation::SimulationConfig;
use crate::simulation::action::Action;
use crate::simulation::engine::FarmEngine;
use crate::world::generation::{generate_map, print_map_summary};
use crate::world::tile::{Obstacle, TileType};

/// Totals printed after a scripted run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub actions: u32,
    pub succeeded: u32,
    pub failed: u32,
    pub skipped: u32,
    pub day: u32,
    pub money: u32,
    pub energy: u32,
}

/// Resolve the catalog: `--catalog` wins over `catalog_file` in the config,
/// and the built-in catalog is used when neither is set.
pub fn load_catalog(
    config: &SimulationConfig,
    catalog_path: Option<&str>,
) -> Result<Catalog, String> {
    match catalog_path.or(config.catalog_file.as_deref()) {
        Some(path) => {
            let catalog = Catalog::from_file(Path::new(path))?;
            info!(path, items = catalog.items().len(), "Catalog loaded");
            Ok(catalog)
        }
        None => Ok(Catalog::default()),
    }
}

/// Generate a map. Writes it to `output` if given, otherwise to stdout.
pub fn generate(
    params_path: Option<&str>,
    seed: Option<u64>,
    output: Option<&str>,
) -> Result<(), String> {
    let mut params = match params_path {
        Some(path) => GenerationParams::from_file(Path::new(path))?,
        None => GenerationParams::default(),
    };
    if let Some(seed) = seed {
        params.seed = seed;
    }
    let map = generate_map(&params)?;
    info!(
        seed = map.params.seed,
        rows = map.params.rows,
        cols = map.params.cols,
        "Map generated"
    );

    match output {
        Some(path) => {
            std::fs::write(path, map.to_text())
                .map_err(|e| format!("Cannot write {}: {}", path, e))?;
            print_map_summary(&map);
            println!("\nMap saved to {}", path);
        }
        None => print!("{}", map.to_text()),
    }
    Ok(())
}

/// Print the starting state of a farm, as text or as a JSON snapshot.
pub fn inspect(
    config: &SimulationConfig,
    catalog: Catalog,
    map_path: &str,
    as_json: bool,
) -> Result<(), String> {
    let engine = FarmEngine::from_map_file(Path::new(map_path), catalog, config)
        .map_err(|e| format!("Failed to load map {}: {}", map_path, e))?;

    if as_json {
        println!("{}", engine.snapshot().to_json());
    } else {
        print_farm_summary(&engine);
    }
    Ok(())
}

fn print_farm_summary(engine: &FarmEngine) {
    let grid = engine.grid();
    let player = engine.player();

    println!("=== Farm ===");
    println!("Day: {}", engine.day());
    println!("Size: {} x {}", grid.rows(), grid.cols());
    println!();
    println!("--- Tiles ---");
    let kinds = [
        ("Grass", TileType::Grass),
        ("Soil", TileType::Soil),
        ("Water", TileType::Impassable(Obstacle::Water)),
        ("Fence", TileType::Impassable(Obstacle::Fence)),
        ("Stone", TileType::Impassable(Obstacle::Stone)),
    ];
    for (name, tile) in kinds {
        let count = grid.count(tile);
        if count > 0 {
            println!("  {:<8} {:>5}", name, count);
        }
    }
    println!();
    println!("--- Player ---");
    println!("  Position: {}", player.position());
    println!("  Facing: {:?}", player.facing());
    println!("  Energy: {}/{}", player.energy(), player.max_energy());
    println!("  Money: ${}", player.money());
    println!("  Inventory:");
    if player.inventory().is_empty() {
        println!("    (empty)");
    }
    for (item, count) in player.inventory() {
        println!("    {:<14} {:>4}", item, count);
    }
    println!();
    println!("--- Map ---");
    let start = player.position();
    for (r, row) in grid.to_rows().iter().enumerate() {
        let line: String = row
            .chars()
            .enumerate()
            .map(|(c, code)| {
                if r as i32 == start.row && c as i32 == start.col {
                    '@'
                } else {
                    code
                }
            })
            .collect();
        println!("  {}", line);
    }
}

/// Load a map and play the actions from `script`, or stdin when no script
/// is given.
pub fn run(
    config: &SimulationConfig,
    catalog: Catalog,
    map_path: &str,
    script: Option<&str>,
) -> Result<(), String> {
    let mut engine = FarmEngine::from_map_file(Path::new(map_path), catalog, config)
        .map_err(|e| format!("Failed to load map {}: {}", map_path, e))?;
    info!(
        map = map_path,
        rows = engine.grid().rows(),
        cols = engine.grid().cols(),
        "Farm loaded"
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let summary = match script {
        Some(path) => {
            let file = std::fs::File::open(path)
                .map_err(|e| format!("Cannot read {}: {}", path, e))?;
            run_actions(&mut engine, BufReader::new(file), &mut out)?
        }
        None => run_actions(&mut engine, std::io::stdin().lock(), &mut out)?,
    };

    let line = serde_json::to_string(&json!({ "summary": summary }))
        .map_err(|e| format!("Cannot serialize summary: {}", e))?;
    writeln!(out, "{}", line).map_err(|e| format!("Cannot write output: {}", e))?;
    info!(
        actions = summary.actions,
        failed = summary.failed,
        day = summary.day,
        "Run finished"
    );
    Ok(())
}

/// Apply one action per input line, writing one JSON result per line.
///
/// Blank lines and lines starting with `#` are ignored. Lines that do not
/// parse are reported and counted as skipped; rejected actions are reported
/// and counted as failed.
pub fn run_actions<R: BufRead, W: Write>(
    engine: &mut FarmEngine,
    input: R,
    out: &mut W,
) -> Result<RunSummary, String> {
    let mut summary = RunSummary {
        actions: 0,
        succeeded: 0,
        failed: 0,
        skipped: 0,
        day: engine.day(),
        money: engine.player().money(),
        energy: engine.player().energy(),
    };

    for (index, line) in input.lines().enumerate() {
        let line = line.map_err(|e| format!("Cannot read input: {}", e))?;
        let line_no = index + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let record = match trimmed.parse::<Action>() {
            Err(e) => {
                warn!(line = line_no, error = %e, "Unparseable action");
                summary.skipped += 1;
                json!({ "line": line_no, "error": "Parse", "message": e.to_string() })
            }
            Ok(action) => {
                summary.actions += 1;
                match engine.apply(action) {
                    Ok(outcome) => {
                        summary.succeeded += 1;
                        json!({ "line": line_no, "result": outcome })
                    }
                    Err(e) => {
                        summary.failed += 1;
                        json!({ "line": line_no, "error": e.kind(), "message": e.to_string() })
                    }
                }
            }
        };
        writeln!(out, "{}", record).map_err(|e| format!("Cannot write output: {}", e))?;
    }

    summary.day = engine.day();
    summary.money = engine.player().money();
    summary.energy = engine.player().energy();
    Ok(summary)
}
