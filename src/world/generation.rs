use std::collections::HashMap;

use noise::{NoiseFn, Perlin};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::config::generation::GenerationParams;
use crate::world::map::START_CODE;
use crate::world::tile::{Obstacle, TileType};

/// A generated map in the text format understood by `FarmMap::parse`.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedMap {
    /// Params with the resolved seed.
    pub params: GenerationParams,
    pub rows: Vec<String>,
}

impl GeneratedMap {
    pub fn to_text(&self) -> String {
        let mut out = self.rows.join("\n");
        out.push('\n');
        out
    }
}

/// Generate a new farm map from the given parameters.
///
/// If `params.seed` is 0, a random seed is chosen. The actual seed used
/// is stored in the returned map's `params` for reproducibility.
/// Parameters outside their valid ranges are rejected.
pub fn generate_map(params: &GenerationParams) -> Result<GeneratedMap, String> {
    params.validate()?;
    let seed = if params.seed == 0 {
        rand::thread_rng().r#gen()
    } else {
        params.seed
    };
    let resolved_params = GenerationParams {
        seed,
        ..params.clone()
    };
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let rows = params.rows as usize;
    let cols = params.cols as usize;
    let mut tiles = vec![TileType::Grass; rows * cols];

    place_ponds(&mut tiles, cols, seed as u32, params.water_level);
    scatter_stones(&mut tiles, &mut rng, params.stone_density);
    till_patches(&mut tiles, &mut rng, params.soil_ratio);
    if params.fence_border {
        build_fence(&mut tiles, rows, cols);
    }

    let start = start_index(params.fence_border, cols);
    tiles[start] = TileType::Grass;

    let encoded = tiles
        .chunks(cols)
        .enumerate()
        .map(|(r, row)| {
            row.iter()
                .enumerate()
                .map(|(c, t)| {
                    if r * cols + c == start {
                        START_CODE
                    } else {
                        t.code()
                    }
                })
                .collect()
        })
        .collect();

    Ok(GeneratedMap {
        params: resolved_params,
        rows: encoded,
    })
}

/// Print a summary of the generated map.
pub fn print_map_summary(map: &GeneratedMap) {
    println!("=== Farm Map ===");
    println!("Size: {} x {}", map.params.rows, map.params.cols);
    println!("Seed: {}", map.params.seed);

    let mut counts: HashMap<&str, u32> = HashMap::new();
    for code in map.rows.iter().flat_map(|r| r.chars()) {
        let name = match TileType::from_code(code) {
            Some(TileType::Grass) | None => "Grass",
            Some(TileType::Soil) => "Soil",
            Some(TileType::Impassable(Obstacle::Water)) => "Water",
            Some(TileType::Impassable(Obstacle::Fence)) => "Fence",
            Some(TileType::Impassable(Obstacle::Stone)) => "Stone",
        };
        *counts.entry(name).or_insert(0) += 1;
    }
    let total = (map.params.rows * map.params.cols) as f32;
    let mut sorted: Vec<_> = counts.into_iter().collect();
    sorted.sort_by_key(|&(name, _)| name);
    println!("\nTiles:");
    for (name, count) in &sorted {
        let pct = *count as f32 / total * 100.0;
        println!("  {:<8} {:>5} ({:.1}%)", name, count, pct);
    }
}

// --- Internal generation functions ---

fn start_index(fenced: bool, cols: usize) -> usize {
    if fenced { cols + 1 } else { 0 }
}

fn place_ponds(tiles: &mut [TileType], cols: usize, seed: u32, water_level: f32) {
    let perlin = Perlin::new(seed);
    let scale = 0.18;
    for (i, tile) in tiles.iter_mut().enumerate() {
        let nx = (i % cols) as f64 * scale;
        let ny = (i / cols) as f64 * scale;
        // Perlin output is roughly [-1, 1]; map to [0, 1].
        let v = ((perlin.get([nx, ny]) + 1.0) / 2.0) as f32;
        if water_level < 1.0 && v > 1.0 - (1.0 - water_level) * 0.5 {
            *tile = TileType::Impassable(Obstacle::Water);
        }
    }
}

fn scatter_stones(tiles: &mut [TileType], rng: &mut impl Rng, density: f32) {
    for tile in tiles.iter_mut() {
        if *tile == TileType::Grass && rng.r#gen::<f32>() < density {
            *tile = TileType::Impassable(Obstacle::Stone);
        }
    }
}

fn till_patches(tiles: &mut [TileType], rng: &mut impl Rng, soil_ratio: f32) {
    for tile in tiles.iter_mut() {
        if *tile == TileType::Grass && rng.r#gen::<f32>() < soil_ratio {
            *tile = TileType::Soil;
        }
    }
}

fn build_fence(tiles: &mut [TileType], rows: usize, cols: usize) {
    for (i, tile) in tiles.iter_mut().enumerate() {
        let (r, c) = (i / cols, i % cols);
        if r == 0 || c == 0 || r == rows - 1 || c == cols - 1 {
            *tile = TileType::Impassable(Obstacle::Fence);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::map::FarmMap;
    use crate::world::tile::Position;

    fn default_params() -> GenerationParams {
        GenerationParams {
            seed: 42,
            ..GenerationParams::default()
        }
    }

    #[test]
    fn generated_map_has_requested_size() {
        let map = generate_map(&default_params()).unwrap();
        assert_eq!(map.rows.len(), 12);
        assert!(map.rows.iter().all(|r| r.chars().count() == 16));
    }

    #[test]
    fn generated_map_parses() {
        let generated = generate_map(&default_params()).unwrap();
        let map = FarmMap::parse(&generated.to_text()).unwrap();
        assert_eq!(map.start, Position::new(1, 1));
        assert!(map.grid.is_passable(map.start));
    }

    #[test]
    fn generation_is_deterministic() {
        let params = default_params();
        assert_eq!(generate_map(&params).unwrap(), generate_map(&params).unwrap());

        let other = GenerationParams {
            seed: 43,
            ..default_params()
        };
        assert_ne!(generate_map(&params).unwrap().rows, generate_map(&other).unwrap().rows);
    }

    #[test]
    fn fence_border_encloses_farm() {
        let map = generate_map(&default_params()).unwrap();
        let first = &map.rows[0];
        let last = &map.rows[map.rows.len() - 1];
        assert!(first.chars().all(|c| c == 'F'));
        assert!(last.chars().all(|c| c == 'F'));
        for row in &map.rows {
            assert!(row.starts_with('F') && row.ends_with('F'));
        }
    }

    #[test]
    fn unfenced_map_starts_at_origin() {
        let params = GenerationParams {
            fence_border: false,
            ..default_params()
        };
        let map = generate_map(&params).unwrap();
        assert!(map.rows[0].starts_with('P'));
        let parsed = FarmMap::parse(&map.to_text()).unwrap();
        assert_eq!(parsed.start, Position::new(0, 0));
    }

    #[test]
    fn zero_ratios_give_open_grass() {
        let params = GenerationParams {
            soil_ratio: 0.0,
            water_level: 1.0,
            stone_density: 0.0,
            fence_border: false,
            ..default_params()
        };
        let map = generate_map(&params).unwrap();
        let non_grass = map
            .rows
            .iter()
            .flat_map(|r| r.chars())
            .filter(|c| *c != 'G' && *c != 'P')
            .count();
        assert_eq!(non_grass, 0);
    }

    #[test]
    fn full_soil_ratio_tills_all_open_ground() {
        let params = GenerationParams {
            soil_ratio: 1.0,
            water_level: 1.0,
            stone_density: 0.0,
            ..default_params()
        };
        let map = generate_map(&params).unwrap();
        let parsed = FarmMap::parse(&map.to_text()).unwrap();
        assert_eq!(parsed.grid.count(TileType::Grass), 1);
    }

    #[test]
    fn seed_zero_generates_random() {
        let params = GenerationParams {
            seed: 0,
            ..default_params()
        };
        let map = generate_map(&params).unwrap();
        assert_ne!(map.params.seed, 0);
    }

    #[test]
    fn invalid_params_rejected() {
        for (rows, cols) in [(0, 16), (12, 0), (1, 16), (200, 16)] {
            let params = GenerationParams {
                rows,
                cols,
                ..default_params()
            };
            assert!(generate_map(&params).is_err(), "{}x{} accepted", rows, cols);
        }
        let params = GenerationParams {
            water_level: 2.0,
            ..default_params()
        };
        assert!(generate_map(&params).unwrap_err().contains("water_level"));
    }
}
