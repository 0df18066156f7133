use serde::Serialize;
use std::collections::BTreeMap;

use crate::simulation::plant::{Plant, Species};
use crate::world::tile::{Position, TileType};
use crate::world::grid::TileGrid;

/// Summary of the farm after a day cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayStatistics {
    pub day: u32,
    pub plants: u32,
    pub mature_plants: u32,
    /// Plants that reached maturity during this cycle.
    pub newly_mature: u32,
    pub plants_by_species: BTreeMap<Species, u32>,
    pub tilled_tiles: u32,
    /// Fraction of soil tiles with a plant on them, 0 when there is no soil.
    pub soil_utilization: f32,
}

/// Compute statistics for the farm after `new_day` has run.
pub fn compute_statistics(
    day: u32,
    grid: &TileGrid,
    plants: &BTreeMap<Position, Plant>,
    newly_mature: u32,
) -> DayStatistics {
    let mut by_species: BTreeMap<Species, u32> = BTreeMap::new();
    let mut mature = 0_u32;
    for plant in plants.values() {
        *by_species.entry(plant.species()).or_insert(0) += 1;
        if plant.is_mature() {
            mature += 1;
        }
    }

    let tilled = grid.count(TileType::Soil) as u32;
    let utilization = if tilled == 0 {
        0.0
    } else {
        plants.len() as f32 / tilled as f32
    };

    DayStatistics {
        day,
        plants: plants.len() as u32,
        mature_plants: mature,
        newly_mature,
        plants_by_species: by_species,
        tilled_tiles: tilled,
        soil_utilization: utilization,
    }
}
