use serde::Serialize;
use std::collections::BTreeMap;

use crate::simulation::engine::FarmEngine;
use crate::simulation::plant::{GrowthStage, Plant, Species};
use crate::simulation::player::Player;
use crate::world::tile::{Direction, Position};

/// Read-only view of the whole farm handed to the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct FarmSnapshot {
    pub day: u32,
    pub rows: usize,
    pub cols: usize,
    pub tiles: Vec<String>,
    pub plants: Vec<PlantSnapshot>,
    pub player: PlayerSnapshot,
}

/// A plant's state in a snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct PlantSnapshot {
    pub position: Position,
    pub species: Species,
    pub days_since_planted: u32,
    pub days_to_maturity: u32,
    pub stage: GrowthStage,
    pub mature: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerSnapshot {
    pub position: Position,
    pub facing: Direction,
    pub inventory: BTreeMap<String, u32>,
    pub money: u32,
    pub energy: u32,
    pub max_energy: u32,
    pub selected_item: Option<String>,
}

impl FarmSnapshot {
    pub fn from_engine(engine: &FarmEngine) -> Self {
        let grid = engine.grid();
        FarmSnapshot {
            day: engine.day(),
            rows: grid.rows(),
            cols: grid.cols(),
            tiles: grid.to_rows(),
            plants: engine
                .plants()
                .iter()
                .map(|(pos, plant)| PlantSnapshot::from_plant(*pos, plant))
                .collect(),
            player: PlayerSnapshot::from_player(engine.player()),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            format!(r#"{{"error":"{}"}}"#, e)
        })
    }
}

impl PlantSnapshot {
    pub fn from_plant(position: Position, plant: &Plant) -> Self {
        PlantSnapshot {
            position,
            species: plant.species(),
            days_since_planted: plant.days_since_planted(),
            days_to_maturity: plant.profile().days_to_maturity,
            stage: plant.stage(),
            mature: plant.is_mature(),
        }
    }
}

impl PlayerSnapshot {
    pub fn from_player(player: &Player) -> Self {
        PlayerSnapshot {
            position: player.position(),
            facing: player.facing(),
            inventory: player.inventory().clone(),
            money: player.money(),
            energy: player.energy(),
            max_energy: player.max_energy(),
            selected_item: player.selected_item().map(str::to_string),
        }
    }
}
