use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::config::catalog::{Catalog, ItemKind};
use crate::config::simulation::SimulationConfig;
use crate::simulation::action::{Action, ActionOutcome, Transaction};
use crate::simulation::error::FarmError;
use crate::simulation::plant::{CropYield, Plant, Species};
use crate::simulation::player::Player;
use crate::simulation::snapshot::FarmSnapshot;
use crate::simulation::statistics::{compute_statistics, DayStatistics};
use crate::world::grid::TileGrid;
use crate::world::map::{FarmMap, MapLoadError};
use crate::world::tile::{Direction, Position, TileType};

/// Owns the whole farm and is the only way to change it.
///
/// Every action either applies completely or returns a [`FarmError`] with the
/// state untouched.
#[derive(Debug, Clone)]
pub struct FarmEngine {
    grid: TileGrid,
    player: Player,
    /// Ordered by position so day advancement is row-major.
    plants: BTreeMap<Position, Plant>,
    day: u32,
    catalog: Catalog,
    step_energy_cost: u32,
}

impl FarmEngine {
    /// Build an engine from an already parsed map.
    ///
    /// Starting inventory entries that are not in the catalog are skipped.
    pub fn new(map: FarmMap, catalog: Catalog, config: &SimulationConfig) -> Self {
        let mut player =
            Player::new(map.start, config.max_energy).with_money(config.starting_money);
        for (item, count) in &config.starting_inventory {
            if catalog.item(item).is_none() {
                warn!(item = %item, "Starting item not in catalog, skipping");
                continue;
            }
            if let Err(e) = player.add_item(item, *count) {
                warn!(item = %item, error = %e, "Starting item not added");
            }
        }

        FarmEngine {
            grid: map.grid,
            player,
            plants: BTreeMap::new(),
            day: 1,
            catalog,
            step_energy_cost: config.step_energy_cost,
        }
    }

    pub fn from_map_str(
        content: &str,
        catalog: Catalog,
        config: &SimulationConfig,
    ) -> Result<Self, MapLoadError> {
        Ok(Self::new(FarmMap::parse(content)?, catalog, config))
    }

    pub fn from_map_file(
        path: &Path,
        catalog: Catalog,
        config: &SimulationConfig,
    ) -> Result<Self, MapLoadError> {
        Ok(Self::new(FarmMap::from_file(path)?, catalog, config))
    }

    // --- Read access ---

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn plants(&self) -> &BTreeMap<Position, Plant> {
        &self.plants
    }

    pub fn plant_at(&self, position: Position) -> Option<&Plant> {
        self.plants.get(&position)
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn snapshot(&self) -> FarmSnapshot {
        FarmSnapshot::from_engine(self)
    }

    // --- Actions ---

    /// Returns whether the player changed tile; facing always updates.
    pub fn move_player(&mut self, direction: Direction) -> bool {
        let moved = self
            .player
            .move_towards(direction, &self.grid, self.step_energy_cost);
        debug!(
            ?direction,
            moved,
            position = %self.player.position(),
            energy = self.player.energy(),
            "Move"
        );
        moved
    }

    pub fn till_soil(&mut self, position: Position) -> Result<(), FarmError> {
        self.grid.till(position)
    }

    pub fn untill_soil(&mut self, position: Position) -> Result<(), FarmError> {
        let occupied = self.plants.contains_key(&position);
        self.grid.untill(position, occupied)
    }

    /// Plant one seed of `species` at `position`.
    ///
    /// Requires tilled, unoccupied soil, the species' seed selected, and at
    /// least one of that seed in the inventory.
    pub fn plant(&mut self, position: Position, species: Species) -> Result<(), FarmError> {
        if self.grid.tile_at(position)? != TileType::Soil {
            return Err(FarmError::InvalidPlantingSite(position));
        }
        if self.plants.contains_key(&position) {
            return Err(FarmError::OccupiedPosition(position));
        }

        let seed = species.seed_item();
        if self.player.selected_item() != Some(seed) {
            return Err(FarmError::SeedNotSelected {
                seed: seed.to_string(),
            });
        }
        let profile = self
            .catalog
            .crop_profile(species)
            .ok_or_else(|| FarmError::UnknownItem(seed.to_string()))?;

        self.player.remove_item(seed, 1)?;
        self.plants.insert(position, Plant::new(species, profile));
        Ok(())
    }

    /// Harvest a mature plant, crediting the yield to the player.
    pub fn harvest_plant(&mut self, position: Position) -> Result<CropYield, FarmError> {
        let plant = self
            .plants
            .get_mut(&position)
            .ok_or(FarmError::NoPlant(position))?;

        let not_mature = FarmError::NotMature {
            position,
            days: plant.days_since_planted(),
            required: plant.profile().days_to_maturity,
        };
        if !plant.is_mature() {
            return Err(not_mature);
        }
        // Check capacity first: harvesting resets a regrowing plant.
        self.player
            .can_hold(plant.species().crop_item(), plant.profile().yield_quantity)?;

        let crop = plant.harvest().ok_or(not_mature)?;
        if !crop.regrows {
            self.plants.remove(&position);
        }
        self.player.add_item(crop.item, crop.quantity)?;
        Ok(crop)
    }

    /// Delete any plant at `position`. Returns whether one was there.
    pub fn remove_plant(&mut self, position: Position) -> bool {
        self.plants.remove(&position).is_some()
    }

    pub fn select_item(&mut self, item: &str) -> Result<(), FarmError> {
        self.player.select(item, &self.catalog)
    }

    /// Buy one unit at the catalog buy price.
    pub fn buy_item(&mut self, item: &str) -> Result<Transaction, FarmError> {
        let entry = self
            .catalog
            .item(item)
            .ok_or_else(|| FarmError::UnknownItem(item.to_string()))?;
        let price = entry
            .buy_price
            .ok_or_else(|| FarmError::NotForSale(item.to_string()))?;

        self.player.buy(item, price)?;
        Ok(self.transaction(item, price))
    }

    /// Sell one unit at the catalog sell price.
    pub fn sell_item(&mut self, item: &str) -> Result<Transaction, FarmError> {
        let entry = self
            .catalog
            .item(item)
            .ok_or_else(|| FarmError::UnknownItem(item.to_string()))?;
        if entry.kind == ItemKind::Tool {
            return Err(FarmError::NotForSale(item.to_string()));
        }
        let price = entry
            .sell_price
            .ok_or_else(|| FarmError::NotForSale(item.to_string()))?;

        self.player.sell(item, price)?;
        Ok(self.transaction(item, price))
    }

    fn transaction(&self, item: &str, unit_price: u32) -> Transaction {
        Transaction {
            item: item.to_string(),
            unit_price,
            money: self.player.money(),
            held: self.player.count(item),
        }
    }

    /// Advance the calendar: grow every plant one day in row-major order and
    /// restore the player's energy.
    pub fn new_day(&mut self) -> DayStatistics {
        self.day += 1;

        let mut newly_mature = 0_u32;
        for plant in self.plants.values_mut() {
            let was_mature = plant.is_mature();
            plant.advance_one_day();
            if !was_mature && plant.is_mature() {
                newly_mature += 1;
            }
        }
        self.player.restore_energy();

        let stats = compute_statistics(self.day, &self.grid, &self.plants, newly_mature);
        info!(
            day = stats.day,
            plants = stats.plants,
            mature = stats.mature_plants,
            newly_mature = stats.newly_mature,
            "New day"
        );
        stats
    }

    /// Dispatch a parsed [`Action`]. Untargeted actions use the player's tile.
    pub fn apply(&mut self, action: Action) -> Result<ActionOutcome, FarmError> {
        let here = self.player.position();
        let result = match action {
            Action::Move(direction) => {
                let moved = self.move_player(direction);
                Ok(ActionOutcome::Moved {
                    moved,
                    position: self.player.position(),
                    facing: self.player.facing(),
                    energy: self.player.energy(),
                })
            }
            Action::Till(target) => {
                let position = target.unwrap_or(here);
                self.till_soil(position)
                    .map(|()| ActionOutcome::Tilled { position })
            }
            Action::Untill(target) => {
                let position = target.unwrap_or(here);
                self.untill_soil(position)
                    .map(|()| ActionOutcome::Untilled { position })
            }
            Action::Plant(species, target) => {
                let position = target.unwrap_or(here);
                self.plant(position, species)
                    .map(|()| ActionOutcome::Planted { position, species })
            }
            Action::Harvest(target) => {
                let position = target.unwrap_or(here);
                self.harvest_plant(position)
                    .map(|crop| ActionOutcome::Harvested { position, crop })
            }
            Action::Remove(target) => {
                let position = target.unwrap_or(here);
                let removed = self.remove_plant(position);
                Ok(ActionOutcome::Removed { position, removed })
            }
            Action::Select(item) => self
                .select_item(&item)
                .map(|()| ActionOutcome::Selected { item }),
            Action::Buy(item) => self.buy_item(&item).map(ActionOutcome::Bought),
            Action::Sell(item) => self.sell_item(&item).map(ActionOutcome::Sold),
            Action::NewDay => Ok(ActionOutcome::NewDay(self.new_day())),
        };

        if let Err(e) = &result {
            debug!(kind = e.kind(), error = %e, "Action rejected");
        }
        result
    }
}
