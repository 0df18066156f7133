use serde::Serialize;
use std::collections::BTreeMap;

use crate::config::catalog::Catalog;
use crate::config::simulation::ENERGY_CAP;
use crate::simulation::error::FarmError;
use crate::world::grid::TileGrid;
use crate::world::tile::{Direction, Position};

/// The farmer: location, belongings, and stamina.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Player {
    position: Position,
    facing: Direction,
    inventory: BTreeMap<String, u32>,
    money: u32,
    energy: u32,
    max_energy: u32,
    selected_item: Option<String>,
}

impl Player {
    /// A rested player facing down at `position`. `max_energy` is capped at
    /// [`ENERGY_CAP`].
    pub fn new(position: Position, max_energy: u32) -> Self {
        let max_energy = max_energy.min(ENERGY_CAP);
        Player {
            position,
            facing: Direction::Down,
            inventory: BTreeMap::new(),
            money: 0,
            energy: max_energy,
            max_energy,
            selected_item: None,
        }
    }

    pub fn with_money(mut self, money: u32) -> Self {
        self.money = money;
        self
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn facing(&self) -> Direction {
        self.facing
    }

    pub fn inventory(&self) -> &BTreeMap<String, u32> {
        &self.inventory
    }

    pub fn count(&self, item: &str) -> u32 {
        self.inventory.get(item).copied().unwrap_or(0)
    }

    pub fn money(&self) -> u32 {
        self.money
    }

    pub fn energy(&self) -> u32 {
        self.energy
    }

    pub fn max_energy(&self) -> u32 {
        self.max_energy
    }

    pub fn selected_item(&self) -> Option<&str> {
        self.selected_item.as_deref()
    }

    /// Turn towards `direction`, then step if the target is passable and
    /// enough energy remains. A blocked step only turns the player and costs
    /// nothing. Returns whether the player moved.
    pub fn move_towards(&mut self, direction: Direction, grid: &TileGrid, step_cost: u32) -> bool {
        self.facing = direction;
        let target = self.position.step(direction);
        if self.energy == 0 || self.energy < step_cost || !grid.is_passable(target) {
            return false;
        }
        self.position = target;
        self.energy -= step_cost;
        true
    }

    /// Hold a seed or tool. Anything else leaves the selection unchanged.
    pub fn select(&mut self, item: &str, catalog: &Catalog) -> Result<(), FarmError> {
        if !catalog.is_selectable(item) {
            return Err(FarmError::UnknownItem(item.to_string()));
        }
        self.selected_item = Some(item.to_string());
        Ok(())
    }

    /// Fails with `InventoryFull` if the count would overflow.
    pub fn can_hold(&self, item: &str, qty: u32) -> Result<(), FarmError> {
        let have = self.count(item);
        match have.checked_add(qty) {
            Some(_) => Ok(()),
            None => Err(FarmError::InventoryFull {
                item: item.to_string(),
                have,
                adding: qty,
            }),
        }
    }

    pub fn add_item(&mut self, item: &str, qty: u32) -> Result<(), FarmError> {
        self.can_hold(item, qty)?;
        if qty > 0 {
            *self.inventory.entry(item.to_string()).or_insert(0) += qty;
        }
        Ok(())
    }

    pub fn remove_item(&mut self, item: &str, qty: u32) -> Result<(), FarmError> {
        let have = self.count(item);
        if have < qty {
            return Err(FarmError::InsufficientInventory {
                item: item.to_string(),
                have,
                need: qty,
            });
        }
        if have == qty {
            self.inventory.remove(item);
        } else if let Some(count) = self.inventory.get_mut(item) {
            *count -= qty;
        }
        Ok(())
    }

    /// Pay `unit_price` for one unit of `item`.
    pub fn buy(&mut self, item: &str, unit_price: u32) -> Result<(), FarmError> {
        if self.money < unit_price {
            return Err(FarmError::InsufficientFunds {
                price: unit_price,
                money: self.money,
            });
        }
        self.can_hold(item, 1)?;
        self.money -= unit_price;
        self.add_item(item, 1)
    }

    /// Sell one unit of `item` for `unit_price`.
    pub fn sell(&mut self, item: &str, unit_price: u32) -> Result<(), FarmError> {
        self.remove_item(item, 1)?;
        self.money = self.money.saturating_add(unit_price);
        Ok(())
    }

    pub fn restore_energy(&mut self) {
        self.energy = self.max_energy;
    }
}
