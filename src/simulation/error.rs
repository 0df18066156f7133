use crate::world::tile::Position;

/// Why an action was rejected. Every variant leaves the engine state untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FarmError {
    OutOfBounds(Position),
    InvalidTileOp { position: Position, reason: &'static str },
    InvalidPlantingSite(Position),
    OccupiedPosition(Position),
    NoPlant(Position),
    NotMature { position: Position, days: u32, required: u32 },
    SeedNotSelected { seed: String },
    InsufficientInventory { item: String, have: u32, need: u32 },
    InventoryFull { item: String, have: u32, adding: u32 },
    InsufficientFunds { price: u32, money: u32 },
    NotForSale(String),
    UnknownItem(String),
}

impl FarmError {
    /// Stable tag for logs and serialized outcomes.
    pub fn kind(&self) -> &'static str {
        match self {
            FarmError::OutOfBounds(_) => "OutOfBounds",
            FarmError::InvalidTileOp { .. } => "InvalidTileOp",
            FarmError::InvalidPlantingSite(_) => "InvalidPlantingSite",
            FarmError::OccupiedPosition(_) => "OccupiedPosition",
            FarmError::NoPlant(_) => "NoPlant",
            FarmError::NotMature { .. } => "NotMature",
            FarmError::SeedNotSelected { .. } => "SeedNotSelected",
            FarmError::InsufficientInventory { .. } => "InsufficientInventory",
            FarmError::InventoryFull { .. } => "InventoryFull",
            FarmError::InsufficientFunds { .. } => "InsufficientFunds",
            FarmError::NotForSale(_) => "NotForSale",
            FarmError::UnknownItem(_) => "UnknownItem",
        }
    }
}

impl std::fmt::Display for FarmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FarmError::OutOfBounds(p) => write!(f, "Position {} is outside the farm", p),
            FarmError::InvalidTileOp { position, reason } => {
                write!(f, "Cannot change tile at {}: {}", position, reason)
            }
            FarmError::InvalidPlantingSite(p) => {
                write!(f, "Tile at {} is not tilled soil", p)
            }
            FarmError::OccupiedPosition(p) => write!(f, "A plant already grows at {}", p),
            FarmError::NoPlant(p) => write!(f, "No plant at {}", p),
            FarmError::NotMature {
                position,
                days,
                required,
            } => write!(
                f,
                "Plant at {} is not mature ({}/{} days)",
                position, days, required
            ),
            FarmError::SeedNotSelected { seed } => write!(f, "Select '{}' before planting", seed),
            FarmError::InsufficientInventory { item, have, need } => write!(
                f,
                "Not enough '{}': have {}, need {}",
                item, have, need
            ),
            FarmError::InventoryFull { item, have, adding } => write!(
                f,
                "Cannot hold {} more '{}': already holding {}",
                adding, item, have
            ),
            FarmError::InsufficientFunds { price, money } => {
                write!(f, "Costs ${} but only ${} available", price, money)
            }
            FarmError::NotForSale(item) => write!(f, "'{}' cannot be traded here", item),
            FarmError::UnknownItem(item) => write!(f, "Unknown item '{}'", item),
        }
    }
}

impl std::error::Error for FarmError {}
