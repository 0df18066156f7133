pub mod generation;
pub mod grid;
pub mod map;
pub mod tile;

pub use grid::TileGrid;
pub use map::{FarmMap, MapLoadError};
pub use tile::{Direction, Obstacle, Position, TileType};
