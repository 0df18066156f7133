use serde::{Deserialize, Serialize};

use crate::simulation::error::FarmError;
use crate::world::tile::{Position, TileType};

/// Fixed-size farm terrain. Dimensions never change after construction;
/// only Grass/Soil transitions mutate individual tiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGrid {
    rows: usize,
    cols: usize,
    tiles: Vec<TileType>,
}

impl TileGrid {
    /// Build a grid from row-major tiles. Returns `None` if `tiles.len()` does
    /// not match `rows * cols` or either dimension is zero.
    pub fn new(rows: usize, cols: usize, tiles: Vec<TileType>) -> Option<Self> {
        if rows == 0 || cols == 0 || tiles.len() != rows * cols {
            return None;
        }
        Some(TileGrid { rows, cols, tiles })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn contains(&self, position: Position) -> bool {
        self.index(position).is_some()
    }

    fn index(&self, position: Position) -> Option<usize> {
        if position.row < 0 || position.col < 0 {
            return None;
        }
        let (row, col) = (position.row as usize, position.col as usize);
        if row >= self.rows || col >= self.cols {
            return None;
        }
        Some(row * self.cols + col)
    }

    pub fn tile_at(&self, position: Position) -> Result<TileType, FarmError> {
        self.index(position)
            .map(|i| self.tiles[i])
            .ok_or(FarmError::OutOfBounds(position))
    }

    /// Off-grid positions are never passable.
    pub fn is_passable(&self, position: Position) -> bool {
        self.tile_at(position).is_ok_and(TileType::is_passable)
    }

    /// Grass → Soil.
    pub fn till(&mut self, position: Position) -> Result<(), FarmError> {
        let i = self.index(position).ok_or(FarmError::OutOfBounds(position))?;
        match self.tiles[i] {
            TileType::Grass => {
                self.tiles[i] = TileType::Soil;
                Ok(())
            }
            TileType::Soil => Err(FarmError::InvalidTileOp {
                position,
                reason: "already tilled",
            }),
            TileType::Impassable(_) => Err(FarmError::InvalidTileOp {
                position,
                reason: "tile cannot be tilled",
            }),
        }
    }

    /// Soil → Grass. `occupied` reports whether a plant grows on the tile.
    pub fn untill(&mut self, position: Position, occupied: bool) -> Result<(), FarmError> {
        let i = self.index(position).ok_or(FarmError::OutOfBounds(position))?;
        if self.tiles[i] != TileType::Soil {
            return Err(FarmError::InvalidTileOp {
                position,
                reason: "tile is not soil",
            });
        }
        if occupied {
            return Err(FarmError::InvalidTileOp {
                position,
                reason: "a plant occupies the tile",
            });
        }
        self.tiles[i] = TileType::Grass;
        Ok(())
    }

    /// Iterate `(position, tile)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, TileType)> + '_ {
        self.tiles.iter().enumerate().map(move |(i, t)| {
            let pos = Position::new((i / self.cols) as i32, (i % self.cols) as i32);
            (pos, *t)
        })
    }

    pub fn count(&self, tile: TileType) -> usize {
        self.tiles.iter().filter(|t| **t == tile).count()
    }

    /// Encode the terrain back into map rows.
    pub fn to_rows(&self) -> Vec<String> {
        self.tiles
            .chunks(self.cols)
            .map(|row| row.iter().map(|t| t.code()).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::tile::Obstacle;

    fn make_grid() -> TileGrid {
        // G S
        // W G
        TileGrid::new(
            2,
            2,
            vec![
                TileType::Grass,
                TileType::Soil,
                TileType::Impassable(Obstacle::Water),
                TileType::Grass,
            ],
        )
        .unwrap()
    }

    #[test]
    fn rejects_mismatched_dimensions() {
        assert!(TileGrid::new(2, 2, vec![TileType::Grass; 3]).is_none());
        assert!(TileGrid::new(0, 2, Vec::new()).is_none());
    }

    #[test]
    fn tile_at_checks_bounds() {
        let grid = make_grid();
        assert_eq!(grid.tile_at(Position::new(0, 1)), Ok(TileType::Soil));
        assert_eq!(
            grid.tile_at(Position::new(2, 0)),
            Err(FarmError::OutOfBounds(Position::new(2, 0)))
        );
        assert_eq!(
            grid.tile_at(Position::new(0, -1)),
            Err(FarmError::OutOfBounds(Position::new(0, -1)))
        );
    }

    #[test]
    fn passability() {
        let grid = make_grid();
        assert!(grid.is_passable(Position::new(0, 0)));
        assert!(grid.is_passable(Position::new(0, 1)));
        assert!(!grid.is_passable(Position::new(1, 0)));
        assert!(!grid.is_passable(Position::new(-1, 0)));
        assert!(!grid.is_passable(Position::new(0, 2)));
    }

    #[test]
    fn till_only_converts_grass() {
        let mut grid = make_grid();
        grid.till(Position::new(0, 0)).unwrap();
        assert_eq!(grid.tile_at(Position::new(0, 0)), Ok(TileType::Soil));

        let err = grid.till(Position::new(0, 1)).unwrap_err();
        assert_eq!(err.kind(), "InvalidTileOp");
        let err = grid.till(Position::new(1, 0)).unwrap_err();
        assert_eq!(err.kind(), "InvalidTileOp");
        assert_eq!(
            grid.tile_at(Position::new(1, 0)),
            Ok(TileType::Impassable(Obstacle::Water))
        );
        assert_eq!(
            grid.till(Position::new(5, 5)),
            Err(FarmError::OutOfBounds(Position::new(5, 5)))
        );
    }

    #[test]
    fn untill_requires_unoccupied_soil() {
        let mut grid = make_grid();
        let err = grid.untill(Position::new(0, 1), true).unwrap_err();
        assert_eq!(err.kind(), "InvalidTileOp");
        assert_eq!(grid.tile_at(Position::new(0, 1)), Ok(TileType::Soil));

        let err = grid.untill(Position::new(0, 0), false).unwrap_err();
        assert_eq!(err.kind(), "InvalidTileOp");

        grid.untill(Position::new(0, 1), false).unwrap();
        assert_eq!(grid.tile_at(Position::new(0, 1)), Ok(TileType::Grass));
    }

    #[test]
    fn till_then_untill_restores_grass() {
        let mut grid = make_grid();
        let before = grid.clone();
        grid.till(Position::new(1, 1)).unwrap();
        grid.untill(Position::new(1, 1), false).unwrap();
        assert_eq!(grid, before);
    }

    #[test]
    fn rows_encode_terrain() {
        let grid = make_grid();
        assert_eq!(grid.to_rows(), vec!["GS".to_string(), "WG".to_string()]);
        assert_eq!(grid.count(TileType::Grass), 2);
        let positions: Vec<Position> = grid.iter().map(|(p, _)| p).collect();
        assert_eq!(positions[3], Position::new(1, 1));
    }
}
