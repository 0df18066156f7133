use serde::{Deserialize, Serialize};

// === Enums ===

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Obstacle {
    Water,
    Fence,
    Stone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileType {
    Grass,
    Soil,
    Impassable(Obstacle),
}

impl TileType {
    /// Decode a map character. `P` (player start) is handled by the map loader.
    pub fn from_code(code: char) -> Option<TileType> {
        match code {
            'G' | ' ' => Some(TileType::Grass),
            'S' => Some(TileType::Soil),
            'W' => Some(TileType::Impassable(Obstacle::Water)),
            'F' => Some(TileType::Impassable(Obstacle::Fence)),
            'R' => Some(TileType::Impassable(Obstacle::Stone)),
            _ => None,
        }
    }

    pub fn code(self) -> char {
        match self {
            TileType::Grass => 'G',
            TileType::Soil => 'S',
            TileType::Impassable(Obstacle::Water) => 'W',
            TileType::Impassable(Obstacle::Fence) => 'F',
            TileType::Impassable(Obstacle::Stone) => 'R',
        }
    }

    pub fn is_passable(self) -> bool {
        !matches!(self, TileType::Impassable(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Row/column delta for one step.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    pub fn all() -> &'static [Direction] {
        &[
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ]
    }

    pub fn parse(s: &str) -> Option<Direction> {
        match s.to_ascii_lowercase().as_str() {
            "up" | "w" => Some(Direction::Up),
            "down" | "s" => Some(Direction::Down),
            "left" | "a" => Some(Direction::Left),
            "right" | "d" => Some(Direction::Right),
            _ => None,
        }
    }
}

// === Position ===

/// Grid coordinate. Signed so that off-grid targets are representable.
///
/// Field order gives the derived `Ord` a row-major ordering, which the engine
/// relies on for deterministic plant iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub const fn new(row: i32, col: i32) -> Self {
        Position { row, col }
    }

    pub fn step(self, direction: Direction) -> Position {
        let (dr, dc) = direction.delta();
        Position {
            row: self.row + dr,
            col: self.col + dc,
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
