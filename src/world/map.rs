use std::io;
use std::path::Path;

use crate::world::grid::TileGrid;
use crate::world::tile::{Position, TileType};

/// Marks the player's starting tile; the tile underneath is Grass.
pub const START_CODE: char = 'P';

/// A parsed map description: terrain plus the player's starting position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FarmMap {
    pub grid: TileGrid,
    pub start: Position,
}

/// Errors that abort map loading. No engine state exists when one is returned.
#[derive(Debug)]
pub enum MapLoadError {
    Io(io::Error),
    Empty,
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    UnknownTile {
        row: usize,
        col: usize,
        code: char,
    },
    MultipleStarts {
        first: Position,
        second: Position,
    },
    StartNotPassable(Position),
}

impl std::fmt::Display for MapLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MapLoadError::Io(e) => write!(f, "I/O error: {}", e),
            MapLoadError::Empty => write!(f, "Map contains no rows"),
            MapLoadError::RaggedRow {
                row,
                expected,
                found,
            } => write!(
                f,
                "Row {} has {} tiles, expected {} (all rows must be equal length)",
                row, found, expected
            ),
            MapLoadError::UnknownTile { row, col, code } => write!(
                f,
                "Unrecognized tile code {:?} at row {}, column {}",
                code, row, col
            ),
            MapLoadError::MultipleStarts { first, second } => write!(
                f,
                "Multiple player start markers: {} and {}",
                first, second
            ),
            MapLoadError::StartNotPassable(p) => {
                write!(f, "Player start {} is not a passable tile", p)
            }
        }
    }
}

impl std::error::Error for MapLoadError {}

impl From<io::Error> for MapLoadError {
    fn from(e: io::Error) -> Self {
        MapLoadError::Io(e)
    }
}

impl FarmMap {
    /// Load a map from a text file.
    pub fn from_file(path: &Path) -> Result<Self, MapLoadError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse map text: one line per row, one character per tile.
    ///
    /// Leading and trailing blank lines are ignored; row numbers in errors
    /// count from the first non-blank line. Without a start marker the player
    /// starts at (0, 0), which must then be passable.
    pub fn parse(content: &str) -> Result<Self, MapLoadError> {
        let mut lines: Vec<&str> = content
            .lines()
            .map(|l| l.strip_suffix('\r').unwrap_or(l))
            .collect();
        while lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }
        let leading = lines.iter().take_while(|l| l.is_empty()).count();
        lines.drain(..leading);
        if lines.is_empty() {
            return Err(MapLoadError::Empty);
        }

        let cols = lines[0].chars().count();
        if cols == 0 {
            return Err(MapLoadError::Empty);
        }

        let mut tiles = Vec::with_capacity(lines.len() * cols);
        let mut start: Option<Position> = None;

        for (row, line) in lines.iter().enumerate() {
            let found = line.chars().count();
            if found != cols {
                return Err(MapLoadError::RaggedRow {
                    row,
                    expected: cols,
                    found,
                });
            }
            for (col, code) in line.chars().enumerate() {
                let position = Position::new(row as i32, col as i32);
                if code == START_CODE {
                    if let Some(first) = start {
                        return Err(MapLoadError::MultipleStarts {
                            first,
                            second: position,
                        });
                    }
                    start = Some(position);
                    tiles.push(TileType::Grass);
                    continue;
                }
                let tile =
                    TileType::from_code(code).ok_or(MapLoadError::UnknownTile { row, col, code })?;
                tiles.push(tile);
            }
        }

        let rows = lines.len();
        let grid = TileGrid::new(rows, cols, tiles).ok_or(MapLoadError::Empty)?;
        let start = start.unwrap_or(Position::new(0, 0));
        if !grid.is_passable(start) {
            return Err(MapLoadError::StartNotPassable(start));
        }

        Ok(FarmMap { grid, start })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::tile::Obstacle;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn parses_all_codes() {
        let map = FarmMap::parse("GSW\nFR \nPGS\n").unwrap();
        assert_eq!(map.grid.rows(), 3);
        assert_eq!(map.grid.cols(), 3);
        assert_eq!(map.start, Position::new(2, 0));
        assert_eq!(map.grid.tile_at(Position::new(0, 1)), Ok(TileType::Soil));
        assert_eq!(
            map.grid.tile_at(Position::new(0, 2)),
            Ok(TileType::Impassable(Obstacle::Water))
        );
        assert_eq!(
            map.grid.tile_at(Position::new(1, 0)),
            Ok(TileType::Impassable(Obstacle::Fence))
        );
        assert_eq!(
            map.grid.tile_at(Position::new(1, 1)),
            Ok(TileType::Impassable(Obstacle::Stone))
        );
        assert_eq!(map.grid.tile_at(Position::new(1, 2)), Ok(TileType::Grass));
        assert_eq!(map.grid.tile_at(Position::new(2, 0)), Ok(TileType::Grass));
    }

    #[test]
    fn default_start_is_origin() {
        let map = FarmMap::parse("SG\nGG").unwrap();
        assert_eq!(map.start, Position::new(0, 0));
    }

    #[test]
    fn crlf_and_trailing_blank_lines_accepted() {
        let map = FarmMap::parse("GG\r\nGS\r\n\r\n\n").unwrap();
        assert_eq!(map.grid.rows(), 2);
        assert_eq!(map.grid.to_rows(), vec!["GG", "GS"]);
    }

    #[test]
    fn leading_blank_lines_accepted() {
        let map = FarmMap::parse("\n\r\nPG\nGS\n").unwrap();
        assert_eq!(map.grid.rows(), 2);
        assert_eq!(map.grid.to_rows(), vec!["GG", "GS"]);
        assert_eq!(map.start, Position::new(0, 0));
        assert!(matches!(FarmMap::parse("\n\n"), Err(MapLoadError::Empty)));
    }

    #[test]
    fn ragged_rows_rejected() {
        let err = FarmMap::parse("GGG\nGG\n").unwrap_err();
        match err {
            MapLoadError::RaggedRow {
                row,
                expected,
                found,
            } => {
                assert_eq!(row, 1);
                assert_eq!(expected, 3);
                assert_eq!(found, 2);
            }
            other => panic!("expected RaggedRow, got {:?}", other),
        }
    }

    #[test]
    fn unknown_code_rejected() {
        let err = FarmMap::parse("GG\nGX\n").unwrap_err();
        assert!(matches!(
            err,
            MapLoadError::UnknownTile {
                row: 1,
                col: 1,
                code: 'X'
            }
        ));
        assert!(err.to_string().contains("'X'"));
    }

    #[test]
    fn empty_map_rejected() {
        assert!(matches!(FarmMap::parse(""), Err(MapLoadError::Empty)));
        assert!(matches!(FarmMap::parse("\n\n"), Err(MapLoadError::Empty)));
    }

    #[test]
    fn multiple_starts_rejected() {
        let err = FarmMap::parse("PG\nGP").unwrap_err();
        assert!(matches!(err, MapLoadError::MultipleStarts { .. }));
    }

    #[test]
    fn impassable_origin_without_marker_rejected() {
        let err = FarmMap::parse("WG\nGG").unwrap_err();
        assert!(matches!(
            err,
            MapLoadError::StartNotPassable(Position { row: 0, col: 0 })
        ));
    }

    #[test]
    fn from_file_loads_map() {
        let mut tmp = NamedTempFile::new().unwrap();
        writeln!(tmp, "GGS").unwrap();
        writeln!(tmp, "GPS").unwrap();
        let map = FarmMap::from_file(tmp.path()).unwrap();
        assert_eq!(map.start, Position::new(1, 1));
    }

    #[test]
    fn from_file_missing_file_error() {
        let err = FarmMap::from_file(Path::new("/nonexistent/map.txt")).unwrap_err();
        assert!(matches!(err, MapLoadError::Io(_)));
        assert!(err.to_string().contains("I/O error"));
    }
}
