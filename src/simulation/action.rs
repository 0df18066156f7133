use serde::Serialize;
use std::str::FromStr;

use crate::simulation::plant::{CropYield, Species};
use crate::simulation::statistics::DayStatistics;
use crate::world::tile::{Direction, Position};

/// A discrete request from the presentation layer.
///
/// Positional actions without a target act on the player's current tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Move(Direction),
    Till(Option<Position>),
    Untill(Option<Position>),
    Plant(Species, Option<Position>),
    Harvest(Option<Position>),
    Remove(Option<Position>),
    Select(String),
    Buy(String),
    Sell(String),
    NewDay,
}

/// Money and stock after a trade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transaction {
    pub item: String,
    pub unit_price: u32,
    pub money: u32,
    pub held: u32,
}

/// Success payload of an applied action.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome")]
pub enum ActionOutcome {
    Moved {
        moved: bool,
        position: Position,
        facing: Direction,
        energy: u32,
    },
    Tilled { position: Position },
    Untilled { position: Position },
    Planted { position: Position, species: Species },
    Harvested { position: Position, crop: CropYield },
    Removed { position: Position, removed: bool },
    Selected { item: String },
    Bought(Transaction),
    Sold(Transaction),
    NewDay(DayStatistics),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionParseError {
    Empty,
    UnknownCommand(String),
    MissingArgument { command: &'static str, expected: &'static str },
    InvalidArgument { command: &'static str, value: String },
}

impl std::fmt::Display for ActionParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionParseError::Empty => write!(f, "Empty command"),
            ActionParseError::UnknownCommand(c) => write!(f, "Unknown command '{}'", c),
            ActionParseError::MissingArgument { command, expected } => {
                write!(f, "'{}' expects {}", command, expected)
            }
            ActionParseError::InvalidArgument { command, value } => {
                write!(f, "'{}': invalid argument '{}'", command, value)
            }
        }
    }
}

impl std::error::Error for ActionParseError {}

/// Parse an optional trailing `row col` pair.
fn parse_target(
    command: &'static str,
    args: &[&str],
) -> Result<Option<Position>, ActionParseError> {
    match args {
        [] => Ok(None),
        [row, col] => {
            let parse = |v: &str| {
                v.parse::<i32>().map_err(|_| ActionParseError::InvalidArgument {
                    command,
                    value: v.to_string(),
                })
            };
            Ok(Some(Position::new(parse(*row)?, parse(*col)?)))
        }
        _ => Err(ActionParseError::InvalidArgument {
            command,
            value: args.join(" "),
        }),
    }
}

fn item_name(command: &'static str, args: &[&str]) -> Result<String, ActionParseError> {
    if args.is_empty() {
        return Err(ActionParseError::MissingArgument {
            command,
            expected: "an item name",
        });
    }
    Ok(args.join(" "))
}

impl FromStr for Action {
    type Err = ActionParseError;

    /// Syntax: `move <dir>`, `till [r c]`, `untill [r c]`, `plant <species> [r c]`,
    /// `harvest [r c]`, `remove [r c]`, `select|buy|sell <item>`, `day`.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((command, args)) = words.split_first() else {
            return Err(ActionParseError::Empty);
        };

        match command.to_ascii_lowercase().as_str() {
            "move" => match args {
                [dir] => Direction::parse(dir).map(Action::Move).ok_or_else(|| {
                    ActionParseError::InvalidArgument {
                        command: "move",
                        value: dir.to_string(),
                    }
                }),
                _ => Err(ActionParseError::MissingArgument {
                    command: "move",
                    expected: "one of up, down, left, right",
                }),
            },
            "till" => parse_target("till", args).map(Action::Till),
            "untill" => parse_target("untill", args).map(Action::Untill),
            "plant" => {
                let Some((species, rest)) = args.split_first() else {
                    return Err(ActionParseError::MissingArgument {
                        command: "plant",
                        expected: "a species",
                    });
                };
                let species =
                    Species::parse(species).ok_or_else(|| ActionParseError::InvalidArgument {
                        command: "plant",
                        value: species.to_string(),
                    })?;
                Ok(Action::Plant(species, parse_target("plant", rest)?))
            }
            "harvest" => parse_target("harvest", args).map(Action::Harvest),
            "remove" => parse_target("remove", args).map(Action::Remove),
            "select" => item_name("select", args).map(Action::Select),
            "buy" => item_name("buy", args).map(Action::Buy),
            "sell" => item_name("sell", args).map(Action::Sell),
            "day" | "new-day" | "sleep" => {
                if args.is_empty() {
                    Ok(Action::NewDay)
                } else {
                    Err(ActionParseError::InvalidArgument {
                        command: "day",
                        value: args.join(" "),
                    })
                }
            }
            other => Err(ActionParseError::UnknownCommand(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_command() {
        assert_eq!("move up".parse::<Action>(), Ok(Action::Move(Direction::Up)));
        assert_eq!("till".parse::<Action>(), Ok(Action::Till(None)));
        assert_eq!(
            "untill 2 3".parse::<Action>(),
            Ok(Action::Untill(Some(Position::new(2, 3))))
        );
        assert_eq!(
            "plant potato".parse::<Action>(),
            Ok(Action::Plant(Species::Potato, None))
        );
        assert_eq!(
            "plant Berry 0 4".parse::<Action>(),
            Ok(Action::Plant(Species::Berry, Some(Position::new(0, 4))))
        );
        assert_eq!("harvest".parse::<Action>(), Ok(Action::Harvest(None)));
        assert_eq!(
            "remove -1 0".parse::<Action>(),
            Ok(Action::Remove(Some(Position::new(-1, 0))))
        );
        assert_eq!(
            "select Potato Seed".parse::<Action>(),
            Ok(Action::Select("Potato Seed".to_string()))
        );
        assert_eq!(
            "buy  Kale   Seed".parse::<Action>(),
            Ok(Action::Buy("Kale Seed".to_string()))
        );
        assert_eq!("sell Berry".parse::<Action>(), Ok(Action::Sell("Berry".to_string())));
        assert_eq!("day".parse::<Action>(), Ok(Action::NewDay));
        assert_eq!("NEW-DAY".parse::<Action>(), Ok(Action::NewDay));
    }

    #[test]
    fn rejects_malformed_commands() {
        assert_eq!("".parse::<Action>(), Err(ActionParseError::Empty));
        assert_eq!(
            "dance".parse::<Action>(),
            Err(ActionParseError::UnknownCommand("dance".to_string()))
        );
        assert!(matches!(
            "move".parse::<Action>(),
            Err(ActionParseError::MissingArgument { .. })
        ));
        assert!(matches!(
            "move north".parse::<Action>(),
            Err(ActionParseError::InvalidArgument { .. })
        ));
        assert!(matches!(
            "plant wheat".parse::<Action>(),
            Err(ActionParseError::InvalidArgument { .. })
        ));
        assert!(matches!(
            "till 1".parse::<Action>(),
            Err(ActionParseError::InvalidArgument { .. })
        ));
        assert!(matches!(
            "harvest a b".parse::<Action>(),
            Err(ActionParseError::InvalidArgument { .. })
        ));
        assert!(matches!(
            "buy".parse::<Action>(),
            Err(ActionParseError::MissingArgument { .. })
        ));
    }
}
