//! Coordinates and small enumerations shared by map entities.

use std::fmt;

use serde::Serialize;

/// A cell coordinate on the map.
///
/// Either half is `None` when the source field was not a number. Records
/// carrying such a position are kept, and the missing half is written back
/// as `NaN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Position {
    pub x: Option<i32>,
    pub y: Option<i32>,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
        }
    }

    /// True when both halves are numbers.
    pub fn is_known(&self) -> bool {
        self.x.is_some() && self.y.is_some()
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

fn coordinate(f: &mut fmt::Formatter<'_>, value: Option<i32>) -> fmt::Result {
    match value {
        Some(v) => write!(f, "{}", v),
        None => f.write_str("NaN"),
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        coordinate(f, self.x)?;
        f.write_str(",")?;
        coordinate(f, self.y)
    }
}

/// Extent of a tile grid in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

/// Anything stored in a point store, keyed by where it stands.
pub trait Positioned {
    fn position(&self) -> Position;
}

/// Facing of a human.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

impl TryFrom<i32> for Direction {
    type Error = i32;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Direction::North),
            1 => Ok(Direction::East),
            2 => Ok(Direction::South),
            3 => Ok(Direction::West),
            other => Err(other),
        }
    }
}

/// Movement pattern of a human.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HumanBehavior {
    Still = 0,
    RandomMove = 1,
    RandomDirection = 2,
    RandomMoveHorizontal = 3,
    RandomMoveVertical = 4,
    GoNear = 5,
    RunAway = 6,
}

impl TryFrom<i32> for HumanBehavior {
    type Error = i32;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(HumanBehavior::Still),
            1 => Ok(HumanBehavior::RandomMove),
            2 => Ok(HumanBehavior::RandomDirection),
            3 => Ok(HumanBehavior::RandomMoveHorizontal),
            4 => Ok(HumanBehavior::RandomMoveVertical),
            5 => Ok(HumanBehavior::GoNear),
            6 => Ok(HumanBehavior::RunAway),
            other => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_from_id() {
        assert_eq!(Direction::try_from(2), Ok(Direction::South));
        assert_eq!(Direction::try_from(4), Err(4));
    }

    #[test]
    fn test_behavior_from_id() {
        assert_eq!(HumanBehavior::try_from(6), Ok(HumanBehavior::RunAway));
        assert_eq!(HumanBehavior::try_from(-1), Err(-1));
    }

    #[test]
    fn test_position_display() {
        assert_eq!(Position::new(3, 4).to_string(), "3,4");
        assert_eq!(Position::from((7, 1)), Position { x: Some(7), y: Some(1) });
    }

    #[test]
    fn test_unknown_position_display() {
        let position = Position { x: None, y: Some(4) };
        assert!(!position.is_known());
        assert_eq!(position.to_string(), "NaN,4");
    }
}
