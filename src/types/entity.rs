//! Point entities placed on a map.
//!
//! Numeric fields that the editor writes freely (direction, speed, map ids)
//! are `Option<i32>`; `None` stands for a value that could not be read as a
//! number and is written back as `NaN`.

use serde::Serialize;

use super::position::{Direction, HumanBehavior, Position, Positioned};
use super::sprite::HumanSprite;

/// A human (NPC) standing on the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Human {
    pub sprite: HumanSprite,
    pub position: Position,
    pub direction: Option<i32>,
    pub behavior: Option<i32>,
    pub speed: Option<i32>,
    pub message: String,
}

impl Human {
    /// Facing, if the stored id is a known direction.
    pub fn facing(&self) -> Option<Direction> {
        self.direction.and_then(|d| Direction::try_from(d).ok())
    }

    /// Movement pattern, if the stored id is a known behavior.
    pub fn movement(&self) -> Option<HumanBehavior> {
        self.behavior.and_then(|b| HumanBehavior::try_from(b).ok())
    }
}

/// A treasure box and the message shown when opening it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreasureBox {
    pub position: Position,
    pub message: String,
}

/// A spot that shows a message when examined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookPoint {
    pub position: Position,
    /// Only shown the first time.
    pub once: bool,
    pub message: String,
}

/// Where a teleport point leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Destination {
    pub map_id: Option<i32>,
    pub x: Option<i32>,
    pub y: Option<i32>,
}

/// A cell that moves the hero to another map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TeleportPoint {
    pub position: Position,
    pub destination: Destination,
}

impl Positioned for Human {
    fn position(&self) -> Position {
        self.position
    }
}

impl Positioned for TreasureBox {
    fn position(&self) -> Position {
        self.position
    }
}

impl Positioned for LookPoint {
    fn position(&self) -> Position {
        self.position
    }
}

impl Positioned for TeleportPoint {
    fn position(&self) -> Position {
        self.position
    }
}
