//! Core domain types for mapchunk.
//!
//! This module contains the in-memory model of a map:
//! - `MapDocument` - header fields, tile layers and point entities
//! - `TileGrid` / `PointStore` - sparse coordinate-indexed storage
//! - `EventPoint` / `Command` - event scripts
//! - `TileCode` / `HumanSprite` - sprite references

mod command;
mod document;
mod entity;
mod event;
mod position;
mod sprite;
mod store;

pub use command::{
    command_terminator, trailing_digits, Branch, Command, Params, RawCommand, Select, BRANCH_END,
    BRANCH_PREFIX, COMMAND_END, SELECT_END, SELECT_PREFIX,
};
pub use document::{MapDocument, DEFAULT_BACKGROUND_IMAGE_URL, DEFAULT_FLOOR_TILE};
pub use entity::{Destination, Human, LookPoint, TeleportPoint, TreasureBox};
pub use event::{Condition, EventPhase, EventPoint, EventTiming, PHASE_COUNT};
pub use position::{Direction, HumanBehavior, Position, Positioned, Size};
pub use sprite::{
    is_walkable, CharacterSurface, HumanSprite, StillSprite, Surface, Tile, TileCode,
};
pub use store::{PointStore, ShardedMap, TileGrid, DEFAULT_SHARD_CAPACITY, MAX_WIDTH};
