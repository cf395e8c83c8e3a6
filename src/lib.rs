//! mapchunk - Codec for chunked plaintext map files
//!
//! A map file is a flat sequence of `#NAME value#END` chunks describing a
//! tile map: the hero's start position, background music and image, two
//! tile layers and point entities (people, treasure boxes, look points,
//! teleports and scripted events). This crate parses such files into a
//! [`MapDocument`] and writes documents back out in canonical form.

pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod escape;
pub mod output;
pub mod parser;
pub mod types;
pub mod writer;

pub use config::{NumberMode, ParseOptions};
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use error::{MapError, Result};
pub use escape::{escape_meta_chars, unescape_meta_chars};
pub use parser::{parse_map, parse_map_with, ChunkReader, ParseOutput, Terminator};
pub use types::{
    Branch, CharacterSurface, Command, Destination, EventPhase, EventPoint, EventTiming, Human,
    HumanSprite, LookPoint, MapDocument, Params, PointStore, Position, RawCommand, Select,
    ShardedMap, Size, TeleportPoint, Tile, TileCode, TileGrid, TreasureBox,
};
pub use writer::{write_map, write_map_file};
