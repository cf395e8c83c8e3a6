//! Parsing of map files.
//!
//! # Format
//!
//! A map file is a sequence of chunks, each introduced by `#NAME` and
//! closed by a terminator:
//!
//! ```text
//! #HERO
//! 3,4#END
//! #FLOOR
//! 0_8 0_8 12C#END
//! #TBOX
//! 2,2,A potion#END
//! ```
//!
//! Top-level chunks end at `#END`. Event points nest further chunks with
//! their own terminators (`#PHEND<n>`, `#ED`, `#SELEND<n>`, `#BREND<n>`).
//!
//! # Usage
//!
//! ```ignore
//! use mapchunk::parser::{parse_map_with, ParseOutput};
//!
//! let source = std::fs::read_to_string("town.map")?;
//! let ParseOutput { document, diagnostics } = parse_map_with(&source, &options)?;
//!
//! for d in diagnostics.iter() {
//!     eprintln!("{}", d);
//! }
//! ```

mod context;
mod document;
mod entities;
mod event;
mod fields;
mod sprite;
mod tiles;
pub mod span;
pub mod tokenizer;

pub use document::{parse_map, parse_map_with, ParseOutput};
pub use fields::parse_int;
pub use span::{offset_to_location, Location};
pub use sprite::{parse_human_sprite, parse_tile_code};
pub use tokenizer::{Chunk, ChunkReader, ChunkValue, Terminator, CHUNK_END};
