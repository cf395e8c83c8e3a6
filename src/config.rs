//! Parse configuration (`mapchunk.yaml`).
//!
//! Every option defaults to the lenient behavior of the map editor itself,
//! so an empty file and `ParseOptions::default()` are the same thing.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MapError, Result};
use crate::types::{DEFAULT_SHARD_CAPACITY, MAX_WIDTH};

/// The conventional name of a configuration file.
pub const CONFIG_FILENAME: &str = "mapchunk.yaml";

/// How text that should be a number is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberMode {
    /// Read a leading integer if there is one, otherwise yield the
    /// not-a-number sentinel.
    Permissive,
    /// The whole field must be an integer.
    Strict,
}

/// Options for parsing a map.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Fail on unterminated or malformed chunks and out-of-range tiles
    /// instead of recovering.
    pub strict_chunks: bool,

    /// Fail on fields that are not valid numbers or sprite tokens.
    pub strict_numbers: bool,

    /// Translate known event commands into typed commands.
    pub translate_commands: bool,

    /// Side length of the tile layers.
    pub max_width: u32,

    /// Entries per shard of the point stores.
    pub shard_capacity: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            strict_chunks: false,
            strict_numbers: false,
            translate_commands: false,
            max_width: MAX_WIDTH,
            shard_capacity: DEFAULT_SHARD_CAPACITY,
        }
    }
}

impl ParseOptions {
    /// Options with every strict check enabled.
    pub fn strict() -> Self {
        Self {
            strict_chunks: true,
            strict_numbers: true,
            ..Self::default()
        }
    }

    pub fn number_mode(&self) -> NumberMode {
        if self.strict_numbers {
            NumberMode::Strict
        } else {
            NumberMode::Permissive
        }
    }

    /// Load options from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| MapError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read config: {}", e),
        })?;

        Self::parse(&content)
    }

    /// Parse options from a YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let options: Self = serde_yaml::from_str(content).map_err(|e| MapError::Config {
            message: e.to_string(),
            help: Some(format!("Check {} syntax", CONFIG_FILENAME)),
        })?;

        if options.max_width == 0 {
            return Err(MapError::Config {
                message: "max_width must be at least 1".to_string(),
                help: None,
            });
        }
        if options.shard_capacity == 0 {
            return Err(MapError::Config {
                message: "shard_capacity must be at least 1".to_string(),
                help: None,
            });
        }

        Ok(options)
    }
}
