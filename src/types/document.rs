//! The in-memory map document.

use serde::Serialize;

use super::entity::{Human, LookPoint, TeleportPoint, TreasureBox};
use super::event::EventPoint;
use super::position::Position;
use super::sprite::{Surface, Tile, TileCode};
use super::store::{PointStore, TileGrid, DEFAULT_SHARD_CAPACITY, MAX_WIDTH};

/// Background image used when a map does not name one.
pub const DEFAULT_BACKGROUND_IMAGE_URL: &str = "http://i.imgur.com/qiN1und.jpg";

/// Floor tile of cells the floor layer leaves empty.
pub const DEFAULT_FLOOR_TILE: TileCode = TileCode::Standard(Surface { x: 0, y: 8 });

/// A parsed map: header fields, two tile layers and the point entities.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapDocument {
    /// Where the hero starts.
    pub hero: Position,
    pub background_image_url: String,
    pub bgm_url: Option<String>,
    /// Terrain layer (`FLOOR`).
    pub floor: TileGrid<TileCode>,
    /// Object layer drawn over the floor (`MAP`).
    pub objects: TileGrid<TileCode>,
    pub humans: PointStore<Human>,
    pub treasure_boxes: PointStore<TreasureBox>,
    pub look_points: PointStore<LookPoint>,
    pub teleport_points: PointStore<TeleportPoint>,
    pub event_points: PointStore<EventPoint>,
}

impl MapDocument {
    /// An empty map with the hero at `hero`.
    pub fn new(hero: Position) -> Self {
        Self::with_limits(hero, MAX_WIDTH, DEFAULT_SHARD_CAPACITY)
    }

    /// An empty map whose tile layers accept `0..max_width` on both axes
    /// and whose point stores use shards of `shard_capacity` entries.
    pub fn with_limits(hero: Position, max_width: u32, shard_capacity: usize) -> Self {
        Self {
            hero,
            background_image_url: DEFAULT_BACKGROUND_IMAGE_URL.to_string(),
            bgm_url: None,
            floor: TileGrid::with_max_width(max_width),
            objects: TileGrid::with_max_width(max_width),
            humans: PointStore::with_shard_capacity(shard_capacity),
            treasure_boxes: PointStore::with_shard_capacity(shard_capacity),
            look_points: PointStore::with_shard_capacity(shard_capacity),
            teleport_points: PointStore::with_shard_capacity(shard_capacity),
            event_points: PointStore::with_shard_capacity(shard_capacity),
        }
    }

    /// Floor tile at a cell, falling back to the default floor.
    pub fn floor_tile(&self, x: i32, y: i32) -> Tile {
        self.floor
            .get(x, y)
            .unwrap_or(&DEFAULT_FLOOR_TILE)
            .at(Position::new(x, y))
    }

    /// Object tile at a cell, if any.
    pub fn object_tile(&self, x: i32, y: i32) -> Option<Tile> {
        self.objects.get(x, y).map(|code| code.at(Position::new(x, y)))
    }

    /// Whether either layer blocks movement at a cell.
    pub fn is_blocked(&self, x: i32, y: i32) -> bool {
        self.floor_tile(x, y).collision || self.object_tile(x, y).is_some_and(|t| t.collision)
    }

    /// Total number of point entities.
    pub fn entity_count(&self) -> usize {
        self.humans.len()
            + self.treasure_boxes.len()
            + self.look_points.len()
            + self.teleport_points.len()
            + self.event_points.len()
    }
}
