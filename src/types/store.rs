//! Sparse coordinate-indexed storage.
//!
//! - [`TileGrid`] holds tiles on a bounded grid, addressed by a packed
//!   integer key.
//! - [`ShardedMap`] is an insertion-ordered map split into fixed-capacity
//!   shards; [`PointStore`] builds on it to hold point entities at
//!   arbitrary coordinates.

use std::collections::HashMap;
use std::hash::Hash;

use serde::ser::{Serialize, SerializeSeq, Serializer};

use crate::error::{MapError, Result};

use super::position::{Position, Positioned, Size};

/// Default side length of a tile grid.
pub const MAX_WIDTH: u32 = 300;

/// Default shard capacity of a point store.
pub const DEFAULT_SHARD_CAPACITY: usize = 1 << 24;

/// Bounded sparse tile storage.
///
/// Keys pack `x` into the high bits and `y` into the low
/// `bit_length(max_width)` bits of a `u64`, so every `u32` width fits.
#[derive(Debug, Clone, PartialEq)]
pub struct TileGrid<T> {
    max_width: u32,
    y_bits: u32,
    cells: HashMap<u64, T>,
}

impl<T> Default for TileGrid<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TileGrid<T> {
    /// Create an empty grid with the default bound.
    pub fn new() -> Self {
        Self::with_max_width(MAX_WIDTH)
    }

    /// Create an empty grid accepting `0..max_width` on both axes.
    pub fn with_max_width(max_width: u32) -> Self {
        let max_width = max_width.max(1);
        Self {
            max_width,
            y_bits: u32::BITS - max_width.leading_zeros(),
            cells: HashMap::new(),
        }
    }

    pub fn max_width(&self) -> u32 {
        self.max_width
    }

    fn key(&self, x: i32, y: i32) -> Result<u64> {
        let in_range = |v: i32| v >= 0 && (v as u32) < self.max_width;
        if !in_range(x) || !in_range(y) {
            return Err(MapError::OutOfRange {
                x: x as i64,
                y: y as i64,
                max: self.max_width,
            });
        }
        Ok(((x as u64) << self.y_bits) | y as u64)
    }

    fn unpack_raw(&self, key: u64) -> (u32, u32) {
        let mask = (1u64 << self.y_bits) - 1;
        ((key >> self.y_bits) as u32, (key & mask) as u32)
    }

    fn unpack(&self, key: u64) -> Position {
        let (x, y) = self.unpack_raw(key);
        Position::new(x as i32, y as i32)
    }

    /// Store a value, replacing any previous value at the cell.
    pub fn set(&mut self, x: i32, y: i32, value: T) -> Result<()> {
        let key = self.key(x, y)?;
        self.cells.insert(key, value);
        Ok(())
    }

    /// Value at a cell. Out-of-range coordinates are simply empty.
    pub fn get(&self, x: i32, y: i32) -> Option<&T> {
        let key = self.key(x, y).ok()?;
        self.cells.get(&key)
    }

    pub fn remove(&mut self, x: i32, y: i32) -> Option<T> {
        let key = self.key(x, y).ok()?;
        self.cells.remove(&key)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Bounding size of the stored cells, measured from the origin.
    pub fn size(&self) -> Size {
        self.cells.keys().fold(Size::default(), |size, &key| {
            let (x, y) = self.unpack_raw(key);
            Size {
                width: size.width.max(x + 1),
                height: size.height.max(y + 1),
            }
        })
    }

    /// Iterate over stored cells in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, &T)> + '_ {
        self.cells.iter().map(move |(&key, value)| (self.unpack(key), value))
    }

    /// Stored cells sorted row by row.
    pub fn sorted(&self) -> Vec<(Position, &T)> {
        let mut cells: Vec<_> = self.iter().collect();
        cells.sort_by_key(|(pos, _)| (pos.y, pos.x));
        cells
    }
}

impl<T: Serialize> Serialize for TileGrid<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        #[derive(serde::Serialize)]
        struct Cell<'a, T> {
            position: Position,
            tile: &'a T,
        }

        let cells = self.sorted();
        let mut seq = serializer.serialize_seq(Some(cells.len()))?;
        for (position, tile) in cells {
            seq.serialize_element(&Cell { position, tile })?;
        }
        seq.end()
    }
}

/// One fixed-capacity table of a [`ShardedMap`], keeping insertion order.
#[derive(Debug, Clone)]
struct Shard<K, V> {
    entries: Vec<(K, V)>,
    index: HashMap<K, usize>,
}

impl<K: Hash + Eq + Clone, V> Shard<K, V> {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    fn get(&self, key: &K) -> Option<&V> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let i = *self.index.get(key)?;
        Some(&mut self.entries[i].1)
    }

    fn push(&mut self, key: K, value: V) {
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, value));
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        let i = self.index.remove(key)?;
        let (_, value) = self.entries.remove(i);
        for slot in self.index.values_mut() {
            if *slot > i {
                *slot -= 1;
            }
        }
        Some(value)
    }
}

/// Insertion-ordered map split across shards of bounded size.
///
/// New keys go to the first shard with room; a new shard is opened once all
/// existing ones are full. Lookups scan shards in creation order.
#[derive(Debug, Clone)]
pub struct ShardedMap<K, V> {
    capacity: usize,
    shards: Vec<Shard<K, V>>,
}

impl<K: Hash + Eq + Clone, V> Default for ShardedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq + Clone, V> ShardedMap<K, V> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_SHARD_CAPACITY)
    }

    /// Create a map whose shards hold at most `capacity` entries each.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            shards: Vec::new(),
        }
    }

    pub fn shard_capacity(&self) -> usize {
        self.capacity
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Insert or replace. A replaced value keeps its place in iteration
    /// order. Returns the previous value.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if let Some(slot) = self.shards.iter_mut().find_map(|s| s.get_mut(&key)) {
            return Some(std::mem::replace(slot, value));
        }

        let capacity = self.capacity;
        match self.shards.iter_mut().find(|s| s.entries.len() < capacity) {
            Some(shard) => shard.push(key, value),
            None => {
                let mut shard = Shard::new();
                shard.push(key, value);
                self.shards.push(shard);
            }
        }
        None
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.shards.iter().find_map(|s| s.get(key))
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.shards.iter_mut().find_map(|s| s.remove(key))
    }

    pub fn len(&self) -> usize {
        self.shards.iter().map(|s| s.entries.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.shards.clear();
    }

    /// Entries shard by shard, each shard in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.shards
            .iter()
            .flat_map(|s| s.entries.iter().map(|(k, v)| (k, v)))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, v)| v)
    }
}

impl<K: Hash + Eq + Clone, V: PartialEq> PartialEq for ShardedMap<K, V> {
    /// Equal when both hold the same entries in the same order, however
    /// they are sharded.
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

/// Unbounded store of point entities keyed by position.
#[derive(Debug, Clone, PartialEq)]
pub struct PointStore<V> {
    map: ShardedMap<Position, V>,
}

impl<V> Default for PointStore<V> {
    fn default() -> Self {
        Self {
            map: ShardedMap::new(),
        }
    }
}

impl<V> PointStore<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_shard_capacity(capacity: usize) -> Self {
        Self {
            map: ShardedMap::with_capacity(capacity),
        }
    }

    /// Store a value at a position, replacing any previous one.
    pub fn set(&mut self, position: Position, value: V) -> Option<V> {
        self.map.insert(position, value)
    }

    pub fn get(&self, x: i32, y: i32) -> Option<&V> {
        self.get_at(Position::new(x, y))
    }

    /// Lookup by position, including positions with a `NaN` half.
    pub fn get_at(&self, position: Position) -> Option<&V> {
        self.map.get(&position)
    }

    pub fn has(&self, x: i32, y: i32) -> bool {
        self.map.contains_key(&Position::new(x, y))
    }

    pub fn remove(&mut self, x: i32, y: i32) -> Option<V> {
        self.map.remove(&Position::new(x, y))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &V> + '_ {
        self.map.values()
    }

    pub fn shard_count(&self) -> usize {
        self.map.shard_count()
    }
}

impl<V: Positioned> PointStore<V> {
    /// Store an entity under its own position.
    pub fn insert(&mut self, value: V) -> Option<V> {
        self.set(value.position(), value)
    }
}

impl<V: Serialize> Serialize for PointStore<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_set_get() {
        let mut grid = TileGrid::new();
        grid.set(0, 0, "a").unwrap();
        grid.set(299, 299, "b").unwrap();
        grid.set(17, 3, "c").unwrap();

        assert_eq!(grid.get(0, 0), Some(&"a"));
        assert_eq!(grid.get(299, 299), Some(&"b"));
        assert_eq!(grid.get(17, 3), Some(&"c"));
        assert_eq!(grid.get(3, 17), None);
    }

    #[test]
    fn test_grid_full_range_roundtrip() {
        let mut grid = TileGrid::new();
        for x in (0..MAX_WIDTH as i32).step_by(7) {
            for y in 0..MAX_WIDTH as i32 {
                grid.set(x, y, (x, y)).unwrap();
            }
        }
        for x in (0..MAX_WIDTH as i32).step_by(7) {
            for y in 0..MAX_WIDTH as i32 {
                assert_eq!(grid.get(x, y), Some(&(x, y)));
            }
        }
    }

    #[test]
    fn test_grid_out_of_range() {
        let mut grid = TileGrid::new();
        let err = grid.set(MAX_WIDTH as i32 + 1, 0, 1).unwrap_err();
        assert!(matches!(err, MapError::OutOfRange { x: 301, y: 0, max: 300 }));

        assert!(grid.set(0, MAX_WIDTH as i32, 1).is_err());
        assert!(grid.set(-1, 0, 1).is_err());
        assert!(grid.is_empty());
        assert_eq!(grid.get(-1, 0), None);
    }

    #[test]
    fn test_grid_size() {
        let mut grid = TileGrid::new();
        assert_eq!(grid.size(), Size { width: 0, height: 0 });

        grid.set(4, 0, ()).unwrap();
        grid.set(1, 9, ()).unwrap();
        assert_eq!(grid.size(), Size { width: 5, height: 10 });

        grid.remove(1, 9);
        assert_eq!(grid.size(), Size { width: 5, height: 1 });
    }

    #[test]
    fn test_grid_custom_width() {
        let mut grid = TileGrid::with_max_width(8);
        assert!(grid.set(7, 7, 'x').is_ok());
        assert!(grid.set(8, 0, 'x').is_err());
        assert_eq!(grid.sorted(), vec![(Position::new(7, 7), &'x')]);
    }

    #[test]
    fn test_grid_wide_keys_stay_distinct() {
        let mut grid = TileGrid::with_max_width(100_000);
        grid.set(0, 0, "origin").unwrap();
        grid.set(32_768, 0, "far").unwrap();
        grid.set(99_999, 99_999, "corner").unwrap();

        assert_eq!(grid.get(0, 0), Some(&"origin"));
        assert_eq!(grid.get(32_768, 0), Some(&"far"));
        assert_eq!(grid.get(99_999, 99_999), Some(&"corner"));
        assert_eq!(grid.size(), Size { width: 100_000, height: 100_000 });
    }

    #[test]
    fn test_grid_widest_bound() {
        let mut grid = TileGrid::with_max_width(u32::MAX);
        grid.set(1, 1, ()).unwrap();
        grid.set(i32::MAX, 0, ()).unwrap();

        assert!(grid.get(1, 1).is_some());
        assert_eq!(grid.sorted()[1].0, Position::new(i32::MAX, 0));
    }

    #[test]
    fn test_sharded_insert_beyond_capacity() {
        let mut map = ShardedMap::with_capacity(1);
        map.insert("name", "Taro");
        map.insert("country", "Japan");

        assert_eq!(map.shard_count(), 2);
        assert_eq!(map.get(&"name"), Some(&"Taro"));
        assert_eq!(map.get(&"country"), Some(&"Japan"));
        assert_eq!(map.len(), 2);
        assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec!["name", "country"]);
    }

    #[test]
    fn test_sharded_many_keys() {
        let mut map = ShardedMap::with_capacity(16);
        for i in 0..1000 {
            map.insert(i, i * 2);
        }
        assert_eq!(map.shard_count(), 63);
        for i in 0..1000 {
            assert_eq!(map.get(&i), Some(&(i * 2)), "key {}", i);
        }
        assert_eq!(map.values().copied().collect::<Vec<_>>(), (0..1000).map(|i| i * 2).collect::<Vec<_>>());
    }

    #[test]
    fn test_sharded_overwrite_keeps_order() {
        let mut map = ShardedMap::with_capacity(2);
        map.insert('a', 1);
        map.insert('b', 2);
        map.insert('c', 3);
        assert_eq!(map.insert('a', 10), Some(1));

        assert_eq!(map.len(), 3);
        let entries: Vec<_> = map.iter().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(entries, vec![('a', 10), ('b', 2), ('c', 3)]);
    }

    #[test]
    fn test_sharded_remove_and_refill() {
        let mut map = ShardedMap::with_capacity(1);
        map.insert("name", "Taro");
        map.insert("country", "Japan");

        assert_eq!(map.remove(&"country"), Some("Japan"));
        assert_eq!(map.remove(&"name"), Some("Taro"));
        assert_eq!(map.get(&"name"), None);
        assert_eq!(map.remove(&"age"), None);
        assert!(map.is_empty());

        // The first shard has room again.
        map.insert("age", "20");
        assert_eq!(map.shard_count(), 2);
        assert!(map.contains_key(&"age"));

        map.clear();
        assert_eq!(map.len(), 0);
    }

    #[test]
    fn test_sharded_remove_keeps_index() {
        let mut map = ShardedMap::new();
        for c in ['a', 'b', 'c', 'd'] {
            map.insert(c, c as u32);
        }
        map.remove(&'b');
        assert_eq!(map.get(&'c'), Some(&('c' as u32)));
        assert_eq!(map.get(&'d'), Some(&('d' as u32)));
        assert_eq!(map.keys().copied().collect::<String>(), "acd");
    }

    #[test]
    fn test_sharded_equality_ignores_sharding() {
        let mut a = ShardedMap::with_capacity(1);
        let mut b = ShardedMap::new();
        for i in 0..5 {
            a.insert(i, i);
            b.insert(i, i);
        }
        assert_eq!(a, b);
    }

    #[test]
    fn test_point_store() {
        let mut store = PointStore::with_shard_capacity(2);
        store.set(Position::new(-5, 100_000), "far");
        store.set(Position::new(1, 1), "near");
        store.set(Position::new(2, 1), "next");

        assert!(store.has(-5, 100_000));
        assert_eq!(store.get(2, 1), Some(&"next"));
        assert_eq!(store.shard_count(), 2);
        assert_eq!(store.iter().copied().collect::<Vec<_>>(), vec!["far", "near", "next"]);

        assert_eq!(store.remove(1, 1), Some("near"));
        assert!(!store.has(1, 1));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_point_store_unknown_positions() {
        let mut store = PointStore::new();
        let unknown = Position { x: None, y: Some(3) };
        store.set(unknown, "first");
        store.set(unknown, "second");

        assert_eq!(store.len(), 1);
        assert_eq!(store.get_at(unknown), Some(&"second"));
        assert_eq!(store.get(0, 3), None);
    }
}
