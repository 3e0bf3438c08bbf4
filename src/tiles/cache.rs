//! Lock-free in-memory cache of decoded basemap tiles

use std::sync::Arc;
use dashmap::DashMap;
use crossbeam::queue::SegQueue;

use super::decode::RgbTile;
use super::grid::TileId;

/// Bounded tile cache shared by every figure of a run
pub struct TileCache {
    cache: Arc<DashMap<TileId, Arc<RgbTile>>>,
    /// Keys in insertion order, one entry per cached tile
    order: Arc<SegQueue<TileId>>,
    max_tiles: usize,
}

impl TileCache {
    /// Creates a new tile cache
    ///
    /// # Arguments
    /// * `max_tiles` - Maximum number of tiles to cache (default: 256)
    pub fn new(max_tiles: usize) -> Self {
        Self {
            cache: Arc::new(DashMap::new()),
            order: Arc::new(SegQueue::new()),
            max_tiles: max_tiles.max(1),
        }
    }

    /// Gets a tile from the cache
    pub fn get(&self, tile: TileId) -> Option<Arc<RgbTile>> {
        self.cache.get(&tile).map(|entry| Arc::clone(entry.value()))
    }

    /// Puts a decoded tile into the cache, evicting the oldest inserted entries when full
    pub fn put(&self, tile: TileId, data: RgbTile) -> Arc<RgbTile> {
        let data_arc = Arc::new(data);

        if self.cache.insert(tile, Arc::clone(&data_arc)).is_some() {
            // already queued from the first insert
            return data_arc;
        }

        while self.cache.len() > self.max_tiles {
            if let Some(old_key) = self.order.pop() {
                self.cache.remove(&old_key);
            } else {
                break;
            }
        }

        self.order.push(tile);
        data_arc
    }

    /// Number of keys waiting in the eviction queue
    #[cfg(test)]
    fn queued(&self) -> usize {
        self.order.len()
    }

    /// Returns the current number of cached tiles
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Returns whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Returns cache statistics
    pub fn stats(&self) -> CacheStats {
        let total_bytes: usize = self.cache
            .iter()
            .map(|entry| entry.value().byte_len())
            .sum();

        CacheStats {
            tile_count: self.cache.len(),
            total_bytes,
            max_tiles: self.max_tiles,
        }
    }
}

impl Clone for TileCache {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
            order: Arc::clone(&self.order),
            max_tiles: self.max_tiles,
        }
    }
}

impl Default for TileCache {
    fn default() -> Self {
        Self::new(256)
    }
}

/// Cache statistics
#[derive(Debug, Clone)]
pub struct CacheStats {
    /// Number of tiles currently in cache
    pub tile_count: usize,
    /// Total decoded bytes held by the cache
    pub total_bytes: usize,
    /// Maximum number of tiles
    pub max_tiles: usize,
}
