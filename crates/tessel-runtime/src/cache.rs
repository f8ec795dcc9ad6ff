use hashbrown::HashMap;
use hashbrown::hash_map::Entry;

use tessel_mesh_cpu::{MeshError, TileMesh};
use tessel_tiles::TilePoint;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChunkCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub builds: u64,
    pub rebuilds: u64,
    pub flushes: u64,
    pub evictions: u64,
    pub entries: usize,
}

/// Chunk origin -> built mesh. Only the renderer mutates it.
#[derive(Debug, Default)]
pub struct ChunkCache {
    entries: HashMap<TilePoint, TileMesh>,
    hits: u64,
    misses: u64,
    builds: u64,
    rebuilds: u64,
    flushes: u64,
    evictions: u64,
}

impl ChunkCache {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn contains(&self, origin: TilePoint) -> bool {
        self.entries.contains_key(&origin)
    }

    pub fn get(&self, origin: TilePoint) -> Option<&TileMesh> {
        self.entries.get(&origin)
    }

    pub fn origins(&self) -> impl Iterator<Item = TilePoint> + '_ {
        self.entries.keys().copied()
    }

    pub fn stats(&self) -> ChunkCacheStats {
        ChunkCacheStats {
            hits: self.hits,
            misses: self.misses,
            builds: self.builds,
            rebuilds: self.rebuilds,
            flushes: self.flushes,
            evictions: self.evictions,
            entries: self.entries.len(),
        }
    }

    /// Returns the cached mesh, or runs `build` and caches its result.
    /// A failed build caches nothing.
    pub(crate) fn get_or_try_insert_with<F>(
        &mut self,
        origin: TilePoint,
        build: F,
    ) -> Result<&TileMesh, MeshError>
    where
        F: FnOnce() -> Result<TileMesh, MeshError>,
    {
        match self.entries.entry(origin) {
            Entry::Occupied(e) => {
                self.hits += 1;
                Ok(e.into_mut())
            }
            Entry::Vacant(v) => {
                self.misses += 1;
                let mesh = build()?;
                self.builds += 1;
                log::debug!("built chunk {} as mesh {:?}", origin, mesh.id());
                Ok(v.insert(mesh))
            }
        }
    }

    pub(crate) fn get_mut(&mut self, origin: TilePoint) -> Option<&mut TileMesh> {
        self.entries.get_mut(&origin)
    }

    pub(crate) fn record_rebuild(&mut self) {
        self.rebuilds += 1;
    }

    /// Releases and drops a single entry.
    pub(crate) fn evict(&mut self, origin: TilePoint) -> bool {
        match self.entries.remove(&origin) {
            Some(mut mesh) => {
                mesh.release();
                self.evictions += 1;
                true
            }
            None => false,
        }
    }

    /// Releases every mesh and empties the cache. Returns how many were dropped.
    pub(crate) fn flush(&mut self) -> usize {
        let n = self.entries.len();
        for (_, mut mesh) in self.entries.drain() {
            mesh.release();
        }
        self.flushes += 1;
        self.evictions += n as u64;
        if n > 0 {
            log::debug!("flushed {} cached chunk meshes", n);
        }
        n
    }
}
