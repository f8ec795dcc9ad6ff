//! Chunked tile-map renderer: visibility, mesh cache and per-view draw lists.

use hashbrown::{HashMap, HashSet};

use tessel_geom::Transform;
use tessel_mesh_cpu::{DrawList, MaterialId, MeshError, TileMesh, TileMeshBuilder};
use tessel_tiles::{Tile, TileMap, TilePoint, TileSource};

use crate::cache::{ChunkCache, ChunkCacheStats};
use crate::settings::RendererSettings;
use crate::view::View;
use crate::visibility::VisibleChunks;

/// Outcome of one `submit` call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SubmitStats {
    /// Visible chunks that produced a mesh.
    pub chunks: usize,
    /// Draw commands appended to the view's list.
    pub draws: usize,
    /// Visible chunks whose build failed and were left out this frame.
    pub skipped: usize,
    /// Whether the cache was flushed before this submission.
    pub flushed: bool,
}

pub struct TileMapRenderer {
    settings: RendererSettings,
    material: MaterialId,
    builder: TileMeshBuilder,
    cache: ChunkCache,
    draw_lists: HashMap<String, DrawList>,
}

impl TileMapRenderer {
    pub fn new(settings: RendererSettings) -> Self {
        Self::with_material(settings, MaterialId::default())
    }

    pub fn with_material(settings: RendererSettings, material: MaterialId) -> Self {
        let settings = settings.sanitized();
        let builder = TileMeshBuilder::new(settings.builder_limits());
        Self {
            settings,
            material,
            builder,
            cache: ChunkCache::new(),
            draw_lists: HashMap::new(),
        }
    }

    #[inline]
    pub fn settings(&self) -> &RendererSettings {
        &self.settings
    }

    #[inline]
    pub fn material(&self) -> MaterialId {
        self.material
    }

    #[inline]
    pub fn cache(&self) -> &ChunkCache {
        &self.cache
    }

    #[inline]
    pub fn stats(&self) -> ChunkCacheStats {
        self.cache.stats()
    }

    /// Applies new settings and drops everything built under the old ones.
    pub fn set_settings(&mut self, settings: RendererSettings) {
        self.settings = settings.sanitized();
        self.rebuild();
    }

    /// Drops all cached meshes and per-view draw lists and re-creates the
    /// builder from the current settings.
    pub fn rebuild(&mut self) {
        self.flush();
        self.draw_lists.clear();
        self.builder = TileMeshBuilder::new(self.settings.builder_limits());
        log::debug!(
            "tile map renderer rebuilt with {}x{} chunks",
            self.settings.chunk_width,
            self.settings.chunk_height
        );
    }

    /// Releases every cached mesh. Returns how many were dropped.
    pub fn flush(&mut self) -> usize {
        self.cache.flush()
    }

    /// Origins of the chunks a view can see that contain at least one tile.
    pub fn visible_chunk_origins<'m, 'a, S, V>(
        &self,
        map: &'m TileMap<'a, S>,
        view: &V,
    ) -> VisibleChunks<'m, 'a, S>
    where
        S: TileSource + ?Sized,
        V: View + ?Sized,
    {
        VisibleChunks::new(
            map,
            view.world_bounds(),
            self.settings.chunk_width,
            self.settings.chunk_height,
        )
    }

    /// Cached mesh for the chunk containing `origin`, building it on a miss.
    /// Unaligned points resolve to their chunk's origin.
    pub fn get_or_build_mesh<S: TileSource + ?Sized>(
        &mut self,
        map: &TileMap<'_, S>,
        origin: TilePoint,
    ) -> Result<&TileMesh, MeshError> {
        let (cw, ch) = (self.settings.chunk_width, self.settings.chunk_height);
        let origin = origin.chunk_origin(cw, ch);
        build_cached(&mut self.cache, &mut self.builder, map, origin, cw, ch)
    }

    /// Rebuilds in place every cached chunk containing one of `positions`.
    /// Uncached chunks are left for the next visibility query. Returns the
    /// number of chunks rebuilt.
    pub fn invalidate_chunks_containing<S, I>(
        &mut self,
        map: &TileMap<'_, S>,
        positions: I,
    ) -> Result<usize, MeshError>
    where
        S: TileSource + ?Sized,
        I: IntoIterator<Item = TilePoint>,
    {
        let (cw, ch) = (self.settings.chunk_width, self.settings.chunk_height);
        let mut seen = HashSet::new();
        let mut rebuilt = 0;
        for origin in positions.into_iter().map(|p| p.chunk_origin(cw, ch)) {
            if !seen.insert(origin) {
                continue;
            }
            let Some(mesh) = self.cache.get_mut(origin) else {
                continue;
            };
            let tiles = chunk_tiles(map, origin, cw, ch);
            match self.builder.rebuild(mesh, tiles, origin, map.tile_size()) {
                Ok(()) => {
                    self.cache.record_rebuild();
                    rebuilt += 1;
                }
                Err(e) if e.is_recoverable() => {
                    log::error!("failed to rebuild chunk {}: {}", origin, e);
                    self.cache.evict(origin);
                }
                Err(e) => return Err(e),
            }
        }
        if rebuilt > 0 {
            log::debug!("rebuilt {} chunk meshes", rebuilt);
        }
        Ok(rebuilt)
    }

    /// Tooling entry point for edits; same as `invalidate_chunks_containing`.
    pub fn rebuild_chunks<S, I>(&mut self, map: &TileMap<'_, S>, positions: I) -> Result<usize, MeshError>
    where
        S: TileSource + ?Sized,
        I: IntoIterator<Item = TilePoint>,
    {
        self.invalidate_chunks_containing(map, positions)
    }

    /// Refills `view`'s draw list with every visible chunk, building missing
    /// chunks on the way. Blacklisted views are ignored.
    pub fn submit<S, V>(&mut self, map: &TileMap<'_, S>, view: &V) -> Result<SubmitStats, MeshError>
    where
        S: TileSource + ?Sized,
        V: View + ?Sized,
    {
        let name = view.name();
        if self.settings.is_blacklisted(name) {
            log::trace!("view '{}' is blacklisted; skipping tile map", name);
            return Ok(SubmitStats::default());
        }

        let mut stats = SubmitStats::default();
        if self.cache.len() > self.settings.flush_threshold {
            self.flush();
            stats.flushed = true;
        }

        let (cw, ch) = (self.settings.chunk_width, self.settings.chunk_height);
        let list = self
            .draw_lists
            .entry(name.to_string())
            .or_insert_with(|| DrawList::new(format!("Draw Tile Map ({})", name)));
        list.clear();

        for origin in VisibleChunks::new(map, view.world_bounds(), cw, ch) {
            let mesh = match build_cached(&mut self.cache, &mut self.builder, map, origin, cw, ch) {
                Ok(mesh) => mesh,
                Err(e) if e.is_recoverable() => {
                    log::error!("skipping chunk {}: {}", origin, e);
                    stats.skipped += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };
            let transform = Transform::from_translation(map.space().chunk_translation(origin));
            stats.draws += mesh.submit(list, transform, self.material)?;
            stats.chunks += 1;
        }
        Ok(stats)
    }

    /// The draw list produced by the last submission for `view_name`.
    pub fn draw_list(&self, view_name: &str) -> Option<&DrawList> {
        self.draw_lists.get(view_name)
    }

    /// Forgets a view's draw list, returning it.
    pub fn detach_view(&mut self, view_name: &str) -> Option<DrawList> {
        self.draw_lists.remove(view_name)
    }
}

impl Drop for TileMapRenderer {
    fn drop(&mut self) {
        self.flush();
    }
}

fn build_cached<'c, S: TileSource + ?Sized>(
    cache: &'c mut ChunkCache,
    builder: &mut TileMeshBuilder,
    map: &TileMap<'_, S>,
    origin: TilePoint,
    cw: i32,
    ch: i32,
) -> Result<&'c TileMesh, MeshError> {
    cache.get_or_try_insert_with(origin, || {
        let mut mesh = TileMesh::new();
        let tiles = chunk_tiles(map, origin, cw, ch);
        match builder.rebuild(&mut mesh, tiles, origin, map.tile_size()) {
            Ok(()) => Ok(mesh),
            Err(e) => {
                mesh.release();
                Err(e)
            }
        }
    })
}

/// Tiles of the chunk at `origin`, row-major, cut off at the map's far edges.
fn chunk_tiles<S: TileSource + ?Sized>(
    map: &TileMap<'_, S>,
    origin: TilePoint,
    cw: i32,
    ch: i32,
) -> impl Iterator<Item = Tile> {
    let w = cw.min(map.width().saturating_sub(origin.x)).max(0);
    let h = ch.min(map.height().saturating_sub(origin.y)).max(0);
    (0..h).flat_map(move |dy| (0..w).map(move |dx| map.get_tile(origin.x + dx, origin.y + dy)))
}
