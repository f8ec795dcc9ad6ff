//! Chunk mesh builder: one quad per tile, triangles grouped by texture.

use std::borrow::Borrow;

use tessel_geom::{Vec2, Vec3};
use tessel_tiles::{Texture, TextureId, TextureRegion, Tile, TileFlip, TilePoint};

use crate::error::MeshError;
use crate::mesh::TileMesh;

/// Upper bound on distinct textures (plus the no-texture batch) per chunk.
pub const DEFAULT_MAX_BATCHES: usize = 30;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuilderLimits {
    pub chunk_width: usize,
    pub chunk_height: usize,
    pub max_batches: usize,
}

impl BuilderLimits {
    pub fn new(chunk_width: usize, chunk_height: usize) -> Self {
        Self {
            chunk_width: chunk_width.max(1),
            chunk_height: chunk_height.max(1),
            max_batches: DEFAULT_MAX_BATCHES,
        }
    }

    pub fn with_max_batches(self, max_batches: usize) -> Self {
        Self {
            max_batches: max_batches.max(1),
            ..self
        }
    }

    #[inline]
    pub fn tile_capacity(&self) -> usize {
        self.chunk_width * self.chunk_height
    }

    #[inline]
    pub fn vertex_capacity(&self) -> usize {
        self.tile_capacity() * 4
    }
}

#[derive(Clone, Debug, Default)]
struct Batch {
    texture: Option<Texture>,
    indices: Vec<u32>,
}

impl Batch {
    #[inline]
    fn key(&self) -> Option<TextureId> {
        self.texture.map(|t| t.id)
    }
}

/// Reusable scratch arena sized for one chunk. Buffers keep their capacity
/// across rebuilds; nothing is reallocated once the first chunk is built.
pub struct TileMeshBuilder {
    limits: BuilderLimits,
    vertices: Vec<Vec3>,
    uvs: Vec<Vec2>,
    batches: Vec<Batch>,
    open: usize,
}

impl TileMeshBuilder {
    pub fn new(limits: BuilderLimits) -> Self {
        let verts = limits.vertex_capacity();
        Self {
            limits,
            vertices: Vec::with_capacity(verts),
            uvs: Vec::with_capacity(verts),
            batches: (0..limits.max_batches).map(|_| Batch::default()).collect(),
            open: 0,
        }
    }

    /// Regenerates `mesh` from `tiles`. Vertex positions are local to
    /// `origin` and scaled by `tile_size`, so the chunk is placed with a
    /// translation to the origin's world position.
    ///
    /// On error `mesh` is left exactly as it was.
    pub fn rebuild<I>(
        &mut self,
        mesh: &mut TileMesh,
        tiles: I,
        origin: TilePoint,
        tile_size: f32,
    ) -> Result<(), MeshError>
    where
        I: IntoIterator,
        I::Item: Borrow<Tile>,
    {
        if mesh.is_released() {
            log::error!("cannot rebuild tile mesh {:?}: mesh was released", mesh.id());
            return Err(MeshError::Released(mesh.id()));
        }
        self.reset();
        let mut count = 0usize;
        for tile in tiles {
            count += 1;
            if count > self.limits.tile_capacity() {
                return Err(MeshError::CapacityExceeded {
                    tiles: count,
                    capacity: self.limits.tile_capacity(),
                });
            }
            self.add_tile(tile.borrow(), origin, tile_size)?;
        }
        self.write_into(mesh)
    }

    fn reset(&mut self) {
        self.vertices.clear();
        self.uvs.clear();
        for b in &mut self.batches[..self.open] {
            b.texture = None;
            b.indices.clear();
        }
        self.open = 0;
    }

    fn add_tile(&mut self, tile: &Tile, origin: TilePoint, tile_size: f32) -> Result<(), MeshError> {
        let region = tile.region.filter(|r| {
            if r.texture.is_valid() {
                true
            } else {
                log::error!(
                    "tile at {} references texture {:?} with zero size; drawing as empty",
                    tile.position,
                    r.texture.id
                );
                false
            }
        });
        let batch = self.batch_for(region.map(|r| r.texture))?;

        let local = (tile.position - origin).as_vec2() * tile_size;
        let base = self.vertices.len() as u32;
        self.push_quad(local, tile_size);
        self.push_uvs(region, tile.flip);

        // bl, br, tr, tl
        let (bl, br, tr, tl) = (base, base + 1, base + 2, base + 3);
        self.batches[batch]
            .indices
            .extend_from_slice(&[bl, br, tl, tr, tl, br]);
        Ok(())
    }

    fn batch_for(&mut self, texture: Option<Texture>) -> Result<usize, MeshError> {
        let key = texture.map(|t| t.id);
        if let Some(i) = self.batches[..self.open].iter().position(|b| b.key() == key) {
            return Ok(i);
        }
        if self.open == self.batches.len() {
            log::error!(
                "chunk needs more than {} batches; reduce distinct textures per chunk",
                self.batches.len()
            );
            return Err(MeshError::BatchLimitExceeded {
                limit: self.batches.len(),
            });
        }
        let i = self.open;
        self.batches[i].texture = texture;
        self.open += 1;
        Ok(i)
    }

    fn push_quad(&mut self, local: Vec2, size: f32) {
        let (x, y) = (local.x, local.y);
        self.vertices.extend_from_slice(&[
            Vec3::new(x, y, 0.0),
            Vec3::new(x + size, y, 0.0),
            Vec3::new(x + size, y + size, 0.0),
            Vec3::new(x, y + size, 0.0),
        ]);
    }

    fn push_uvs(&mut self, region: Option<TextureRegion>, flip: TileFlip) {
        let Some(region) = region else {
            self.uvs.extend_from_slice(&[
                Vec2::new(0.0, 0.0),
                Vec2::new(1.0, 0.0),
                Vec2::new(1.0, 1.0),
                Vec2::new(0.0, 1.0),
            ]);
            return;
        };
        let r = region.rect;
        let (mut x0, mut x1) = (r.min.x, r.max.x);
        let (mut y0, mut y1) = (r.min.y, r.max.y);
        if flip.flips_x() {
            std::mem::swap(&mut x0, &mut x1);
        }
        if flip.flips_y() {
            std::mem::swap(&mut y0, &mut y1);
        }
        let tw = region.texture.width as f32;
        let th = region.texture.height as f32;
        let (l, rt) = (x0 / tw, x1 / tw);
        let (b, t) = (y0 / th, y1 / th);
        self.uvs.extend_from_slice(&[
            Vec2::new(l, b),
            Vec2::new(rt, b),
            Vec2::new(rt, t),
            Vec2::new(l, t),
        ]);
    }

    fn write_into(&self, mesh: &mut TileMesh) -> Result<(), MeshError> {
        let (geom, textures) = mesh.parts_mut()?;
        geom.clear_keep_capacity();
        geom.vertices.extend_from_slice(&self.vertices);
        geom.uvs.extend_from_slice(&self.uvs);
        // Batches beyond the new count are dropped so stale indices never draw.
        geom.batches.truncate(self.open);
        geom.batches.resize_with(self.open, Vec::new);
        textures.clear();
        for (dst, src) in geom.batches.iter_mut().zip(&self.batches[..self.open]) {
            dst.extend_from_slice(&src.indices);
            textures.push(src.texture);
        }
        mesh.mark_built();
        Ok(())
    }
}
