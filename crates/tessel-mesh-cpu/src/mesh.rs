use std::sync::atomic::{AtomicU64, Ordering};

use tessel_geom::{Transform, Vec2, Vec3};
use tessel_tiles::Texture;

use crate::draw::{DrawCommand, DrawList, MaterialId};
use crate::error::MeshError;

static NEXT_MESH_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshId(pub u64);

impl MeshId {
    fn next() -> Self {
        MeshId(NEXT_MESH_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Vertex, UV and per-batch index buffers of one chunk mesh.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct MeshGeometry {
    pub vertices: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub batches: Vec<Vec<u32>>,
}

impl MeshGeometry {
    /// Clears all arrays but retains capacity for reuse across rebuilds.
    #[inline]
    pub fn clear_keep_capacity(&mut self) {
        self.vertices.clear();
        self.uvs.clear();
        for b in &mut self.batches {
            b.clear();
        }
    }
}

/// A chunk's renderable mesh plus its per-batch textures.
///
/// Batch `i` draws with `textures()[i]`; a `None` entry is the no-texture
/// batch holding empty tiles and is never drawn. After [`TileMesh::release`]
/// the geometry is gone and every draw or rebuild returns
/// [`MeshError::Released`].
#[derive(Debug)]
pub struct TileMesh {
    id: MeshId,
    geometry: Option<MeshGeometry>,
    textures: Vec<Option<Texture>>,
    builds: u32,
}

impl Default for TileMesh {
    fn default() -> Self {
        Self::new()
    }
}

impl TileMesh {
    pub fn new() -> Self {
        Self {
            id: MeshId::next(),
            geometry: Some(MeshGeometry::default()),
            textures: Vec::new(),
            builds: 0,
        }
    }

    #[inline]
    pub fn id(&self) -> MeshId {
        self.id
    }

    #[inline]
    pub fn is_released(&self) -> bool {
        self.geometry.is_none()
    }

    /// Destroys the geometry and forgets all textures. Idempotent.
    pub fn release(&mut self) {
        if self.geometry.take().is_some() {
            log::trace!("released tile mesh {:?}", self.id);
        }
        self.textures.clear();
    }

    pub fn vertices(&self) -> &[Vec3] {
        self.geometry.as_ref().map_or(&[], |g| g.vertices.as_slice())
    }

    pub fn uvs(&self) -> &[Vec2] {
        self.geometry.as_ref().map_or(&[], |g| g.uvs.as_slice())
    }

    pub fn batches(&self) -> &[Vec<u32>] {
        self.geometry.as_ref().map_or(&[], |g| g.batches.as_slice())
    }

    pub fn batch(&self, i: usize) -> Option<&[u32]> {
        self.batches().get(i).map(Vec::as_slice)
    }

    #[inline]
    pub fn textures(&self) -> &[Option<Texture>] {
        &self.textures
    }

    #[inline]
    pub fn batch_count(&self) -> usize {
        self.textures.len()
    }

    /// Batches with a texture; the count of draws one submission emits.
    pub fn drawable_batch_count(&self) -> usize {
        self.textures.iter().filter(|t| t.is_some()).count()
    }

    /// How many times geometry has been written into this mesh.
    #[inline]
    pub fn build_count(&self) -> u32 {
        self.builds
    }

    /// Appends one command per textured batch. Returns the number appended.
    pub fn submit(
        &self,
        list: &mut DrawList,
        transform: Transform,
        material: MaterialId,
    ) -> Result<usize, MeshError> {
        if self.is_released() {
            log::error!("cannot draw tile mesh {:?}: mesh was released", self.id);
            return Err(MeshError::Released(self.id));
        }
        let mut n = 0;
        for (batch, tex) in self.textures.iter().enumerate() {
            let Some(texture) = *tex else { continue };
            list.push(DrawCommand {
                mesh: self.id,
                batch,
                transform,
                texture,
                material,
            });
            n += 1;
        }
        Ok(n)
    }

    pub(crate) fn parts_mut(
        &mut self,
    ) -> Result<(&mut MeshGeometry, &mut Vec<Option<Texture>>), MeshError> {
        match self.geometry.as_mut() {
            Some(g) => Ok((g, &mut self.textures)),
            None => {
                log::error!("cannot rebuild tile mesh {:?}: mesh was released", self.id);
                Err(MeshError::Released(self.id))
            }
        }
    }

    pub(crate) fn mark_built(&mut self) {
        self.builds = self.builds.saturating_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessel_tiles::TextureId;

    #[test]
    fn ids_are_unique() {
        let a = TileMesh::new();
        let b = TileMesh::new();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn release_is_idempotent_and_blocks_submit() {
        let mut m = TileMesh::new();
        m.textures.push(Some(Texture::new(TextureId(0), 4, 4)));
        m.release();
        m.release();
        assert!(m.is_released());
        assert!(m.textures().is_empty());
        assert!(m.vertices().is_empty());
        let mut list = DrawList::new("test");
        let err = m
            .submit(&mut list, Transform::IDENTITY, MaterialId::default())
            .unwrap_err();
        assert_eq!(err, MeshError::Released(m.id()));
        assert!(list.is_empty());
    }

    #[test]
    fn submit_skips_untextured_batches() {
        let mut m = TileMesh::new();
        m.textures = vec![None, Some(Texture::new(TextureId(3), 8, 8))];
        let mut list = DrawList::new("test");
        let n = m
            .submit(&mut list, Transform::IDENTITY, MaterialId(7))
            .unwrap();
        assert_eq!(n, 1);
        assert_eq!(list.commands()[0].batch, 1);
        assert_eq!(list.commands()[0].texture.id, TextureId(3));
        assert_eq!(list.commands()[0].material, MaterialId(7));
        assert_eq!(m.batch_count(), 2);
        assert_eq!(m.drawable_batch_count(), 1);
    }
}
