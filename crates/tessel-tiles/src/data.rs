//! In-memory tile grid: compact per-cell indices resolved to [`Tile`]s on demand.

use crate::point::TilePoint;
use crate::source::TileSource;
use crate::tile::{Tile, TileFlip};
use crate::tileset::TileSet;

/// Data-level tile: indices into the map's tile sets, the set's shapes and the
/// shape's sprites. A negative `tile_set` marks an empty cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TileData {
    pub tile_set: i8,
    pub shape: u8,
    pub sprite: u8,
    pub flip: TileFlip,
}

impl TileData {
    pub const EMPTY: TileData = TileData {
        tile_set: -1,
        shape: 0,
        sprite: 0,
        flip: TileFlip::None,
    };

    #[inline]
    pub const fn new(tile_set: i8, shape: u8, sprite: u8, flip: TileFlip) -> Self {
        Self {
            tile_set,
            shape,
            sprite,
            flip,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tile_set < 0
    }
}

impl Default for TileData {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[derive(Clone, Debug)]
pub struct TileMapData {
    width: i32,
    height: i32,
    tile_sets: Vec<TileSet>,
    tiles: Vec<TileData>,
}

impl TileMapData {
    /// Creates an all-empty grid. Dimensions below 1 are clamped to 1.
    pub fn new(width: i32, height: i32) -> Self {
        if width < 1 || height < 1 {
            log::warn!(
                "tile map dimensions ({}, {}) are invalid; values < 1 are clamped to 1",
                width,
                height
            );
        }
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            tile_sets: Vec::new(),
            tiles: vec![TileData::EMPTY; (width as usize) * (height as usize)],
        }
    }

    pub fn tile_sets(&self) -> &[TileSet] {
        &self.tile_sets
    }

    /// Appends a tile set and returns its index, or `None` once the `i8`
    /// index space is exhausted.
    pub fn add_tile_set(&mut self, set: TileSet) -> Option<i8> {
        if self.tile_sets.len() > i8::MAX as usize {
            log::warn!("tile set '{}' not added: map already holds {} sets", set.name, self.tile_sets.len());
            return None;
        }
        self.tile_sets.push(set);
        Some((self.tile_sets.len() - 1) as i8)
    }

    pub fn has_non_empty_tile(&self, x: i32, y: i32) -> bool {
        self.index(x, y)
            .is_some_and(|i| !self.tiles[i].is_empty())
    }

    /// Writes a cell; out-of-range coordinates are ignored. Returns whether
    /// the cell was written.
    pub fn set_tile(&mut self, x: i32, y: i32, data: TileData) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.tiles[i] = data;
                true
            }
            None => false,
        }
    }

    pub fn tile_data(&self, x: i32, y: i32) -> Option<TileData> {
        self.index(x, y).map(|i| self.tiles[i])
    }

    /// Fills the half-open rectangle `[x0, x0+w) x [y0, y0+h)`,
    /// clipped to the map, and returns the positions written.
    pub fn fill(&mut self, x0: i32, y0: i32, w: i32, h: i32, data: TileData) -> Vec<TilePoint> {
        let mut written = Vec::new();
        for y in y0.max(0)..(y0 + h).min(self.height) {
            for x in x0.max(0)..(x0 + w).min(self.width) {
                if self.set_tile(x, y, data) {
                    written.push(TilePoint::new(x, y));
                }
            }
        }
        written
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && x < self.width && y >= 0 && y < self.height {
            Some((y * self.width + x) as usize)
        } else {
            None
        }
    }

    fn resolve(&self, x: i32, y: i32, data: TileData) -> Option<Tile> {
        if data.is_empty() {
            return None;
        }
        let set_i = data.tile_set as usize;
        check_index(set_i, self.tile_sets.len(), x, y, "tile set")?;
        let set = &self.tile_sets[set_i];
        let shape_i = data.shape as usize;
        check_index(shape_i, set.shapes.len(), x, y, "shape")?;
        let shape = &set.shapes[shape_i];
        let sprite_i = data.sprite as usize;
        check_index(sprite_i, shape.sprites.len(), x, y, "sprite")?;
        Some(Tile::new(
            TilePoint::new(x, y),
            data.flip,
            Some(shape.sprites[sprite_i]),
            shape.collider_points().clone(),
        ))
    }
}

fn check_index(i: usize, len: usize, x: i32, y: i32, what: &str) -> Option<()> {
    if i >= len {
        log::error!(
            "couldn't load tile: {} index for position ({}, {}) was invalid: got {}, expected less than {}",
            what,
            x,
            y,
            i,
            len
        );
        return None;
    }
    Some(())
}

impl TileSource for TileMapData {
    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }

    /// Any in-range cell counts, including empty ones.
    fn has_tile(&self, x: i32, y: i32) -> bool {
        self.index(x, y).is_some()
    }

    fn get_tile(&self, x: i32, y: i32) -> Tile {
        self.index(x, y)
            .and_then(|i| self.resolve(x, y, self.tiles[i]))
            .unwrap_or_else(|| Tile::empty(TilePoint::new(x, y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::{Texture, TextureId, TextureRegion};
    use crate::tileset::{ColliderKind, TileShape};
    use tessel_geom::{Rect, Vec2};

    fn region(id: u16) -> TextureRegion {
        TextureRegion::new(
            Texture::new(TextureId(id), 64, 64),
            Rect::new(Vec2::new(0.0, 0.0), Vec2::new(16.0, 16.0)),
        )
    }

    fn sample_map() -> TileMapData {
        let mut map = TileMapData::new(4, 3);
        let shape = TileShape::with_collider("grass", vec![region(0), region(1)], ColliderKind::Auto);
        map.add_tile_set(TileSet::new("terrain", vec![shape]));
        map
    }

    #[test]
    fn invalid_dimensions_are_clamped() {
        let map = TileMapData::new(0, -5);
        assert_eq!((map.width(), map.height()), (1, 1));
        assert!(map.has_tile(0, 0));
    }

    #[test]
    fn has_tile_includes_empty_cells() {
        let map = sample_map();
        assert!(map.has_tile(3, 2));
        assert!(!map.has_non_empty_tile(3, 2));
        assert!(!map.has_tile(4, 0));
        assert!(!map.has_tile(-1, 0));
    }

    #[test]
    fn resolves_sprite_flip_and_collider() {
        let mut map = sample_map();
        assert!(map.set_tile(1, 2, TileData::new(0, 0, 1, TileFlip::Vertical)));
        let t = map.get_tile(1, 2);
        assert_eq!(t.position, TilePoint::new(1, 2));
        assert_eq!(t.flip, TileFlip::Vertical);
        assert_eq!(t.region, Some(region(1)));
        assert_eq!(t.collider_points.len(), 4);
    }

    #[test]
    fn bad_indices_degrade_to_empty() {
        let mut map = sample_map();
        map.set_tile(0, 0, TileData::new(3, 0, 0, TileFlip::None));
        map.set_tile(1, 0, TileData::new(0, 9, 0, TileFlip::None));
        map.set_tile(2, 0, TileData::new(0, 0, 7, TileFlip::None));
        for x in 0..3 {
            let t = map.get_tile(x, 0);
            assert!(t.is_empty(), "tile {} should be empty", x);
            assert_eq!(t.position, TilePoint::new(x, 0));
        }
    }

    #[test]
    fn out_of_range_reads_and_writes_are_harmless() {
        let mut map = sample_map();
        assert!(!map.set_tile(10, 10, TileData::new(0, 0, 0, TileFlip::None)));
        assert!(map.get_tile(10, 10).is_empty());
        assert_eq!(map.tile_data(10, 10), None);
    }

    #[test]
    fn fill_is_clipped_to_map() {
        let mut map = sample_map();
        let written = map.fill(2, 1, 5, 5, TileData::new(0, 0, 0, TileFlip::None));
        assert_eq!(written.len(), 4);
        assert!(map.has_non_empty_tile(3, 2));
        assert!(!map.has_non_empty_tile(1, 1));
    }
}
