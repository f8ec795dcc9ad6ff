use tessel_geom::{Rect, Vec3};

use crate::point::TilePoint;
use crate::space::MapSpace;
use crate::tile::Tile;

/// Read-only tile grid the renderer queries. Implementations own the
/// storage; the renderer never mutates it.
pub trait TileSource {
    fn width(&self) -> i32;
    fn height(&self) -> i32;
    fn has_tile(&self, x: i32, y: i32) -> bool;
    /// Returns the empty-tile sentinel for out-of-range or empty cells.
    fn get_tile(&self, x: i32, y: i32) -> Tile;
}

/// Query façade pairing a borrowed tile source with its world placement.
pub struct TileMap<'a, S: TileSource + ?Sized> {
    source: &'a S,
    space: MapSpace,
}

impl<'a, S: TileSource + ?Sized> TileMap<'a, S> {
    pub fn new(source: &'a S, position: Vec3, tile_size: f32) -> Self {
        let space = MapSpace::new(position, source.width(), source.height(), tile_size);
        Self { source, space }
    }

    #[inline]
    pub fn source(&self) -> &'a S {
        self.source
    }

    #[inline]
    pub fn space(&self) -> &MapSpace {
        &self.space
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.source.width()
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.source.height()
    }

    #[inline]
    pub fn tile_size(&self) -> f32 {
        self.space.tile_size()
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        self.space.center()
    }

    #[inline]
    pub fn has_tile(&self, x: i32, y: i32) -> bool {
        self.source.has_tile(x, y)
    }

    #[inline]
    pub fn has_tile_at(&self, p: TilePoint) -> bool {
        self.source.has_tile(p.x, p.y)
    }

    #[inline]
    pub fn get_tile(&self, x: i32, y: i32) -> Tile {
        self.source.get_tile(x, y)
    }

    #[inline]
    pub fn world_bounds(&self) -> Rect {
        self.space.world_bounds()
    }

    /// Tile containing a world-space position.
    pub fn get_tile_at_world(&self, world: Vec3) -> Tile {
        let p = self.space.to_tile_space(world);
        self.source.get_tile(p.x, p.y)
    }

    #[inline]
    pub fn to_tile_space(&self, world: Vec3) -> TilePoint {
        self.space.to_tile_space(world)
    }

    #[inline]
    pub fn to_world_space(&self, p: TilePoint) -> Vec3 {
        self.space.to_world_space(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::TileMapData;
    use tessel_geom::Vec2;

    #[test]
    fn facade_forwards_to_source() {
        let data = TileMapData::new(6, 4);
        let map = TileMap::new(&data, Vec3::new(3.0, 2.0, 0.0), 1.0);
        assert_eq!((map.width(), map.height()), (6, 4));
        assert_eq!(map.center(), Vec3::ZERO);
        assert!(map.has_tile(5, 3));
        assert!(!map.has_tile_at(TilePoint::new(6, 0)));
        let t = map.get_tile_at_world(Vec3::new(2.5, 1.5, 0.0));
        assert_eq!(t.position, TilePoint::new(2, 1));
        assert!(t.is_empty());

        let b = map.world_bounds();
        assert_eq!((b.min, b.max), (Vec2::ZERO, Vec2::new(6.0, 4.0)));
        assert!(b.contains(Vec2::new(3.0, 2.0)));
    }
}
