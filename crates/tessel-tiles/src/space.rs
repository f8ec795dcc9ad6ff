//! Tile space <-> world space mapping for a uniform grid.

use tessel_geom::{Rect, Vec3};

use crate::point::TilePoint;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MapSpace {
    position: Vec3,
    width: i32,
    height: i32,
    tile_size: f32,
}

impl MapSpace {
    /// `position` is the map's anchor in world space; the grid is centered on
    /// it. A non-positive or non-finite `tile_size` is clamped to 1.
    pub fn new(position: Vec3, width: i32, height: i32, tile_size: f32) -> Self {
        let tile_size = if tile_size.is_finite() && tile_size > 0.0 {
            tile_size
        } else {
            log::warn!("tile size {} is invalid; clamping to 1.0", tile_size);
            1.0
        };
        Self {
            position,
            width: width.max(1),
            height: height.max(1),
            tile_size,
        }
    }

    #[inline]
    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// World position of tile (0, 0)'s bottom-left corner. Grid dimensions are
    /// halved with integer division.
    #[inline]
    pub fn center(&self) -> Vec3 {
        let x = (self.width / 2) as f32 * self.tile_size;
        let y = (self.height / 2) as f32 * self.tile_size;
        self.position - Vec3::new(x, y, 0.0)
    }

    /// Cell containing `world`. Cells are half-open, bounded by the corners
    /// `to_world_space` reports, so a corner maps back to its own tile.
    pub fn to_tile_space(&self, world: Vec3) -> TilePoint {
        let c = self.center();
        TilePoint::new(
            axis_floor(world.x, c.x, self.tile_size),
            axis_floor(world.y, c.y, self.tile_size),
        )
    }

    pub fn to_world_space(&self, p: TilePoint) -> Vec3 {
        let c = self.center();
        Vec3::new(
            axis_corner(p.x, c.x, self.tile_size),
            axis_corner(p.y, c.y, self.tile_size),
            c.z,
        )
    }

    /// World rectangle the whole grid covers on the map plane.
    pub fn world_bounds(&self) -> Rect {
        let far = self.to_world_space(TilePoint::new(self.width, self.height));
        Rect::from_corners(self.center().truncate(), far.truncate())
    }

    /// Draw translation for a chunk whose vertices are local to `origin`.
    #[inline]
    pub fn chunk_translation(&self, origin: TilePoint) -> Vec3 {
        self.to_world_space(origin)
    }
}

#[inline]
fn axis_corner(i: i32, origin: f32, tile_size: f32) -> f32 {
    i as f32 * tile_size + origin
}

/// Floors in f64, then settles the candidate against the f32 corners on
/// either side. The estimate is never off by more than one cell.
fn axis_floor(world: f32, origin: f32, tile_size: f32) -> i32 {
    let q = (f64::from(world) - f64::from(origin)) / f64::from(tile_size);
    let n = q.floor() as i32;
    if n < i32::MAX && axis_corner(n + 1, origin, tile_size) <= world {
        n + 1
    } else if n > i32::MIN && axis_corner(n, origin, tile_size) > world {
        n - 1
    } else {
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_uses_integer_halving() {
        let s = MapSpace::new(Vec3::new(10.0, 10.0, 2.0), 5, 4, 2.0);
        // 5/2 = 2 tiles, 4/2 = 2 tiles, each 2 units.
        assert_eq!(s.center(), Vec3::new(6.0, 6.0, 2.0));
    }

    #[test]
    fn points_inside_a_cell_map_to_it() {
        let s = MapSpace::new(Vec3::ZERO, 40, 40, 1.0);
        // center = (-20, -20)
        assert_eq!(s.to_tile_space(Vec3::new(-20.0, -20.0, 0.0)), TilePoint::new(0, 0));
        assert_eq!(s.to_tile_space(Vec3::new(-19.5, -19.01, 0.0)), TilePoint::new(0, 0));
        assert_eq!(s.to_tile_space(Vec3::new(-20.5, -20.5, 0.0)), TilePoint::new(-1, -1));
    }

    #[test]
    fn points_near_a_cell_edge_stay_floored() {
        let s = MapSpace::new(Vec3::ZERO, 2, 2, 1.0);
        // center = (-1, -1)
        assert_eq!(s.to_tile_space(Vec3::new(-0.0005, -0.5, 0.0)), TilePoint::new(0, 0));
        assert_eq!(s.to_tile_space(Vec3::new(-1.0005, -0.5, 0.0)), TilePoint::new(-1, 0));
        assert_eq!(s.to_tile_space(Vec3::new(0.0, -1.0, 0.0)), TilePoint::new(1, 0));
        let below = f32::from_bits(1.0f32.to_bits() - 1);
        assert_eq!(s.to_tile_space(Vec3::new(below - 1.0, -0.5, 0.0)), TilePoint::new(0, 0));
    }

    #[test]
    fn invalid_tile_size_is_clamped() {
        assert_eq!(MapSpace::new(Vec3::ZERO, 1, 1, 0.0).tile_size(), 1.0);
        assert_eq!(MapSpace::new(Vec3::ZERO, 1, 1, -3.0).tile_size(), 1.0);
        assert_eq!(MapSpace::new(Vec3::ZERO, 1, 1, f32::NAN).tile_size(), 1.0);
    }
}
