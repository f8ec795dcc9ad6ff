use core::fmt;
use core::ops::{Add, Sub};

use serde::{Deserialize, Serialize};
use tessel_geom::Vec2;

/// Integer (x, y) position in tile space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TilePoint {
    pub x: i32,
    pub y: i32,
}

impl TilePoint {
    pub const ZERO: TilePoint = TilePoint { x: 0, y: 0 };

    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Origin of the `chunk_w` x `chunk_h` chunk containing this point.
    /// Floor division keeps negative coordinates in the chunk below them.
    /// Origins that would fall below `i32::MIN` saturate there.
    #[inline]
    pub fn chunk_origin(self, chunk_w: i32, chunk_h: i32) -> TilePoint {
        TilePoint {
            x: self.x.saturating_sub(self.x.rem_euclid(chunk_w)),
            y: self.y.saturating_sub(self.y.rem_euclid(chunk_h)),
        }
    }

    #[inline]
    pub fn as_vec2(self) -> Vec2 {
        Vec2::new(self.x as f32, self.y as f32)
    }
}

impl Add for TilePoint {
    type Output = TilePoint;
    #[inline]
    fn add(self, rhs: TilePoint) -> TilePoint {
        TilePoint::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for TilePoint {
    type Output = TilePoint;
    #[inline]
    fn sub(self, rhs: TilePoint) -> TilePoint {
        TilePoint::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl From<(i32, i32)> for TilePoint {
    fn from(value: (i32, i32)) -> Self {
        Self::new(value.0, value.1)
    }
}

impl From<TilePoint> for (i32, i32) {
    fn from(value: TilePoint) -> Self {
        (value.x, value.y)
    }
}

impl fmt::Display for TilePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_origin_uses_floor_division() {
        assert_eq!(TilePoint::new(25, 3).chunk_origin(20, 20), TilePoint::new(20, 0));
        assert_eq!(TilePoint::new(-1, -20).chunk_origin(20, 20), TilePoint::new(-20, -20));
        assert_eq!(TilePoint::new(-21, 19).chunk_origin(20, 20), TilePoint::new(-40, 0));
    }

    #[test]
    fn chunk_origin_saturates_at_the_bottom_of_the_range() {
        let p = TilePoint::new(i32::MIN, i32::MIN + 5);
        assert_eq!(p.chunk_origin(20, 20), TilePoint::new(i32::MIN, i32::MIN));
        let top = TilePoint::new(i32::MAX, i32::MAX);
        assert!(top.chunk_origin(20, 20).x <= i32::MAX);
    }

    #[test]
    fn display_matches_tuple_form() {
        assert_eq!(TilePoint::new(3, -4).to_string(), "(3, -4)");
    }
}
