use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tessel_geom::Vec2;

use crate::point::TilePoint;
use crate::texture::TextureRegion;

/// Flip state of a tile. Both its UVs and its collider polygon are mirrored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum TileFlip {
    #[default]
    None = 0x00,
    Horizontal = 0x01,
    Vertical = 0x02,
    Both = 0x03,
}

impl TileFlip {
    #[inline]
    pub fn flips_x(self) -> bool {
        (self as u8) & (TileFlip::Horizontal as u8) != 0
    }

    #[inline]
    pub fn flips_y(self) -> bool {
        (self as u8) & (TileFlip::Vertical as u8) != 0
    }

    #[inline]
    pub fn from_axes(flip_x: bool, flip_y: bool) -> Self {
        match (flip_x, flip_y) {
            (false, false) => TileFlip::None,
            (true, false) => TileFlip::Horizontal,
            (false, true) => TileFlip::Vertical,
            (true, true) => TileFlip::Both,
        }
    }
}

/// Runtime-resolved tile, produced on demand by a tile source.
#[derive(Clone, Debug, PartialEq)]
pub struct Tile {
    pub position: TilePoint,
    pub flip: TileFlip,
    /// `None` for an empty tile.
    pub region: Option<TextureRegion>,
    /// Polygon in normalized [0,1] tile-local space; may be empty.
    pub collider_points: Arc<[Vec2]>,
}

impl Tile {
    pub fn new(
        position: TilePoint,
        flip: TileFlip,
        region: Option<TextureRegion>,
        collider_points: Arc<[Vec2]>,
    ) -> Self {
        Self {
            position,
            flip,
            region,
            collider_points,
        }
    }

    /// The empty-tile sentinel: no texture region, no collider points.
    pub fn empty(position: TilePoint) -> Self {
        Self {
            position,
            flip: TileFlip::None,
            region: None,
            collider_points: Arc::from(Vec::new()),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.region.is_none()
    }

    /// Collider polygon mirrored by the flip state. Mirroring reverses the
    /// winding, so flipping on exactly one axis also reverses point order.
    pub fn flipped_collider_points(&self) -> Vec<Vec2> {
        let fx = self.flip.flips_x();
        let fy = self.flip.flips_y();
        let mut pts: Vec<Vec2> = self
            .collider_points
            .iter()
            .map(|p| {
                Vec2::new(
                    if fx { 1.0 - p.x } else { p.x },
                    if fy { 1.0 - p.y } else { p.y },
                )
            })
            .collect();
        if fx != fy {
            pts.reverse();
        }
        pts
    }
}
