use std::sync::Arc;

use tessel_geom::Vec2;

use crate::texture::TextureRegion;

/// How a shape's collider polygon is produced.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum ColliderKind {
    #[default]
    None,
    /// Unit square covering the whole tile.
    Auto,
    /// User polygon in normalized tile space (at least 3 points).
    Custom(Vec<Vec2>),
}

/// One logical tile: its sprite variants and its collision polygon.
#[derive(Clone, Debug)]
pub struct TileShape {
    pub name: String,
    pub sprites: Vec<TextureRegion>,
    collider: ColliderKind,
    collider_points: Arc<[Vec2]>,
}

impl TileShape {
    pub fn new(name: impl Into<String>, sprites: Vec<TextureRegion>) -> Self {
        Self::with_collider(name, sprites, ColliderKind::None)
    }

    pub fn with_collider(
        name: impl Into<String>,
        sprites: Vec<TextureRegion>,
        collider: ColliderKind,
    ) -> Self {
        let name = name.into();
        let points: Vec<Vec2> = match &collider {
            ColliderKind::None => Vec::new(),
            ColliderKind::Auto => vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(1.0, 0.0),
                Vec2::new(1.0, 1.0),
                Vec2::new(0.0, 1.0),
            ],
            ColliderKind::Custom(pts) => {
                if pts.len() < 3 {
                    log::warn!(
                        "shape '{}' has a custom collider with {} point(s); ignoring it",
                        name,
                        pts.len()
                    );
                    Vec::new()
                } else {
                    pts.clone()
                }
            }
        };
        Self {
            name,
            sprites,
            collider,
            collider_points: Arc::from(points),
        }
    }

    #[inline]
    pub fn collider(&self) -> &ColliderKind {
        &self.collider
    }

    /// Shared collider polygon; cloning the `Arc` is how tiles reference it.
    #[inline]
    pub fn collider_points(&self) -> &Arc<[Vec2]> {
        &self.collider_points
    }
}

#[derive(Clone, Debug, Default)]
pub struct TileSet {
    pub name: String,
    pub shapes: Vec<TileShape>,
}

impl TileSet {
    pub fn new(name: impl Into<String>, shapes: Vec<TileShape>) -> Self {
        Self {
            name: name.into(),
            shapes,
        }
    }
}
