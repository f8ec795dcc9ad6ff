use tessel_geom::{Rect, Vec2};

/// A render target the tile map submits draws to.
///
/// Views are identified by name: the blacklist and per-view draw lists are
/// keyed on it, so names must be unique among active views.
pub trait View {
    fn name(&self) -> &str;

    /// Axis-aligned world-space rectangle the view can see on the map plane.
    fn world_bounds(&self) -> Rect;
}

/// Orthographic camera looking down -Z at the map plane.
#[derive(Clone, Debug, PartialEq)]
pub struct OrthoView {
    name: String,
    center: Vec2,
    half_extents: Vec2,
}

impl OrthoView {
    pub fn new(name: impl Into<String>, center: Vec2, half_width: f32, half_height: f32) -> Self {
        Self {
            name: name.into(),
            center,
            half_extents: Vec2::new(half_width.abs(), half_height.abs()),
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn set_center(&mut self, center: Vec2) {
        self.center = center;
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.center = self.center + delta;
    }

    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        self.half_extents
    }
}

impl View for OrthoView {
    fn name(&self) -> &str {
        &self.name
    }

    fn world_bounds(&self) -> Rect {
        Rect::new(self.center - self.half_extents, self.center + self.half_extents)
    }
}
