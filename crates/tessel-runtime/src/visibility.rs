use std::iter::FusedIterator;

use tessel_geom::Rect;
use tessel_tiles::{TileMap, TilePoint, TileSource};

/// Chunk origins overlapping a world rectangle, row-major, restricted to the
/// map and to origins the source reports a tile at. Clone to restart.
pub struct VisibleChunks<'m, 'a, S: TileSource + ?Sized> {
    map: &'m TileMap<'a, S>,
    chunk_w: i32,
    chunk_h: i32,
    x0: i32,
    x1: i32,
    y1: i32,
    // `None` once exhausted
    next: Option<TilePoint>,
}

impl<'m, 'a, S: TileSource + ?Sized> VisibleChunks<'m, 'a, S> {
    pub fn new(map: &'m TileMap<'a, S>, bounds: Rect, chunk_w: i32, chunk_h: i32) -> Self {
        let (cw, ch) = (chunk_w.max(1), chunk_h.max(1));
        let z = map.center().z;
        let lo = map.to_tile_space(bounds.min.extend(z)).chunk_origin(cw, ch);
        let hi = map.to_tile_space(bounds.max.extend(z)).chunk_origin(cw, ch);

        let last = TilePoint::new(map.width() - 1, map.height() - 1).chunk_origin(cw, ch);
        let x0 = lo.x.max(0);
        let y0 = lo.y.max(0);
        let x1 = hi.x.min(last.x);
        let y1 = hi.y.min(last.y);

        let next = (x0 <= x1 && y0 <= y1).then(|| TilePoint::new(x0, y0));
        Self {
            map,
            chunk_w: cw,
            chunk_h: ch,
            x0,
            x1,
            y1,
            next,
        }
    }

    fn advance(&mut self, p: TilePoint) {
        self.next = if p.x < self.x1 {
            Some(TilePoint::new(p.x + self.chunk_w, p.y))
        } else if p.y < self.y1 {
            Some(TilePoint::new(self.x0, p.y + self.chunk_h))
        } else {
            None
        };
    }
}

impl<S: TileSource + ?Sized> Clone for VisibleChunks<'_, '_, S> {
    fn clone(&self) -> Self {
        Self {
            map: self.map,
            chunk_w: self.chunk_w,
            chunk_h: self.chunk_h,
            x0: self.x0,
            x1: self.x1,
            y1: self.y1,
            next: self.next,
        }
    }
}

impl<S: TileSource + ?Sized> Iterator for VisibleChunks<'_, '_, S> {
    type Item = TilePoint;

    fn next(&mut self) -> Option<TilePoint> {
        while let Some(p) = self.next {
            self.advance(p);
            if self.map.has_tile_at(p) {
                return Some(p);
            }
        }
        None
    }
}

impl<S: TileSource + ?Sized> FusedIterator for VisibleChunks<'_, '_, S> {}
