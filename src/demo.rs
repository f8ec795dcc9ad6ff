use std::error::Error;
use std::fs;
use std::path::Path;

use hashbrown::HashSet;
use serde::Deserialize;

use tessel_geom::Vec2;
use tessel_runtime::{OrthoView, RendererSettings, SubmitStats, TileMapRenderer, View};
use tessel_tiles::{LoadedMap, TileData, TileFlip, TileMap, TilePoint};

use crate::worldgen::NoiseMapParams;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub renderer: RendererSettings,
    pub demo: DemoSettings,
    pub noise: NoiseMapParams,
}

impl DemoConfig {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        let mut cfg: DemoConfig = toml::from_str(&s)?;
        cfg.renderer = cfg.renderer.sanitized();
        Ok(cfg)
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct DemoSettings {
    pub frames: u32,
    /// World units the main camera pans per frame.
    pub pan: [f32; 2],
    pub view_half_extent: f32,
    pub edits_per_frame: u32,
    pub paint_tile_set: i8,
    pub paint_shape: u8,
    /// Log a frame summary every N frames.
    pub report_every: u32,
}

impl Default for DemoSettings {
    fn default() -> Self {
        Self {
            frames: 240,
            pan: [0.6, 0.25],
            view_half_extent: 24.0,
            edits_per_frame: 3,
            paint_tile_set: 0,
            paint_shape: 3,
            report_every: 30,
        }
    }
}

#[derive(Default)]
struct Totals {
    chunks: usize,
    draws: usize,
    skipped: usize,
    flushes: usize,
    rebuilt: usize,
}

impl Totals {
    fn add(&mut self, s: SubmitStats) {
        self.chunks += s.chunks;
        self.draws += s.draws;
        self.skipped += s.skipped;
        self.flushes += usize::from(s.flushed);
    }
}

/// Edit positions scattered around `center`, different every frame.
fn edit_points(center: TilePoint, frame: u32, count: u32) -> impl Iterator<Item = TilePoint> {
    (0..count).map(move |i| {
        let k = (frame.wrapping_mul(7).wrapping_add(i.wrapping_mul(13)) % 100_000) as i32;
        center + TilePoint::new(k.rem_euclid(17) - 8, (k / 3).rem_euclid(17) - 8)
    })
}

/// Drives the renderer like a host frame loop: pan a camera, paint tiles
/// under it, rebuild the touched chunks and submit every view.
pub fn run(map: &mut LoadedMap, cfg: &DemoConfig) -> Result<(), Box<dyn Error>> {
    let settings = &cfg.demo;
    let mut renderer = TileMapRenderer::new(cfg.renderer.clone());

    let bounds = TileMap::new(&map.data, map.position, map.tile_size).world_bounds();
    let he = settings.view_half_extent;
    let start = bounds.min + Vec2::new(he, he);
    let mut main = OrthoView::new("Main", start, he, he);
    let overview = OrthoView::new(
        "Overview",
        bounds.center(),
        bounds.width() / 2.0,
        bounds.height() / 2.0,
    );
    let prerender = OrthoView::new("PreRenderCamera", main.center(), he, he);

    let paint_enabled = (settings.paint_tile_set as usize) < map.data.tile_sets().len();
    if !paint_enabled {
        log::warn!(
            "paint tile set {} does not exist; edits are disabled",
            settings.paint_tile_set
        );
    }

    let mut totals = Totals::default();
    for frame in 0..settings.frames {
        main.translate(Vec2::new(settings.pan[0], settings.pan[1]));
        if !bounds.contains(main.center()) {
            main.set_center(start);
        }

        let mut edited = HashSet::new();
        if paint_enabled {
            let under = TileMap::new(&map.data, map.position, map.tile_size)
                .to_tile_space(main.center().extend(0.0));
            let flip = if frame % 2 == 0 { TileFlip::Horizontal } else { TileFlip::None };
            let paint = TileData::new(settings.paint_tile_set, settings.paint_shape, 0, flip);
            for p in edit_points(under, frame, settings.edits_per_frame) {
                if map.data.set_tile(p.x, p.y, paint) {
                    edited.insert(p);
                }
            }
        }

        let tiles = TileMap::new(&map.data, map.position, map.tile_size);
        totals.rebuilt += renderer.rebuild_chunks(&tiles, edited.iter().copied())?;
        for view in [&main as &dyn View, &overview, &prerender] {
            let stats = renderer.submit(&tiles, view)?;
            totals.add(stats);
            if settings.report_every > 0 && frame % settings.report_every == 0 {
                log::info!(
                    target: "frame",
                    "frame {} view '{}': {} chunks, {} draws, {} skipped{}",
                    frame,
                    view.name(),
                    stats.chunks,
                    stats.draws,
                    stats.skipped,
                    if stats.flushed { " (flushed)" } else { "" }
                );
            }
        }
    }

    if let Some(list) = renderer.draw_list("Main") {
        let textures: HashSet<_> = list.iter().map(|c| c.texture.id).collect();
        log::info!(
            "last '{}' list: {} commands over {} textures",
            list.name(),
            list.len(),
            textures.len()
        );
    }
    let s = renderer.stats();
    log::info!(
        "{} frames: {} chunk draws, {} commands, {} skipped, {} edits rebuilt, {} flushes",
        settings.frames,
        totals.chunks,
        totals.draws,
        totals.skipped,
        totals.rebuilt,
        totals.flushes
    );
    log::info!(
        "chunk cache: hits={} misses={} builds={} rebuilds={} evictions={} entries={}",
        s.hits,
        s.misses,
        s.builds,
        s.rebuilds,
        s.evictions,
        s.entries
    );
    Ok(())
}
