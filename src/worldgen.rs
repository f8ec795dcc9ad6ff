use fastnoise_lite::{FastNoiseLite, NoiseType};
use serde::Deserialize;

use tessel_geom::{Rect, Vec2, Vec3};
use tessel_tiles::{
    ColliderKind, LoadedMap, TextureCatalog, TextureRegion, TileData, TileFlip, TileMapData,
    TileSet, TileShape, TileSource,
};

/// Noise thresholds for the procedural island map, all on the [-1, 1] noise range.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct NoiseMapParams {
    pub frequency: f32,
    pub water_below: f32,
    pub sand_below: f32,
    pub stone_above: f32,
    /// Cells above this are left empty.
    pub void_above: f32,
    pub tile_size: f32,
}

impl Default for NoiseMapParams {
    fn default() -> Self {
        Self {
            frequency: 0.035,
            water_below: -0.30,
            sand_below: -0.18,
            stone_above: 0.45,
            void_above: 0.80,
            tile_size: 1.0,
        }
    }
}

const WATER: u8 = 0;
const SAND: u8 = 1;
const GRASS: u8 = 2;
const STONE: u8 = 3;

fn atlas_cell(catalog: &TextureCatalog, key: &str, col: u32, row: u32) -> Option<TextureRegion> {
    let texture = catalog.texture(key)?;
    let (x, y) = (col as f32 * 16.0, row as f32 * 16.0);
    Some(TextureRegion::new(
        texture,
        Rect::new(Vec2::new(x, y), Vec2::new(x + 16.0, y + 16.0)),
    ))
}

fn terrain_set(catalog: &TextureCatalog) -> TileSet {
    let sprites = |cells: &[(&str, u32, u32)]| -> Vec<TextureRegion> {
        cells
            .iter()
            .filter_map(|(key, c, r)| atlas_cell(catalog, key, *c, *r))
            .collect()
    };
    TileSet::new(
        "terrain",
        vec![
            TileShape::new("water", sprites(&[("water", 0, 0), ("water", 1, 0)])),
            TileShape::new("sand", sprites(&[("terrain", 0, 0)])),
            TileShape::new(
                "grass",
                sprites(&[("terrain", 1, 0), ("terrain", 2, 0), ("terrain", 3, 0)]),
            ),
            TileShape::with_collider("stone", sprites(&[("terrain", 0, 1)]), ColliderKind::Auto),
        ],
    )
}

/// Builds a `width` x `height` island map from simplex noise.
pub fn generate(width: i32, height: i32, seed: i32, params: &NoiseMapParams) -> LoadedMap {
    let mut textures = TextureCatalog::new();
    textures.insert("terrain", 64, 64);
    textures.insert("water", 32, 16);

    let mut data = TileMapData::new(width, height);
    let set = terrain_set(&textures);
    let set_index = data.add_tile_set(set).unwrap_or(0);

    let mut elevation = FastNoiseLite::with_seed(seed);
    elevation.set_noise_type(Some(NoiseType::OpenSimplex2));
    elevation.set_frequency(Some(params.frequency));
    let mut detail = FastNoiseLite::with_seed(seed ^ 51_853);
    detail.set_noise_type(Some(NoiseType::OpenSimplex2));
    detail.set_frequency(Some(params.frequency * 6.0));

    let mut counts = [0usize; 5];
    for y in 0..data.height() {
        for x in 0..data.width() {
            let e = elevation.get_noise_2d(x as f32, y as f32);
            let d = detail.get_noise_2d(x as f32, y as f32);
            let shape = if e > params.void_above {
                counts[4] += 1;
                continue;
            } else if e < params.water_below {
                WATER
            } else if e < params.sand_below {
                SAND
            } else if e > params.stone_above {
                STONE
            } else {
                GRASS
            };
            counts[shape as usize] += 1;
            let sprite = match shape {
                GRASS => ((d + 1.0) * 1.5).clamp(0.0, 2.0) as u8,
                WATER => u8::from(d > 0.0),
                _ => 0,
            };
            let flip = TileFlip::from_axes(d > 0.5, d < -0.5);
            data.set_tile(x, y, TileData::new(set_index, shape, sprite, flip));
        }
    }
    log::info!(
        "generated {}x{} map (seed {}): water={} sand={} grass={} stone={} empty={}",
        width,
        height,
        seed,
        counts[0],
        counts[1],
        counts[2],
        counts[3],
        counts[4]
    );

    LoadedMap {
        data,
        textures,
        position: Vec3::ZERO,
        tile_size: params.tile_size,
    }
}
