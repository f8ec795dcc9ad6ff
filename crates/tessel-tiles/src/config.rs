//! TOML map description: textures, tile sets and rectangular fills.

use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tessel_geom::{Rect, Vec2, Vec3};

use crate::data::{TileData, TileMapData};
use crate::texture::{TextureCatalog, TextureDef, TextureRegion};
use crate::tile::TileFlip;
use crate::tileset::{ColliderKind, TileSet, TileShape};

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    UnknownTexture { shape: String, texture: String },
    TooManyTileSets(usize),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::UnknownTexture { shape, texture } => {
                write!(f, "shape '{}' references unknown texture '{}'", shape, texture)
            }
            ConfigError::TooManyTileSets(n) => {
                write!(f, "map declares {} tile sets; at most {} are addressable", n, i8::MAX as usize + 1)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

fn default_tile_size() -> f32 {
    1.0
}

#[derive(Deserialize, Debug, Clone)]
pub struct MapConfig {
    pub width: i32,
    pub height: i32,
    #[serde(default = "default_tile_size")]
    pub tile_size: f32,
    #[serde(default)]
    pub position: [f32; 3],
    #[serde(default)]
    pub textures: HashMap<String, TextureDef>,
    #[serde(default)]
    pub tile_sets: Vec<TileSetDef>,
    #[serde(default)]
    pub fills: Vec<FillDef>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct TileSetDef {
    pub name: String,
    #[serde(default)]
    pub shapes: Vec<ShapeDef>,
}

#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColliderDef {
    #[default]
    None,
    Auto,
    Custom,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ShapeDef {
    pub name: String,
    #[serde(default)]
    pub sprites: Vec<SpriteDef>,
    #[serde(default)]
    pub collider: ColliderDef,
    #[serde(default)]
    pub collider_points: Vec<[f32; 2]>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct SpriteDef {
    pub texture: String,
    /// `[x, y, width, height]` in pixels.
    pub rect: [f32; 4],
}

#[derive(Deserialize, Debug, Clone)]
pub struct FillDef {
    pub tile_set: i8,
    #[serde(default)]
    pub shape: u8,
    #[serde(default)]
    pub sprite: u8,
    #[serde(default)]
    pub flip: TileFlip,
    /// `[x, y, width, height]` in tiles.
    pub rect: [i32; 4],
}

/// A fully resolved map ready to hand to the renderer.
#[derive(Debug, Clone)]
pub struct LoadedMap {
    pub data: TileMapData,
    pub textures: TextureCatalog,
    pub position: Vec3,
    pub tile_size: f32,
}

impl MapConfig {
    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        Ok(toml::from_str(toml_str)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    pub fn build(&self) -> Result<LoadedMap, ConfigError> {
        if self.tile_sets.len() > i8::MAX as usize + 1 {
            return Err(ConfigError::TooManyTileSets(self.tile_sets.len()));
        }
        let textures = TextureCatalog::from_defs(&self.textures);

        let mut data = TileMapData::new(self.width, self.height);
        for set_def in &self.tile_sets {
            let mut shapes = Vec::with_capacity(set_def.shapes.len());
            for shape_def in &set_def.shapes {
                shapes.push(build_shape(shape_def, &textures)?);
            }
            data.add_tile_set(TileSet::new(set_def.name.clone(), shapes));
        }
        for fill in &self.fills {
            let [x, y, w, h] = fill.rect;
            let td = TileData::new(fill.tile_set, fill.shape, fill.sprite, fill.flip);
            data.fill(x, y, w, h, td);
        }

        let [px, py, pz] = self.position;
        Ok(LoadedMap {
            data,
            textures,
            position: Vec3::new(px, py, pz),
            tile_size: self.tile_size,
        })
    }
}

fn build_shape(def: &ShapeDef, textures: &TextureCatalog) -> Result<TileShape, ConfigError> {
    let mut sprites = Vec::with_capacity(def.sprites.len());
    for s in &def.sprites {
        let texture = textures
            .texture(&s.texture)
            .ok_or_else(|| ConfigError::UnknownTexture {
                shape: def.name.clone(),
                texture: s.texture.clone(),
            })?;
        let [x, y, w, h] = s.rect;
        sprites.push(TextureRegion::new(
            texture,
            Rect::new(Vec2::new(x, y), Vec2::new(x + w, y + h)),
        ));
    }
    let collider = match def.collider {
        ColliderDef::None => ColliderKind::None,
        ColliderDef::Auto => ColliderKind::Auto,
        ColliderDef::Custom => ColliderKind::Custom(
            def.collider_points
                .iter()
                .map(|[x, y]| Vec2::new(*x, *y))
                .collect(),
        ),
    };
    Ok(TileShape::with_collider(def.name.clone(), sprites, collider))
}
