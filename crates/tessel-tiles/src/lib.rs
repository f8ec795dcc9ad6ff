//! Tile, texture and tile-grid crate: the query side of the renderer.
#![forbid(unsafe_code)]

pub mod config;
pub mod data;
pub mod point;
pub mod source;
pub mod space;
pub mod texture;
pub mod tile;
pub mod tileset;

pub use config::{ConfigError, LoadedMap, MapConfig};
pub use data::{TileData, TileMapData};
pub use point::TilePoint;
pub use source::{TileMap, TileSource};
pub use space::MapSpace;
pub use texture::{Texture, TextureCatalog, TextureId, TextureRegion};
pub use tile::{Tile, TileFlip};
pub use tileset::{ColliderKind, TileSet, TileShape};
