//! Chunk cache and per-view submission for tile map rendering.
#![forbid(unsafe_code)]

mod cache;
mod renderer;
mod settings;
mod view;
mod visibility;

pub use cache::{ChunkCache, ChunkCacheStats};
pub use renderer::{SubmitStats, TileMapRenderer};
pub use settings::{DEFAULT_CHUNK_SIZE, DEFAULT_FLUSH_THRESHOLD, RendererSettings};
pub use view::{OrthoView, View};
pub use visibility::VisibleChunks;
