//! CPU tile meshing: chunk mesh builder, mesh resources and draw lists.
#![forbid(unsafe_code)]

pub mod builder;
pub mod draw;
pub mod error;
pub mod mesh;

pub use builder::{BuilderLimits, DEFAULT_MAX_BATCHES, TileMeshBuilder};
pub use draw::{DrawCommand, DrawList, MaterialId};
pub use error::MeshError;
pub use mesh::{MeshId, TileMesh};
