use crate::mesh::MeshId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MeshError {
    /// The mesh was drawn or rebuilt after `release()`. Always an ownership bug.
    Released(MeshId),
    /// A chunk needed more distinct textures than the builder has batches for.
    BatchLimitExceeded { limit: usize },
    /// More tiles were supplied than the builder's scratch arena holds.
    CapacityExceeded { tiles: usize, capacity: usize },
}

impl MeshError {
    /// Content/configuration problems the renderer recovers from by skipping
    /// the chunk, as opposed to lifecycle misuse.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, MeshError::Released(_))
    }
}

impl std::fmt::Display for MeshError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeshError::Released(id) => write!(f, "tile mesh {:?} used after release", id),
            MeshError::BatchLimitExceeded { limit } => {
                write!(f, "chunk uses more than {} distinct textures", limit)
            }
            MeshError::CapacityExceeded { tiles, capacity } => write!(
                f,
                "chunk supplied at least {} tiles but the builder holds {}",
                tiles, capacity
            ),
        }
    }
}

impl std::error::Error for MeshError {}
