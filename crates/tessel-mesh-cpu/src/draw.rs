use tessel_geom::Transform;
use tessel_tiles::Texture;

use crate::mesh::MeshId;

/// Shared material the batch textures are bound to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MaterialId(pub u32);

/// One draw: a single batch of a chunk mesh with its texture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawCommand {
    pub mesh: MeshId,
    pub batch: usize,
    pub transform: Transform,
    pub texture: Texture,
    pub material: MaterialId,
}

/// Per-view command list, cleared and refilled on every submission.
#[derive(Clone, Debug, Default)]
pub struct DrawList {
    name: String,
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commands: Vec::new(),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Clears commands but retains capacity for reuse across frames.
    #[inline]
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    #[inline]
    pub fn push(&mut self, cmd: DrawCommand) {
        self.commands.push(cmd);
    }

    #[inline]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter()
    }
}
