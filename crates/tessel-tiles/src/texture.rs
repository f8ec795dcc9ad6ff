use std::collections::HashMap;
use std::path::PathBuf;

use serde::Deserialize;
use tessel_geom::Rect;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u16);

/// Handle to a texture resource. Batching compares textures by `id` only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Texture {
    pub id: TextureId,
    pub width: u32,
    pub height: u32,
}

impl Texture {
    #[inline]
    pub const fn new(id: TextureId, width: u32, height: u32) -> Self {
        Self { id, width, height }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Pixel-space rectangle on a texture, used to render one tile variant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextureRegion {
    pub texture: Texture,
    pub rect: Rect,
}

impl TextureRegion {
    #[inline]
    pub const fn new(texture: Texture, rect: Rect) -> Self {
        Self { texture, rect }
    }
}

#[derive(Clone, Debug)]
pub struct TextureEntry {
    pub id: TextureId,
    pub key: String,
    pub path: Option<PathBuf>,
    pub texture: Texture,
}

#[derive(Default, Clone, Debug)]
pub struct TextureCatalog {
    pub textures: Vec<TextureEntry>,
    pub by_key: HashMap<String, TextureId>,
}

impl TextureCatalog {
    pub fn new() -> Self {
        Self {
            textures: Vec::new(),
            by_key: HashMap::new(),
        }
    }

    pub fn get_id(&self, key: &str) -> Option<TextureId> {
        self.by_key.get(key).copied()
    }

    pub fn get(&self, id: TextureId) -> Option<&TextureEntry> {
        self.textures.get(id.0 as usize)
    }

    pub fn texture(&self, key: &str) -> Option<Texture> {
        self.get_id(key)
            .and_then(|id| self.get(id))
            .map(|e| e.texture)
    }

    /// Registers a texture under `key`, replacing the size of an existing entry.
    pub fn insert(&mut self, key: &str, width: u32, height: u32) -> Texture {
        if let Some(id) = self.get_id(key) {
            let entry = &mut self.textures[id.0 as usize];
            entry.texture.width = width;
            entry.texture.height = height;
            return entry.texture;
        }
        let id = TextureId(self.textures.len() as u16);
        let texture = Texture::new(id, width, height);
        self.by_key.insert(key.to_string(), id);
        self.textures.push(TextureEntry {
            id,
            key: key.to_string(),
            path: None,
            texture,
        });
        texture
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Builds a catalog from the `[textures]` table of a map description.
    pub fn from_defs(defs: &HashMap<String, TextureDef>) -> Self {
        let mut catalog = TextureCatalog::new();
        let mut keys: Vec<&String> = defs.keys().collect();
        // HashMap iteration order is nondeterministic; sort keys so TextureId assignment is stable.
        keys.sort();
        for key in keys {
            let def = &defs[key];
            if def.width == 0 || def.height == 0 {
                log::warn!(
                    "texture '{}' has invalid size {}x{}; tiles using it will render empty",
                    key,
                    def.width,
                    def.height
                );
            }
            let texture = catalog.insert(key, def.width, def.height);
            catalog.textures[texture.id.0 as usize].path = def.path.as_ref().map(PathBuf::from);
        }
        catalog
    }
}

// --- Config ---

#[derive(Deserialize, Debug, Clone)]
pub struct TextureDef {
    pub path: Option<String>,
    pub width: u32,
    pub height: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_assigned_in_key_order() {
        let src = r#"
            [water]
            width = 64
            height = 64

            [grass]
            path = "tiles/grass.png"
            width = 128
            height = 32
        "#;
        let defs: HashMap<String, TextureDef> = toml::from_str(src).unwrap();
        let cat = TextureCatalog::from_defs(&defs);
        assert_eq!(cat.len(), 2);
        assert_eq!(cat.get_id("grass"), Some(TextureId(0)));
        assert_eq!(cat.get_id("water"), Some(TextureId(1)));
        let grass = cat.texture("grass").unwrap();
        assert_eq!((grass.width, grass.height), (128, 32));
        assert_eq!(
            cat.get(TextureId(0)).and_then(|e| e.path.clone()),
            Some(PathBuf::from("tiles/grass.png"))
        );
    }

    #[test]
    fn insert_reuses_existing_key() {
        let mut cat = TextureCatalog::new();
        let a = cat.insert("a", 16, 16);
        let again = cat.insert("a", 32, 32);
        assert_eq!(a.id, again.id);
        assert_eq!(cat.len(), 1);
        assert_eq!(cat.texture("a").map(|t| t.width), Some(32));
    }
}
