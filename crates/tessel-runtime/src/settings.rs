use std::error::Error;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tessel_mesh_cpu::{BuilderLimits, DEFAULT_MAX_BATCHES};

pub const DEFAULT_CHUNK_SIZE: i32 = 20;
pub const DEFAULT_FLUSH_THRESHOLD: usize = 50;

/// Renderer tunables. Missing TOML keys take their defaults.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RendererSettings {
    pub chunk_width: i32,
    pub chunk_height: i32,
    /// Cached chunk count above which the cache is flushed before a submission.
    pub flush_threshold: usize,
    /// Views (by name) that never receive tile map draws.
    pub view_blacklist: Vec<String>,
    pub max_batches: usize,
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            chunk_width: DEFAULT_CHUNK_SIZE,
            chunk_height: DEFAULT_CHUNK_SIZE,
            flush_threshold: DEFAULT_FLUSH_THRESHOLD,
            view_blacklist: vec!["PreRenderCamera".to_string()],
            max_batches: DEFAULT_MAX_BATCHES,
        }
    }
}

impl RendererSettings {
    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        let settings: RendererSettings = toml::from_str(toml_str)?;
        Ok(settings.sanitized())
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    /// Clamps every dimension to its minimum valid value, warning on each fix.
    pub fn sanitized(mut self) -> Self {
        if self.chunk_width < 1 {
            log::warn!("chunk width {} is invalid; clamping to 1", self.chunk_width);
            self.chunk_width = 1;
        }
        if self.chunk_height < 1 {
            log::warn!("chunk height {} is invalid; clamping to 1", self.chunk_height);
            self.chunk_height = 1;
        }
        if self.max_batches < 1 {
            log::warn!("max batches {} is invalid; clamping to 1", self.max_batches);
            self.max_batches = 1;
        }
        self
    }

    pub fn is_blacklisted(&self, view_name: &str) -> bool {
        self.view_blacklist.iter().any(|n| n == view_name)
    }

    pub fn builder_limits(&self) -> BuilderLimits {
        BuilderLimits::new(self.chunk_width.max(1) as usize, self.chunk_height.max(1) as usize)
            .with_max_batches(self.max_batches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let s = RendererSettings::default();
        assert_eq!((s.chunk_width, s.chunk_height), (20, 20));
        assert_eq!(s.flush_threshold, 50);
        assert!(s.is_blacklisted("PreRenderCamera"));
        assert!(!s.is_blacklisted("Main"));
        assert_eq!(s.builder_limits().max_batches, 30);
    }

    #[test]
    fn partial_toml_keeps_defaults_and_clamps() {
        let s = RendererSettings::from_toml_str(
            r#"
chunk_width = 0
flush_threshold = 8
view_blacklist = []
"#,
        )
        .unwrap();
        assert_eq!(s.chunk_width, 1);
        assert_eq!(s.chunk_height, 20);
        assert_eq!(s.flush_threshold, 8);
        assert!(!s.is_blacklisted("PreRenderCamera"));
    }
}
