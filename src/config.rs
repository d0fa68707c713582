use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Texture sampling applied to tileset images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextureFilter {
    /// Pixel art friendly; the default
    #[default]
    Nearest,
    /// Bilinear
    Linear,
}

/// Where assets live and how textures are sampled.
///
/// ```json
/// { "roots": ["res", "mods/res"], "recursive": true, "filter": "nearest" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AssetConfig {
    /// Directories searched in order
    #[serde(default = "default_roots")]
    pub roots: Vec<PathBuf>,
    /// Also search sub-directories of each root
    #[serde(default = "default_true")]
    pub recursive: bool,
    /// Filter for tileset textures
    #[serde(default)]
    pub filter: TextureFilter,
}

fn default_roots() -> Vec<PathBuf> {
    vec![PathBuf::from("res")]
}
fn default_true() -> bool {
    true
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            roots: default_roots(),
            recursive: true,
            filter: TextureFilter::default(),
        }
    }
}

impl AssetConfig {
    /// Parses a JSON config; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("Parsing asset config")
    }

    /// Reads and parses a JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let txt = std::fs::read_to_string(path)
            .with_context(|| format!("Reading asset config {}", path.display()))?;
        Self::from_json_str(&txt).with_context(|| format!("In asset config {}", path.display()))
    }
}
