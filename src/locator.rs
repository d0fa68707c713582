use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::backend::AssetLocator;
use crate::config::AssetConfig;

/// Looks assets up by file name under a list of root directories.
#[derive(Debug, Clone)]
pub struct DirLocator {
    roots: Vec<PathBuf>,
    recursive: bool,
}

impl DirLocator {
    /// Searches `roots` in order, descending into sub-directories when `recursive`.
    pub fn new(roots: Vec<PathBuf>, recursive: bool) -> Self {
        Self { roots, recursive }
    }

    /// Locator for the roots named in `config`.
    pub fn from_config(config: &AssetConfig) -> Self {
        Self::new(config.roots.clone(), config.recursive)
    }

    fn search_root(&self, root: &Path, logical_name: &str) -> Option<PathBuf> {
        let direct = root.join(logical_name);
        if direct.is_file() {
            return Some(direct);
        }
        if !self.recursive {
            return None;
        }

        let bare = Path::new(logical_name).file_name()?;
        WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .find(|e| e.file_type().is_file() && e.file_name() == bare)
            .map(|e| e.into_path())
    }
}

impl AssetLocator for DirLocator {
    fn find_path(&self, logical_name: &str) -> Option<PathBuf> {
        self.roots
            .iter()
            .find_map(|root| self.search_root(root, logical_name))
    }
}
