use crate::error::{LsmsError, Result};
use crate::models::Tree;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// File-backed tree inventory: a single JSON array.
///
/// Only `Tree` is written, so explanation details never reach disk.
#[derive(Debug, Clone)]
pub struct TreeStore {
    path: PathBuf,
}

impl TreeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file is an empty inventory. Tree ids must be unique.
    pub fn load(&self) -> Result<Vec<Tree>> {
        if !self.path.exists() {
            tracing::info!("No inventory at {:?}, starting empty", self.path);
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let trees: Vec<Tree> = serde_json::from_str(&content).map_err(|e| {
            LsmsError::InvalidData(format!("Failed to parse {:?}: {}", self.path, e))
        })?;

        let mut seen = HashSet::new();
        if let Some(dup) = trees.iter().find(|t| !seen.insert(t.id.as_str())) {
            return Err(LsmsError::InvalidData(format!(
                "Duplicate tree id {:?} in {:?}",
                dup.id, self.path
            )));
        }

        tracing::debug!("Loaded {} trees from {:?}", trees.len(), self.path);
        Ok(trees)
    }

    /// Write the inventory and return how many trees were saved.
    ///
    /// The file is written beside the target and renamed into place.
    pub fn save(&self, trees: &[Tree]) -> Result<usize> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(trees)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;

        tracing::info!("Saved {} trees to {:?}", trees.len(), self.path);
        Ok(trees.len())
    }
}
