//! Resource lookup for rule sets and variant tables.
//!
//! Filters never read files on their own. The chain assembler hands them a
//! [`ResourceLoader`], and whatever the loader returns for an id is parsed once
//! during construction.

use std::path::{Path, PathBuf};

use ahash::AHashMap;

use crate::error::{CjkAnalysisError, Result};

/// Opens named text resources.
pub trait ResourceLoader: Send + Sync {
    /// Return the full UTF-8 text of the resource named `id`.
    ///
    /// A missing or unreadable resource is a configuration error.
    fn open_resource(&self, id: &str) -> Result<String>;
}

/// Resolves resource ids as paths relative to a root directory.
#[derive(Debug, Clone)]
pub struct FsResourceLoader {
    root: PathBuf,
}

impl FsResourceLoader {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        FsResourceLoader {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ResourceLoader for FsResourceLoader {
    fn open_resource(&self, id: &str) -> Result<String> {
        let path = self.root.join(id.trim());
        log::debug!("loading resource '{}' from {}", id, path.display());
        std::fs::read_to_string(&path).map_err(|e| {
            CjkAnalysisError::configuration(format!(
                "failed to read resource '{}' ({}): {}",
                id,
                path.display(),
                e
            ))
        })
    }
}

/// Serves resources from memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryResourceLoader {
    resources: AHashMap<String, String>,
}

impl MemoryResourceLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource, replacing any previous one with the same id.
    pub fn with_resource<K: Into<String>, V: Into<String>>(mut self, id: K, text: V) -> Self {
        self.resources.insert(id.into(), text.into());
        self
    }
}

impl ResourceLoader for MemoryResourceLoader {
    fn open_resource(&self, id: &str) -> Result<String> {
        self.resources
            .get(id.trim())
            .cloned()
            .ok_or_else(|| CjkAnalysisError::configuration(format!("resource '{id}' not found")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_loader() {
        let loader = MemoryResourceLoader::new().with_resource("rules.txt", "a > b ;");
        assert_eq!(loader.open_resource("rules.txt").unwrap(), "a > b ;");
        assert_eq!(loader.open_resource(" rules.txt ").unwrap(), "a > b ;");
        assert!(loader.open_resource("missing.txt").unwrap_err().is_configuration());
    }

    #[test]
    fn test_fs_loader() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("variants.tsv"), "亜\t亞\n").unwrap();

        let loader = FsResourceLoader::new(dir.path());
        assert_eq!(loader.open_resource("variants.tsv").unwrap(), "亜\t亞\n");

        let err = loader.open_resource("nope.tsv").unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("nope.tsv"));
    }
}
