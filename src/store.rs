#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::{error::AdminResult, model::SiteRegistry};

/// A site registry persisted as a JSON file.
#[derive(Debug, Clone)]
pub struct SiteStore {
    /// File holding the registry.
    path:         PathBuf,
    /// Default site of a registry created from scratch.
    default_site: String,
}

impl SiteStore {
    /// Store at `path`; a missing file loads as an empty registry whose
    /// default site is `default_site`.
    pub fn new(path: impl Into<PathBuf>, default_site: impl Into<String>) -> Self {
        Self {
            path:         path.into(),
            default_site: default_site.into(),
        }
    }

    /// File holding the registry.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the registry.
    pub fn load(&self) -> AdminResult<SiteRegistry> {
        if !self.path.exists() {
            debug!("{} does not exist; starting empty", self.path.display());
            return Ok(SiteRegistry::new(self.default_site.clone()));
        }
        let bytes = fs::read(&self.path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Writes `registry`, replacing the file atomically.
    pub fn save(&self, registry: &SiteRegistry) -> AdminResult<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut tmp, registry)?;
        tmp.flush()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        debug!("Saved site registry to {}", self.path.display());
        Ok(())
    }
}
