#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{
    fs,
    ops::{Deref, DerefMut},
    path::{Component, Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use tempfile::TempDir;
use tracing::warn;

use crate::constants::EXPORT_TMP_PREFIX;

/// A staging area that import and export utilities read from and write to.
///
/// Files are addressed by name inside an optional *bucket*, a relative
/// sub-directory such as `Lessons` or `Sections/001`.
pub trait Filer {
    /// Directory backing this filer.
    fn root(&self) -> &Path;

    /// Acquires the staging area.
    fn prepare(&mut self) -> Result<()>;

    /// Releases the staging area and everything in it.
    fn reset(&mut self) -> Result<()>;

    /// Writes `data` as `name` inside `bucket`, returning the written path.
    fn save(&mut self, name: &str, data: &[u8], bucket: Option<&str>) -> Result<PathBuf>;

    /// Reads `name` from `bucket`, or `None` when it does not exist.
    fn get(&self, name: &str, bucket: Option<&str>) -> Result<Option<Vec<u8>>>;

    /// Names of the files and buckets directly inside `bucket`, sorted.
    fn list(&self, bucket: Option<&str>) -> Result<Vec<String>>;

    /// Whether `name` exists inside `bucket`.
    fn contains(&self, name: &str, bucket: Option<&str>) -> bool {
        self.bucket_path(bucket).join(name).exists()
    }

    /// Whether `name` is itself a bucket.
    fn is_bucket(&self, name: &str) -> bool {
        self.root().join(name).is_dir()
    }

    /// Filesystem path of `bucket`.
    fn bucket_path(&self, bucket: Option<&str>) -> PathBuf {
        match bucket {
            Some(b) => self.root().join(b),
            None => self.root().to_path_buf(),
        }
    }
}

/// Rejects names that would escape the filer root.
fn check_relative(name: &str) -> Result<()> {
    let path = Path::new(name);
    if name.is_empty()
        || path
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
    {
        bail!("Refusing to use `{name}` as a filer path");
    }
    Ok(())
}

/// A [`Filer`] over a plain directory.
#[derive(Debug)]
pub struct DirectoryFiler {
    /// Directory backing the filer.
    root:    PathBuf,
    /// Owned temporary directory, when the filer created its own root.
    staging: Option<TempDir>,
}

impl DirectoryFiler {
    /// Filer over an existing (or to-be-created) directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root:    root.into(),
            staging: None,
        }
    }

    /// Filer over a fresh temporary directory, created under `temp_root` when
    /// given. The directory is removed by [`Filer::reset`] or on drop.
    pub fn temporary(temp_root: Option<&Path>) -> Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(EXPORT_TMP_PREFIX);
        let staging = match temp_root {
            Some(dir) => builder.tempdir_in(dir),
            None => builder.tempdir(),
        }
        .context("Could not create a staging directory")?;

        Ok(Self {
            root:    staging.path().to_path_buf(),
            staging: Some(staging),
        })
    }
}

impl Filer for DirectoryFiler {
    fn root(&self) -> &Path {
        &self.root
    }

    fn prepare(&mut self) -> Result<()> {
        fs::create_dir_all(&self.root)
            .with_context(|| format!("Could not create {}", self.root.display()))
    }

    fn reset(&mut self) -> Result<()> {
        if let Some(staging) = self.staging.take() {
            return staging
                .close()
                .with_context(|| format!("Could not delete {}", self.root.display()));
        }
        if self.root.exists() {
            fs::remove_dir_all(&self.root)
                .with_context(|| format!("Could not delete {}", self.root.display()))?;
        }
        Ok(())
    }

    fn save(&mut self, name: &str, data: &[u8], bucket: Option<&str>) -> Result<PathBuf> {
        check_relative(name)?;
        if let Some(b) = bucket {
            check_relative(b)?;
        }
        let dir = self.bucket_path(bucket);
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Could not create {}", parent.display()))?;
        }
        fs::write(&path, data).with_context(|| format!("Could not write {}", path.display()))?;
        Ok(path)
    }

    fn get(&self, name: &str, bucket: Option<&str>) -> Result<Option<Vec<u8>>> {
        check_relative(name)?;
        let path = self.bucket_path(bucket).join(name);
        if !path.is_file() {
            return Ok(None);
        }
        fs::read(&path)
            .map(Some)
            .with_context(|| format!("Could not read {}", path.display()))
    }

    fn list(&self, bucket: Option<&str>) -> Result<Vec<String>> {
        let dir = self.bucket_path(bucket);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(&dir).with_context(|| format!("Could not list {}", dir.display()))?
        {
            let entry = entry?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }
}

/// Keeps a filer prepared for as long as the guard lives and resets it on
/// drop, whichever way the enclosing scope is left.
pub struct FilerGuard<'a, F: Filer + ?Sized> {
    /// The prepared filer.
    filer: &'a mut F,
}

impl<'a, F: Filer + ?Sized> FilerGuard<'a, F> {
    /// Prepares `filer` and wraps it.
    pub fn prepare(filer: &'a mut F) -> Result<Self> {
        filer.prepare()?;
        Ok(Self { filer })
    }
}

impl<F: Filer + ?Sized> Deref for FilerGuard<'_, F> {
    type Target = F;

    fn deref(&self) -> &Self::Target {
        self.filer
    }
}

impl<F: Filer + ?Sized> DerefMut for FilerGuard<'_, F> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.filer
    }
}

impl<F: Filer + ?Sized> Drop for FilerGuard<'_, F> {
    fn drop(&mut self) {
        if let Err(e) = self.filer.reset() {
            warn!("Could not reset filer at {}: {e:#}", self.filer.root().display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_resets_temporary_filer_on_drop() {
        let mut filer = DirectoryFiler::temporary(None).unwrap();
        let root = filer.root().to_path_buf();
        {
            let mut guard = FilerGuard::prepare(&mut filer).unwrap();
            guard.save("a.json", b"{}", Some("Lessons")).unwrap();
            assert!(guard.contains("a.json", Some("Lessons")));
            assert_eq!(guard.list(None).unwrap(), ["Lessons"]);
        }
        assert!(!root.exists());
    }

    #[test]
    fn save_refuses_escaping_names() {
        let tmp = tempfile::TempDir::new().unwrap();
        let mut filer = DirectoryFiler::new(tmp.path());
        assert!(filer.save("../evil", b"x", None).is_err());
        assert!(filer.save("ok.txt", b"x", Some("/abs")).is_err());
        assert_eq!(filer.get("ok.txt", None).unwrap(), None);
    }
}
