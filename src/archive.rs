#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{
    fs::{self, File},
    io,
    path::{Path, PathBuf},
};

use itertools::Itertools;
use tempfile::TempDir;
use tracing::{debug, info, warn};
use walkdir::WalkDir;
use zip::{CompressionMethod, ZipArchive, ZipWriter, write::FileOptions};

use crate::{
    constants::IMPORT_TMP_PREFIX,
    error::{AdminError, AdminResult},
};

/// A course archive ready to be read from disk.
///
/// Zip files are extracted into a temporary directory owned by this value;
/// dropping it removes the extraction.
#[derive(Debug)]
pub struct ResolvedArchive {
    /// Directory holding the archive contents.
    path: PathBuf,
    /// Extraction directory, when the archive was a zip file.
    tmp:  Option<TempDir>,
}

impl ResolvedArchive {
    /// Directory holding the archive contents.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the contents live in a temporary extraction directory.
    pub fn is_temporary(&self) -> bool {
        self.tmp.is_some()
    }

    /// Root of the temporary extraction, if any. May differ from
    /// [`ResolvedArchive::path`] when a wrapping directory was peeled off.
    pub fn temp_root(&self) -> Option<&Path> {
        self.tmp.as_ref().map(TempDir::path)
    }

    /// Removes the temporary extraction now, reporting failures.
    pub fn close(self) -> io::Result<()> {
        match self.tmp {
            Some(tmp) => tmp.close(),
            None => Ok(()),
        }
    }

    /// Removes the temporary extraction now, logging failures.
    pub fn discard(self) {
        let path = self.path.clone();
        if let Err(err) = self.close() {
            warn!("Could not remove the extraction at {}: {err}", path.display());
        }
    }
}

/// Turns archive paths into readable directories.
#[derive(Debug, Clone, Default)]
pub struct ArchiveResolver {
    /// Parent of extraction directories; the system temp dir when `None`.
    temp_root: Option<PathBuf>,
}

impl ArchiveResolver {
    /// Resolver extracting into the system temporary directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver extracting into `temp_root`.
    pub fn with_temp_root(temp_root: impl Into<PathBuf>) -> Self {
        Self {
            temp_root: Some(temp_root.into()),
        }
    }

    /// Parent directory of extraction directories, if overridden.
    pub fn temp_root(&self) -> Option<&Path> {
        self.temp_root.as_deref()
    }

    /// Resolves `path` into a directory.
    ///
    /// * A directory is returned unchanged and nothing is owned.
    /// * Anything else must be a zip archive; it is extracted into a new
    ///   temporary directory. When the extraction holds a single directory
    ///   and nothing else, that inner directory is returned.
    pub fn resolve(&self, path: &Path) -> AdminResult<ResolvedArchive> {
        if path.is_dir() {
            debug!("Using archive directory {}", path.display());
            return Ok(ResolvedArchive {
                path: path.to_path_buf(),
                tmp:  None,
            });
        }

        let file = File::open(path).map_err(|e| AdminError::invalid_archive(path, e))?;
        let mut archive = ZipArchive::new(file).map_err(|e| AdminError::invalid_archive(path, e))?;

        let mut builder = tempfile::Builder::new();
        builder.prefix(IMPORT_TMP_PREFIX);
        let tmp = match &self.temp_root {
            Some(root) => builder.tempdir_in(root)?,
            None => builder.tempdir()?,
        };

        archive
            .extract(tmp.path())
            .map_err(|e| AdminError::invalid_archive(path, e))?;

        // a single wrapping directory is peeled off
        let entries = fs::read_dir(tmp.path())?.collect::<io::Result<Vec<_>>>()?;
        let resolved = if entries.len() == 1 && entries[0].file_type()?.is_dir() {
            entries[0].path()
        } else {
            tmp.path().to_path_buf()
        };

        info!(
            "Extracted {} ({} entries) into {}",
            path.display(),
            archive.len(),
            resolved.display()
        );
        Ok(ResolvedArchive {
            path: resolved,
            tmp:  Some(tmp),
        })
    }
}

/// Whether `path` is a file that opens as a zip archive.
pub fn is_zip_archive(path: &Path) -> bool {
    File::open(path)
        .ok()
        .and_then(|f| ZipArchive::new(f).ok())
        .is_some()
}

/// Packages the contents of `src` into a deflated zip at `dest`.
///
/// Entry names are relative to `src`; parent directories of `dest` are
/// created when missing. An existing file at `dest` is an error, never
/// overwritten.
pub fn zip_directory(src: &Path, dest: &Path) -> AdminResult<PathBuf> {
    if let Some(parent) = dest.parent()
        && !parent.exists()
    {
        fs::create_dir_all(parent)?;
    }

    let file = File::create_new(dest)?;
    let mut zip = ZipWriter::new(file);
    let options: FileOptions<'_, ()> =
        FileOptions::default().compression_method(CompressionMethod::Deflated);

    for entry in WalkDir::new(src).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(io::Error::from)?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| AdminError::Unknown(e.into()))?;
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .join("/");

        if entry.file_type().is_dir() {
            zip.add_directory(format!("{name}/"), options)?;
        } else {
            zip.start_file(name.as_str(), options)?;
            let mut reader = File::open(entry.path())?;
            io::copy(&mut reader, &mut zip)?;
        }
    }

    zip.finish()?;
    debug!("Packaged {} into {}", src.display(), dest.display());
    Ok(dest.to_path_buf())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_zip(dest: &Path, entries: &[(&str, &str)]) {
        let mut zip = ZipWriter::new(File::create(dest).unwrap());
        let options: FileOptions<'_, ()> = FileOptions::default();
        for (name, body) in entries {
            zip.start_file(*name, options).unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }

    #[test]
    fn directories_pass_through_untouched() {
        let tmp = TempDir::new().unwrap();
        let resolved = ArchiveResolver::new().resolve(tmp.path()).unwrap();
        assert_eq!(resolved.path(), tmp.path());
        assert!(!resolved.is_temporary());
    }

    #[test]
    fn flat_zip_resolves_to_extraction_root() {
        let tmp = TempDir::new().unwrap();
        let zip_path = tmp.path().join("flat.zip");
        write_zip(&zip_path, &[("course_info.json", "{}"), ("Content/a.txt", "a")]);

        let resolved = ArchiveResolver::new().resolve(&zip_path).unwrap();
        assert_eq!(Some(resolved.path()), resolved.temp_root());
        assert!(resolved.path().join("course_info.json").is_file());

        let root = resolved.path().to_path_buf();
        resolved.close().unwrap();
        assert!(!root.exists());
    }

    #[test]
    fn zip_directory_round_trips_through_resolver() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        fs::create_dir_all(src.join("Lessons")).unwrap();
        fs::write(src.join("course_info.json"), "{}").unwrap();
        fs::write(src.join("Lessons").join("l.json"), "{}").unwrap();

        let zipped = zip_directory(&src, &tmp.path().join("out").join("c.zip")).unwrap();
        assert!(is_zip_archive(&zipped));
        assert!(!is_zip_archive(&src.join("course_info.json")));

        let resolved = ArchiveResolver::new().resolve(&zipped).unwrap();
        assert!(resolved.path().join("Lessons").join("l.json").is_file());
    }
}
