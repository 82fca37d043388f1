#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::{filer::Filer, model::Course};

/// Default exporter writing the directory layout read by [`ArchiveImporter`].
pub mod export;
/// Default importer reading the layout written by [`ArchiveExporter`].
pub mod import;

pub use export::ArchiveExporter;
pub use import::ArchiveImporter;

/// Serializes a course into a filer.
pub trait CourseExportUtility: Send + Sync {
    /// Writes `course` into `filer`.
    ///
    /// * `backup`: keep identifiers and role assignments verbatim.
    /// * `salt`: mixed into identifiers of non-backup exports.
    fn export(
        &self,
        course: &Course,
        filer: &mut dyn Filer,
        backup: bool,
        salt: Option<&str>,
    ) -> Result<()>;
}

/// Populates a course from a filer.
pub trait CourseImportUtility: Send + Sync {
    /// Reads the filer into `course`. `writeout` marks imported files durable.
    fn import(&self, course: &mut Course, filer: &dyn Filer, writeout: bool)
    -> Result<ImportSummary>;
}

/// What an import touched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    /// Number of outline nodes now in the course, root included.
    pub outline_nodes:    usize,
    /// Number of lesson overviews imported.
    pub lessons:          usize,
    /// Number of content files imported.
    pub files:            usize,
    /// Sections that were imported, as bucket paths.
    pub sections:         Vec<String>,
    /// Sections present in the archive but missing on the course.
    pub skipped_sections: Vec<String>,
}

/// Manifest stamped into every export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportManifest {
    /// Layout version.
    pub version:     u32,
    /// Whether this is a backup export.
    pub backup:      bool,
    /// Salt mixed into identifiers, if any.
    #[serde(default)]
    pub salt:        Option<String>,
    /// RFC 3339 export time.
    pub exported_at: String,
    /// Catalog NTIID of the exported course.
    pub course:      String,
    /// Title of the exported course.
    pub title:       String,
}

/// Joins a nested bucket path.
pub(crate) fn join_bucket(parent: Option<&str>, child: &str) -> String {
    match parent {
        Some(p) => format!("{p}/{child}"),
        None => child.to_string(),
    }
}
