#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::path::{Path, PathBuf};

use anyhow::Context;
use bon::Builder;
use tracing::info;

use crate::{
    archive::zip_directory,
    constants::EXPORT_TMP_PREFIX,
    context::AdminContext,
    error::AdminResult,
    filer::{DirectoryFiler, Filer, FilerGuard},
    model::{Course, CourseRef, SiteRegistry},
    ntiid::disambiguate,
    permissions::{authorize, editing_policy},
    util::{sanitize_component, timestamp_salt},
};

/// Switches controlling an export.
#[derive(Debug, Clone, Default, Builder)]
pub struct ExportOptions {
    /// Keep identifiers and role assignments verbatim.
    #[builder(default)]
    pub backup:     bool,
    /// Salt mixed into identifiers of non-backup exports. Defaults to the
    /// current time in nanoseconds.
    #[builder(into)]
    pub salt:       Option<String>,
    /// Directory the zip file is written to.
    #[builder(into)]
    pub output_dir: Option<PathBuf>,
}

/// Stem of the zip an export of `course` is written to:
/// `<admin level>_<provider id>`, falling back to the course key when the
/// provider id is blank.
pub fn archive_stem(course: &Course) -> String {
    let id = if course.catalog.provider_unique_id.trim().is_empty() {
        course.key.as_str()
    } else {
        course.catalog.provider_unique_id.as_str()
    };
    format!(
        "{}_{}",
        sanitize_component(&course.admin_level),
        sanitize_component(id)
    )
}

/// Path in `dir` the next export of `course` is written to. Existing files
/// are never reused; a `-<n>` suffix is added instead.
pub fn archive_path(dir: &Path, course: &Course) -> PathBuf {
    let stem = disambiguate(archive_stem(course), |stem| {
        dir.join(format!("{stem}.zip")).exists()
    });
    dir.join(format!("{stem}.zip"))
}

/// Exports `course` into a zip file and returns its path.
///
/// The course is written into a staging filer by the context's export
/// utility, then zipped into `<output dir>/<admin level>_<provider id>.zip`
/// (see [`archive_path`]). The output directory is the one in `options`,
/// else the context's, else a fresh temporary directory that is kept. The
/// staging filer is reset however this returns.
///
/// Fails with `PermissionDenied` when the context's principal may not edit
/// the course.
pub fn export_course(
    ctx: &AdminContext,
    course: &Course,
    options: &ExportOptions,
) -> AdminResult<PathBuf> {
    authorize(ctx.principal(), &editing_policy(), course, "export")?;
    let salt = match (&options.salt, options.backup) {
        (Some(salt), _) => Some(salt.clone()),
        (None, false) => Some(timestamp_salt()),
        (None, true) => None,
    };

    let mut filer = DirectoryFiler::temporary(ctx.resolver().temp_root())?;
    let mut staged = FilerGuard::prepare(&mut filer)?;
    ctx.exporter()
        .export(course, &mut *staged, options.backup, salt.as_deref())
        .with_context(|| format!("Failed to export {}", course.catalog.ntiid()))?;

    let output_dir = match options.output_dir.as_deref().or(ctx.export_dir()) {
        Some(dir) => dir.to_path_buf(),
        None => tempfile::Builder::new()
            .prefix(EXPORT_TMP_PREFIX)
            .tempdir()
            .context("Could not create an export directory")?
            .keep(),
    };
    let dest = archive_path(&output_dir, course);
    let zipped = zip_directory(staged.root(), &dest)?;

    info!(
        "Exported {} ({}) to {}",
        course.catalog.ntiid(),
        if options.backup { "backup" } else { "salted" },
        zipped.display()
    );
    Ok(zipped)
}

/// Resolves `course` in `registry` and exports it.
pub fn export_course_ref(
    ctx: &AdminContext,
    registry: &SiteRegistry,
    course: &CourseRef,
    options: &ExportOptions,
) -> AdminResult<PathBuf> {
    let course = registry.resolve(course)?;
    export_course(ctx, course, options)
}
