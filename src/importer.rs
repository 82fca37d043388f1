#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::path::Path;

use anyhow::Context;
use bon::Builder;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    context::AdminContext,
    course_io::ImportSummary,
    error::AdminResult,
    events::ContentEvent,
    filer::DirectoryFiler,
    locking::lock_course_tree,
    model::{Course, CourseRef, SiteRegistry},
    permissions::{authorize, editing_policy},
};

/// Switches controlling an import. All default to off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Builder, Serialize, Deserialize)]
pub struct ImportOptions {
    /// Mark imported content files durable instead of transient.
    #[builder(default)]
    #[serde(default)]
    pub writeout: bool,
    /// Lock the imported content (and that of every section) afterwards.
    #[builder(default)]
    #[serde(default)]
    pub lockout:  bool,
    /// Erase the course content folder before importing.
    #[builder(default)]
    #[serde(default)]
    pub clear:    bool,
}

/// Imports `archive` into the course `course` names.
///
/// Fails with `InvalidCourse` when `course` does not resolve,
/// `PermissionDenied` when the context's principal may not edit it and
/// `InvalidArchive` when `archive` is neither a directory nor a zip file.
/// Any extraction directory is removed before this returns; a failure to
/// remove it is logged, not returned.
pub fn import_course<'r>(
    ctx: &AdminContext,
    registry: &'r mut SiteRegistry,
    course: &CourseRef,
    archive: &Path,
    options: ImportOptions,
) -> AdminResult<&'r mut Course> {
    let course = registry.resolve_mut(course)?;
    authorize(ctx.principal(), &editing_policy(), course, "import into")?;
    let summary = import_into(ctx, course, archive, options)?;
    info!(
        "Imported {} lessons and {} files into {} ({} sections)",
        summary.lessons,
        summary.files,
        course.catalog.ntiid(),
        summary.sections.len()
    );
    Ok(course)
}

/// Imports `archive` into an already resolved `course`.
///
/// Steps run in order: clear the content folder when asked, resolve the
/// archive, run the import utility, notify `CourseImported`, then lock
/// when asked.
pub fn import_into(
    ctx: &AdminContext,
    course: &mut Course,
    archive: &Path,
    options: ImportOptions,
) -> AdminResult<ImportSummary> {
    if options.clear {
        info!(
            "Clearing {} content files of {}",
            course.content.len(),
            course.catalog.ntiid()
        );
        course.content.clear();
    }

    let resolved = ctx.resolver().resolve(archive)?;
    let filer = DirectoryFiler::new(resolved.path());
    let summary = ctx
        .importer()
        .import(course, &filer, options.writeout)
        .with_context(|| {
            format!("Failed to import {} into {}", archive.display(), course.catalog.ntiid())
        })?;

    ctx.events().notify(&ContentEvent::CourseImported {
        ntiid: course.catalog.ntiid().to_string(),
    });

    if options.lockout {
        lock_course_tree(course, ctx.events());
    }

    resolved.discard();
    Ok(summary)
}
