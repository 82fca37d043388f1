use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::{CourseImportUtility, ImportSummary, join_bucket};
use crate::{
    constants::{CONTENT, COURSE_INFO, COURSE_OUTLINE, LESSONS, ROLE_INFO, SECTIONS},
    filer::Filer,
    model::{CatalogEntry, Course, LessonOverview, OutlineNode, Storage},
    roles::RoleAssignments,
};

/// Reads courses from the layout written by
/// [`ArchiveExporter`](super::ArchiveExporter).
///
/// Missing documents are tolerated: an archive holding only `Content/` files
/// imports just those. Sections in the archive are imported into sections
/// that already exist on the course; others are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArchiveImporter;

/// Reads and parses `name` from `bucket`, if present.
fn read_json<T: DeserializeOwned>(
    filer: &dyn Filer,
    name: &str,
    bucket: Option<&str>,
) -> Result<Option<T>> {
    let Some(bytes) = filer.get(name, bucket)? else {
        return Ok(None);
    };
    serde_json::from_slice(&bytes)
        .map(Some)
        .with_context(|| format!("Could not parse {} in {}", name, bucket.unwrap_or(".")))
}

impl ArchiveImporter {
    /// Imports `bucket` of `filer` into `course`, then its sections.
    fn import_from(
        &self,
        course: &mut Course,
        filer: &dyn Filer,
        bucket: Option<&str>,
        writeout: bool,
        summary: &mut ImportSummary,
    ) -> Result<()> {
        if let Some(entry) = read_json::<CatalogEntry>(filer, COURSE_INFO, bucket)? {
            course.catalog.update_from(&entry);
        }

        if let Some(outline) = read_json::<OutlineNode>(filer, COURSE_OUTLINE, bucket)? {
            course.outline = outline;
        }
        summary.outline_nodes += course.outline.iter().count();

        let lessons_bucket = join_bucket(bucket, LESSONS);
        for name in filer.list(Some(lessons_bucket.as_str()))? {
            if !name.ends_with(".json") {
                continue;
            }
            if let Some(lesson) =
                read_json::<LessonOverview>(filer, &name, Some(lessons_bucket.as_str()))?
            {
                course.lessons.insert(lesson.ntiid.clone(), lesson);
                summary.lessons += 1;
            }
        }

        let storage = if writeout {
            Storage::Durable
        } else {
            Storage::Transient
        };
        let content_bucket = join_bucket(bucket, CONTENT);
        summary.files += self.import_content(course, filer, &content_bucket, "", storage)?;

        if let Some(roles) = read_json::<RoleAssignments>(filer, ROLE_INFO, bucket)? {
            course.roles.merge(&roles);
        }

        let sections_bucket = join_bucket(bucket, SECTIONS);
        for name in filer.list(Some(sections_bucket.as_str()))? {
            let section_bucket = join_bucket(Some(sections_bucket.as_str()), &name);
            if !filer.is_bucket(&section_bucket) {
                continue;
            }
            match course.sections.get_mut(&name) {
                Some(section) => {
                    self.import_from(section, filer, Some(section_bucket.as_str()), writeout, summary)
                        .with_context(|| format!("Failed to import section {name}"))?;
                    summary.sections.push(section_bucket);
                }
                None => {
                    warn!(
                        "Section {name} is in the archive but not on {}; skipping",
                        course.catalog.ntiid()
                    );
                    summary.skipped_sections.push(section_bucket);
                }
            }
        }

        debug!("Imported {} from {}", course.catalog.ntiid(), bucket.unwrap_or("."));
        Ok(())
    }

    /// Copies every file below `bucket` into the course content folder, keyed
    /// by its path relative to the content root. Returns the file count.
    fn import_content(
        &self,
        course: &mut Course,
        filer: &dyn Filer,
        bucket: &str,
        prefix: &str,
        storage: Storage,
    ) -> Result<usize> {
        let mut count = 0;
        for name in filer.list(Some(bucket))? {
            let key = if prefix.is_empty() {
                name.clone()
            } else {
                format!("{prefix}/{name}")
            };
            let nested = join_bucket(Some(bucket), &name);
            if filer.is_bucket(&nested) {
                count += self.import_content(course, filer, &nested, &key, storage)?;
            } else if let Some(data) = filer.get(&name, Some(bucket))? {
                course.content.insert(key, data, storage);
                count += 1;
            }
        }
        Ok(count)
    }
}

impl CourseImportUtility for ArchiveImporter {
    fn import(
        &self,
        course: &mut Course,
        filer: &dyn Filer,
        writeout: bool,
    ) -> Result<ImportSummary> {
        let mut summary = ImportSummary::default();
        self.import_from(course, filer, None, writeout, &mut summary)?;
        Ok(summary)
    }
}
