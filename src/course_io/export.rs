use anyhow::{Context, Result};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tracing::debug;

use super::{CourseExportUtility, ExportManifest, join_bucket};
use crate::{
    constants::{
        CONTENT, COURSE_INFO, COURSE_OUTLINE, EXPORT_FORMAT_VERSION, EXPORT_MANIFEST, LESSONS,
        ROLE_INFO, SECTIONS,
    },
    filer::Filer,
    model::{Course, LessonItem, OutlineNode},
    util::{salted_digest, sanitize_component},
};

/// Writes courses as a tree of JSON documents plus raw content files.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArchiveExporter;

/// Maps content identifiers for a non-backup export.
struct Relabel<'a> {
    /// Salt to mix in; identifiers are kept when `None`.
    salt: Option<&'a str>,
}

impl Relabel<'_> {
    /// New identifier for `ntiid`.
    fn ntiid(&self, ntiid: &str) -> String {
        match self.salt {
            Some(salt) => format!("{ntiid}.{}", &salted_digest(ntiid, salt)[..12]),
            None => ntiid.to_string(),
        }
    }

    /// Relabels `node` and its descendants in place.
    fn outline(&self, node: &mut OutlineNode) {
        node.ntiid = self.ntiid(&node.ntiid);
        if let Some(lesson) = node.lesson.as_mut() {
            *lesson = self.ntiid(lesson);
        }
        for child in node.children.iter_mut() {
            self.outline(child);
        }
    }

    /// Relabels lesson items and everything nested in them.
    fn items(&self, items: &mut [LessonItem]) {
        for item in items {
            match item {
                LessonItem::Asset(asset) => asset.ntiid = self.ntiid(&asset.ntiid),
                LessonItem::Container(container) => {
                    container.ntiid = self.ntiid(&container.ntiid);
                    self.items(&mut container.items);
                }
            }
        }
    }
}

impl ArchiveExporter {
    /// Writes `course` into `bucket` of `filer`, then each of its sections.
    fn export_into(
        &self,
        course: &Course,
        filer: &mut dyn Filer,
        bucket: Option<&str>,
        backup: bool,
        salt: Option<&str>,
    ) -> Result<()> {
        let relabel = Relabel {
            salt: if backup { None } else { salt },
        };

        let exported_at = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .context("Failed to format export timestamp")?;
        let manifest = ExportManifest {
            version: EXPORT_FORMAT_VERSION,
            backup,
            salt: salt.map(str::to_string),
            exported_at,
            course: course.catalog.ntiid().to_string(),
            title: course.catalog.title.clone(),
        };
        filer.save(EXPORT_MANIFEST, &serde_json::to_vec_pretty(&manifest)?, bucket)?;
        filer.save(COURSE_INFO, &serde_json::to_vec_pretty(&course.catalog)?, bucket)?;

        let mut outline = course.outline.clone();
        relabel.outline(&mut outline);
        filer.save(COURSE_OUTLINE, &serde_json::to_vec_pretty(&outline)?, bucket)?;

        let lessons_bucket = join_bucket(bucket, LESSONS);
        for lesson in course.lessons.values() {
            let mut lesson = lesson.clone();
            lesson.ntiid = relabel.ntiid(&lesson.ntiid);
            relabel.items(&mut lesson.items);
            let name = format!("{}.json", sanitize_component(&lesson.ntiid));
            let body = serde_json::to_vec_pretty(&lesson)?;
            filer.save(&name, &body, Some(lessons_bucket.as_str()))?;
        }

        let content_bucket = join_bucket(bucket, CONTENT);
        for (name, file) in course.content.iter() {
            filer.save(name, &file.data, Some(content_bucket.as_str()))?;
        }

        if backup && !course.roles.is_empty() {
            filer.save(ROLE_INFO, &serde_json::to_vec_pretty(&course.roles)?, bucket)?;
        }

        for (name, section) in &course.sections {
            let section_bucket = join_bucket(bucket, &format!("{SECTIONS}/{name}"));
            self.export_into(section, filer, Some(section_bucket.as_str()), backup, salt)
                .with_context(|| format!("Failed to export section {name}"))?;
        }

        debug!(
            "Exported {} ({} lessons, {} files) into {}",
            course.catalog.ntiid(),
            course.lessons.len(),
            course.content.len(),
            bucket.unwrap_or(".")
        );
        Ok(())
    }
}

impl CourseExportUtility for ArchiveExporter {
    fn export(
        &self,
        course: &Course,
        filer: &mut dyn Filer,
        backup: bool,
        salt: Option<&str>,
    ) -> Result<()> {
        self.export_into(course, filer, None, backup, salt)
    }
}
