#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use serde::Serialize;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Panel, Style, Width, object::Rows},
};

use crate::{
    error::AdminResult,
    locking::locked_ntiids,
    model::{Course, SiteRegistry},
    roles::course_roles,
};

/// One row of the course overview.
#[derive(Debug, Clone, PartialEq, Eq, Tabled, Serialize)]
pub struct CourseRow {
    #[tabled(rename = "Site")]
    /// Site holding the course.
    pub site:        String,
    #[tabled(rename = "Level")]
    /// Administrative level.
    pub admin_level: String,
    #[tabled(rename = "Key")]
    /// Course key.
    pub key:         String,
    #[tabled(rename = "Title")]
    /// Catalog title.
    pub title:       String,
    #[tabled(rename = "Sections")]
    /// Number of sections.
    pub sections:    usize,
    #[tabled(rename = "Lessons")]
    /// Number of lesson overviews.
    pub lessons:     usize,
    #[tabled(rename = "Files")]
    /// Number of root content files.
    pub files:       usize,
    #[tabled(rename = "Locked")]
    /// Number of locked content nodes.
    pub locked:      usize,
    #[tabled(rename = "NTIID")]
    /// Catalog NTIID.
    pub ntiid:       String,
}

/// Overview rows of every course in `site` (the default site when `None`).
pub fn course_rows(registry: &SiteRegistry, site: Option<&str>) -> AdminResult<Vec<CourseRow>> {
    let site = registry.site(site)?;
    Ok(site
        .courses()
        .map(|course| CourseRow {
            site:        site.name.clone(),
            admin_level: course.admin_level.clone(),
            key:         course.key.clone(),
            title:       course.catalog.title.clone(),
            sections:    course.sections.len(),
            lessons:     course.lessons.len(),
            files:       course.content.len(),
            locked:      locked_ntiids(course).len(),
            ntiid:       course.catalog.ntiid().to_string(),
        })
        .collect())
}

/// Renders course overview rows.
pub fn courses_table(rows: &[CourseRow]) -> String {
    Table::new(rows)
        .with(Panel::header("Courses"))
        .with(Modify::new(Rows::new(1..)).with(Width::wrap(32).keep_words(true)))
        .with(
            Modify::new(Rows::first())
                .with(Alignment::center())
                .with(Alignment::center_vertical()),
        )
        .with(Style::modern())
        .to_string()
}

/// Renders the role assignments of `course`.
pub fn roles_table(course: &Course) -> String {
    let rows = course_roles(course);
    Table::new(&rows)
        .with(Panel::header(format!("Roles on {}", course.catalog.title)))
        .with(Panel::footer(format!("{} assignments", rows.len())))
        .with(
            Modify::new(Rows::first())
                .with(Alignment::center())
                .with(Alignment::center_vertical()),
        )
        .with(Style::modern())
        .to_string()
}
