#![allow(dead_code)]

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use course_admin::{
    AdminContext,
    archive::{ArchiveResolver, zip_directory},
    course_io::{ArchiveExporter, CourseExportUtility},
    events::RecordingSink,
    filer::DirectoryFiler,
    model::{Asset, AssetKind, Course, ItemContainer, LessonOverview, OutlineNode, Storage},
    ntiid::NtiidFactory,
};
use uuid::Uuid;

pub fn temp_root(label: &str) -> PathBuf {
    let root = std::env::temp_dir().join(format!("course-admin-{label}-{}", Uuid::new_v4()));
    fs::create_dir_all(&root).expect("create temp root");
    root
}

/// Number of entries directly under `dir`.
pub fn entries(dir: &Path) -> usize {
    fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
}

/// A context whose temporary directories live under `tmp` and whose events
/// are recorded.
pub fn context(tmp: &Path) -> (AdminContext, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::new());
    let ctx = AdminContext::builder()
        .events(sink.clone())
        .resolver(ArchiveResolver::with_temp_root(tmp))
        .ntiids(NtiidFactory::new("courses.example.org").with_date("2015"))
        .build();
    (ctx, sink)
}

/// A course with two units, nested lessons, media, a non-recordable asset,
/// content files and two sections.
pub fn sample_course() -> Course {
    let mut course = Course::new("Fall2015", "CS1323", "tag:src,2015:CS1323");
    course.catalog.title = "Introduction to Programming".into();
    course.catalog.description = "Java for beginners".into();

    course.outline = OutlineNode::root("tag:src.outline")
        .with_child(OutlineNode::new("tag:src.unit1", "Unit 1").with_lesson("tag:src.lesson1"))
        .with_child(
            OutlineNode::new("tag:src.unit2", "Unit 2").with_child(
                OutlineNode::new("tag:src.unit2.1", "Unit 2.1").with_lesson("tag:src.lesson2"),
            ),
        );

    let mut handout = Asset::new("tag:src.handout", "Handout", AssetKind::Document);
    handout.recordable = false;
    course.lessons.insert(
        "tag:src.lesson1".into(),
        LessonOverview::new("tag:src.lesson1", "Lesson 1")
            .with_item(Asset::new("tag:src.syllabus", "Syllabus", AssetKind::Document))
            .with_item(Asset::new("tag:src.lecture", "Lecture", AssetKind::Video))
            .with_item(handout)
            .with_item(
                ItemContainer::new("tag:src.readings", "Readings")
                    .with_item(Asset::new("tag:src.slides", "Slides", AssetKind::Slide)),
            ),
    );
    course.lessons.insert(
        "tag:src.lesson2".into(),
        LessonOverview::new("tag:src.lesson2", "Lesson 2")
            .with_item(Asset::new("tag:src.link", "Docs", AssetKind::Link)),
    );

    course.content.insert("syllabus.pdf", b"%PDF".to_vec(), Storage::Durable);
    course.content.insert("images/logo.png", b"PNG".to_vec(), Storage::Durable);

    for name in ["001", "002"] {
        let section = course.add_section(name, format!("tag:src,2015:CS1323_{name}"));
        section.catalog.title = format!("Section {name}");
        section
            .content
            .insert(format!("{name}.txt"), name.as_bytes().to_vec(), Storage::Durable);
    }
    course
}

/// Writes `course` as a directory archive under `dir`.
pub fn write_archive(course: &Course, dir: &Path, backup: bool) -> PathBuf {
    let mut filer = DirectoryFiler::new(dir);
    ArchiveExporter
        .export(course, &mut filer, backup, None)
        .expect("export sample");
    dir.to_path_buf()
}

/// Writes `course` as a zip whose entries sit below a single `wrapper/`
/// directory, the shape an archive utility produces when zipping a folder.
pub fn write_wrapped_zip(course: &Course, scratch: &Path, dest: &Path) -> PathBuf {
    let tree = scratch.join("tree");
    write_archive(course, &tree.join("wrapper"), true);
    zip_directory(&tree, dest).expect("zip sample")
}
