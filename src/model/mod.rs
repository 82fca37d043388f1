#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Catalog entries.
pub mod catalog;
/// Courses, sections and their root content folder.
pub mod course;
/// Outline nodes, lessons, assets and item containers.
pub mod outline;
/// Sites, administrative levels and course references.
pub mod site;

pub use catalog::CatalogEntry;
pub use course::{ContentFile, ContentFolder, Course, Storage};
pub use outline::{
    Asset, AssetKind, ItemContainer, LessonItem, LessonOverview, Lockable, NodeTag, OutlineNode,
};
pub use site::{AdministrativeLevel, CourseRef, Site, SiteRegistry};
