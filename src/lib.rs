//! # course-admin
//!
//! Administrative operations on courses held in a content catalog: create a
//! course from an exported archive, import an archive into an existing
//! course, export a course to a zip file, lock imported content and manage
//! instructor and editor roles.
//!
//! Every operation takes an explicit [`AdminContext`] and [`SiteRegistry`];
//! nothing is looked up from ambient state.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Resolving course archives (directories or zip files) and packaging
/// directories into zip files
pub mod archive;
/// Environment-driven configuration
pub mod config;
/// A module defining a bunch of constant values to be used throughout
pub mod constants;
/// Collaborators passed to every operation
pub mod context;
/// Import and export utilities reading and writing course archives
pub mod course_io;
/// Creating courses from archives
pub mod creator;
/// Error taxonomy
pub mod error;
/// Content notifications
pub mod events;
/// Exporting courses to zip files
pub mod exporter;
/// Staging directories
pub mod filer;
/// Importing archives into existing courses
pub mod importer;
/// Locking course content
pub mod locking;
/// Sites, courses and their content
pub mod model;
/// NTIID generation
pub mod ntiid;
/// Access policies
pub mod permissions;
/// Tabular overviews of courses and roles
pub mod report;
/// Validation of raw create/import inputs
pub mod requests;
/// Instructor and editor roles
pub mod roles;
/// Persisted site registry
pub mod store;
/// Utility functions for convenience
pub mod util;

pub use context::AdminContext;
pub use creator::create_course;
pub use error::{AdminError, AdminResult};
pub use exporter::{ExportOptions, export_course, export_course_ref};
pub use importer::{ImportOptions, import_course, import_into};
pub use locking::{LockReport, lock_course, lock_course_tree};
pub use model::{Course, CourseRef, SiteRegistry};
