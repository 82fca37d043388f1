#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Directory inside an archive holding one sub-archive per section.
pub const SECTIONS: &str = "Sections";

/// Directory inside an archive holding one JSON document per lesson overview.
pub const LESSONS: &str = "Lessons";

/// Directory inside an archive mirroring the course's root content folder.
pub const CONTENT: &str = "Content";

/// Export manifest: format version, backup flag, salt and timestamp.
pub const EXPORT_MANIFEST: &str = "export_manifest.json";

/// Catalog entry of the exported course.
pub const COURSE_INFO: &str = "course_info.json";

/// Outline tree of the exported course.
pub const COURSE_OUTLINE: &str = "course_outline.json";

/// Instructor and editor assignments, written for backups only.
pub const ROLE_INFO: &str = "role_info.json";

/// Version stamped into every export manifest.
pub const EXPORT_FORMAT_VERSION: u32 = 1;

/// Prefix of temporary directories used while extracting archives.
pub const IMPORT_TMP_PREFIX: &str = "course-import-";

/// Prefix of temporary directories used while staging exports.
pub const EXPORT_TMP_PREFIX: &str = "course-export-";

/// Default site name when none is configured.
pub const DEFAULT_SITE: &str = "platform.ou.edu";

/// Default authority used when minting NTIIDs.
pub const DEFAULT_NTIID_AUTHORITY: &str = "courses.example.org";
