#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::path::PathBuf;

/// Errors surfaced by the administrative course operations.
///
/// Every variant is raised synchronously and never retried here; callers
/// decide whether to report, retry or abort.
#[derive(thiserror::Error, Debug)]
pub enum AdminError {
    /// The path is neither a directory nor a readable zip archive.
    #[error("Invalid archive `{path}`: {reason}")]
    InvalidArchive {
        /// Path that was offered as an archive.
        path:   PathBuf,
        /// Why it was rejected.
        reason: String,
    },
    /// The supplied identifier or context does not resolve to a course.
    #[error("Invalid course: `{0}`")]
    InvalidCourse(String),
    /// The archive path is missing or does not exist.
    #[error("Invalid archive path: `{0}`")]
    InvalidPath(String),
    /// No administrative level was supplied.
    #[error("Missing administrative level")]
    MissingAdminLevel,
    /// No course key was supplied.
    #[error("Missing course key")]
    MissingCourseKey,
    /// The named site (catalog) does not exist.
    #[error("Invalid site: `{0}`")]
    InvalidSite(String),
    /// The named administrative level does not exist in the site.
    #[error("Invalid administrative level: `{0}`")]
    InvalidAdminLevel(String),
    /// A course with this key already exists under the administrative level.
    #[error("Course `{key}` already exists under `{admin_level}`")]
    CourseAlreadyExists {
        /// Administrative level the course was to be created in.
        admin_level: String,
        /// The conflicting course key.
        key:         String,
    },
    /// A boolean switch was given a value other than a recognized spelling.
    #[error("Invalid value `{value}` for `{name}`; expected true or false")]
    InvalidFlag {
        /// Name of the switch.
        name:  String,
        /// Offending value.
        value: String,
    },
    /// The acting principal may not run this operation on the course.
    #[error("`{principal}` may not {action} `{course}`")]
    PermissionDenied {
        /// Username of the acting principal.
        principal: String,
        /// Operation that was refused.
        action:    String,
        /// Catalog NTIID of the course, or the site for site-wide operations.
        course:    String,
    },
    /// Filesystem failure while staging, extracting or packaging.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Failure reading or writing a zip archive.
    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),
    /// Failure (de)serializing archive documents.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    /// Anything raised by an external collaborator.
    #[error(transparent)]
    Unknown(#[from] anyhow::Error),
}

impl AdminError {
    /// Builds an [`AdminError::InvalidArchive`] for `path`.
    pub fn invalid_archive(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::InvalidArchive {
            path:   path.into(),
            reason: reason.to_string(),
        }
    }

    /// Short, stable name of the error kind, used for structured responses.
    pub fn kind(&self) -> &'static str {
        match self {
            AdminError::InvalidArchive { .. } => "InvalidArchiveError",
            AdminError::InvalidCourse(_) => "InvalidCourseError",
            AdminError::InvalidPath(_) => "InvalidPathError",
            AdminError::MissingAdminLevel => "MissingAdminLevelError",
            AdminError::MissingCourseKey => "MissingCourseKeyError",
            AdminError::InvalidSite(_) => "InvalidSiteError",
            AdminError::InvalidAdminLevel(_) => "InvalidAdminLevelError",
            AdminError::CourseAlreadyExists { .. } => "CourseAlreadyExistsError",
            AdminError::InvalidFlag { .. } => "InvalidFlagError",
            AdminError::PermissionDenied { .. } => "PermissionDeniedError",
            AdminError::Io(_) | AdminError::Zip(_) | AdminError::Json(_) => "IOError",
            AdminError::Unknown(_) => "UnknownError",
        }
    }
}

/// Result alias used throughout the crate.
pub type AdminResult<T> = Result<T, AdminError>;
