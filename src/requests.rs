#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::path::{Path, PathBuf};

use bon::Builder;
use serde::Deserialize;

use crate::{
    error::{AdminError, AdminResult},
    importer::ImportOptions,
    model::CourseRef,
};

/// Raw inputs of a course creation, as received from a form or command line.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateCourseRequest {
    /// Administrative level the course goes under.
    #[serde(default, alias = "admin")]
    pub admin_level: Option<String>,
    /// Key of the new course.
    #[serde(default)]
    pub key:         Option<String>,
    /// Archive path.
    #[serde(default, alias = "path")]
    pub archive:     Option<String>,
    /// Site to create the course in.
    #[serde(default, alias = "site")]
    pub catalog:     Option<String>,
    /// Raw `writeout` switch.
    #[serde(default)]
    pub writeout:    Option<String>,
    /// Raw `lockout` switch.
    #[serde(default)]
    pub lockout:     Option<String>,
    /// Raw `clear` switch.
    #[serde(default)]
    pub clear:       Option<String>,
}

/// Raw inputs of an import into an existing course.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImportCourseRequest {
    /// Course NTIID or `[site::]admin/key[/Sections/name]` path.
    #[serde(default, alias = "ntiid")]
    pub course:   Option<String>,
    /// Archive path.
    #[serde(default, alias = "path")]
    pub archive:  Option<String>,
    /// Raw `writeout` switch.
    #[serde(default)]
    pub writeout: Option<String>,
    /// Raw `lockout` switch.
    #[serde(default)]
    pub lockout:  Option<String>,
    /// Raw `clear` switch.
    #[serde(default)]
    pub clear:    Option<String>,
}

/// A validated course creation.
#[derive(Debug, Clone, Builder)]
pub struct CreateCourse {
    /// Administrative level the course goes under.
    #[builder(into)]
    admin_level:  String,
    /// Key of the new course.
    #[builder(into)]
    key:          String,
    /// Archive to import after creation.
    #[builder(into)]
    archive:      PathBuf,
    /// Site to create the course in; the registry default when unset.
    #[builder(into)]
    catalog:      Option<String>,
    /// Switches passed on to the import.
    #[builder(default)]
    options:      ImportOptions,
    /// Create the administrative level when it does not exist yet.
    #[builder(default)]
    create_level: bool,
}

impl CreateCourse {
    /// Administrative level name.
    pub fn admin_level(&self) -> &str {
        &self.admin_level
    }

    /// Course key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Archive path.
    pub fn archive(&self) -> &Path {
        &self.archive
    }

    /// Target site, if one was named.
    pub fn catalog(&self) -> Option<&str> {
        self.catalog.as_deref()
    }

    /// Import switches.
    pub fn options(&self) -> ImportOptions {
        self.options
    }

    /// Whether a missing administrative level is created.
    pub fn create_level(&self) -> bool {
        self.create_level
    }

    /// Replaces the import switches.
    pub fn with_options(mut self, options: ImportOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets whether a missing administrative level is created.
    pub fn with_create_level(mut self, create_level: bool) -> Self {
        self.create_level = create_level;
        self
    }
}

/// A validated import.
#[derive(Debug, Clone)]
pub struct ImportCourse {
    /// Course to import into.
    pub course:  CourseRef,
    /// Archive path.
    pub archive: PathBuf,
    /// Import switches.
    pub options: ImportOptions,
}

/// Trimmed value of `value`, or `None` when absent or blank.
fn required(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// An archive path that exists on disk.
fn archive_path(value: &Option<String>) -> AdminResult<PathBuf> {
    let path = required(value).ok_or_else(|| AdminError::InvalidPath(String::new()))?;
    if !Path::new(&path).exists() {
        return Err(AdminError::InvalidPath(path));
    }
    Ok(PathBuf::from(path))
}

/// Parses a boolean switch. Absent or blank means `false`; only the usual
/// spellings of true and false are accepted.
pub fn parse_flag(name: &str, value: Option<&str>) -> AdminResult<bool> {
    let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(false);
    };
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(AdminError::InvalidFlag {
            name:  name.to_string(),
            value: raw.to_string(),
        }),
    }
}

/// Parses the three import switches.
fn import_options(
    writeout: &Option<String>,
    lockout: &Option<String>,
    clear: &Option<String>,
) -> AdminResult<ImportOptions> {
    Ok(ImportOptions {
        writeout: parse_flag("writeout", writeout.as_deref())?,
        lockout:  parse_flag("lockout", lockout.as_deref())?,
        clear:    parse_flag("clear", clear.as_deref())?,
    })
}

impl CreateCourseRequest {
    /// Checks the inputs that need no registry: administrative level, key,
    /// archive path and switches, in that order.
    pub fn validate(&self) -> AdminResult<CreateCourse> {
        let admin_level = required(&self.admin_level).ok_or(AdminError::MissingAdminLevel)?;
        let key = required(&self.key).ok_or(AdminError::MissingCourseKey)?;
        let archive = archive_path(&self.archive)?;
        let options = import_options(&self.writeout, &self.lockout, &self.clear)?;

        Ok(CreateCourse::builder()
            .admin_level(admin_level)
            .key(key)
            .archive(archive)
            .maybe_catalog(required(&self.catalog))
            .options(options)
            .build())
    }
}

impl ImportCourseRequest {
    /// Checks the course reference, archive path and switches.
    pub fn validate(&self) -> AdminResult<ImportCourse> {
        let course = required(&self.course)
            .ok_or_else(|| AdminError::InvalidCourse(String::new()))?
            .parse::<CourseRef>()?;
        let archive = archive_path(&self.archive)?;
        let options = import_options(&self.writeout, &self.lockout, &self.clear)?;
        Ok(ImportCourse {
            course,
            archive,
            options,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_accept_only_boolean_spellings() {
        assert!(!parse_flag("clear", None).unwrap());
        assert!(!parse_flag("clear", Some(" ")).unwrap());
        assert!(parse_flag("clear", Some("True")).unwrap());
        assert!(parse_flag("clear", Some("on")).unwrap());
        assert!(!parse_flag("clear", Some("0")).unwrap());
        assert_eq!(
            parse_flag("clear", Some("maybe")).unwrap_err().kind(),
            "InvalidFlagError"
        );
    }

    #[test]
    fn create_requests_check_fields_in_order() {
        let mut request = CreateCourseRequest::default();
        assert!(matches!(request.validate(), Err(AdminError::MissingAdminLevel)));

        request.admin_level = Some("Fall2015".into());
        assert!(matches!(request.validate(), Err(AdminError::MissingCourseKey)));

        request.key = Some("CS1323".into());
        assert!(matches!(request.validate(), Err(AdminError::InvalidPath(p)) if p.is_empty()));

        request.archive = Some("/definitely/not/here.zip".into());
        assert!(matches!(request.validate(), Err(AdminError::InvalidPath(_))));

        let tmp = tempfile::TempDir::new().unwrap();
        request.archive = Some(tmp.path().display().to_string());
        request.lockout = Some("yes".into());
        let create = request.validate().unwrap();
        assert_eq!(create.admin_level(), "Fall2015");
        assert!(create.options().lockout);
        assert!(!create.options().clear);
        assert!(create.catalog().is_none());
    }

    #[test]
    fn import_requests_need_a_course() {
        let request = ImportCourseRequest {
            course: Some("not a course".into()),
            ..Default::default()
        };
        assert!(matches!(request.validate(), Err(AdminError::InvalidCourse(_))));
    }
}
