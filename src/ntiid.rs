#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use time::OffsetDateTime;

use crate::{constants::DEFAULT_NTIID_AUTHORITY, util::sanitize_component};

/// Mints catalog NTIIDs for new courses and sections.
///
/// A course NTIID is derived from its site, administrative level and key,
/// and a section NTIID extends its parent's. Sanitizing the parts is lossy,
/// so minted identifiers go through [`disambiguate`] before use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NtiidFactory {
    /// Naming authority, e.g. `courses.example.org`.
    authority: String,
    /// Date component of the tag URI.
    date:      String,
}

impl NtiidFactory {
    /// Factory for `authority`, dated with the current year.
    pub fn new(authority: impl Into<String>) -> Self {
        Self {
            authority: authority.into(),
            date:      OffsetDateTime::now_utc().year().to_string(),
        }
    }

    /// Overrides the date component.
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = date.into();
        self
    }

    /// NTIID of the catalog entry for `site/admin_level/key`.
    pub fn course(&self, site: &str, admin_level: &str, key: &str) -> String {
        format!(
            "tag:{},{}:{}-CourseInfo-{}_{}",
            self.authority,
            self.date,
            sanitize_component(site),
            sanitize_component(admin_level),
            sanitize_component(key),
        )
    }

    /// NTIID of the catalog entry for section `name` of `parent`.
    pub fn section(&self, parent: &str, name: &str) -> String {
        format!("{parent}_SubInstances_{}", sanitize_component(name))
    }
}

/// Returns `base`, or `base` with the first `-<n>` suffix (from 2) that
/// `taken` rejects.
pub fn disambiguate(base: String, taken: impl Fn(&str) -> bool) -> String {
    if !taken(&base) {
        return base;
    }
    (2..)
        .map(|n| format!("{base}-{n}"))
        .find(|candidate| !taken(candidate))
        .unwrap_or(base)
}

impl Default for NtiidFactory {
    fn default() -> Self {
        Self::new(DEFAULT_NTIID_AUTHORITY)
    }
}
