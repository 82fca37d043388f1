#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use super::course::Course;
use crate::{
    constants::SECTIONS,
    error::{AdminError, AdminResult},
};

/// A named grouping (usually a term) under which courses are created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdministrativeLevel {
    /// Level name, e.g. `Fall2015`.
    pub name: String,
    /// Courses keyed by course key.
    #[serde(default)]
    courses:  BTreeMap<String, Course>,
}

impl AdministrativeLevel {
    /// Creates an empty level.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name:    name.into(),
            courses: BTreeMap::new(),
        }
    }

    /// Course stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Course> {
        self.courses.get(key)
    }

    /// Mutable course stored under `key`.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Course> {
        self.courses.get_mut(key)
    }

    /// Whether a course is stored under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.courses.contains_key(key)
    }

    /// Stores `course` under its key, failing if the key is taken.
    pub fn insert(&mut self, course: Course) -> AdminResult<&mut Course> {
        if self.courses.contains_key(&course.key) {
            return Err(AdminError::CourseAlreadyExists {
                admin_level: self.name.clone(),
                key:         course.key.clone(),
            });
        }
        Ok(self.courses.entry(course.key.clone()).or_insert(course))
    }

    /// Courses in key order.
    pub fn courses(&self) -> impl Iterator<Item = &Course> {
        self.courses.values()
    }

    /// Mutable courses in key order.
    pub fn courses_mut(&mut self) -> impl Iterator<Item = &mut Course> {
        self.courses.values_mut()
    }
}

/// A site and its course catalog of administrative levels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    /// Site name, e.g. `platform.ou.edu`.
    pub name: String,
    /// Administrative levels by name.
    #[serde(default)]
    levels:   BTreeMap<String, AdministrativeLevel>,
}

impl Site {
    /// Creates a site with no administrative levels.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name:   name.into(),
            levels: BTreeMap::new(),
        }
    }

    /// Returns the level called `name`, creating it when missing.
    pub fn ensure_level(&mut self, name: &str) -> &mut AdministrativeLevel {
        self.levels
            .entry(name.to_string())
            .or_insert_with(|| AdministrativeLevel::new(name))
    }

    /// Administrative level called `name`.
    pub fn level(&self, name: &str) -> Option<&AdministrativeLevel> {
        self.levels.get(name)
    }

    /// Mutable administrative level called `name`.
    pub fn level_mut(&mut self, name: &str) -> Option<&mut AdministrativeLevel> {
        self.levels.get_mut(name)
    }

    /// Every top-level course of the site.
    pub fn courses(&self) -> impl Iterator<Item = &Course> {
        self.levels.values().flat_map(|l| l.courses())
    }

    /// Finds a course or section anywhere in the site by catalog NTIID.
    pub fn find_mut(&mut self, ntiid: &str) -> Option<&mut Course> {
        self.levels
            .values_mut()
            .flat_map(|l| l.courses_mut())
            .find_map(|c| c.find_mut(ntiid))
    }

    /// Read-only variant of [`Site::find_mut`].
    pub fn find(&self, ntiid: &str) -> Option<&Course> {
        self.courses().find_map(|c| c.find(ntiid))
    }
}

/// Every known site plus the one used when a caller names none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteRegistry {
    /// Site used when a request does not name one.
    default_site: String,
    /// Sites by name.
    #[serde(default)]
    sites:        BTreeMap<String, Site>,
}

impl SiteRegistry {
    /// Creates a registry holding a single, empty default site.
    pub fn new(default_site: impl Into<String>) -> Self {
        let default_site = default_site.into();
        let mut sites = BTreeMap::new();
        sites.insert(default_site.clone(), Site::new(default_site.clone()));
        Self {
            default_site,
            sites,
        }
    }

    /// Name of the default site.
    pub fn default_site(&self) -> &str {
        &self.default_site
    }

    /// Adds a site, replacing any existing site with the same name.
    pub fn add_site(&mut self, site: Site) {
        self.sites.insert(site.name.clone(), site);
    }

    /// Sites in name order.
    pub fn sites(&self) -> impl Iterator<Item = &Site> {
        self.sites.values()
    }

    /// Site called `name`, or the default site when `name` is `None`.
    pub fn site(&self, name: Option<&str>) -> AdminResult<&Site> {
        let name = name.unwrap_or(&self.default_site);
        self.sites
            .get(name)
            .ok_or_else(|| AdminError::InvalidSite(name.to_string()))
    }

    /// Mutable variant of [`SiteRegistry::site`].
    pub fn site_mut(&mut self, name: Option<&str>) -> AdminResult<&mut Site> {
        let name = name.unwrap_or(&self.default_site).to_string();
        self.sites
            .get_mut(&name)
            .ok_or(AdminError::InvalidSite(name))
    }

    /// Catalog NTIIDs of every course and section in every site.
    pub fn catalog_ntiids(&self) -> BTreeSet<String> {
        self.sites
            .values()
            .flat_map(Site::courses)
            .flat_map(Course::catalog_ntiids)
            .map(str::to_string)
            .collect()
    }

    /// Resolves a course reference to a course or section.
    pub fn resolve(&self, course: &CourseRef) -> AdminResult<&Course> {
        let found = match course {
            CourseRef::Ntiid(ntiid) => self.sites.values().find_map(|s| s.find(ntiid)),
            CourseRef::Path {
                site,
                admin_level,
                key,
                section,
            } => {
                let site = self
                    .site(site.as_deref())
                    .map_err(|_| AdminError::InvalidCourse(course.to_string()))?;
                let parent = site.level(admin_level).and_then(|l| l.get(key));
                match section {
                    Some(name) => parent.and_then(|c| c.sections.get(name)),
                    None => parent,
                }
            }
        };
        found.ok_or_else(|| AdminError::InvalidCourse(course.to_string()))
    }

    /// Mutable variant of [`SiteRegistry::resolve`].
    pub fn resolve_mut(&mut self, course: &CourseRef) -> AdminResult<&mut Course> {
        let invalid = || AdminError::InvalidCourse(course.to_string());
        match course {
            CourseRef::Ntiid(ntiid) => self
                .sites
                .values_mut()
                .find_map(|s| s.find_mut(ntiid))
                .ok_or_else(invalid),
            CourseRef::Path {
                site,
                admin_level,
                key,
                section,
            } => {
                let site = self.site_mut(site.as_deref()).map_err(|_| invalid())?;
                let parent = site
                    .level_mut(admin_level)
                    .and_then(|l| l.get_mut(key))
                    .ok_or_else(invalid)?;
                match section {
                    Some(name) => parent.sections.get_mut(name).ok_or_else(invalid),
                    None => Ok(parent),
                }
            }
        }
    }
}

impl Default for SiteRegistry {
    fn default() -> Self {
        Self::new(crate::constants::DEFAULT_SITE)
    }
}

/// A caller-supplied reference to a course or section.
///
/// Parsed from either an NTIID (`tag:...`) or a path of the form
/// `[site::]admin/key[/Sections/name]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CourseRef {
    /// Catalog NTIID of the course or section.
    Ntiid(String),
    /// Location within a site's catalog.
    Path {
        /// Site; the registry default when `None`.
        site:        Option<String>,
        /// Administrative level name.
        admin_level: String,
        /// Course key.
        key:         String,
        /// Section name, when addressing a sub-instance.
        section:     Option<String>,
    },
}

impl CourseRef {
    /// Reference to `admin_level/key` in the default site.
    pub fn path(admin_level: impl Into<String>, key: impl Into<String>) -> Self {
        CourseRef::Path {
            site:        None,
            admin_level: admin_level.into(),
            key:         key.into(),
            section:     None,
        }
    }
}

impl FromStr for CourseRef {
    type Err = AdminError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.starts_with("tag:") {
            return Ok(CourseRef::Ntiid(s.to_string()));
        }

        let (site, rest) = match s.split_once("::") {
            Some((site, rest)) => (Some(site.to_string()), rest),
            None => (None, s),
        };
        let parts: Vec<&str> = rest.split('/').filter(|p| !p.is_empty()).collect();
        match parts.as_slice() {
            [admin_level, key] => Ok(CourseRef::Path {
                site,
                admin_level: admin_level.to_string(),
                key: key.to_string(),
                section: None,
            }),
            [admin_level, key, sections, name] if *sections == SECTIONS => Ok(CourseRef::Path {
                site,
                admin_level: admin_level.to_string(),
                key: key.to_string(),
                section: Some(name.to_string()),
            }),
            _ => Err(AdminError::InvalidCourse(s.to_string())),
        }
    }
}

impl fmt::Display for CourseRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CourseRef::Ntiid(ntiid) => write!(f, "{ntiid}"),
            CourseRef::Path {
                site,
                admin_level,
                key,
                section,
            } => {
                if let Some(site) = site {
                    write!(f, "{site}::")?;
                }
                write!(f, "{admin_level}/{key}")?;
                if let Some(section) = section {
                    write!(f, "/{SECTIONS}/{section}")?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn course_refs_parse_paths_and_ntiids() {
        let r: CourseRef = "Fall2015/CS1323".parse().unwrap();
        assert_eq!(r, CourseRef::path("Fall2015", "CS1323"));

        let r: CourseRef = "janux.ou.edu::Fall2015/CS1323/Sections/001".parse().unwrap();
        assert_eq!(r.to_string(), "janux.ou.edu::Fall2015/CS1323/Sections/001");

        let r: CourseRef = "tag:courses.example.org,2015:x".parse().unwrap();
        assert!(matches!(r, CourseRef::Ntiid(_)));

        assert!("CS1323".parse::<CourseRef>().is_err());
    }

    #[test]
    fn resolve_reports_invalid_course() {
        let mut registry = SiteRegistry::default();
        let level = registry.site_mut(None).unwrap().ensure_level("Fall2015");
        level
            .insert(Course::new("Fall2015", "CS1323", "tag:cs1323"))
            .unwrap();

        assert!(registry.resolve(&CourseRef::path("Fall2015", "CS1323")).is_ok());
        assert!(
            registry
                .resolve(&CourseRef::Ntiid("tag:cs1323".into()))
                .is_ok()
        );
        let err = registry
            .resolve(&CourseRef::path("Fall2015", "CS9999"))
            .unwrap_err();
        assert!(matches!(err, AdminError::InvalidCourse(_)));
    }

    #[test]
    fn inserting_a_duplicate_key_fails() {
        let mut level = AdministrativeLevel::new("Fall2015");
        level.insert(Course::new("Fall2015", "CS1323", "tag:a")).unwrap();
        let err = level
            .insert(Course::new("Fall2015", "CS1323", "tag:b"))
            .unwrap_err();
        assert!(matches!(err, AdminError::CourseAlreadyExists { .. }));
    }
}
