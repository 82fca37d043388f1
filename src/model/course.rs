#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{
    catalog::CatalogEntry,
    outline::{LessonOverview, OutlineNode},
};
use crate::roles::RoleAssignments;

/// Where an imported content file lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Storage {
    /// Written out to durable storage.
    Durable,
    /// Kept only for the lifetime of the content tree.
    #[default]
    Transient,
}

/// A file in a course's root content folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentFile {
    /// Raw file contents.
    pub data:    Vec<u8>,
    /// Durable or transient.
    #[serde(default)]
    pub storage: Storage,
}

/// The root content folder of a course, keyed by file name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentFolder {
    /// Files by name.
    files: BTreeMap<String, ContentFile>,
}

impl ContentFolder {
    /// Adds or replaces a file.
    pub fn insert(&mut self, name: impl Into<String>, data: Vec<u8>, storage: Storage) {
        self.files.insert(name.into(), ContentFile { data, storage });
    }

    /// Looks a file up by name.
    pub fn get(&self, name: &str) -> Option<&ContentFile> {
        self.files.get(name)
    }

    /// Whether a file with `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.files.contains_key(name)
    }

    /// Removes every file.
    pub fn clear(&mut self) {
        self.files.clear();
    }

    /// Number of files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// True when there are no files.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// `(name, file)` pairs in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ContentFile)> {
        self.files.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// A course instance, or a section (sub-instance) of one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// Course key (name) under its administrative level, or section name.
    pub key:         String,
    /// Name of the administrative level the course lives under.
    pub admin_level: String,
    /// Catalog metadata.
    pub catalog:     CatalogEntry,
    /// Outline tree; its root is the outline container.
    pub outline:     OutlineNode,
    /// Lesson overviews by NTIID, referenced from outline nodes.
    #[serde(default)]
    pub lessons:     BTreeMap<String, LessonOverview>,
    /// Sub-instances by section name.
    #[serde(default)]
    pub sections:    BTreeMap<String, Course>,
    /// Root content folder.
    #[serde(default)]
    pub content:     ContentFolder,
    /// Instructor and editor assignments.
    #[serde(default)]
    pub roles:       RoleAssignments,
}

impl Course {
    /// Creates an empty course whose catalog entry carries `ntiid`.
    pub fn new(
        admin_level: impl Into<String>,
        key: impl Into<String>,
        ntiid: impl Into<String>,
    ) -> Self {
        let key = key.into();
        let ntiid = ntiid.into();
        let catalog = CatalogEntry::builder()
            .ntiid(ntiid.clone())
            .title(key.clone())
            .provider_unique_id(key.clone())
            .build();

        Self {
            outline: OutlineNode::root(format!("{ntiid}.outline")),
            key,
            admin_level: admin_level.into(),
            catalog,
            lessons: BTreeMap::new(),
            sections: BTreeMap::new(),
            content: ContentFolder::default(),
            roles: RoleAssignments::default(),
        }
    }

    /// Catalog NTIIDs of this course and all of its (nested) sections.
    pub fn catalog_ntiids(&self) -> Vec<&str> {
        let mut ids = vec![self.catalog.ntiid()];
        ids.extend(self.sections.values().flat_map(Course::catalog_ntiids));
        ids
    }

    /// Adds a section shell named `name`; an existing section is returned as is.
    pub fn add_section(&mut self, name: &str, ntiid: impl Into<String>) -> &mut Course {
        let admin_level = self.admin_level.clone();
        self.sections
            .entry(name.to_string())
            .or_insert_with(|| Course::new(admin_level, name, ntiid))
    }

    /// Finds this course or one of its (nested) sections by catalog NTIID.
    pub fn find(&self, ntiid: &str) -> Option<&Course> {
        if self.catalog.ntiid() == ntiid {
            return Some(self);
        }
        self.sections.values().find_map(|s| s.find(ntiid))
    }

    /// Mutable variant of [`Course::find`].
    pub fn find_mut(&mut self, ntiid: &str) -> Option<&mut Course> {
        if self.catalog.ntiid() == ntiid {
            return Some(self);
        }
        self.sections.values_mut().find_map(|s| s.find_mut(ntiid))
    }
}
