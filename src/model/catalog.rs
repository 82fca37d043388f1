#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use bon::Builder;
use serde::{Deserialize, Serialize};

/// Catalog metadata for a course or a course section.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(on(String, into))]
pub struct CatalogEntry {
    /// Unique identifier; set once when the course is created.
    #[serde(rename = "NTIID")]
    ntiid:                  String,
    /// Display title.
    #[serde(default)]
    #[builder(default)]
    pub title:              String,
    /// Registrar-facing identifier, e.g. `CS 1323`.
    #[serde(rename = "ProviderUniqueID", default)]
    #[builder(default)]
    pub provider_unique_id: String,
    /// Free-form description.
    #[serde(default)]
    #[builder(default)]
    pub description:        String,
    /// Whether the catalog entry is locked against re-import.
    #[serde(default)]
    #[builder(default)]
    pub locked:             bool,
}

impl CatalogEntry {
    /// Identifier of the catalog entry.
    pub fn ntiid(&self) -> &str {
        &self.ntiid
    }

    /// Copies the descriptive fields of `other`, keeping this entry's NTIID.
    pub fn update_from(&mut self, other: &CatalogEntry) {
        self.title = other.title.clone();
        self.provider_unique_id = other.provider_unique_id.clone();
        self.description = other.description.clone();
    }
}
