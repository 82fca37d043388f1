#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{path::{Path, PathBuf}, sync::Arc};

use bon::Builder;

use crate::{
    archive::ArchiveResolver,
    config::ConfigState,
    course_io::{ArchiveExporter, ArchiveImporter, CourseExportUtility, CourseImportUtility},
    events::{EventSink, TracingSink},
    ntiid::NtiidFactory,
    permissions::Principal,
};

/// Collaborators every administrative operation runs against.
///
/// Passed explicitly to each operation instead of being looked up from
/// ambient state. Every field has a default, so
/// `AdminContext::builder().build()` is a working context.
#[derive(Builder)]
pub struct AdminContext {
    /// Populates courses from staged archives.
    #[builder(default = Box::new(ArchiveImporter) as Box<dyn CourseImportUtility>)]
    importer:   Box<dyn CourseImportUtility>,
    /// Serializes courses into a filer.
    #[builder(default = Box::new(ArchiveExporter) as Box<dyn CourseExportUtility>)]
    exporter:   Box<dyn CourseExportUtility>,
    /// Mints catalog NTIIDs.
    #[builder(default)]
    ntiids:     NtiidFactory,
    /// Receives created/imported/modified notifications.
    #[builder(default = Arc::new(TracingSink) as Arc<dyn EventSink>)]
    events:     Arc<dyn EventSink>,
    /// Resolves archive paths, extracting zips.
    #[builder(default)]
    resolver:   ArchiveResolver,
    /// Default destination for exports; a fresh temporary directory when unset.
    #[builder(into)]
    export_dir: Option<PathBuf>,
    /// Who is acting; permission checks are skipped when unset.
    principal:  Option<Principal>,
}

impl AdminContext {
    /// Context wired from the loaded configuration.
    pub fn from_config(config: &ConfigState) -> Self {
        let resolver = match config.temp_root() {
            Some(root) => ArchiveResolver::with_temp_root(root),
            None => ArchiveResolver::new(),
        };
        AdminContext::builder()
            .ntiids(NtiidFactory::new(config.ntiid_authority()))
            .resolver(resolver)
            .maybe_export_dir(config.export_dir().map(Path::to_path_buf))
            .build()
    }

    /// The course import utility.
    pub fn importer(&self) -> &dyn CourseImportUtility {
        self.importer.as_ref()
    }

    /// The course export utility.
    pub fn exporter(&self) -> &dyn CourseExportUtility {
        self.exporter.as_ref()
    }

    /// The NTIID factory.
    pub fn ntiids(&self) -> &NtiidFactory {
        &self.ntiids
    }

    /// The event sink.
    pub fn events(&self) -> &dyn EventSink {
        self.events.as_ref()
    }

    /// The archive resolver.
    pub fn resolver(&self) -> &ArchiveResolver {
        &self.resolver
    }

    /// The acting principal, if any.
    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    /// Context acting as `principal`.
    pub fn acting_as(mut self, principal: Principal) -> Self {
        self.principal = Some(principal);
        self
    }

    /// Default export destination, if configured.
    pub fn export_dir(&self) -> Option<&Path> {
        self.export_dir.as_deref()
    }
}

impl Default for AdminContext {
    fn default() -> Self {
        AdminContext::builder().build()
    }
}
