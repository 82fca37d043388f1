#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex, OnceLock},
};

use anyhow::{Context, Result};
use tracing::{Level, metadata::LevelFilter};

use crate::constants::{DEFAULT_NTIID_AUTHORITY, DEFAULT_SITE};

/// Environment variable naming the persisted site registry.
pub const SITE_FILE_ENV: &str = "COURSE_ADMIN_SITE_FILE";
/// Environment variable naming the default site.
pub const DEFAULT_SITE_ENV: &str = "COURSE_ADMIN_DEFAULT_SITE";
/// Environment variable naming the parent of extraction and staging
/// directories.
pub const TMPDIR_ENV: &str = "COURSE_ADMIN_TMPDIR";
/// Environment variable naming the default export destination.
pub const EXPORT_DIR_ENV: &str = "COURSE_ADMIN_EXPORT_DIR";
/// Environment variable naming the NTIID authority.
pub const NTIID_AUTHORITY_ENV: &str = "COURSE_ADMIN_NTIID_AUTHORITY";
/// Environment variable holding the log level.
pub const LOG_ENV: &str = "COURSE_ADMIN_LOG";

/// Runtime configuration shared across the crate.
#[derive(Debug, Clone)]
pub struct ConfigState {
    /// JSON file the site registry is loaded from and saved to.
    site_file:       PathBuf,
    /// Site used when an operation names none.
    default_site:    String,
    /// Parent directory for temporary directories, system default when unset.
    temp_root:       Option<PathBuf>,
    /// Default export destination, a fresh temporary directory when unset.
    export_dir:      Option<PathBuf>,
    /// Authority stamped into minted NTIIDs.
    ntiid_authority: String,
    /// Maximum level of emitted log events.
    log_level:       LevelFilter,
}

impl ConfigState {
    /// Reads configuration from the process environment.
    fn new() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to
    /// its value. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let log_level = match read(LOG_ENV) {
            Some(value) => parse_level(&value)
                .with_context(|| format!("Invalid {LOG_ENV} value `{value}`"))?,
            None => LevelFilter::from_level(Level::INFO),
        };

        Ok(Self {
            site_file: read(SITE_FILE_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("site.json")),
            default_site: read(DEFAULT_SITE_ENV).unwrap_or_else(|| DEFAULT_SITE.to_string()),
            temp_root: read(TMPDIR_ENV).map(PathBuf::from),
            export_dir: read(EXPORT_DIR_ENV).map(PathBuf::from),
            ntiid_authority: read(NTIID_AUTHORITY_ENV)
                .unwrap_or_else(|| DEFAULT_NTIID_AUTHORITY.to_string()),
            log_level,
        })
    }

    /// Returns the site registry file.
    pub fn site_file(&self) -> &Path {
        &self.site_file
    }

    /// Returns the default site name.
    pub fn default_site(&self) -> &str {
        &self.default_site
    }

    /// Returns the temporary directory root, if configured.
    pub fn temp_root(&self) -> Option<&Path> {
        self.temp_root.as_deref()
    }

    /// Returns the default export destination, if configured.
    pub fn export_dir(&self) -> Option<&Path> {
        self.export_dir.as_deref()
    }

    /// Returns the NTIID authority.
    pub fn ntiid_authority(&self) -> &str {
        &self.ntiid_authority
    }

    /// Returns the log level filter.
    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }
}

/// Parses a level name such as `debug` or `warn`; `off` disables logging.
fn parse_level(value: &str) -> Result<LevelFilter> {
    value
        .parse::<LevelFilter>()
        .map_err(|e| anyhow::anyhow!("{e}"))
}

/// Shared configuration handle used throughout the crate.
#[derive(Clone)]
pub struct ConfigHandle(Arc<ConfigState>);

impl std::ops::Deref for ConfigHandle {
    type Target = ConfigState;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Global storage for the lazily constructed configuration state.
static CONFIG_SLOT: OnceLock<Mutex<Option<Arc<ConfigState>>>> = OnceLock::new();

/// Returns the mutex guarding the global configuration slot.
fn slot() -> &'static Mutex<Option<Arc<ConfigState>>> {
    CONFIG_SLOT.get_or_init(|| Mutex::new(None))
}

/// Ensure the global configuration has been initialized and return a handle.
pub fn ensure_initialized() -> Result<ConfigHandle> {
    let slot = slot();
    let mut guard = slot
        .lock()
        .map_err(|_| anyhow::anyhow!("Configuration slot is poisoned"))?;
    if let Some(cfg) = guard.as_ref() {
        return Ok(ConfigHandle(Arc::clone(cfg)));
    }

    let cfg = Arc::new(ConfigState::new()?);
    *guard = Some(Arc::clone(&cfg));
    Ok(ConfigHandle(cfg))
}
