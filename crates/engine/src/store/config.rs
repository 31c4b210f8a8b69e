//! Store configuration via `docshelf.toml`
//!
//! On first open a default `docshelf.toml` is written to the data
//! directory. To change settings, edit the file and reopen the store.

use docshelf_core::{Error, Result};
use docshelf_extract::ExtractionLimits;
use docshelf_storage::DurabilityMode;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;
use std::time::Duration;

/// Config file name placed in the data directory.
pub const CONFIG_FILE_NAME: &str = "docshelf.toml";

/// Page size of the original catalog view
pub const DEFAULT_PAGE_SIZE: usize = 6;

/// `[extraction]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExtractionConfig {
    /// Uploads larger than this are stored but not extracted
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: usize,
    /// Longest a single extraction may run, in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Extraction workers allowed at once, timed-out ones included
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,
}

fn default_max_file_bytes() -> usize {
    docshelf_extract::runner::DEFAULT_MAX_INPUT_BYTES
}

fn default_timeout_ms() -> u64 {
    docshelf_extract::runner::DEFAULT_TIMEOUT.as_millis() as u64
}

fn default_max_workers() -> usize {
    docshelf_extract::runner::DEFAULT_MAX_WORKERS
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: default_max_file_bytes(),
            timeout_ms: default_timeout_ms(),
            max_workers: default_max_workers(),
        }
    }
}

/// `[catalog]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Documents per catalog page when the caller gives no limit
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

/// Store configuration loaded from `docshelf.toml`.
///
/// # Example
///
/// ```toml
/// durability = "always"
///
/// [extraction]
/// max_file_bytes = 33554432
/// timeout_ms = 10000
/// max_workers = 16
///
/// [catalog]
/// page_size = 6
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocshelfConfig {
    /// Durability mode: `"always"`, `"standard"` or `"cache"`.
    #[serde(default = "default_durability_str")]
    pub durability: String,
    /// Extraction bounds
    #[serde(default)]
    pub extraction: ExtractionConfig,
    /// Catalog defaults
    #[serde(default)]
    pub catalog: CatalogConfig,
}

fn default_durability_str() -> String {
    "always".to_string()
}

impl Default for DocshelfConfig {
    fn default() -> Self {
        Self {
            durability: default_durability_str(),
            extraction: ExtractionConfig::default(),
            catalog: CatalogConfig::default(),
        }
    }
}

impl DocshelfConfig {
    /// Config for a store that never touches the filesystem
    pub fn cache() -> Self {
        Self {
            durability: "cache".to_string(),
            ..Self::default()
        }
    }

    /// Parse the durability string into a `DurabilityMode`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the string is not a known mode.
    pub fn durability_mode(&self) -> Result<DurabilityMode> {
        self.durability.parse::<DurabilityMode>().map_err(|e| {
            Error::invalid_input(format!("{} in {}", e, CONFIG_FILE_NAME))
        })
    }

    /// Bounds handed to the extraction runner
    pub fn extraction_limits(&self) -> ExtractionLimits {
        ExtractionLimits {
            max_input_bytes: self.extraction.max_file_bytes,
            timeout: Duration::from_millis(self.extraction.timeout_ms),
            max_workers: self.extraction.max_workers,
        }
    }

    /// Check every field, not just the durability string
    pub fn validate(&self) -> Result<()> {
        self.durability_mode()?;
        if self.extraction.timeout_ms == 0 {
            return Err(Error::invalid_input(format!(
                "extraction.timeout_ms must be positive in {}",
                CONFIG_FILE_NAME
            )));
        }
        if self.extraction.max_workers == 0 {
            return Err(Error::invalid_input(format!(
                "extraction.max_workers must be at least 1 in {}",
                CONFIG_FILE_NAME
            )));
        }
        if self.catalog.page_size == 0 {
            return Err(Error::invalid_input(format!(
                "catalog.page_size must be at least 1 in {}",
                CONFIG_FILE_NAME
            )));
        }
        Ok(())
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# docshelf configuration
#
# Durability mode: "always" (default), "standard" or "cache"
#   "always"   = fsync every write, zero data loss
#   "standard" = periodic fsync (~100ms), may lose last interval on crash
#   "cache"    = in-memory only, nothing is written to disk
durability = "always"

[extraction]
# Uploads larger than this are stored but not extracted (default: 32 MiB)
max_file_bytes = 33554432
# Longest a single extraction may run before it is abandoned (default: 10s)
timeout_ms = 10000
# Extraction threads alive at once; a timed-out one keeps its slot until
# it finishes, and uploads beyond the cap are stored without text
max_workers = 16

[catalog]
# Documents per page when `list` is given no limit
page_size = 6
"#
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            io_context(e, format!("failed to read config file '{}'", path.display()))
        })?;
        let config: DocshelfConfig = toml::from_str(&content).map_err(|e| {
            Error::invalid_input(format!(
                "failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Write the default config file if it does not already exist.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| {
                io_context(
                    e,
                    format!("failed to write default config file '{}'", path.display()),
                )
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::serialization(format!("failed to serialize config: {}", e)))?;
        std::fs::write(path, content).map_err(|e| {
            io_context(e, format!("failed to write config file '{}'", path.display()))
        })
    }
}

fn io_context(e: io::Error, context: String) -> Error {
    Error::Io(io::Error::new(e.kind(), format!("{}: {}", context, e)))
}
