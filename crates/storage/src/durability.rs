//! Durability mode configuration
//!
//! Controls when the document log is fsynced (Cache, Standard, Always).

use std::fmt;
use std::str::FromStr;

/// Durability mode for document log appends
///
/// | Mode | Files | fsync | Data Loss Window |
/// |------|-------|-------|------------------|
/// | Cache | none | never | everything on exit |
/// | Standard | log + uploads | every N writes or T ms | up to batch/interval |
/// | Always | log + uploads | every write | zero |
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DurabilityMode {
    /// In-memory only; no files are created
    Cache,

    /// fsync after every committed write (the default)
    #[default]
    Always,

    /// fsync every `batch_size` writes or `interval_ms`, whichever first
    Standard {
        /// Maximum time between fsyncs in milliseconds
        interval_ms: u64,
        /// Maximum writes between fsyncs
        batch_size: usize,
    },
}

impl DurabilityMode {
    /// Whether this mode writes a log file at all
    pub fn requires_log(&self) -> bool {
        !matches!(self, DurabilityMode::Cache)
    }

    /// Whether every append is followed by an fsync
    pub fn requires_immediate_fsync(&self) -> bool {
        matches!(self, DurabilityMode::Always)
    }

    /// `Standard { interval_ms: 100, batch_size: 1000 }`
    pub fn standard_default() -> Self {
        DurabilityMode::Standard {
            interval_ms: 100,
            batch_size: 1000,
        }
    }

    /// Config-file spelling of the mode
    pub fn as_str(&self) -> &'static str {
        match self {
            DurabilityMode::Cache => "cache",
            DurabilityMode::Always => "always",
            DurabilityMode::Standard { .. } => "standard",
        }
    }
}

impl fmt::Display for DurabilityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DurabilityMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cache" => Ok(DurabilityMode::Cache),
            "always" => Ok(DurabilityMode::Always),
            "standard" => Ok(DurabilityMode::standard_default()),
            other => Err(format!(
                "invalid durability mode '{}': expected \"cache\", \"standard\", or \"always\"",
                other
            )),
        }
    }
}
