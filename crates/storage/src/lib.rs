//! Persistence layer for docshelf
//!
//! This crate implements the durable side of the document store:
//! - `LogRecord`: self-delimiting, checksummed record for one committed document
//! - `CommitLog`: append-only sink with all-or-nothing appends
//!   (`FileLog` on disk, `MemoryLog` for cache durability)
//! - `LogReader`: recovery scan that tolerates torn tails and bit rot
//! - `DurabilityMode`: when appends are fsynced
//! - `BlobStore`: verbatim storage of original uploads
//!
//! # Data Directory
//!
//! ```text
//! <data_dir>/
//! ├── docshelf.toml
//! ├── documents.log
//! └── uploads/
//!     └── 1718000000000-0_report.pdf
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod blob;
pub mod durability;
pub mod log;
pub mod reader;
pub mod record;
pub mod testing;

pub use blob::BlobStore;
pub use durability::DurabilityMode;
pub use log::{CommitLog, FileLog, MemoryLog, LOG_FILE_NAME};
pub use reader::{LogReadResult, LogReader, ReadStopReason};
pub use record::{LogRecord, RecordError};
