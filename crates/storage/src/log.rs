//! Commit log implementations
//!
//! `CommitLog` is the seam between the document store and its persistence
//! medium. An append either lands completely or leaves the log exactly as
//! it was; the store relies on this to keep a failed write invisible.

use crate::durability::DurabilityMode;
use crate::reader::{LogReadResult, LogReader};
use crate::record::{header_bytes, LogRecord, LOG_HEADER_SIZE};
use std::fs::{File, OpenOptions};
use std::io::{self, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// File name of the document log inside the data directory
pub const LOG_FILE_NAME: &str = "documents.log";

/// Append-only record sink
pub trait CommitLog: Send {
    /// Append one record
    ///
    /// On `Err`, nothing from this record is retained.
    fn append(&mut self, record: &LogRecord) -> io::Result<()>;

    /// Force any buffered data to stable storage
    fn flush(&mut self) -> io::Result<()>;

    /// Current log size in bytes, header included
    fn size(&self) -> u64;

    /// Name for debugging and logging
    fn name(&self) -> &str;
}

fn encode(record: &LogRecord) -> io::Result<Vec<u8>> {
    record
        .to_bytes()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Document log backed by a single file
pub struct FileLog {
    file: File,
    path: PathBuf,
    durability: DurabilityMode,
    write_position: u64,
    writes_since_sync: usize,
    last_sync_time: Instant,
    has_unsynced_data: bool,
    /// Set when a failed append could not be rolled back
    broken: bool,
}

impl FileLog {
    /// Open (or create) `documents.log` in `dir` and recover its records
    ///
    /// A torn or unreadable tail is truncated before the log accepts new
    /// appends. A file that is not a document log is refused.
    pub fn open(dir: &Path, durability: DurabilityMode) -> io::Result<(Self, LogReadResult)> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(LOG_FILE_NAME);

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;

        let mut result = LogReader.read_file(&path)?;

        if result.valid_end < LOG_HEADER_SIZE as u64 {
            // New file, or a crash before the header was complete
            file.set_len(0)?;
            file.seek(SeekFrom::Start(0))?;
            file.write_all(&header_bytes())?;
            file.sync_all()?;
            result = LogReadResult::empty();
        } else if result.needs_truncation() {
            warn!(
                path = %path.display(),
                valid_end = result.valid_end,
                file_len = result.file_len,
                stop_reason = ?result.stop_reason,
                "Truncating damaged document log tail"
            );
            file.set_len(result.valid_end)?;
            file.sync_all()?;
        }

        let write_position = file.seek(SeekFrom::End(0))?;

        info!(
            path = %path.display(),
            records = result.records.len(),
            skipped = result.skipped_corrupted,
            watermark = result.watermark(),
            "Opened document log"
        );

        Ok((
            FileLog {
                file,
                path,
                durability,
                write_position,
                writes_since_sync: 0,
                last_sync_time: Instant::now(),
                has_unsynced_data: false,
                broken: false,
            },
            result,
        ))
    }

    /// Path of the log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_record(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.file.write_all(bytes)?;
        self.writes_since_sync += 1;
        self.has_unsynced_data = true;
        self.maybe_sync()
    }

    fn maybe_sync(&mut self) -> io::Result<()> {
        match self.durability {
            DurabilityMode::Always => self.sync(),
            DurabilityMode::Standard {
                interval_ms,
                batch_size,
            } => {
                if self.writes_since_sync >= batch_size
                    || self.last_sync_time.elapsed().as_millis() as u64 >= interval_ms
                {
                    self.sync()?;
                }
                Ok(())
            }
            DurabilityMode::Cache => Ok(()),
        }
    }

    fn sync(&mut self) -> io::Result<()> {
        self.file.sync_data()?;
        self.writes_since_sync = 0;
        self.last_sync_time = Instant::now();
        self.has_unsynced_data = false;
        Ok(())
    }

    /// Cut the file back to `position` after a failed append
    fn rollback(&mut self, position: u64) {
        let restored = self
            .file
            .set_len(position)
            .and_then(|_| self.file.seek(SeekFrom::Start(position)))
            .and_then(|_| self.file.sync_data());
        if let Err(e) = restored {
            error!(
                path = %self.path.display(),
                position,
                error = %e,
                "Failed to roll back document log; refusing further appends"
            );
            self.broken = true;
        }
    }
}

impl CommitLog for FileLog {
    fn append(&mut self, record: &LogRecord) -> io::Result<()> {
        if self.broken {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                "document log is in an unknown state after a failed rollback",
            ));
        }

        let bytes = encode(record)?;
        let start = self.write_position;
        if let Err(e) = self.write_record(&bytes) {
            self.rollback(start);
            return Err(e);
        }
        self.write_position += bytes.len() as u64;

        debug!(seq = record.seq, bytes = bytes.len(), "Appended log record");
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.has_unsynced_data {
            self.sync()?;
        }
        Ok(())
    }

    fn size(&self) -> u64 {
        self.write_position
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for FileLog {
    fn drop(&mut self) {
        if self.has_unsynced_data {
            if let Err(e) = self.sync() {
                warn!(path = %self.path.display(), error = %e, "Failed to sync document log on close");
            }
        }
    }
}

/// Document log for cache durability
///
/// Nothing is retained: the store's snapshot already holds every document,
/// so appends are only encoded (to surface encoding errors) and counted.
#[derive(Debug, Clone)]
pub struct MemoryLog {
    size: u64,
    records: u64,
}

impl MemoryLog {
    /// Empty log (header only)
    pub fn new() -> Self {
        MemoryLog {
            size: LOG_HEADER_SIZE as u64,
            records: 0,
        }
    }

    /// Records appended so far
    pub fn records(&self) -> u64 {
        self.records
    }
}

impl Default for MemoryLog {
    fn default() -> Self {
        Self::new()
    }
}

impl CommitLog for MemoryLog {
    fn append(&mut self, record: &LogRecord) -> io::Result<()> {
        let encoded = encode(record)?.len() as u64;
        self.size += encoded;
        self.records += 1;
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn name(&self) -> &str {
        "memory"
    }
}
