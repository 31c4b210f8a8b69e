//! Document log corruption utilities
//!
//! Simulates on-disk damage to `documents.log` for recovery tests.
//!
//! # Corruption Types
//!
//! - Truncation: removes bytes from the tail (crash during append)
//! - Garbage: appends bytes that are not a record
//! - Partial record: a length prefix promising more bytes than exist
//! - Bit flip: damages one byte inside a chosen record
//!
//! # Example
//!
//! ```ignore
//! use docshelf_storage::testing::LogCorruptionTester;
//!
//! let tester = LogCorruptionTester::new("path/to/data");
//! tester.truncate_tail(5)?;
//! // Reopening the store should keep every record before the torn one
//! ```

use crate::log::LOG_FILE_NAME;
use crate::reader::LogReader;
use crate::record::LOG_HEADER_SIZE;
use byteorder::{ByteOrder, LittleEndian};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Damages the document log of a data directory
pub struct LogCorruptionTester {
    data_dir: PathBuf,
}

impl LogCorruptionTester {
    /// Create a tester for the store rooted at `data_dir`
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        LogCorruptionTester {
            data_dir: data_dir.as_ref().to_path_buf(),
        }
    }

    /// Path of the document log
    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE_NAME)
    }

    /// Current size of the log file
    pub fn log_len(&self) -> io::Result<u64> {
        Ok(std::fs::metadata(self.log_path())?.len())
    }

    /// File offsets at which each intact record starts
    pub fn record_offsets(&self) -> io::Result<Vec<u64>> {
        let bytes = std::fs::read(self.log_path())?;
        let mut offsets = Vec::new();
        let mut pos = LOG_HEADER_SIZE;
        while pos + 4 <= bytes.len() {
            let len = LittleEndian::read_u32(&bytes[pos..pos + 4]) as usize;
            if len == 0 || pos + 4 + len > bytes.len() {
                break;
            }
            offsets.push(pos as u64);
            pos += 4 + len;
        }
        Ok(offsets)
    }

    /// Remove `bytes_to_remove` bytes from the end of the log
    pub fn truncate_tail(&self, bytes_to_remove: u64) -> io::Result<TruncationResult> {
        let original_size = self.log_len()?;
        let new_size = original_size.saturating_sub(bytes_to_remove);
        let file = std::fs::OpenOptions::new()
            .write(true)
            .open(self.log_path())?;
        file.set_len(new_size)?;
        Ok(TruncationResult {
            original_size,
            new_size,
        })
    }

    /// Append raw bytes to the log
    pub fn append_garbage(&self, garbage: &[u8]) -> io::Result<GarbageResult> {
        let original_size = self.log_len()?;
        let mut file = std::fs::OpenOptions::new()
            .append(true)
            .open(self.log_path())?;
        file.write_all(garbage)?;
        Ok(GarbageResult {
            original_size,
            new_size: original_size + garbage.len() as u64,
        })
    }

    /// Append the start of a record whose length prefix overshoots the file
    pub fn create_partial_record(&self) -> io::Result<GarbageResult> {
        let partial = [
            0x40, 0x00, 0x00, 0x00, // length prefix: 64 bytes follow
            0x01, // format version
            0x07, 0x00, 0x00, 0x00, // partial seq
        ];
        self.append_garbage(&partial)
    }

    /// XOR one payload byte of the `index`-th record
    pub fn flip_byte_in_record(&self, index: usize) -> io::Result<()> {
        let offsets = self.record_offsets()?;
        let start = *offsets.get(index).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("log has {} records, no index {}", offsets.len(), index),
            )
        })? as usize;

        let mut bytes = std::fs::read(self.log_path())?;
        // Past the length prefix and format version, inside the seq field
        let pos = start + 4 + 1 + 2;
        bytes[pos] ^= 0xA5;
        std::fs::write(self.log_path(), bytes)
    }

    /// Number of records a fresh scan recovers
    pub fn recoverable_records(&self) -> io::Result<usize> {
        Ok(LogReader.read_file(&self.log_path())?.records.len())
    }
}

/// Result of a tail truncation
#[derive(Debug)]
pub struct TruncationResult {
    /// File size before
    pub original_size: u64,
    /// File size after
    pub new_size: u64,
}

/// Result of appending bytes
#[derive(Debug)]
pub struct GarbageResult {
    /// File size before
    pub original_size: u64,
    /// File size after
    pub new_size: u64,
}
