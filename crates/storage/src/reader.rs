//! Document log reader for recovery.
//!
//! Reads every record after the file header, in order. A partial record
//! at the tail (crash during append) ends the scan; a record whose CRC
//! fails but whose length prefix is sane is skipped; anything else ends
//! the scan at that offset. `valid_end` is where the writer should
//! truncate before appending again.

use crate::record::{parse_header, LogRecord, RecordError, LOG_HEADER_SIZE, MAX_RECORD_LEN};
use byteorder::{ByteOrder, LittleEndian};
use std::path::Path;
use tracing::warn;

/// Why the scan stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadStopReason {
    /// Every byte was consumed by valid records
    EndOfData,
    /// The tail held an incomplete record (expected after a crash)
    PartialRecord {
        /// File offset of the incomplete record
        offset: u64,
    },
    /// A CRC mismatch whose record boundary could not be determined
    ChecksumMismatch {
        /// File offset of the corrupt record
        offset: u64,
    },
    /// CRC was valid (or the length was nonsense) but the record did not parse
    ParseError {
        /// File offset of the record
        offset: u64,
        /// Parser message
        detail: String,
    },
}

/// Outcome of scanning a document log
#[derive(Debug, Clone)]
pub struct LogReadResult {
    /// Valid records in file order
    pub records: Vec<LogRecord>,
    /// Offset just past the last byte worth keeping
    pub valid_end: u64,
    /// Size of the scanned input
    pub file_len: u64,
    /// Why the scan stopped
    pub stop_reason: ReadStopReason,
    /// Records skipped for checksum mismatch
    pub skipped_corrupted: usize,
}

impl LogReadResult {
    /// Result for a log with no records yet
    pub fn empty() -> Self {
        LogReadResult {
            records: Vec::new(),
            valid_end: LOG_HEADER_SIZE as u64,
            file_len: LOG_HEADER_SIZE as u64,
            stop_reason: ReadStopReason::EndOfData,
            skipped_corrupted: 0,
        }
    }

    /// Whether bytes past `valid_end` must be cut off
    pub fn needs_truncation(&self) -> bool {
        self.valid_end < self.file_len
    }

    /// Highest commit sequence number seen (0 for an empty log)
    pub fn watermark(&self) -> u64 {
        self.records.iter().map(|r| r.seq).max().unwrap_or(0)
    }
}

/// Stateless document log scanner
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReader;

impl LogReader {
    /// Scan the log file at `path`
    ///
    /// Fails only on I/O errors or a header that belongs to some other file
    /// format; record-level damage is reported in the result.
    pub fn read_file(&self, path: &Path) -> std::io::Result<LogReadResult> {
        let bytes = std::fs::read(path)?;
        self.read_bytes(&bytes)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    /// Scan an in-memory log image (header included)
    pub fn read_bytes(&self, bytes: &[u8]) -> Result<LogReadResult, RecordError> {
        let file_len = bytes.len() as u64;

        match parse_header(bytes) {
            Ok(_) => {}
            Err(RecordError::InsufficientData) => {
                // Crash before the header was fully written
                return Ok(LogReadResult {
                    records: Vec::new(),
                    valid_end: 0,
                    file_len,
                    stop_reason: ReadStopReason::PartialRecord { offset: 0 },
                    skipped_corrupted: 0,
                });
            }
            Err(e) => return Err(e),
        }

        let body = &bytes[LOG_HEADER_SIZE..];
        let base = LOG_HEADER_SIZE as u64;
        let mut records = Vec::new();
        let mut offset = 0usize;
        let mut valid_end = base;
        let mut stop_reason = ReadStopReason::EndOfData;
        let mut skipped_corrupted = 0usize;

        while offset < body.len() {
            let remaining = &body[offset..];
            match LogRecord::from_bytes(remaining) {
                Ok((record, consumed)) => {
                    records.push(record);
                    offset += consumed;
                    valid_end = base + offset as u64;
                }
                Err(RecordError::InsufficientData) => {
                    stop_reason = ReadStopReason::PartialRecord {
                        offset: base + offset as u64,
                    };
                    break;
                }
                Err(RecordError::ChecksumMismatch { .. }) => {
                    // Try to skip the corrupted record using its length field
                    let record_len = LittleEndian::read_u32(&remaining[0..4]) as usize;
                    if record_len > 0
                        && record_len <= MAX_RECORD_LEN
                        && remaining.len() >= 4 + record_len
                    {
                        warn!(
                            offset = base + offset as u64,
                            "Skipping corrupted log record (checksum mismatch)"
                        );
                        offset += 4 + record_len;
                        valid_end = base + offset as u64;
                        skipped_corrupted += 1;
                        continue;
                    }
                    stop_reason = ReadStopReason::ChecksumMismatch {
                        offset: base + offset as u64,
                    };
                    break;
                }
                Err(e) => {
                    stop_reason = ReadStopReason::ParseError {
                        offset: base + offset as u64,
                        detail: e.to_string(),
                    };
                    break;
                }
            }
        }

        Ok(LogReadResult {
            records,
            valid_end,
            file_len,
            stop_reason,
            skipped_corrupted,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::header_bytes;
    use chrono::Utc;
    use docshelf_core::{Document, DocumentDraft, DocumentId, TagSet};

    fn record(seq: u64, title: &str) -> LogRecord {
        let doc = Document::from_draft(
            DocumentId::new(),
            Utc::now(),
            DocumentDraft::text_only(title, "", TagSet::new()),
        );
        LogRecord::new(seq, doc)
    }

    fn image(records: &[LogRecord]) -> (Vec<u8>, Vec<usize>) {
        let mut bytes = header_bytes().to_vec();
        let mut offsets = Vec::new();
        for r in records {
            offsets.push(bytes.len());
            bytes.extend_from_slice(&r.to_bytes().unwrap());
        }
        (bytes, offsets)
    }

    #[test]
    fn test_empty_log() {
        let result = LogReader.read_bytes(&header_bytes()).unwrap();
        assert!(result.records.is_empty());
        assert!(!result.needs_truncation());
        assert_eq!(result.watermark(), 0);
        assert_eq!(result.stop_reason, ReadStopReason::EndOfData);
    }

    #[test]
    fn test_reads_all_in_order() {
        let records = vec![record(1, "a"), record(2, "b"), record(3, "c")];
        let (bytes, _) = image(&records);
        let result = LogReader.read_bytes(&bytes).unwrap();
        assert_eq!(result.records, records);
        assert_eq!(result.watermark(), 3);
        assert!(!result.needs_truncation());
    }

    #[test]
    fn test_torn_tail_is_truncated() {
        let (mut bytes, offsets) = image(&[record(1, "a"), record(2, "b")]);
        let full = bytes.len();
        bytes.truncate(full - 3);

        let result = LogReader.read_bytes(&bytes).unwrap();
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.valid_end, offsets[1] as u64);
        assert!(result.needs_truncation());
        assert!(matches!(result.stop_reason, ReadStopReason::PartialRecord { .. }));
    }

    #[test]
    fn test_checksum_mismatch_is_skipped() {
        let (mut bytes, offsets) = image(&[record(1, "a"), record(2, "b"), record(3, "c")]);
        // Flip a payload byte in the middle record
        bytes[offsets[1] + 12] ^= 0xFF;

        let result = LogReader.read_bytes(&bytes).unwrap();
        let seqs: Vec<u64> = result.records.iter().map(|r| r.seq).collect();
        assert_eq!(seqs, vec![1, 3]);
        assert_eq!(result.skipped_corrupted, 1);
        assert!(!result.needs_truncation());
    }

    #[test]
    fn test_garbage_length_stops_scan() {
        let (mut bytes, offsets) = image(&[record(1, "a")]);
        bytes.extend_from_slice(&[0xFF, 0xFF, 0xFF, 0xFF, 0x01, 0x02]);

        let result = LogReader.read_bytes(&bytes).unwrap();
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.valid_end, (offsets[0] + result_len(&bytes, offsets[0])) as u64);
        assert!(matches!(result.stop_reason, ReadStopReason::ParseError { .. }));
        assert!(result.needs_truncation());
    }

    fn result_len(bytes: &[u8], offset: usize) -> usize {
        4 + LittleEndian::read_u32(&bytes[offset..offset + 4]) as usize
    }

    #[test]
    fn test_short_header_is_partial() {
        let result = LogReader.read_bytes(b"DSH").unwrap();
        assert_eq!(result.valid_end, 0);
        assert!(result.needs_truncation());
    }

    #[test]
    fn test_foreign_file_is_rejected() {
        assert_eq!(
            LogReader.read_bytes(b"%PDF-1.5 something").unwrap_err(),
            RecordError::BadMagic
        );
    }
}
