//! Document log file and record format.
//!
//! The log is a single append-only file, `documents.log`, in the data
//! directory.
//!
//! # File Layout
//!
//! ```text
//! ┌────────────────────────────────────┐
//! │ File Header (8 bytes)              │
//! ├────────────────────────────────────┤
//! │ Record 1                           │
//! ├────────────────────────────────────┤
//! │ Record 2                           │
//! ├────────────────────────────────────┤
//! │ ...                                │
//! └────────────────────────────────────┘
//! ```
//!
//! # Record Layout
//!
//! ```text
//! ┌─────────────────┬──────────────────┬─────────────────────────┬──────────┐
//! │ Length (4 bytes)│ Format Ver (1)   │ Payload (variable)      │ CRC32 (4)│
//! └─────────────────┴──────────────────┴─────────────────────────┴──────────┘
//!
//! Payload:
//! ┌──────────────┬──────────────────────────────────────────────┐
//! │ Seq (8)      │ Document (MessagePack, named fields)         │
//! └──────────────┴──────────────────────────────────────────────┘
//! ```
//!
//! The length field covers format version, payload, and CRC. The CRC
//! covers format version and payload.

use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};
use crc32fast::Hasher;
use docshelf_core::Document;

/// Magic bytes identifying a document log: "DSHL"
pub const LOG_MAGIC: [u8; 4] = *b"DSHL";

/// Current log file format version
pub const LOG_FORMAT_VERSION: u32 = 1;

/// Size of the file header in bytes
pub const LOG_HEADER_SIZE: usize = 8;

/// Current record format version
pub const RECORD_FORMAT_VERSION: u8 = 1;

/// Records claiming to be larger than this are treated as garbage
pub const MAX_RECORD_LEN: usize = 256 * 1024 * 1024;

/// Serialize the 8-byte file header
pub fn header_bytes() -> [u8; LOG_HEADER_SIZE] {
    let mut bytes = [0u8; LOG_HEADER_SIZE];
    bytes[0..4].copy_from_slice(&LOG_MAGIC);
    LittleEndian::write_u32(&mut bytes[4..8], LOG_FORMAT_VERSION);
    bytes
}

/// Validate a file header, returning the format version
pub fn parse_header(bytes: &[u8]) -> Result<u32, RecordError> {
    if bytes.len() < LOG_HEADER_SIZE {
        return Err(RecordError::InsufficientData);
    }
    if bytes[0..4] != LOG_MAGIC {
        return Err(RecordError::BadMagic);
    }
    let version = LittleEndian::read_u32(&bytes[4..8]);
    if version != LOG_FORMAT_VERSION {
        return Err(RecordError::UnsupportedVersion(version));
    }
    Ok(version)
}

/// One committed document write.
///
/// `seq` is the 1-based commit number assigned by the store; it is the
/// commit watermark after this record is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// Commit sequence number
    pub seq: u64,
    /// The committed document
    pub document: Document,
}

impl LogRecord {
    /// Create a new log record.
    pub fn new(seq: u64, document: Document) -> Self {
        LogRecord { seq, document }
    }

    /// Serialize record to bytes (for appending to the log).
    pub fn to_bytes(&self) -> Result<Vec<u8>, RecordError> {
        let doc = rmp_serde::to_vec_named(&self.document)
            .map_err(|e| RecordError::Payload(e.to_string()))?;

        let mut payload = Vec::with_capacity(9 + doc.len());
        payload.push(RECORD_FORMAT_VERSION);
        payload
            .write_u64::<LittleEndian>(self.seq)
            .map_err(|e| RecordError::Payload(e.to_string()))?;
        payload.extend_from_slice(&doc);

        let crc = compute_crc(&payload);

        let total_len = payload.len() + 4;
        if total_len > MAX_RECORD_LEN {
            return Err(RecordError::TooLarge(total_len));
        }
        let mut record = Vec::with_capacity(4 + total_len);
        record.extend_from_slice(&(total_len as u32).to_le_bytes());
        record.extend_from_slice(&payload);
        record.extend_from_slice(&crc.to_le_bytes());

        Ok(record)
    }

    /// Deserialize record from bytes.
    ///
    /// Returns (record, bytes_consumed) on success.
    pub fn from_bytes(bytes: &[u8]) -> Result<(Self, usize), RecordError> {
        if bytes.len() < 4 {
            return Err(RecordError::InsufficientData);
        }

        let length = LittleEndian::read_u32(&bytes[0..4]) as usize;
        if length < 5 || length > MAX_RECORD_LEN {
            // Minimum: 1 byte format version + 4 bytes CRC
            return Err(RecordError::InvalidFormat);
        }
        if bytes.len() < 4 + length {
            return Err(RecordError::InsufficientData);
        }

        let body = &bytes[4..4 + length];
        let payload = &body[..length - 4];
        let stored_crc = LittleEndian::read_u32(&body[length - 4..]);

        let computed_crc = compute_crc(payload);
        if computed_crc != stored_crc {
            return Err(RecordError::ChecksumMismatch {
                expected: stored_crc,
                computed: computed_crc,
            });
        }

        if payload[0] != RECORD_FORMAT_VERSION {
            return Err(RecordError::UnsupportedVersion(payload[0] as u32));
        }
        if payload.len() < 9 {
            return Err(RecordError::InvalidFormat);
        }

        let seq = LittleEndian::read_u64(&payload[1..9]);
        let document: Document = rmp_serde::from_slice(&payload[9..])
            .map_err(|e| RecordError::Payload(e.to_string()))?;

        Ok((LogRecord { seq, document }, 4 + length))
    }
}

fn compute_crc(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// Record parsing errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    /// Not enough data to parse record
    #[error("Insufficient data to parse record")]
    InsufficientData,

    /// Length prefix is out of range
    #[error("Invalid record format")]
    InvalidFormat,

    /// Checksum verification failed
    #[error("Checksum mismatch: expected {expected:08x}, computed {computed:08x}")]
    ChecksumMismatch {
        /// Expected checksum from record
        expected: u32,
        /// Computed checksum
        computed: u32,
    },

    /// Unsupported file or record format version
    #[error("Unsupported format version: {0}")]
    UnsupportedVersion(u32),

    /// File does not start with the log magic
    #[error("Not a document log (bad magic)")]
    BadMagic,

    /// CRC was valid but the document payload did not decode
    #[error("Payload error: {0}")]
    Payload(String),

    /// Encoded record exceeds `MAX_RECORD_LEN`
    #[error("Record too large: {0} bytes")]
    TooLarge(usize),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use docshelf_core::{DocumentDraft, DocumentId, TagSet};

    fn doc(title: &str) -> Document {
        Document::from_draft(
            DocumentId::new(),
            Utc::now(),
            DocumentDraft::text_only(title, "body text", TagSet::parse("a,b")),
        )
    }

    #[test]
    fn test_header_roundtrip() {
        let bytes = header_bytes();
        assert_eq!(&bytes[0..4], b"DSHL");
        assert_eq!(parse_header(&bytes).unwrap(), LOG_FORMAT_VERSION);
    }

    #[test]
    fn test_header_rejects_garbage() {
        assert_eq!(parse_header(b"DSH"), Err(RecordError::InsufficientData));
        assert_eq!(parse_header(b"XXXX\x01\0\0\0"), Err(RecordError::BadMagic));
        assert_eq!(
            parse_header(b"DSHL\x09\0\0\0"),
            Err(RecordError::UnsupportedVersion(9))
        );
    }

    #[test]
    fn test_record_roundtrip() {
        let record = LogRecord::new(42, doc("hello"));
        let bytes = record.to_bytes().unwrap();
        let (parsed, consumed) = LogRecord::from_bytes(&bytes).unwrap();
        assert_eq!(parsed, record);
        assert_eq!(consumed, bytes.len());
    }

    #[test]
    fn test_record_checksum_failure() {
        let mut bytes = LogRecord::new(1, doc("x")).to_bytes().unwrap();
        bytes[10] ^= 0xFF;
        assert!(matches!(
            LogRecord::from_bytes(&bytes),
            Err(RecordError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn test_record_insufficient_data() {
        assert_eq!(
            LogRecord::from_bytes(&[1, 2, 3]).unwrap_err(),
            RecordError::InsufficientData
        );
        assert_eq!(
            LogRecord::from_bytes(&[100, 0, 0, 0, 1, 2, 3]).unwrap_err(),
            RecordError::InsufficientData
        );
        let bytes = LogRecord::new(1, doc("x")).to_bytes().unwrap();
        assert_eq!(
            LogRecord::from_bytes(&bytes[..bytes.len() - 1]).unwrap_err(),
            RecordError::InsufficientData
        );
    }

    #[test]
    fn test_record_invalid_length() {
        assert_eq!(
            LogRecord::from_bytes(&[0, 0, 0, 0, 1]).unwrap_err(),
            RecordError::InvalidFormat
        );
        assert_eq!(
            LogRecord::from_bytes(&[0xFF, 0xFF, 0xFF, 0xFF, 1]).unwrap_err(),
            RecordError::InvalidFormat
        );
    }

    #[test]
    fn test_valid_crc_bad_payload() {
        // Hand-build a record whose CRC is right but whose body is not a document
        let mut payload = vec![RECORD_FORMAT_VERSION];
        payload.extend_from_slice(&7u64.to_le_bytes());
        payload.extend_from_slice(b"not msgpack");
        let crc = compute_crc(&payload);
        let mut bytes = ((payload.len() + 4) as u32).to_le_bytes().to_vec();
        bytes.extend_from_slice(&payload);
        bytes.extend_from_slice(&crc.to_le_bytes());

        assert!(matches!(
            LogRecord::from_bytes(&bytes),
            Err(RecordError::Payload(_))
        ));
    }

    #[test]
    fn test_multiple_records_in_sequence() {
        let records = vec![
            LogRecord::new(1, doc("one")),
            LogRecord::new(2, doc("two")),
            LogRecord::new(3, doc("three")),
        ];
        let mut all = Vec::new();
        for r in &records {
            all.extend_from_slice(&r.to_bytes().unwrap());
        }

        let mut offset = 0;
        for expected in &records {
            let (parsed, consumed) = LogRecord::from_bytes(&all[offset..]).unwrap();
            assert_eq!(&parsed, expected);
            offset += consumed;
        }
        assert_eq!(offset, all.len());
    }
}
