//! Original upload storage
//!
//! Uploaded files are kept verbatim under `<data_dir>/uploads/` with a
//! collision-free name derived from the original file name:
//!
//! ```text
//! <unix-millis>-<seq>_<sanitized stem><.ext>
//! ```
//!
//! The returned `SourceRef` is that stored name. In cache durability the
//! bytes are kept in memory instead.

use chrono::Utc;
use docshelf_core::{Error, Result, SourceRef};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// Directory (under the data dir) holding uploads
pub const UPLOADS_DIR: &str = "uploads";

/// Disambiguates uploads stored within the same millisecond
static UPLOAD_SEQ: AtomicU64 = AtomicU64::new(0);

/// Stem used when the original name has no usable characters
const EMPTY_STEM: &str = "file";

/// Longest stem kept in a stored name; keeps names under the 255-byte limit
pub const MAX_STEM_BYTES: usize = 200;

/// Longer extensions are dropped
pub const MAX_EXT_BYTES: usize = 16;

/// Fresh names tried before `put` gives up
const MAX_NAME_ATTEMPTS: usize = 16;

/// Where uploaded originals live
pub enum BlobStore {
    /// Files under an uploads directory
    Disk {
        /// The uploads directory
        dir: PathBuf,
    },
    /// In-memory map from stored name to bytes
    Memory(RwLock<FxHashMap<String, Arc<[u8]>>>),
}

impl BlobStore {
    /// Use `<data_dir>/uploads`, creating it if needed
    pub fn open(data_dir: &Path) -> Result<Self> {
        let dir = data_dir.join(UPLOADS_DIR);
        std::fs::create_dir_all(&dir)?;
        Ok(BlobStore::Disk { dir })
    }

    /// Keep uploads in memory
    pub fn in_memory() -> Self {
        BlobStore::Memory(RwLock::new(FxHashMap::default()))
    }

    /// Store `bytes` under a fresh name derived from `original_name`
    ///
    /// On disk the file is created exclusively and synced before this
    /// returns. A name that is already taken is never overwritten or
    /// removed; another name is tried instead.
    pub fn put(&self, original_name: &str, bytes: &[u8]) -> Result<SourceRef> {
        self.put_with(bytes, || stored_name(original_name))
    }

    fn put_with(&self, bytes: &[u8], mut next_name: impl FnMut() -> String) -> Result<SourceRef> {
        for _ in 0..MAX_NAME_ATTEMPTS {
            let name = next_name();
            let source = SourceRef::new(name.clone())
                .ok_or_else(|| Error::invalid_input(format!("unusable upload name '{}'", name)))?;

            let stored = match self {
                BlobStore::Disk { dir } => write_new(&dir.join(&name), bytes).map_err(|e| {
                    Error::persistence(format!("failed to store upload '{}': {}", name, e))
                })?,
                BlobStore::Memory(map) => {
                    let mut map = map.write();
                    if map.contains_key(&name) {
                        false
                    } else {
                        map.insert(name.clone(), Arc::from(bytes));
                        true
                    }
                }
            };

            if stored {
                debug!(source_ref = %source, bytes = bytes.len(), "Stored upload");
                return Ok(source);
            }
            debug!(name = %name, "Upload name taken, retrying");
        }

        Err(Error::persistence(format!(
            "no free upload name after {} attempts",
            MAX_NAME_ATTEMPTS
        )))
    }

    /// Read back the original bytes for `source`
    pub fn open_source(&self, source: &SourceRef) -> Result<Vec<u8>> {
        match self {
            BlobStore::Disk { dir } => match std::fs::read(dir.join(source.as_str())) {
                Ok(bytes) => Ok(bytes),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    Err(Error::not_found_raw(source.as_str()))
                }
                Err(e) => Err(Error::Io(e)),
            },
            BlobStore::Memory(map) => map
                .read()
                .get(source.as_str())
                .map(|b| b.to_vec())
                .ok_or_else(|| Error::not_found_raw(source.as_str())),
        }
    }

    /// Delete a stored upload (best-effort; failures are logged)
    pub fn remove(&self, source: &SourceRef) {
        match self {
            BlobStore::Disk { dir } => {
                if let Err(e) = std::fs::remove_file(dir.join(source.as_str())) {
                    if e.kind() != io::ErrorKind::NotFound {
                        warn!(source_ref = %source, error = %e, "Failed to remove upload");
                    }
                }
            }
            BlobStore::Memory(map) => {
                map.write().remove(source.as_str());
            }
        }
    }

    /// Whether uploads are persisted to disk
    pub fn is_persistent(&self) -> bool {
        matches!(self, BlobStore::Disk { .. })
    }
}

impl std::fmt::Debug for BlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlobStore::Disk { dir } => f.debug_struct("Disk").field("dir", dir).finish(),
            BlobStore::Memory(map) => f
                .debug_struct("Memory")
                .field("uploads", &map.read().len())
                .finish(),
        }
    }
}

/// Create `path` exclusively and write `bytes` to it
///
/// Returns `Ok(false)` without touching anything if `path` already exists.
/// If writing fails after creation, the partial file is removed.
fn write_new(path: &Path, bytes: &[u8]) -> io::Result<bool> {
    let mut file: File = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => return Ok(false),
        Err(e) => return Err(e),
    };
    let written = file.write_all(bytes).and_then(|_| file.sync_all());
    if let Err(e) = written {
        drop(file);
        let _ = std::fs::remove_file(path);
        return Err(e);
    }
    Ok(true)
}

/// `<millis>-<seq>_<stem><.ext>` for an original upload name
pub fn stored_name(original_name: &str) -> String {
    let (stem, ext) = split_name(original_name);
    let millis = Utc::now().timestamp_millis();
    let seq = UPLOAD_SEQ.fetch_add(1, Ordering::Relaxed);
    format!("{}-{}_{}{}", millis, seq, stem, ext)
}

/// Sanitized (stem, extension-with-dot) of an original file name
///
/// Only the final path component is kept.
pub fn split_name(original_name: &str) -> (String, String) {
    let base = original_name
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or(original_name);
    let (raw_stem, raw_ext) = match base.rfind('.') {
        Some(idx) if idx > 0 => (&base[..idx], &base[idx..]),
        _ => (base, ""),
    };

    let stem: String = raw_stem
        .chars()
        .filter(|c| !is_stripped(*c))
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();
    let ext: String = raw_ext
        .chars()
        .filter(|c| !is_stripped(*c) && !c.is_whitespace())
        .collect();

    let stem = if stem.is_empty() {
        EMPTY_STEM.to_string()
    } else {
        truncate_on_char_boundary(stem, MAX_STEM_BYTES)
    };
    let ext = if ext == "." || ext.len() > MAX_EXT_BYTES {
        String::new()
    } else {
        ext
    };
    (stem, ext)
}

fn truncate_on_char_boundary(mut s: String, max: usize) -> String {
    if s.len() > max {
        let mut end = max;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        s.truncate(end);
    }
    s
}

fn is_stripped(c: char) -> bool {
    matches!(c, '/' | '\\' | '\0') || (c.is_control() && !c.is_whitespace())
}
