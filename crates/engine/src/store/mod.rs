//! The document store
//!
//! `DocumentStore` is the single serialization point for persistence and
//! indexing. A write is committed in two steps under the writer mutex:
//!
//! 1. the record is appended to the commit log (and fsynced, per the
//!    durability mode);
//! 2. the document and its postings are published to the committed
//!    snapshot under its write lock.
//!
//! Readers only ever see the snapshot, so a document is either fully
//! visible (listed, fetchable and searchable) or not visible at all. If
//! step 1 fails, step 2 never runs and the log is left as it was.
//!
//! # Durability
//!
//! | Constructor | Files | Recovery |
//! |-------------|-------|----------|
//! | `in_memory()` | none | no |
//! | `open(path)` | `docshelf.toml`, `documents.log`, `uploads/` | yes |

pub mod config;

use crate::paginator::{page, Page};
use chrono::Utc;
use docshelf_core::{Document, DocumentDraft, DocumentId, Error, Limits, Result, SourceRef};
use docshelf_search::{DocTerms, InvertedIndex, SearchEngine, SearchHit};
use docshelf_storage::{BlobStore, CommitLog, DurabilityMode, FileLog, LogRecord, MemoryLog};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock, RwLockReadGuard};
use tracing::{debug, info, warn};

pub use config::{CatalogConfig, DocshelfConfig, ExtractionConfig, CONFIG_FILE_NAME};

/// Lock file guarding a data directory against a second open store
pub const LOCK_FILE_NAME: &str = ".lock";

/// The append side of the store; held for the whole of a write
struct Writer {
    log: Box<dyn CommitLog>,
    next_seq: u64,
}

/// Everything readers can observe
#[derive(Default)]
struct Snapshot {
    /// Committed documents in insertion order
    documents: Vec<Arc<Document>>,
    /// Identifier to position in `documents`
    by_id: FxHashMap<DocumentId, usize>,
    /// Postings keyed by position in `documents`
    index: InvertedIndex,
    /// Sequence number of the last applied record
    watermark: u64,
}

impl Snapshot {
    /// Publish one committed document
    fn apply(&mut self, seq: u64, document: Arc<Document>, terms: DocTerms) {
        let ordinal = self.documents.len();
        self.index.insert(ordinal, terms);
        self.by_id.insert(document.id(), ordinal);
        self.documents.push(document);
        self.watermark = seq;
    }
}

/// Point-in-time counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreStats {
    /// Committed documents
    pub documents: usize,
    /// Distinct indexed terms
    pub terms: usize,
    /// Sequence number of the last committed write
    pub watermark: u64,
    /// Size of the commit log in bytes
    pub log_bytes: u64,
    /// How writes are persisted
    pub durability: DurabilityMode,
}

/// Immutable document store with a full-text index
pub struct DocumentStore {
    data_dir: Option<PathBuf>,
    config: DocshelfConfig,
    durability: DurabilityMode,
    limits: Limits,
    writer: Mutex<Writer>,
    snapshot: RwLock<Snapshot>,
    blobs: BlobStore,
    engine: SearchEngine,
    /// Exclusive lock on `<data_dir>/.lock`, held while the store is open
    _lock_file: Option<File>,
}

impl DocumentStore {
    /// Open (or create) a store in `path`
    ///
    /// Writes a default `docshelf.toml` on first open and uses whatever
    /// the file says afterwards.
    ///
    /// # Example
    ///
    /// ```text
    /// use docshelf_engine::DocumentStore;
    ///
    /// let store = DocumentStore::open("/var/lib/docshelf")?;
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Arc<Self>> {
        let data_dir = path.as_ref().to_path_buf();
        std::fs::create_dir_all(&data_dir)?;

        let config_path = data_dir.join(CONFIG_FILE_NAME);
        DocshelfConfig::write_default_if_missing(&config_path)?;
        let cfg = DocshelfConfig::from_file(&config_path)?;

        Self::open_with_config(path, cfg)
    }

    /// Open a store in `path` with an explicit configuration
    ///
    /// The config is written to `docshelf.toml` so a later `open` picks up
    /// the same settings. With `durability = "cache"` nothing but the
    /// config and lock files is written and the store starts empty.
    ///
    /// # Errors
    ///
    /// Fails with `Persistence` if another store (in this or any other
    /// process) has the directory open.
    pub fn open_with_config<P: AsRef<Path>>(path: P, cfg: DocshelfConfig) -> Result<Arc<Self>> {
        let data_dir = path.as_ref().to_path_buf();
        std::fs::create_dir_all(&data_dir)?;

        cfg.validate()?;
        let mode = cfg.durability_mode()?;
        let lock_file = lock_data_dir(&data_dir)?;
        cfg.write_to_file(&data_dir.join(CONFIG_FILE_NAME))?;

        let mut store = if mode.requires_log() {
            let (log, recovered) = FileLog::open(&data_dir, mode)?;
            let blobs = BlobStore::open(&data_dir)?;
            Self::assemble(
                Some(data_dir),
                cfg,
                Box::new(log),
                recovered.records,
                blobs,
            )
        } else {
            info!(path = %data_dir.display(), "Opening store in cache mode; nothing will be persisted");
            Self::assemble(
                None,
                cfg,
                Box::new(MemoryLog::new()),
                Vec::new(),
                BlobStore::in_memory(),
            )
        };
        store._lock_file = Some(lock_file);
        Ok(Arc::new(store))
    }

    /// Store with no files at all
    pub fn in_memory() -> Arc<Self> {
        Arc::new(Self::assemble(
            None,
            DocshelfConfig::cache(),
            Box::new(MemoryLog::new()),
            Vec::new(),
            BlobStore::in_memory(),
        ))
    }

    /// Empty store over a caller-supplied log
    ///
    /// Used to put a failure-injecting log underneath the store. The log
    /// is assumed to hold no records yet.
    pub fn with_log(log: Box<dyn CommitLog>, blobs: BlobStore, cfg: DocshelfConfig) -> Arc<Self> {
        Arc::new(Self::assemble(None, cfg, log, Vec::new(), blobs))
    }

    fn assemble(
        data_dir: Option<PathBuf>,
        config: DocshelfConfig,
        log: Box<dyn CommitLog>,
        records: Vec<LogRecord>,
        blobs: BlobStore,
    ) -> Self {
        let durability = config.durability_mode().unwrap_or_default();
        let snapshot = replay(records);
        let next_seq = snapshot.watermark + 1;

        info!(
            documents = snapshot.documents.len(),
            terms = snapshot.index.term_count(),
            watermark = snapshot.watermark,
            log = log.name(),
            durability = %durability,
            "Document store ready"
        );

        DocumentStore {
            data_dir,
            config,
            durability,
            limits: Limits::default(),
            writer: Mutex::new(Writer { log, next_seq }),
            snapshot: RwLock::new(snapshot),
            blobs,
            engine: SearchEngine::default(),
            _lock_file: None,
        }
    }

    #[cfg(test)]
    fn set_limits(&mut self, limits: Limits) {
        self.limits = limits;
    }

    #[cfg(test)]
    pub(crate) fn in_memory_with_limits(limits: Limits) -> Arc<Self> {
        let mut store = DocumentStore::assemble(
            None,
            DocshelfConfig::cache(),
            Box::new(MemoryLog::new()),
            Vec::new(),
            BlobStore::in_memory(),
        );
        store.set_limits(limits);
        Arc::new(store)
    }

    /// Field size limits every write is checked against
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    // ========================================================================
    // Write path
    // ========================================================================

    /// Commit a new document
    ///
    /// Assigns the identifier and creation time, appends the record to the
    /// log and publishes it to readers. On any error nothing is committed:
    /// the document is neither listed, fetchable nor searchable, now or
    /// after a reopen.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if the draft violates the limits
    /// - `Persistence` if the log append fails
    pub fn write(&self, draft: DocumentDraft) -> Result<Arc<Document>> {
        draft.validate(&self.limits)?;

        let document = Document::from_draft(DocumentId::new(), Utc::now(), draft);
        let terms = DocTerms::from_document(&document);

        let mut writer = self.writer.lock();
        // Only writers take the write lock and they all hold `writer`, so
        // the snapshot cannot become poisoned between here and publishing.
        if self.snapshot.is_poisoned() {
            return Err(Error::persistence("document snapshot is poisoned"));
        }

        let seq = writer.next_seq;
        let record = LogRecord::new(seq, document);
        if let Err(e) = writer.log.append(&record) {
            warn!(doc_id = %record.document.id(), seq, error = %e, "Document write failed");
            return Err(Error::persistence(format!("failed to append to document log: {}", e)));
        }
        writer.next_seq += 1;

        let document = Arc::new(record.document);
        let mut snapshot = self
            .snapshot
            .write()
            .map_err(|_| Error::persistence("document snapshot is poisoned"))?;
        snapshot.apply(seq, Arc::clone(&document), terms);
        drop(snapshot);
        drop(writer);

        debug!(
            doc_id = %document.id(),
            seq,
            format = ?document.format(),
            bytes = document.content().len(),
            "Committed document"
        );
        Ok(document)
    }

    /// Force buffered log writes to disk
    pub fn flush(&self) -> Result<()> {
        self.writer
            .lock()
            .log
            .flush()
            .map_err(|e| Error::persistence(format!("failed to flush document log: {}", e)))
    }

    // ========================================================================
    // Read path
    // ========================================================================

    fn read(&self) -> Result<RwLockReadGuard<'_, Snapshot>> {
        self.snapshot
            .read()
            .map_err(|_| Error::query("document snapshot is poisoned"))
    }

    /// Look up a committed document
    ///
    /// # Errors
    ///
    /// `NotFound` if no document with this identifier was committed.
    pub fn get_by_id(&self, id: DocumentId) -> Result<Arc<Document>> {
        let snapshot = self.read()?;
        snapshot
            .by_id
            .get(&id)
            .map(|&ordinal| Arc::clone(&snapshot.documents[ordinal]))
            .ok_or_else(|| Error::not_found(id))
    }

    /// Look up by the textual identifier a client sent
    ///
    /// Text that is not an identifier at all is reported as `NotFound`,
    /// the same as an identifier that was never committed.
    pub fn get_by_str(&self, id: &str) -> Result<Arc<Document>> {
        match DocumentId::from_string(id) {
            Some(id) => self.get_by_id(id),
            None => Err(Error::not_found_raw(id)),
        }
    }

    /// Every committed document, in insertion order
    pub fn list_all(&self) -> Result<Vec<Arc<Document>>> {
        Ok(self.read()?.documents.clone())
    }

    /// One catalog page of `list_all()`
    pub fn list_page(&self, offset: usize, limit: usize) -> Result<Page<Arc<Document>>> {
        let snapshot = self.read()?;
        Ok(page(&snapshot.documents, offset, limit))
    }

    /// Ranked documents matching `query`
    ///
    /// A blank query yields an empty result.
    pub fn search(&self, query: &str) -> Result<Vec<Arc<Document>>> {
        Ok(self
            .search_hits(query)?
            .into_iter()
            .map(|hit| hit.document)
            .collect())
    }

    /// Ranked matches with their scores
    pub fn search_hits(&self, query: &str) -> Result<Vec<SearchHit>> {
        let snapshot = self.read()?;
        self.engine
            .search(&snapshot.index, &snapshot.documents, query)
    }

    /// Document count, index size and commit watermark
    pub fn stats(&self) -> Result<StoreStats> {
        let log_bytes = self.writer.lock().log.size();
        let snapshot = self.read()?;
        Ok(StoreStats {
            documents: snapshot.documents.len(),
            terms: snapshot.index.term_count(),
            watermark: snapshot.watermark,
            log_bytes,
            durability: self.durability,
        })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Where original uploads are kept
    pub fn blobs(&self) -> &BlobStore {
        &self.blobs
    }

    /// Original bytes of an uploaded file
    pub fn open_source(&self, source: &SourceRef) -> Result<Vec<u8>> {
        self.blobs.open_source(source)
    }

    /// Active configuration
    pub fn config(&self) -> &DocshelfConfig {
        &self.config
    }

    /// Data directory, `None` for a store with no files
    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }

    /// Whether committed writes survive a restart
    pub fn is_persistent(&self) -> bool {
        self.data_dir.is_some()
    }
}

impl std::fmt::Debug for DocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentStore")
            .field("data_dir", &self.data_dir)
            .field("durability", &self.durability)
            .field("blobs", &self.blobs)
            .finish()
    }
}

/// Rebuild the snapshot from recovered records, in log order
/// Take the exclusive lock on `<dir>/.lock`
///
/// Two logs appending to the same file would overwrite each other's
/// records, so a directory is only ever open in one store.
fn lock_data_dir(dir: &Path) -> Result<File> {
    let lock_path = dir.join(LOCK_FILE_NAME);
    let lock_file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .read(true)
        .write(true)
        .open(&lock_path)
        .map_err(|e| Error::persistence(format!("failed to open lock file: {}", e)))?;
    fs2::FileExt::try_lock_exclusive(&lock_file).map_err(|_| {
        Error::persistence(format!(
            "data directory '{}' is already in use by another store",
            dir.display()
        ))
    })?;
    Ok(lock_file)
}

fn replay(records: Vec<LogRecord>) -> Snapshot {
    let mut snapshot = Snapshot::default();
    let mut watermark = 0;
    for record in records {
        watermark = watermark.max(record.seq);
        let id = record.document.id();
        if snapshot.by_id.contains_key(&id) {
            warn!(doc_id = %id, seq = record.seq, "Skipping duplicate document in log");
            continue;
        }
        let terms = DocTerms::from_document(&record.document);
        snapshot.apply(record.seq, Arc::new(record.document), terms);
    }
    snapshot.watermark = watermark;
    snapshot
}
