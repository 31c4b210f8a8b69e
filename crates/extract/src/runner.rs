//! Bounded extraction
//!
//! Parsers for binary formats can be slow or pathological on hostile
//! input. `BoundedExtractor` runs each extraction on its own worker thread
//! and waits at most `ExtractionLimits::timeout` for the text. Inputs over
//! `max_input_bytes` are not parsed at all.
//!
//! A worker that overruns its deadline is detached, not killed; its result
//! is discarded when it eventually finishes. Detached workers still count
//! against `max_workers`, so once that many are in flight new extractions
//! are skipped instead of piling up more threads.

use crate::extractor::Extractor;
use docshelf_core::FormatTag;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Default cap on the size of an input that will be parsed (32 MiB)
pub const DEFAULT_MAX_INPUT_BYTES: usize = 32 * 1024 * 1024;

/// Default extraction deadline
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default cap on extraction workers alive at once
pub const DEFAULT_MAX_WORKERS: usize = 16;

const WORKER_NAME: &str = "docshelf-extract";

/// Resource limits applied to a single extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionLimits {
    /// Inputs larger than this are stored but yield empty text
    pub max_input_bytes: usize,
    /// Maximum time the caller waits for the worker
    pub timeout: Duration,
    /// Workers (including timed-out ones still running) allowed at once
    pub max_workers: usize,
}

impl Default for ExtractionLimits {
    fn default() -> Self {
        Self {
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
            timeout: DEFAULT_TIMEOUT,
            max_workers: DEFAULT_MAX_WORKERS,
        }
    }
}

/// Runs extraction under `ExtractionLimits`, never failing
///
/// Clones share one worker count.
#[derive(Debug, Clone, Default)]
pub struct BoundedExtractor {
    limits: ExtractionLimits,
    in_flight: Arc<AtomicUsize>,
}

/// Releases a worker slot when dropped
struct WorkerSlot(Arc<AtomicUsize>);

impl Drop for WorkerSlot {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

impl BoundedExtractor {
    /// Create a runner with the given limits
    pub fn new(limits: ExtractionLimits) -> Self {
        Self {
            limits,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Workers currently running, timed-out ones included
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }

    fn acquire_slot(&self) -> Option<WorkerSlot> {
        let max = self.limits.max_workers;
        self.in_flight
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (n < max).then_some(n + 1)
            })
            .ok()
            .map(|_| WorkerSlot(Arc::clone(&self.in_flight)))
    }

    /// Limits in effect
    pub fn limits(&self) -> ExtractionLimits {
        self.limits
    }

    /// Extract text from `bytes`; faults, oversize input, and timeouts
    /// all yield `""`
    pub fn run(&self, bytes: Arc<[u8]>, tag: FormatTag) -> String {
        let extractor = Extractor::for_format(tag);
        if extractor == Extractor::Noop {
            return String::new();
        }

        if bytes.len() > self.limits.max_input_bytes {
            warn!(
                format = ?tag,
                bytes = bytes.len(),
                max = self.limits.max_input_bytes,
                "input exceeds extraction cap, skipping"
            );
            return String::new();
        }

        let Some(slot) = self.acquire_slot() else {
            warn!(
                format = ?tag,
                max_workers = self.limits.max_workers,
                "too many extraction workers in flight, skipping"
            );
            return String::new();
        };

        let (tx, rx) = mpsc::sync_channel(1);
        let input = Arc::clone(&bytes);
        let spawned = thread::Builder::new()
            .name(WORKER_NAME.to_string())
            .spawn(move || {
                let text = extractor.extract(&input);
                drop(slot);
                // receiver may already be gone after a timeout
                let _ = tx.send(text);
            });

        if let Err(e) = spawned {
            warn!(format = ?tag, error = %e, "failed to spawn extraction worker");
            return String::new();
        }

        let started = Instant::now();
        match rx.recv_timeout(self.limits.timeout) {
            Ok(text) => {
                debug!(format = ?tag, elapsed_ms = started.elapsed().as_millis() as u64, "extraction finished");
                text
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                warn!(
                    format = ?tag,
                    bytes = bytes.len(),
                    timeout_ms = self.limits.timeout.as_millis() as u64,
                    "extraction timed out, using empty text"
                );
                String::new()
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                warn!(format = ?tag, "extraction worker exited without a result");
                String::new()
            }
        }
    }
}
