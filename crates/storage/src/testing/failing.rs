//! Failure injection for commit logs
//!
//! `FailingLog` wraps any `CommitLog` and, while its `FailSwitch` is armed,
//! rejects appends without forwarding them. The switch is shared, so a test
//! can hand the log to a store and still toggle failures from outside.

use crate::log::CommitLog;
use crate::record::LogRecord;
use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Shared control for a `FailingLog`
#[derive(Debug, Clone, Default)]
pub struct FailSwitch {
    armed: Arc<AtomicBool>,
    rejected: Arc<AtomicUsize>,
}

impl FailSwitch {
    /// Make every subsequent append fail
    pub fn arm(&self) {
        self.armed.store(true, Ordering::SeqCst);
    }

    /// Let appends through again
    pub fn disarm(&self) {
        self.armed.store(false, Ordering::SeqCst);
    }

    /// Whether appends are currently failing
    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::SeqCst)
    }

    /// Appends rejected so far
    pub fn rejected(&self) -> usize {
        self.rejected.load(Ordering::SeqCst)
    }
}

/// A `CommitLog` that fails on demand
pub struct FailingLog {
    inner: Box<dyn CommitLog>,
    switch: FailSwitch,
}

impl FailingLog {
    /// Wrap `inner`; the returned switch starts disarmed
    pub fn new(inner: Box<dyn CommitLog>) -> (Self, FailSwitch) {
        let switch = FailSwitch::default();
        (
            FailingLog {
                inner,
                switch: switch.clone(),
            },
            switch,
        )
    }
}

impl CommitLog for FailingLog {
    fn append(&mut self, record: &LogRecord) -> io::Result<()> {
        if self.switch.is_armed() {
            self.switch.rejected.fetch_add(1, Ordering::SeqCst);
            return Err(io::Error::new(
                io::ErrorKind::Other,
                "injected append failure",
            ));
        }
        self.inner.append(record)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }

    fn size(&self) -> u64 {
        self.inner.size()
    }

    fn name(&self) -> &str {
        "failing"
    }
}
