//! Testing utilities for log durability and failure handling
//!
//! - **Corruption**: on-disk damage to `documents.log` for recovery tests
//! - **Failure injection**: a `CommitLog` wrapper that fails appends on demand
//!
//! # Example
//!
//! ```ignore
//! use docshelf_storage::testing::{FailingLog, LogCorruptionTester};
//!
//! let (log, switch) = FailingLog::new(Box::new(MemoryLog::new()));
//! switch.arm();
//! // every append through `log` now fails and leaves nothing behind
//! ```

mod corruption;
mod failing;

pub use corruption::{GarbageResult, LogCorruptionTester, TruncationResult};
pub use failing::{FailSwitch, FailingLog};
