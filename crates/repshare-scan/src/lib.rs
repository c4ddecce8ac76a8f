//! Revision-scan and aggregation engine for repshare.
//!
//! Walks the full revision history of an append-only store through the
//! [`StorageBackend`] capability interface, resolves every changed path to
//! its node record, and tallies how many logical references point at each
//! distinct physical representation, deduplicated by content digest.
//!
//! # Pipeline
//!
//! [`RevisionWalker`] → [`ChangeSetResolver`] (per revision) →
//! [`TallySet::record_node`] (per changed path) → [`print_report`]
//! (after the full scan).
//!
//! # Guarantees
//!
//! - Revisions are visited exactly once, 0 through youngest inclusive,
//!   strictly increasing; the scan is single-threaded and synchronous.
//! - Tallies are append/increment-only during the scan and read-only once
//!   it completes; their size is bounded by the number of distinct
//!   representations, not by history length.
//! - Cancellation is cooperative: the [`CancelToken`] is polled before
//!   each revision and before each report line, and every error is
//!   terminal for the run.
//!
//! [`StorageBackend`]: repshare_store::StorageBackend

pub mod cancel;
pub mod error;
pub mod progress;
pub mod report;
pub mod resolver;
pub mod tally;
pub mod walker;

pub use cancel::CancelToken;
pub use error::{ScanError, ScanResult};
pub use progress::{NullProgress, ProgressSink, WriteProgress};
pub use report::print_report;
pub use resolver::ChangeSetResolver;
pub use tally::{
    Category, CategorySelection, InconsistencyPolicy, RepEntry, RepKey, Tally, TallySet,
};
pub use walker::{ensure_supported, scan, RevisionWalker, ScanOptions};
