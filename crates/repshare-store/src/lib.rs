//! Storage backend boundary for repshare.
//!
//! The scan engine never touches a store directly: it consumes the
//! [`StorageBackend`] capability trait, which exposes exactly the read-only
//! operations the scan needs — the youngest revision, per-revision changed
//! paths, node-id resolution, node-record fetch, and the store's physical
//! format identifier.
//!
//! # Backends
//!
//! - [`InMemoryStore`] — table-backed store for tests and embedding
//! - [`DiskStore`] — read-only adapter for an on-disk revlog snapshot
//!   (a `format` marker file next to a `store.json` document)
//!
//! # Design Rules
//!
//! 1. Backends are read-only: nothing here mutates a store.
//! 2. All I/O and lookup errors are propagated, never silently ignored.
//! 3. The backend never interprets representation contents; it only reports
//!    locations and digests recorded by the store.

pub mod disk;
pub mod error;
pub mod format;
pub mod memory;
pub mod traits;

pub use disk::{write_store, ChangeDocument, DiskStore, StoreDocument};
pub use error::{StoreError, StoreResult};
pub use format::StoreFormat;
pub use memory::{InMemoryStore, RevisionChange};
pub use traits::StorageBackend;
