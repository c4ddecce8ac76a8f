use repshare_types::{ChangedPathEntry, NodeId, NodeRecord, Revision};

use crate::error::StoreResult;
use crate::format::StoreFormat;

/// Read-only capability interface over an append-only versioned store.
///
/// All implementations must satisfy these invariants:
/// - The store is append-only: a (revision, offset) location never changes
///   content once written, so descriptors fetched through this trait are
///   stable identifiers for the life of a scan.
/// - Revisions are dense: every revision from 0 through
///   `youngest_revision()` exists and can be enumerated.
/// - `resolve_node_id` returns the id valid at the revision's root, never a
///   transient id from a commit in progress.
/// - Lookup and I/O errors are propagated, never silently ignored.
pub trait StorageBackend: Send + Sync {
    /// The store's physical format identifier.
    fn store_format(&self) -> StoreFormat;

    /// The highest revision number present in the store.
    fn youngest_revision(&self) -> StoreResult<Revision>;

    /// The set of paths changed in `revision`, with their change kinds.
    fn changed_paths(&self, revision: Revision) -> StoreResult<Vec<ChangedPathEntry>>;

    /// Resolve `path` to the node id valid at `revision`'s root.
    ///
    /// Fails with `StoreError::NoSuchPath` if the path does not exist there
    /// — in particular, for a path deleted in `revision`.
    fn resolve_node_id(&self, revision: Revision, path: &str) -> StoreResult<NodeId>;

    /// Fetch the node record behind a resolved id.
    fn fetch_node_record(&self, id: &NodeId) -> StoreResult<NodeRecord>;
}
