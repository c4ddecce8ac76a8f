use repshare_types::{NodeId, Revision};

/// Errors from storage backend operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested revision does not exist in the store.
    #[error("no such revision r{revision} (youngest is r{youngest})")]
    NoSuchRevision { revision: Revision, youngest: Revision },

    /// The path does not exist at the given revision's root.
    #[error("path '{path}' not found at r{revision}")]
    NoSuchPath { revision: Revision, path: String },

    /// A node id resolved earlier has no backing record.
    #[error("node record {0} is missing from the store")]
    MissingNode(NodeId),

    /// The store's format marker is absent or unreadable.
    #[error("store at '{path}' has no readable format marker")]
    MissingFormat { path: String },

    /// Snapshot document is malformed or cannot be decoded.
    #[error("malformed store document: {0}")]
    Malformed(#[from] serde_json::Error),

    /// I/O error from the underlying storage.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for backend operations.
pub type StoreResult<T> = Result<T, StoreError>;
