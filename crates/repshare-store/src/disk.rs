use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use repshare_types::{ChangeKind, ChangedPathEntry, NodeId, NodeRecord, Revision};

use crate::error::{StoreError, StoreResult};
use crate::format::StoreFormat;
use crate::memory::{InMemoryStore, RevisionChange};
use crate::traits::StorageBackend;

/// Name of the marker file identifying the store's physical format.
const FORMAT_FILE: &str = "format";

/// Name of the snapshot document holding the revision history.
const DOCUMENT_FILE: &str = "store.json";

/// Serialized form of one path change inside the snapshot document.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChangeDocument {
    pub path: String,
    pub kind: ChangeKind,
    /// Node record after the change; absent for deletes.
    #[serde(default)]
    pub node: Option<NodeRecord>,
}

/// On-disk snapshot of a revlog store's history.
///
/// `revisions[i]` holds the change set of revision `i + 1`; revision 0 is
/// always the empty root and is not serialized.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StoreDocument {
    pub revisions: Vec<Vec<ChangeDocument>>,
}

/// Write a store layout under `path`: the format marker plus, for revlog
/// stores, the snapshot document. Intended for fixtures and tooling; the
/// scan side of this crate never writes.
pub fn write_store(
    path: impl AsRef<Path>,
    format: &StoreFormat,
    document: &StoreDocument,
) -> StoreResult<()> {
    let path = path.as_ref();
    fs::create_dir_all(path)?;
    fs::write(path.join(FORMAT_FILE), format!("{format}\n"))?;
    if *format == StoreFormat::Revlog {
        let json = serde_json::to_string_pretty(document)?;
        fs::write(path.join(DOCUMENT_FILE), json)?;
    }
    Ok(())
}

/// Read-only adapter for an on-disk revlog snapshot.
///
/// Opening reads the format marker and, for revlog stores, loads the
/// snapshot document into in-memory tables; scanning then runs entirely
/// against those tables. Stores of a foreign format still open — they
/// report their declared format so the scan's gate can reject them by
/// name — but carry no history.
pub struct DiskStore {
    path: PathBuf,
    format: StoreFormat,
    inner: InMemoryStore,
}

impl DiskStore {
    /// Open the store at `path` without modifying it.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();

        let marker = fs::read_to_string(path.join(FORMAT_FILE)).map_err(|_| {
            StoreError::MissingFormat {
                path: path.display().to_string(),
            }
        })?;
        let format = StoreFormat::parse(marker.trim());

        let mut inner = InMemoryStore::with_format(format.clone());
        if format == StoreFormat::Revlog {
            let json = fs::read_to_string(path.join(DOCUMENT_FILE))?;
            let document: StoreDocument = serde_json::from_str(&json)?;
            for changes in document.revisions {
                inner.push_revision(
                    changes
                        .into_iter()
                        .map(|change| RevisionChange {
                            path: change.path,
                            kind: change.kind,
                            node: change.node,
                        })
                        .collect(),
                );
            }
        }

        Ok(Self {
            path,
            format,
            inner,
        })
    }

    /// Filesystem location the store was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StorageBackend for DiskStore {
    fn store_format(&self) -> StoreFormat {
        self.format.clone()
    }

    fn youngest_revision(&self) -> StoreResult<Revision> {
        self.inner.youngest_revision()
    }

    fn changed_paths(&self, revision: Revision) -> StoreResult<Vec<ChangedPathEntry>> {
        self.inner.changed_paths(revision)
    }

    fn resolve_node_id(&self, revision: Revision, path: &str) -> StoreResult<NodeId> {
        self.inner.resolve_node_id(revision, path)
    }

    fn fetch_node_record(&self, id: &NodeId) -> StoreResult<NodeRecord> {
        self.inner.fetch_node_record(id)
    }
}

impl std::fmt::Debug for DiskStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiskStore")
            .field("path", &self.path)
            .field("format", &self.format)
            .finish()
    }
}
