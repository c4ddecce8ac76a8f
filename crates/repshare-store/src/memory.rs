use std::collections::HashMap;

use repshare_types::{ChangeKind, ChangedPathEntry, NodeId, NodeRecord, Revision};

use crate::error::{StoreError, StoreResult};
use crate::format::StoreFormat;
use crate::traits::StorageBackend;

/// One path's change handed to [`InMemoryStore::push_revision`].
#[derive(Clone, Debug)]
pub struct RevisionChange {
    pub path: String,
    pub kind: ChangeKind,
    /// Node record backing the path after the change. `None` for deletes,
    /// which leave nothing to resolve at the deleting revision.
    pub node: Option<NodeRecord>,
}

impl RevisionChange {
    pub fn add(path: impl Into<String>, node: NodeRecord) -> Self {
        Self {
            path: path.into(),
            kind: ChangeKind::Add,
            node: Some(node),
        }
    }

    pub fn modify(path: impl Into<String>, node: NodeRecord) -> Self {
        Self {
            path: path.into(),
            kind: ChangeKind::Modify,
            node: Some(node),
        }
    }

    pub fn replace(path: impl Into<String>, node: NodeRecord) -> Self {
        Self {
            path: path.into(),
            kind: ChangeKind::Replace,
            node: Some(node),
        }
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: ChangeKind::Delete,
            node: None,
        }
    }
}

/// Table-backed store for tests and embedding.
///
/// Built up front with `&mut` calls to [`push_revision`], then scanned
/// through the shared [`StorageBackend`] view. Revision 0 always exists and
/// is empty, matching a freshly created store.
///
/// [`push_revision`]: InMemoryStore::push_revision
pub struct InMemoryStore {
    format: StoreFormat,
    revisions: Vec<Vec<ChangedPathEntry>>,
    nodes: HashMap<NodeId, NodeRecord>,
    resolutions: HashMap<(Revision, String), NodeId>,
}

impl InMemoryStore {
    /// Create an empty store of the supported revlog format.
    pub fn new() -> Self {
        Self::with_format(StoreFormat::Revlog)
    }

    /// Create an empty store reporting `format`. Useful for exercising the
    /// format gate with unsupported identifiers.
    pub fn with_format(format: StoreFormat) -> Self {
        Self {
            format,
            revisions: vec![Vec::new()],
            nodes: HashMap::new(),
            resolutions: HashMap::new(),
        }
    }

    /// Append a revision holding `changes` and return its number.
    ///
    /// Node ids are assigned per (revision, ordinal). Non-delete changes
    /// register both the node record and the path resolution at this
    /// revision; deletes register only the changed-path entry.
    pub fn push_revision(&mut self, changes: Vec<RevisionChange>) -> Revision {
        let revision = self.revisions.len() as Revision;
        let mut entries = Vec::with_capacity(changes.len());

        for (ordinal, change) in changes.into_iter().enumerate() {
            let node_id = NodeId::new(revision, ordinal as u64);
            entries.push(ChangedPathEntry::new(
                change.path.clone(),
                change.kind,
                node_id,
            ));
            if let Some(node) = change.node {
                self.nodes.insert(node_id, node);
                self.resolutions.insert((revision, change.path), node_id);
            }
        }

        self.revisions.push(entries);
        revision
    }

    /// Number of node records held by the store.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageBackend for InMemoryStore {
    fn store_format(&self) -> StoreFormat {
        self.format.clone()
    }

    fn youngest_revision(&self) -> StoreResult<Revision> {
        Ok((self.revisions.len() - 1) as Revision)
    }

    fn changed_paths(&self, revision: Revision) -> StoreResult<Vec<ChangedPathEntry>> {
        self.revisions
            .get(revision as usize)
            .cloned()
            .ok_or(StoreError::NoSuchRevision {
                revision,
                youngest: (self.revisions.len() - 1) as Revision,
            })
    }

    fn resolve_node_id(&self, revision: Revision, path: &str) -> StoreResult<NodeId> {
        self.resolutions
            .get(&(revision, path.to_string()))
            .copied()
            .ok_or_else(|| StoreError::NoSuchPath {
                revision,
                path: path.to_string(),
            })
    }

    fn fetch_node_record(&self, id: &NodeId) -> StoreResult<NodeRecord> {
        self.nodes
            .get(id)
            .cloned()
            .ok_or(StoreError::MissingNode(*id))
    }
}

impl std::fmt::Debug for InMemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryStore")
            .field("format", &self.format)
            .field("revisions", &self.revisions.len())
            .field("nodes", &self.nodes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use repshare_types::{ContentDigest, NodeKind, RepDescriptor};

    use super::*;

    fn file_node(revision: Revision, offset: u64, content: &[u8]) -> NodeRecord {
        NodeRecord::new(NodeKind::File).with_data_rep(RepDescriptor::with_digest(
            revision,
            offset,
            ContentDigest::of(content),
        ))
    }

    #[test]
    fn fresh_store_has_empty_revision_zero() {
        let store = InMemoryStore::new();
        assert_eq!(store.youngest_revision().unwrap(), 0);
        assert!(store.changed_paths(0).unwrap().is_empty());
    }

    #[test]
    fn push_revision_assigns_increasing_numbers() {
        let mut store = InMemoryStore::new();
        let r1 = store.push_revision(vec![RevisionChange::add("/a", file_node(1, 0, b"a"))]);
        let r2 = store.push_revision(vec![RevisionChange::modify("/a", file_node(2, 0, b"b"))]);
        assert_eq!((r1, r2), (1, 2));
        assert_eq!(store.youngest_revision().unwrap(), 2);
    }

    #[test]
    fn resolves_and_fetches_non_deleted_paths() {
        let mut store = InMemoryStore::new();
        let node = file_node(1, 16, b"contents");
        let rev = store.push_revision(vec![RevisionChange::add("/f", node.clone())]);

        let id = store.resolve_node_id(rev, "/f").unwrap();
        assert_eq!(store.fetch_node_record(&id).unwrap(), node);
    }

    #[test]
    fn deleted_path_does_not_resolve_at_deleting_revision() {
        let mut store = InMemoryStore::new();
        store.push_revision(vec![RevisionChange::add("/gone", file_node(1, 0, b"x"))]);
        let rev = store.push_revision(vec![RevisionChange::delete("/gone")]);

        let changes = store.changed_paths(rev).unwrap();
        assert_eq!(changes.len(), 1);
        assert!(changes[0].kind.is_delete());
        assert!(matches!(
            store.resolve_node_id(rev, "/gone"),
            Err(StoreError::NoSuchPath { .. })
        ));
    }

    #[test]
    fn unknown_revision_is_an_error() {
        let store = InMemoryStore::new();
        assert!(matches!(
            store.changed_paths(7),
            Err(StoreError::NoSuchRevision {
                revision: 7,
                youngest: 0
            })
        ));
    }

    #[test]
    fn reports_configured_format() {
        let store = InMemoryStore::with_format(StoreFormat::Other("bdb".into()));
        assert_eq!(store.store_format(), StoreFormat::Other("bdb".into()));
    }
}
