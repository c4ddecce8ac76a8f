use std::fmt;

use serde::{Deserialize, Serialize};

use crate::digest::ContentDigest;

/// Revision number within the append-only store. Revision 0 is the empty
/// root; the youngest revision is the highest number present at scan time.
pub type Revision = u64;

/// Identifier of one node record, valid for the lifetime of the store.
///
/// Opaque to the scan engine: it is obtained from
/// `StorageBackend::resolve_node_id` and handed back unchanged to
/// `fetch_node_record`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId {
    /// Revision the node record was committed in.
    pub revision: Revision,
    /// Ordinal of the record within that revision.
    pub index: u64,
}

impl NodeId {
    pub const fn new(revision: Revision, index: u64) -> Self {
        Self { revision, index }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}/{}", self.revision, self.index)
    }
}

/// Kind of the versioned object a node record describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    File,
    Directory,
}

/// Physical location of one representation, plus its content digest when
/// the store recorded one.
///
/// The digest is absent for directory property lists and for records
/// written by legacy store versions; descriptors without a digest never
/// participate in sharing statistics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepDescriptor {
    /// Revision the representation was written in.
    pub revision: Revision,
    /// Byte offset (item index) of the representation within that revision.
    pub offset: u64,
    /// Content digest, when present.
    pub digest: Option<ContentDigest>,
}

impl RepDescriptor {
    /// Descriptor with a known content digest.
    pub fn with_digest(revision: Revision, offset: u64, digest: ContentDigest) -> Self {
        Self {
            revision,
            offset,
            digest: Some(digest),
        }
    }

    /// Descriptor whose digest the store did not record.
    pub fn without_digest(revision: Revision, offset: u64) -> Self {
        Self {
            revision,
            offset,
            digest: None,
        }
    }
}

/// Per-path, per-revision record naming the representations that back the
/// path's content at that revision.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub kind: NodeKind,
    /// Representation holding the object's data, if any.
    pub data_rep: Option<RepDescriptor>,
    /// Representation holding the object's properties, if any.
    pub prop_rep: Option<RepDescriptor>,
}

impl NodeRecord {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            data_rep: None,
            prop_rep: None,
        }
    }

    pub fn with_data_rep(mut self, rep: RepDescriptor) -> Self {
        self.data_rep = Some(rep);
        self
    }

    pub fn with_prop_rep(mut self, rep: RepDescriptor) -> Self {
        self.prop_rep = Some(rep);
        self
    }
}
