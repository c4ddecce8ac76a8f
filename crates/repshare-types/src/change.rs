use std::fmt;

use serde::{Deserialize, Serialize};

use crate::node::NodeId;

/// How a path changed within one revision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Add,
    Modify,
    Delete,
    Replace,
}

impl ChangeKind {
    /// Deleted paths no longer exist at the deleting revision's root, so
    /// they must never be resolved there.
    pub fn is_delete(&self) -> bool {
        matches!(self, ChangeKind::Delete)
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChangeKind::Add => "add",
            ChangeKind::Modify => "modify",
            ChangeKind::Delete => "delete",
            ChangeKind::Replace => "replace",
        };
        write!(f, "{s}")
    }
}

/// One path's change within a single revision's change set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangedPathEntry {
    pub path: String,
    pub kind: ChangeKind,
    /// Node identifier recorded with the change. May be a transient id from
    /// the commit in progress; consumers wanting the id valid at the
    /// revision's root should resolve it through the backend instead.
    pub node_id: NodeId,
}

impl ChangedPathEntry {
    pub fn new(path: impl Into<String>, kind: ChangeKind, node_id: NodeId) -> Self {
        Self {
            path: path.into(),
            kind,
            node_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_delete_is_delete() {
        assert!(ChangeKind::Delete.is_delete());
        assert!(!ChangeKind::Add.is_delete());
        assert!(!ChangeKind::Modify.is_delete());
        assert!(!ChangeKind::Replace.is_delete());
    }

    #[test]
    fn display_names() {
        assert_eq!(ChangeKind::Add.to_string(), "add");
        assert_eq!(ChangeKind::Replace.to_string(), "replace");
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&ChangeKind::Replace).unwrap();
        assert_eq!(json, "\"replace\"");
    }

    #[test]
    fn entry_roundtrip() {
        let entry = ChangedPathEntry::new("/trunk/a.txt", ChangeKind::Modify, NodeId::new(3, 1));
        let json = serde_json::to_string(&entry).unwrap();
        let parsed: ChangedPathEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(entry, parsed);
    }
}
