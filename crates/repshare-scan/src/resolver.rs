use repshare_store::StorageBackend;
use repshare_types::Revision;

use crate::error::ScanResult;
use crate::progress::ProgressSink;
use crate::tally::TallySet;

/// Resolves one revision's change set into node records and feeds them to
/// the recorder.
pub struct ChangeSetResolver<'a, B: StorageBackend + ?Sized> {
    backend: &'a B,
}

impl<'a, B: StorageBackend + ?Sized> ChangeSetResolver<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    /// Process every path changed in `revision`.
    ///
    /// Deleted paths get a progress line but are never resolved: the object
    /// no longer exists at that revision's root. For everything else, the
    /// node id valid at this revision is resolved through the backend (the
    /// entry's embedded id may be a transient commit id) and the record is
    /// recorded. Backend errors propagate unchanged; there is no retry and
    /// no partial skip.
    ///
    /// The changed-path set is scratch local to this call, so peak memory
    /// stays bounded by one revision's change set.
    pub fn process_revision<P: ProgressSink>(
        &self,
        revision: Revision,
        tallies: &mut TallySet,
        progress: &mut P,
    ) -> ScanResult<()> {
        let changes = self.backend.changed_paths(revision)?;

        for entry in &changes {
            progress.path_visited(revision, &entry.path)?;

            if entry.kind.is_delete() {
                continue;
            }

            let node_id = self.backend.resolve_node_id(revision, &entry.path)?;
            let record = self.backend.fetch_node_record(&node_id)?;
            tallies.record_node(&record)?;
        }

        Ok(())
    }
}
