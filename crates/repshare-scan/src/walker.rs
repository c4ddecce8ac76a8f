use repshare_store::{StorageBackend, StoreFormat};

use crate::cancel::CancelToken;
use crate::error::{ScanError, ScanResult};
use crate::progress::ProgressSink;
use crate::resolver::ChangeSetResolver;
use crate::tally::{CategorySelection, InconsistencyPolicy, TallySet};

/// Knobs for one scan run.
#[derive(Clone, Copy, Debug)]
pub struct ScanOptions {
    pub selection: CategorySelection,
    pub policy: InconsistencyPolicy,
}

impl ScanOptions {
    pub fn new(selection: CategorySelection) -> Self {
        Self {
            selection,
            policy: InconsistencyPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: InconsistencyPolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// Fail unless the backend reports the one supported physical format.
pub fn ensure_supported<B: StorageBackend + ?Sized>(backend: &B) -> ScanResult<()> {
    match backend.store_format() {
        StoreFormat::Revlog => Ok(()),
        other => Err(ScanError::UnsupportedFormat {
            found: other.as_str().to_string(),
        }),
    }
}

/// Drives the full-history scan: revisions 0 through youngest inclusive,
/// strictly increasing, one at a time.
pub struct RevisionWalker<'a, B: StorageBackend + ?Sized> {
    backend: &'a B,
    cancel: CancelToken,
}

impl<'a, B: StorageBackend + ?Sized> RevisionWalker<'a, B> {
    pub fn new(backend: &'a B, cancel: CancelToken) -> Self {
        Self { backend, cancel }
    }

    /// Run the scan and return the frozen tallies.
    ///
    /// The format gate runs before any revision is touched. Per revision,
    /// in order: cancellation checkpoint, progress line, change-set
    /// processing. The caller is responsible for a non-empty category
    /// selection; an empty one scans history and tallies nothing.
    pub fn scan<P: ProgressSink>(
        &self,
        options: ScanOptions,
        progress: &mut P,
    ) -> ScanResult<TallySet> {
        ensure_supported(self.backend)?;

        let youngest = self.backend.youngest_revision()?;
        let resolver = ChangeSetResolver::new(self.backend);
        let mut tallies = TallySet::new(options.selection, options.policy);

        for revision in 0..=youngest {
            self.cancel.checkpoint()?;
            progress.revision_started(revision)?;
            resolver.process_revision(revision, &mut tallies, progress)?;
        }

        tracing::debug!(youngest, "history scan complete");
        Ok(tallies)
    }
}

/// Convenience wrapper: walk `backend`'s full history with `options`.
pub fn scan<B, P>(
    backend: &B,
    options: ScanOptions,
    cancel: CancelToken,
    progress: &mut P,
) -> ScanResult<TallySet>
where
    B: StorageBackend + ?Sized,
    P: ProgressSink,
{
    RevisionWalker::new(backend, cancel).scan(options, progress)
}
