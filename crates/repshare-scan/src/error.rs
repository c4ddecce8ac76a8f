use repshare_store::StoreError;
use repshare_types::ContentDigest;

use crate::tally::RepKey;

/// Errors produced by the scan engine. Every variant is terminal for the
/// run: nothing is retried or recovered internally.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// Cooperative cancellation was observed mid-scan or mid-report.
    #[error("scan cancelled")]
    Cancelled,

    /// The opened store is not of the one supported physical format.
    #[error("store is of unsupported format '{found}' (expected 'revlog')")]
    UnsupportedFormat { found: String },

    /// Two observations of the same physical key disagree on content
    /// digest, breaking the content-addressing assumption. Only raised
    /// under [`InconsistencyPolicy::Fatal`].
    ///
    /// [`InconsistencyPolicy::Fatal`]: crate::tally::InconsistencyPolicy
    #[error(
        "store inconsistency at ({key_revision}, {key_offset}): \
         digest {existing} already recorded, observed {observed}"
    )]
    Inconsistency {
        key_revision: u64,
        key_offset: u64,
        existing: ContentDigest,
        observed: ContentDigest,
    },

    /// Backend failure while resolving or fetching revision data.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Failure writing a progress or report line.
    #[error("output error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScanError {
    pub(crate) fn inconsistency(
        key: RepKey,
        existing: ContentDigest,
        observed: ContentDigest,
    ) -> Self {
        ScanError::Inconsistency {
            key_revision: key.revision,
            key_offset: key.offset,
            existing,
            observed,
        }
    }
}

/// Result alias for scan operations.
pub type ScanResult<T> = Result<T, ScanError>;
