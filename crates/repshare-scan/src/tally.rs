use std::collections::HashMap;
use std::fmt;

use repshare_types::{ContentDigest, NodeRecord, RepDescriptor, Revision};

use crate::error::{ScanError, ScanResult};

/// The parts of a representation that determine whether it is shared: its
/// physical location in the append-only store. Value equality only — two
/// keys are the same representation iff revision and offset match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RepKey {
    pub revision: Revision,
    pub offset: u64,
}

impl RepKey {
    pub const fn new(revision: Revision, offset: u64) -> Self {
        Self { revision, offset }
    }
}

/// What is known about one distinct representation: its content digest and
/// how many logical references to it the scan has observed so far.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RepEntry {
    pub digest: ContentDigest,
    pub refcount: u64,
}

/// What to do when two observations of the same physical key disagree on
/// content digest. Such a disagreement means the store's content-addressing
/// assumption is broken; this tool cannot repair it either way.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InconsistencyPolicy {
    /// Terminate the run with [`ScanError::Inconsistency`].
    #[default]
    Fatal,
    /// Log a warning, keep the first-seen digest, and still count the
    /// reference, so the remaining categories stay analyzable.
    Warn,
}

/// One aggregation map from physical key to digest and refcount.
#[derive(Clone, Debug, Default)]
pub struct Tally {
    entries: HashMap<RepKey, RepEntry>,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one observation of `rep`.
    ///
    /// No-op if the descriptor carries no digest (directory property lists,
    /// legacy records). First observation of a key inserts refcount 1;
    /// later observations verify the digest and increment.
    pub fn record(&mut self, rep: &RepDescriptor, policy: InconsistencyPolicy) -> ScanResult<()> {
        let Some(digest) = rep.digest else {
            return Ok(());
        };

        let key = RepKey::new(rep.revision, rep.offset);
        match self.entries.get_mut(&key) {
            Some(entry) => {
                if entry.digest != digest {
                    match policy {
                        InconsistencyPolicy::Fatal => {
                            return Err(ScanError::inconsistency(key, entry.digest, digest));
                        }
                        InconsistencyPolicy::Warn => {
                            tracing::warn!(
                                revision = key.revision,
                                offset = key.offset,
                                existing = %entry.digest,
                                observed = %digest,
                                "digest mismatch for shared representation; keeping first"
                            );
                        }
                    }
                }
                entry.refcount += 1;
            }
            None => {
                self.entries.insert(key, RepEntry { digest, refcount: 1 });
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &RepKey) -> Option<&RepEntry> {
        self.entries.get(key)
    }

    /// Iterate entries in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&RepKey, &RepEntry)> {
        self.entries.iter()
    }
}

/// Aggregation category a report line belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Category {
    Data,
    Prop,
    Both,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Data => "data",
            Category::Prop => "prop",
            Category::Both => "both",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which representation kinds the run tallies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CategorySelection {
    pub data: bool,
    pub prop: bool,
}

impl CategorySelection {
    pub fn data_only() -> Self {
        Self {
            data: true,
            prop: false,
        }
    }

    pub fn prop_only() -> Self {
        Self {
            data: false,
            prop: true,
        }
    }

    pub fn both() -> Self {
        Self {
            data: true,
            prop: true,
        }
    }

    /// The merged tally exists only when data and prop are both tracked.
    pub fn merged(&self) -> bool {
        self.data && self.prop
    }

    /// A selection tracking nothing is a usage error upstream; the engine
    /// refuses to guess.
    pub fn is_empty(&self) -> bool {
        !self.data && !self.prop
    }
}

/// The run's accumulated tallies. Allocated once before the scan per the
/// category selection; a category that was not requested stays `None` and
/// is never populated or printed.
#[derive(Clone, Debug)]
pub struct TallySet {
    policy: InconsistencyPolicy,
    data: Option<Tally>,
    prop: Option<Tally>,
    both: Option<Tally>,
}

impl TallySet {
    pub fn new(selection: CategorySelection, policy: InconsistencyPolicy) -> Self {
        Self {
            policy,
            data: selection.data.then(Tally::new),
            prop: selection.prop.then(Tally::new),
            both: selection.merged().then(Tally::new),
        }
    }

    /// Record one node record's representations.
    ///
    /// Up to four tally insertions: prop and data into their own
    /// categories, then both descriptors into the merged category, so
    /// `both` accumulates the union of all data and prop observations.
    pub fn record_node(&mut self, record: &NodeRecord) -> ScanResult<()> {
        let policy = self.policy;
        record_into(&mut self.prop, record.prop_rep.as_ref(), policy)?;
        record_into(&mut self.data, record.data_rep.as_ref(), policy)?;
        record_into(&mut self.both, record.prop_rep.as_ref(), policy)?;
        record_into(&mut self.both, record.data_rep.as_ref(), policy)?;
        Ok(())
    }

    pub fn data(&self) -> Option<&Tally> {
        self.data.as_ref()
    }

    pub fn prop(&self) -> Option<&Tally> {
        self.prop.as_ref()
    }

    pub fn both(&self) -> Option<&Tally> {
        self.both.as_ref()
    }

    /// Categories in report order.
    pub fn categories(&self) -> [(Category, Option<&Tally>); 3] {
        [
            (Category::Prop, self.prop()),
            (Category::Data, self.data()),
            (Category::Both, self.both()),
        ]
    }
}

/// Skip entirely if the category is not tracked or the descriptor is absent.
fn record_into(
    tally: &mut Option<Tally>,
    rep: Option<&RepDescriptor>,
    policy: InconsistencyPolicy,
) -> ScanResult<()> {
    if let (Some(tally), Some(rep)) = (tally, rep) {
        tally.record(rep, policy)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use repshare_types::NodeKind;

    use super::*;

    fn digest(tag: &[u8]) -> ContentDigest {
        ContentDigest::of(tag)
    }

    #[test]
    fn descriptor_without_digest_is_ignored() {
        let mut tally = Tally::new();
        tally
            .record(
                &RepDescriptor::without_digest(3, 7),
                InconsistencyPolicy::Fatal,
            )
            .unwrap();
        assert!(tally.is_empty());
    }

    #[test]
    fn first_observation_inserts_refcount_one() {
        let mut tally = Tally::new();
        let d = digest(b"x");
        tally
            .record(
                &RepDescriptor::with_digest(5, 0, d),
                InconsistencyPolicy::Fatal,
            )
            .unwrap();
        let entry = tally.get(&RepKey::new(5, 0)).unwrap();
        assert_eq!(entry.refcount, 1);
        assert_eq!(entry.digest, d);
    }

    #[test]
    fn reobservation_increments() {
        let mut tally = Tally::new();
        let rep = RepDescriptor::with_digest(5, 0, digest(b"x"));
        for _ in 0..3 {
            tally.record(&rep, InconsistencyPolicy::Fatal).unwrap();
        }
        assert_eq!(tally.get(&RepKey::new(5, 0)).unwrap().refcount, 3);
        assert_eq!(tally.len(), 1);
    }

    #[test]
    fn digest_conflict_is_fatal_by_default() {
        let mut tally = Tally::new();
        tally
            .record(
                &RepDescriptor::with_digest(5, 0, digest(b"x")),
                InconsistencyPolicy::Fatal,
            )
            .unwrap();
        let err = tally
            .record(
                &RepDescriptor::with_digest(5, 0, digest(b"y")),
                InconsistencyPolicy::Fatal,
            )
            .unwrap_err();
        assert!(matches!(err, ScanError::Inconsistency { .. }));
        // The tally is untouched by the failed insertion.
        assert_eq!(tally.get(&RepKey::new(5, 0)).unwrap().refcount, 1);
    }

    #[test]
    fn digest_conflict_under_warn_keeps_first_and_counts() {
        let mut tally = Tally::new();
        let first = digest(b"x");
        tally
            .record(
                &RepDescriptor::with_digest(5, 0, first),
                InconsistencyPolicy::Warn,
            )
            .unwrap();
        tally
            .record(
                &RepDescriptor::with_digest(5, 0, digest(b"y")),
                InconsistencyPolicy::Warn,
            )
            .unwrap();
        let entry = tally.get(&RepKey::new(5, 0)).unwrap();
        assert_eq!(entry.refcount, 2);
        assert_eq!(entry.digest, first);
    }

    #[test]
    fn distinct_keys_are_independent_even_with_equal_digests() {
        let mut tally = Tally::new();
        let d = digest(b"same content");
        tally
            .record(
                &RepDescriptor::with_digest(5, 0, d),
                InconsistencyPolicy::Fatal,
            )
            .unwrap();
        tally
            .record(
                &RepDescriptor::with_digest(5, 40, d),
                InconsistencyPolicy::Fatal,
            )
            .unwrap();
        assert_eq!(tally.len(), 2);
        assert_eq!(tally.get(&RepKey::new(5, 0)).unwrap().refcount, 1);
        assert_eq!(tally.get(&RepKey::new(5, 40)).unwrap().refcount, 1);
    }

    #[test]
    fn unrequested_categories_stay_unallocated() {
        let set = TallySet::new(CategorySelection::data_only(), InconsistencyPolicy::Fatal);
        assert!(set.data().is_some());
        assert!(set.prop().is_none());
        assert!(set.both().is_none());
    }

    #[test]
    fn merged_tally_requires_both_kinds() {
        let set = TallySet::new(CategorySelection::both(), InconsistencyPolicy::Fatal);
        assert!(set.data().is_some());
        assert!(set.prop().is_some());
        assert!(set.both().is_some());
    }

    #[test]
    fn both_receives_union_of_data_and_prop() {
        let mut set = TallySet::new(CategorySelection::both(), InconsistencyPolicy::Fatal);
        let record = NodeRecord::new(NodeKind::File)
            .with_data_rep(RepDescriptor::with_digest(2, 0, digest(b"d")))
            .with_prop_rep(RepDescriptor::with_digest(2, 64, digest(b"p")));

        set.record_node(&record).unwrap();
        set.record_node(&record).unwrap();

        assert_eq!(set.data().unwrap().len(), 1);
        assert_eq!(set.prop().unwrap().len(), 1);
        let both = set.both().unwrap();
        assert_eq!(both.len(), 2);
        assert_eq!(both.get(&RepKey::new(2, 0)).unwrap().refcount, 2);
        assert_eq!(both.get(&RepKey::new(2, 64)).unwrap().refcount, 2);
    }

    #[test]
    fn recording_order_does_not_change_counts() {
        let reps = [
            RepDescriptor::with_digest(1, 0, digest(b"a")),
            RepDescriptor::with_digest(1, 32, digest(b"b")),
            RepDescriptor::with_digest(1, 0, digest(b"a")),
        ];

        let mut forward = Tally::new();
        for rep in &reps {
            forward.record(rep, InconsistencyPolicy::Fatal).unwrap();
        }
        let mut backward = Tally::new();
        for rep in reps.iter().rev() {
            backward.record(rep, InconsistencyPolicy::Fatal).unwrap();
        }

        for (key, entry) in forward.iter() {
            assert_eq!(backward.get(key), Some(entry));
        }
        assert_eq!(forward.len(), backward.len());
    }

    proptest::proptest! {
        /// Refcounts are pure occurrence counts: for every key, the final
        /// refcount equals the number of record calls made for that key.
        #[test]
        fn refcount_equals_observation_count(observations in proptest::collection::vec((0u64..4, 0u64..4), 0..64)) {
            let mut tally = Tally::new();
            let mut expected: std::collections::HashMap<RepKey, u64> = std::collections::HashMap::new();

            for (revision, slot) in observations {
                let offset = slot * 16;
                // Digest derived from the key, so re-observations agree.
                let d = ContentDigest::of(format!("{revision}:{offset}").as_bytes());
                let rep = RepDescriptor::with_digest(revision, offset, d);
                tally.record(&rep, InconsistencyPolicy::Fatal).unwrap();
                *expected.entry(RepKey::new(revision, offset)).or_default() += 1;
            }

            proptest::prop_assert_eq!(tally.len(), expected.len());
            for (key, count) in expected {
                proptest::prop_assert_eq!(tally.get(&key).unwrap().refcount, count);
            }
        }
    }
}
