//! Per-seed association cache.
//!
//! Associations are keyed by (target collection, filter kind, range). A query
//! is served by an entry with exactly the same range, or derived from the
//! entry with the smallest range that is strictly larger:
//!
//! ```text
//!   cached r=50: {5, 15, 45}
//!   query  r=20: {5, 15}        ← every feature within 20 is also within 50
//!   query  r=70: miss           ← features between 50 and 70 were never seen
//! ```
//!
//! The cache lives for one seed feature and is dropped afterwards.

use log::{debug, trace};

use crate::config::{FilterConfig, FilterKind, RANGE_EPSILON};
use crate::pipeline::AssociationRecord;
use crate::source::{CollectionId, FeatureId};

/// Result of associating one seed with one target collection.
#[derive(Clone, Debug)]
pub struct AssociatedCollection<'a> {
    pub seed: FeatureId,
    pub reconstruction_time: f64,
    pub target: CollectionId,
    pub filter: FilterConfig,
    pub records: Vec<AssociationRecord<'a>>,
}

/// How a cached range relates to a queried range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RangeCoverage {
    /// Same range (within [`RANGE_EPSILON`]).
    Exact,
    /// Cached range is strictly larger; its records can be narrowed down.
    Covers,
    /// Cached range is smaller and may be missing features.
    Insufficient,
}

/// The only rule deciding whether a cached range can answer a query.
pub fn range_coverage(cached: f64, query: f64) -> RangeCoverage {
    if (cached - query).abs() <= RANGE_EPSILON {
        RangeCoverage::Exact
    } else if cached > query {
        RangeCoverage::Covers
    } else {
        RangeCoverage::Insufficient
    }
}

/// Cache counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub exact_hits: usize,
    pub derived_hits: usize,
    pub misses: usize,
}

impl CacheStats {
    /// Merge another set of counters into this one
    pub fn merge(&mut self, other: &CacheStats) {
        self.exact_hits += other.exact_hits;
        self.derived_hits += other.derived_hits;
        self.misses += other.misses;
    }
}

/// Association lookup table for one seed feature.
#[derive(Debug, Default)]
pub struct AssociationCache<'a> {
    entries: Vec<AssociatedCollection<'a>>,
    stats: CacheStats,
}

impl<'a> AssociationCache<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether associations made with this filter are stored at all.
    pub fn is_cacheable(filter: &FilterConfig) -> bool {
        filter.kind() != FilterKind::NoOp
    }

    /// Find or derive the association for `target` under `filter`.
    ///
    /// Returns `None` on a miss; the caller computes the association and
    /// [`insert`](Self::insert)s it.
    pub fn lookup(
        &mut self,
        target: CollectionId,
        filter: &FilterConfig,
    ) -> Option<Vec<AssociationRecord<'a>>> {
        if !Self::is_cacheable(filter) {
            return None;
        }

        let query = filter.range();
        let mut best_cover: Option<&AssociatedCollection<'a>> = None;

        for entry in self
            .entries
            .iter()
            .filter(|e| e.target == target && e.filter.kind() == filter.kind())
        {
            match range_coverage(entry.filter.range(), query) {
                RangeCoverage::Exact => {
                    self.stats.exact_hits += 1;
                    trace!("[AssociationCache] exact hit {} r={}", target, query);
                    return Some(entry.records.clone());
                }
                RangeCoverage::Covers => {
                    if best_cover.is_none_or(|b| entry.filter.range() < b.filter.range()) {
                        best_cover = Some(entry);
                    }
                }
                RangeCoverage::Insufficient => {}
            }
        }

        match best_cover {
            Some(entry) => {
                self.stats.derived_hits += 1;
                debug!(
                    "[AssociationCache] deriving {} r={} from cached r={}",
                    target,
                    query,
                    entry.filter.range()
                );
                Some(
                    entry
                        .records
                        .iter()
                        .filter(|r| r.distance <= query)
                        .copied()
                        .collect(),
                )
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    /// Store a freshly computed association.
    pub fn insert(&mut self, entry: AssociatedCollection<'a>) {
        if Self::is_cacheable(&entry.filter) {
            self.entries.push(entry);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}
