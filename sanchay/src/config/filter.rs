//! Filter (associator) configuration.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Tolerance for comparing region-of-interest ranges.
pub const RANGE_EPSILON: f64 = 1e-9;

/// Which filter a configuration selects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FilterKind {
    RegionOfInterest,
    SeedSelf,
    NoOp,
}

/// Filter configuration of a co-registration row.
///
/// Serialized with an internal `kind` tag:
/// ```yaml
/// filter: { kind: region_of_interest, range: 20.0 }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilterConfig {
    /// Keep candidates within `range` of any seed geometry (inclusive).
    RegionOfInterest { range: f64 },
    /// Use the seed's own geometries.
    SeedSelf,
    /// Associate nothing.
    NoOp,
}

impl FilterConfig {
    /// Region-of-interest filter with the given range.
    pub fn region_of_interest(range: f64) -> Self {
        FilterConfig::RegionOfInterest { range }
    }

    pub fn kind(&self) -> FilterKind {
        match self {
            FilterConfig::RegionOfInterest { .. } => FilterKind::RegionOfInterest,
            FilterConfig::SeedSelf => FilterKind::SeedSelf,
            FilterConfig::NoOp => FilterKind::NoOp,
        }
    }

    /// Type name used to group rows during canonicalization.
    pub fn type_name(&self) -> &'static str {
        match self {
            FilterConfig::RegionOfInterest { .. } => "RegionOfInterestFilter",
            FilterConfig::SeedSelf => "SeedSelfFilter",
            FilterConfig::NoOp => "NoOpFilter",
        }
    }

    /// Association range. Filters without a range report zero.
    pub fn range(&self) -> f64 {
        match self {
            FilterConfig::RegionOfInterest { range } => *range,
            FilterConfig::SeedSelf | FilterConfig::NoOp => 0.0,
        }
    }

    /// Region-of-interest filter whose range is numerically zero.
    pub fn is_zero_range_roi(&self) -> bool {
        matches!(self, FilterConfig::RegionOfInterest { range } if range.abs() <= RANGE_EPSILON)
    }

    /// Whether configs of this kind can be ordered against each other.
    ///
    /// `NoOp` has no ordering; canonicalization leaves NoOp rows in their
    /// insertion order.
    pub fn is_orderable(&self) -> bool {
        !matches!(self, FilterConfig::NoOp)
    }

    /// Order two configs of the same kind.
    ///
    /// Regions of interest order by descending range, so the widest search of
    /// a group runs first and narrower ones are cut from its cached result.
    /// Returns `None` for different kinds or when either side is not orderable.
    pub fn try_cmp(&self, other: &FilterConfig) -> Option<Ordering> {
        match (self, other) {
            (
                FilterConfig::RegionOfInterest { range: a },
                FilterConfig::RegionOfInterest { range: b },
            ) => Some(b.total_cmp(a)),
            (FilterConfig::SeedSelf, FilterConfig::SeedSelf) => Some(Ordering::Equal),
            _ => None,
        }
    }
}
