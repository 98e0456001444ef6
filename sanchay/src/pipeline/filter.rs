//! Association filters.

use log::trace;

use crate::geometry::GeometryOps;
use crate::source::ReconstructedGeometry;

use super::AssociationRecord;

/// Selects which target geometries are associated with a seed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Filter {
    /// Keep candidates within `range` of any seed geometry.
    RegionOfInterest { range: f64 },
    /// Return the seed's own geometries at distance zero.
    SeedSelf,
    /// Associate nothing.
    NoOp,
}

impl Filter {
    /// Run the filter.
    ///
    /// Pure function of its inputs. `candidates` are the target collection's
    /// geometries, `seeds` the seed feature's geometries.
    pub fn process<'a>(
        &self,
        candidates: &'a [ReconstructedGeometry],
        seeds: &[&'a ReconstructedGeometry],
        ops: &dyn GeometryOps,
    ) -> Vec<AssociationRecord<'a>> {
        match *self {
            Filter::RegionOfInterest { range } => region_of_interest(candidates, seeds, range, ops),
            Filter::SeedSelf => seeds
                .iter()
                .map(|&seed| AssociationRecord::new(seed, 0.0))
                .collect(),
            Filter::NoOp => Vec::new(),
        }
    }
}

fn region_of_interest<'a>(
    candidates: &'a [ReconstructedGeometry],
    seeds: &[&'a ReconstructedGeometry],
    range: f64,
    ops: &dyn GeometryOps,
) -> Vec<AssociationRecord<'a>> {
    let mut records = Vec::new();

    for candidate in candidates {
        let closest = seeds
            .iter()
            .filter_map(|seed| ops.is_close_enough(&seed.geometry, &candidate.geometry, range))
            .min_by(f64::total_cmp);

        if let Some(distance) = closest {
            records.push(AssociationRecord::new(candidate, distance));
        }
    }

    trace!(
        "[Filter] region of interest {:.3}: {} of {} candidates kept",
        range,
        records.len(),
        candidates.len()
    );
    records
}
