//! Value extraction from associated features.

use log::trace;

use crate::opaque::OpaqueData;
use crate::source::{FeatureSource, ReconstructedGeometry};

use super::AssociationRecord;

/// Extracts values from associated features.
///
/// Per-feature mappers yield exactly one value per record. `Presence` and
/// `PresenceCount` yield exactly one value for the whole record list.
#[derive(Clone, Debug, PartialEq)]
pub enum Mapper {
    /// Named property of the record's owning feature.
    ///
    /// With `shapefile` set the name is looked up in the imported shapefile
    /// attributes instead. Only the first matching property is used.
    Property { name: String, shapefile: bool },
    /// Shortest distance from the record's geometry to any seed geometry.
    Distance,
    /// `true` iff anything was associated.
    Presence,
    /// Number of associated records.
    PresenceCount,
    /// Produces nothing.
    NoOp,
}

impl Mapper {
    /// Whether the mapper produces one value per record.
    pub fn is_per_record(&self) -> bool {
        matches!(self, Mapper::Property { .. } | Mapper::Distance)
    }

    /// Map association records to values.
    pub fn process<S: FeatureSource + ?Sized>(
        &self,
        records: &[AssociationRecord<'_>],
        seeds: &[&ReconstructedGeometry],
        source: &S,
    ) -> Vec<OpaqueData> {
        match self {
            Mapper::Property { name, shapefile } => records
                .iter()
                .map(|record| lookup_property(source, record, name, *shapefile))
                .collect(),
            Mapper::Distance => {
                let ops = source.geometry_ops();
                records
                    .iter()
                    .map(|record| {
                        let mut seed_geometries = seeds.iter().map(|seed| &seed.geometry);
                        OpaqueData::from(
                            ops.shortest_distance(&record.rfg.geometry, &mut seed_geometries),
                        )
                    })
                    .collect()
            }
            Mapper::Presence => vec![OpaqueData::Bool(!records.is_empty())],
            Mapper::PresenceCount => vec![OpaqueData::UInt(records.len() as u64)],
            Mapper::NoOp => Vec::new(),
        }
    }
}

fn lookup_property<S: FeatureSource + ?Sized>(
    source: &S,
    record: &AssociationRecord<'_>,
    name: &str,
    shapefile: bool,
) -> OpaqueData {
    let Some(feature) = source.feature(record.feature()) else {
        trace!("[Mapper] {} has no feature record", record.feature());
        return OpaqueData::Empty;
    };

    let value = if shapefile {
        feature.shapefile_attribute(name)
    } else {
        if feature.property_count(name) > 1 {
            trace!(
                "[Mapper] {} has several '{}' properties, using the first",
                feature.id,
                name
            );
        }
        feature.property(name)
    };

    value.cloned().unwrap_or_default()
}
