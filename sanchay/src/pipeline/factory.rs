//! Stage factory: configuration row → filter, mapper, reducer.
//!
//! Combinations that cannot work degrade to the `NoOp` stage with a warning
//! instead of failing the whole table.

use log::warn;

use crate::config::{AttributeType, ConfigurationRow, FilterConfig, ReducerType};

use super::{Filter, Mapper, Reducer};

/// The three stages for one configuration row.
#[derive(Clone, Debug, PartialEq)]
pub struct RowStages {
    pub filter: Filter,
    pub mapper: Mapper,
    pub reducer: Reducer,
}

impl RowStages {
    /// Build all stages for a row.
    pub fn for_row(row: &ConfigurationRow) -> Self {
        Self {
            filter: create_filter(&row.filter),
            mapper: create_mapper(row),
            reducer: create_reducer(row),
        }
    }
}

pub fn create_filter(config: &FilterConfig) -> Filter {
    match *config {
        FilterConfig::RegionOfInterest { range } => Filter::RegionOfInterest { range },
        FilterConfig::SeedSelf => Filter::SeedSelf,
        FilterConfig::NoOp => Filter::NoOp,
    }
}

pub fn create_mapper(row: &ConfigurationRow) -> Mapper {
    match row.attribute_type {
        AttributeType::Property | AttributeType::ShapefileProperty
            if row.attribute_name.is_empty() =>
        {
            warn!(
                "[Factory] {:?} row without attribute name, mapper disabled",
                row.attribute_type
            );
            Mapper::NoOp
        }
        AttributeType::Property => Mapper::Property {
            name: row.attribute_name.clone(),
            shapefile: false,
        },
        AttributeType::ShapefileProperty => Mapper::Property {
            name: row.attribute_name.clone(),
            shapefile: true,
        },
        AttributeType::Distance => Mapper::Distance,
        AttributeType::Presence => Mapper::Presence,
        AttributeType::PresenceCount => Mapper::PresenceCount,
    }
}

pub fn create_reducer(row: &ConfigurationRow) -> Reducer {
    // Lookup pairs each value with its association record
    if row.reducer == ReducerType::Lookup && row.attribute_type.is_collapsing() {
        warn!(
            "[Factory] lookup reducer cannot follow a {:?} mapper, reducer disabled for '{}'",
            row.attribute_type, row.attribute_name
        );
        return Reducer::NoOp;
    }

    match row.reducer {
        ReducerType::Min => Reducer::Min,
        ReducerType::Max => Reducer::Max,
        ReducerType::Mean => Reducer::Mean,
        ReducerType::Median => Reducer::Median,
        ReducerType::Lookup => Reducer::Lookup,
        ReducerType::Vote => Reducer::Vote,
        ReducerType::WeightedMean => Reducer::WeightedMean,
        ReducerType::Percentile(p) if p > 100 => {
            warn!("[Factory] percentile {} out of range, reducer disabled", p);
            Reducer::NoOp
        }
        ReducerType::Percentile(p) => Reducer::Percentile(p),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::CollectionId;

    fn row(attribute_type: AttributeType, reducer: ReducerType) -> ConfigurationRow {
        ConfigurationRow::new(
            CollectionId(1),
            FilterConfig::region_of_interest(10.0),
            "age",
            attribute_type,
            reducer,
        )
    }

    #[test]
    fn test_stages_for_property_mean() {
        let stages = RowStages::for_row(&row(AttributeType::Property, ReducerType::Mean));
        assert_eq!(stages.filter, Filter::RegionOfInterest { range: 10.0 });
        assert_eq!(
            stages.mapper,
            Mapper::Property {
                name: "age".into(),
                shapefile: false
            }
        );
        assert_eq!(stages.reducer, Reducer::Mean);
    }

    #[test]
    fn test_shapefile_flag() {
        let mapper = create_mapper(&row(AttributeType::ShapefileProperty, ReducerType::Vote));
        assert!(matches!(mapper, Mapper::Property { shapefile: true, .. }));
    }

    #[test]
    fn test_lookup_after_presence_degrades() {
        let reducer = create_reducer(&row(AttributeType::Presence, ReducerType::Lookup));
        assert_eq!(reducer, Reducer::NoOp);
        let reducer = create_reducer(&row(AttributeType::Distance, ReducerType::Lookup));
        assert_eq!(reducer, Reducer::Lookup);
    }

    #[test]
    fn test_unnamed_property_degrades() {
        let mut unnamed = row(AttributeType::Property, ReducerType::Min);
        unnamed.attribute_name.clear();
        assert_eq!(create_mapper(&unnamed), Mapper::NoOp);
        // Relational mappers do not need a name
        let mut distance = row(AttributeType::Distance, ReducerType::Min);
        distance.attribute_name.clear();
        assert_eq!(create_mapper(&distance), Mapper::Distance);
    }

    #[test]
    fn test_percentile_out_of_range_degrades() {
        assert_eq!(
            create_reducer(&row(AttributeType::Property, ReducerType::Percentile(101))),
            Reducer::NoOp
        );
        assert_eq!(
            create_reducer(&row(AttributeType::Property, ReducerType::Percentile(75))),
            Reducer::Percentile(75)
        );
    }
}
