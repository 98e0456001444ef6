//! Default value functions for serde deserialization.

use super::row::{AttributeType, ReducerType};

pub fn attribute_type() -> AttributeType {
    AttributeType::Property
}

pub fn reducer() -> ReducerType {
    ReducerType::Lookup
}

pub fn raster_fill_polygons() -> bool {
    true
}

pub fn parallel() -> bool {
    false
}

pub fn log_stats() -> bool {
    true
}
