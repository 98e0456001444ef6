//! Filter → map → reduce stages.
//!
//! For one seed feature and one configuration row:
//!
//! ```text
//!   target collection RFGs ──► Filter ──► [AssociationRecord]
//!                                              │
//!                                              ▼
//!                                           Mapper ──► [OpaqueData]
//!                                                          │
//!                                                          ▼
//!                                                       Reducer ──► cell
//! ```
//!
//! Stages are closed enums; [`factory`] turns a configuration row into the
//! matching triple.

pub mod factory;
mod filter;
mod mapper;
mod reducer;

pub use factory::{create_filter, create_mapper, create_reducer, RowStages};
pub use filter::Filter;
pub use mapper::Mapper;
pub use reducer::{Reducer, ReducerInput};

use crate::source::{FeatureId, ReconstructedGeometry};

/// A target geometry associated with a seed, and its distance to the seed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AssociationRecord<'a> {
    pub rfg: &'a ReconstructedGeometry,
    /// Shortest distance to any seed geometry.
    pub distance: f64,
}

impl<'a> AssociationRecord<'a> {
    #[inline]
    pub fn new(rfg: &'a ReconstructedGeometry, distance: f64) -> Self {
        Self { rfg, distance }
    }

    /// Owning feature of the associated geometry.
    #[inline]
    pub fn feature(&self) -> FeatureId {
        self.rfg.feature
    }
}
