//! # Sanchay: Co-registration Data Mining
//!
//! Associates every seed feature with nearby features of other collections
//! at a reconstruction time, extracts attributes from them and reduces those
//! attributes into one table cell per configured column.
//!
//! ## Quick Start
//!
//! ```rust
//! use sanchay::config::{AttributeType, ConfigurationRow, FilterConfig, ReducerType};
//! use sanchay::geometry::{Geometry, Point};
//! use sanchay::source::{CollectionId, Feature, FeatureId, FeatureStore};
//! use sanchay::{DataSelector, SelectorConfig};
//!
//! let mut store = FeatureStore::new(0.0);
//! store.insert(
//!     CollectionId(0),
//!     Feature::new(FeatureId(1)),
//!     vec![Geometry::Point(Point::ZERO)],
//! );
//! store.insert(
//!     CollectionId(1),
//!     Feature::new(FeatureId(2)).with_property("age", 120.0),
//!     vec![Geometry::Point(Point::new(3.0, 4.0))],
//! );
//!
//! let rows = vec![ConfigurationRow::new(
//!     CollectionId(1),
//!     FilterConfig::region_of_interest(10.0),
//!     "age",
//!     AttributeType::Property,
//!     ReducerType::Mean,
//! )];
//! let selector = DataSelector::new(rows.into(), SelectorConfig::default());
//! let table = selector.select(&store, &[CollectionId(0)]);
//!
//! assert_eq!(table.rows[0].cells[0].as_f64(), Some(120.0));
//! ```
//!
//! ## Architecture
//!
//! - [`config`]: Configuration rows, canonical table ordering and YAML loading
//! - [`source`]: Feature source trait and an in-memory store
//! - [`geometry`]: Geometry types and the distance/area backend trait
//! - [`pipeline`]: Filter, mapper and reducer stages
//! - [`cache`]: Per-seed association cache
//! - [`selector`]: Runs the pipeline for every seed feature
//! - [`table`]: Output table
//!
//! ## Data Flow
//!
//! ```text
//!   ┌──────────────────┐      ┌──────────────────┐
//!   │  CoregConfig     │      │  FeatureSource   │
//!   │  (YAML rows)     │      │  (reconstructed  │
//!   └────────┬─────────┘      │   collections)   │
//!            │ to_table()     └────────┬─────────┘
//!            ▼                         │
//!   ┌──────────────────┐               │
//!   │ ConfigurationTbl │               │
//!   │  (canonicalized) │               │
//!   └────────┬─────────┘               │
//!            │                         │
//!            ▼                         ▼
//!   ┌────────────────────────────────────────────┐
//!   │               DataSelector                 │
//!   │  per seed: cache → filter → map → reduce   │
//!   └─────────────────────┬──────────────────────┘
//!                         │
//!                         ▼
//!               ┌──────────────────┐
//!               │    DataTable     │
//!               │ (seed × column)  │
//!               └──────────────────┘
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod geometry;
pub mod opaque;
pub mod pipeline;
pub mod selector;
pub mod source;
pub mod table;

// Re-export main types at crate root
pub use cache::{AssociationCache, CacheStats};
pub use config::{CoregConfig, ConfigurationRow, ConfigurationTable, FilterConfig};
pub use error::{CoregError, Result};
pub use opaque::OpaqueData;
pub use selector::{DataSelector, SelectionStats, SelectorConfig};
pub use source::{CollectionId, FeatureId, FeatureSource, FeatureStore};
pub use table::{ColumnDescriptor, DataRow, DataTable};
