//! Co-registration configuration.
//!
//! A configuration is an ordered list of rows, each describing one output
//! column: which collection to search, how to associate features with the
//! seed, what to extract from them and how to reduce the extracted values.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sanchay::config::CoregConfig;
//!
//! // Load from default path (configs/coregistration.yaml)
//! let config = CoregConfig::load_default()?;
//!
//! let table = config.to_table();
//! let selector = DataSelector::new(table, config.selector_config());
//! ```
//!
//! ## Example YAML
//!
//! ```yaml
//! selector:
//!   parallel: false
//!
//! rows:
//!   - target_layer: 2
//!     filter: { kind: region_of_interest, range: 20.0 }
//!     attribute_name: age
//!     attribute_type: property      # property | distance | presence |
//!                                   # presence_count | shapefile_property
//!     reducer: mean                 # min | max | mean | median | lookup |
//!                                   # vote | weighted_mean | !percentile 90
//! ```

mod coreg;
mod defaults;
mod error;
mod filter;
mod row;
mod table;

// Re-export main types
pub use coreg::CoregConfig;
pub use error::ConfigLoadError;

pub use filter::{FilterConfig, FilterKind, RANGE_EPSILON};
pub use row::{AttributeType, ConfigurationRow, ReducerType};
pub use table::ConfigurationTable;

pub(crate) use defaults::{log_stats as default_log_stats, parallel as default_parallel};
