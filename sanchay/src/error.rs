//! Error types for Sanchay

use thiserror::Error;

use crate::config::ConfigLoadError;
use crate::source::CollectionId;

/// Sanchay error type
#[derive(Error, Debug)]
pub enum CoregError {
    /// A configuration row or seed list names a collection the source does not have.
    #[error("Feature collection {0} is not available")]
    MissingCollection(CollectionId),

    /// A numeric reducer was handed a cell it cannot coerce to a number.
    #[error("Cannot reduce non-numeric value '{value}' with the {reducer} reducer")]
    NonNumeric {
        reducer: &'static str,
        value: String,
    },

    /// A stage exists in the configuration vocabulary but has no implementation.
    #[error("{0} is not implemented")]
    NotImplemented(&'static str),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigLoadError),
}

pub type Result<T> = std::result::Result<T, CoregError>;
