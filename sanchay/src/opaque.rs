//! Universal cell value.
//!
//! Every attribute extracted from a feature, every mapped value and every
//! reduced table cell is an [`OpaqueData`]. The explicit [`OpaqueData::Empty`]
//! case means "no result" and is distinct from any zero or empty string.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoregError, Result};

/// Tagged scalar value.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpaqueData {
    /// No value.
    #[default]
    Empty,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Char(char),
    Float(f32),
    Double(f64),
    String(String),
}

impl OpaqueData {
    /// Check for the `Empty` sentinel.
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, OpaqueData::Empty)
    }

    /// Check whether the value can be coerced to a number.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            OpaqueData::Bool(_)
                | OpaqueData::Int(_)
                | OpaqueData::UInt(_)
                | OpaqueData::Float(_)
                | OpaqueData::Double(_)
        )
    }

    /// Coerce to `f64`.
    ///
    /// Booleans map to 0/1. Returns `None` for `Empty`, `Char` and `String`.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            OpaqueData::Bool(b) => Some(if b { 1.0 } else { 0.0 }),
            OpaqueData::Int(v) => Some(v as f64),
            OpaqueData::UInt(v) => Some(v as f64),
            OpaqueData::Float(v) => Some(v as f64),
            OpaqueData::Double(v) => Some(v),
            OpaqueData::Empty | OpaqueData::Char(_) | OpaqueData::String(_) => None,
        }
    }

    /// Coerce to `f64`, reporting the offending value on failure.
    pub fn to_f64(&self, reducer: &'static str) -> Result<f64> {
        self.as_f64().ok_or_else(|| CoregError::NonNumeric {
            reducer,
            value: self.to_string(),
        })
    }
}

impl fmt::Display for OpaqueData {
    /// `Empty` renders as an empty string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpaqueData::Empty => Ok(()),
            OpaqueData::Bool(v) => write!(f, "{}", v),
            OpaqueData::Int(v) => write!(f, "{}", v),
            OpaqueData::UInt(v) => write!(f, "{}", v),
            OpaqueData::Char(v) => write!(f, "{}", v),
            OpaqueData::Float(v) => write!(f, "{}", v),
            OpaqueData::Double(v) => write!(f, "{}", v),
            OpaqueData::String(v) => f.write_str(v),
        }
    }
}

impl From<bool> for OpaqueData {
    fn from(v: bool) -> Self {
        OpaqueData::Bool(v)
    }
}

impl From<i32> for OpaqueData {
    fn from(v: i32) -> Self {
        OpaqueData::Int(v as i64)
    }
}

impl From<i64> for OpaqueData {
    fn from(v: i64) -> Self {
        OpaqueData::Int(v)
    }
}

impl From<u32> for OpaqueData {
    fn from(v: u32) -> Self {
        OpaqueData::UInt(v as u64)
    }
}

impl From<u64> for OpaqueData {
    fn from(v: u64) -> Self {
        OpaqueData::UInt(v)
    }
}

impl From<char> for OpaqueData {
    fn from(v: char) -> Self {
        OpaqueData::Char(v)
    }
}

impl From<f32> for OpaqueData {
    fn from(v: f32) -> Self {
        OpaqueData::Float(v)
    }
}

impl From<f64> for OpaqueData {
    fn from(v: f64) -> Self {
        OpaqueData::Double(v)
    }
}

impl From<&str> for OpaqueData {
    fn from(v: &str) -> Self {
        OpaqueData::String(v.to_string())
    }
}

impl From<String> for OpaqueData {
    fn from(v: String) -> Self {
        OpaqueData::String(v)
    }
}

impl<T: Into<OpaqueData>> From<Option<T>> for OpaqueData {
    fn from(v: Option<T>) -> Self {
        v.map_or(OpaqueData::Empty, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_distinct_from_zero() {
        assert!(OpaqueData::Empty.is_empty());
        assert!(!OpaqueData::Int(0).is_empty());
        assert!(!OpaqueData::String(String::new()).is_empty());
        assert_ne!(OpaqueData::Empty, OpaqueData::Double(0.0));
    }

    #[test]
    fn test_numeric_coercion() {
        assert_eq!(OpaqueData::Int(-3).as_f64(), Some(-3.0));
        assert_eq!(OpaqueData::UInt(7).as_f64(), Some(7.0));
        assert_eq!(OpaqueData::Bool(true).as_f64(), Some(1.0));
        assert_eq!(OpaqueData::Float(0.5).as_f64(), Some(0.5));
        assert_eq!(OpaqueData::Empty.as_f64(), None);
        assert_eq!(OpaqueData::from("12").as_f64(), None);
    }

    #[test]
    fn test_coercion_error_names_value() {
        let err = OpaqueData::from("basalt").to_f64("mean").unwrap_err();
        assert!(err.to_string().contains("basalt"));
        assert!(err.to_string().contains("mean"));
    }

    #[test]
    fn test_display() {
        assert_eq!(OpaqueData::Empty.to_string(), "");
        assert_eq!(OpaqueData::Char('x').to_string(), "x");
        assert_eq!(OpaqueData::Double(1.5).to_string(), "1.5");
        assert_eq!(OpaqueData::from(None::<i32>), OpaqueData::Empty);
    }
}
