//! Main CoregConfig and conversion methods.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::selector::SelectorConfig;

use super::error::ConfigLoadError;
use super::filter::FilterConfig;
use super::row::{AttributeType, ConfigurationRow, ReducerType};
use super::table::ConfigurationTable;

/// Full co-registration configuration loaded from YAML
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CoregConfig {
    /// Data selector settings
    #[serde(default)]
    pub selector: SelectorConfig,

    /// One row per output column
    #[serde(default)]
    pub rows: Vec<ConfigurationRow>,
}

impl CoregConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigLoadError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigLoadError::Io(e.to_string()))?;
        Self::from_yaml(&contents)
    }

    /// Load from default config path (configs/coregistration.yaml)
    pub fn load_default() -> Result<Self, ConfigLoadError> {
        let path = Path::new("configs/coregistration.yaml");
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse and validate from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: CoregConfig =
            serde_yaml::from_str(yaml).map_err(|e| ConfigLoadError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to a YAML string
    pub fn to_yaml(&self) -> Result<String, ConfigLoadError> {
        serde_yaml::to_string(self).map_err(|e| ConfigLoadError::Parse(e.to_string()))
    }

    /// Check every row for values the pipeline cannot use.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        for (i, row) in self.rows.iter().enumerate() {
            if let FilterConfig::RegionOfInterest { range } = row.filter {
                if !range.is_finite() || range < 0.0 {
                    return Err(ConfigLoadError::Validation(format!(
                        "row {}: region of interest range must be a non-negative number, got {}",
                        i, range
                    )));
                }
            }

            if let ReducerType::Percentile(p) = row.reducer {
                if p > 100 {
                    return Err(ConfigLoadError::Validation(format!(
                        "row {}: percentile must be within 0..=100, got {}",
                        i, p
                    )));
                }
            }

            let needs_name = matches!(
                row.attribute_type,
                AttributeType::Property | AttributeType::ShapefileProperty
            );
            if needs_name && row.attribute_name.is_empty() {
                return Err(ConfigLoadError::Validation(format!(
                    "row {}: {:?} attribute needs an attribute name",
                    i, row.attribute_type
                )));
            }
        }
        Ok(())
    }

    /// Build the configuration table (not yet canonical)
    pub fn to_table(&self) -> ConfigurationTable {
        self.rows.iter().cloned().collect()
    }

    /// Get the data selector config
    pub fn selector_config(&self) -> SelectorConfig {
        self.selector.clone()
    }
}
