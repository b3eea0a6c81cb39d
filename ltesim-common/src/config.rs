//! Configuration structures for the UE carrier aggregation model
//!
//! This module provides the UE component carrier configuration: which
//! carriers the UE is configured with and which CCM algorithm distributes
//! logical channels across them.

use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::types::{ComponentCarrierId, MAX_COMPONENT_CARRIERS};

/// Radio parameters of one configured component carrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentCarrierConfig {
    /// Component carrier ID (0 = primary)
    pub id: ComponentCarrierId,
    /// Downlink EARFCN
    pub dl_earfcn: u32,
    /// Uplink EARFCN
    pub ul_earfcn: u32,
    /// Downlink bandwidth in resource blocks
    #[serde(default = "default_bandwidth")]
    pub dl_bandwidth: u16,
}

fn default_bandwidth() -> u16 {
    25
}

impl ComponentCarrierConfig {
    /// Creates a carrier configuration with the default bandwidth.
    pub fn new(id: impl Into<ComponentCarrierId>, dl_earfcn: u32, ul_earfcn: u32) -> Self {
        Self {
            id: id.into(),
            dl_earfcn,
            ul_earfcn,
            dl_bandwidth: default_bandwidth(),
        }
    }
}

/// Component carrier manager algorithm selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CcmAlgorithm {
    /// Every logical channel is mapped on the primary carrier only
    PrimaryCarrierOnly,
    /// Every logical channel is mapped on all configured carriers
    #[default]
    SplitAcrossCarriers,
}

impl fmt::Display for CcmAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CcmAlgorithm::PrimaryCarrierOnly => write!(f, "PrimaryCarrierOnly"),
            CcmAlgorithm::SplitAcrossCarriers => write!(f, "SplitAcrossCarriers"),
        }
    }
}

/// UE component carrier manager configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UeCcmConfig {
    /// Configured component carriers (primary must be present)
    pub component_carriers: Vec<ComponentCarrierConfig>,
    /// Distribution algorithm used by the CCM
    #[serde(default)]
    pub ccm_algorithm: CcmAlgorithm,
}

impl Default for UeCcmConfig {
    fn default() -> Self {
        Self {
            component_carriers: vec![ComponentCarrierConfig::new(0, 100, 18100)],
            ccm_algorithm: CcmAlgorithm::default(),
        }
    }
}

impl UeCcmConfig {
    /// Returns the configured carrier IDs in ascending order.
    pub fn carrier_ids(&self) -> BTreeSet<ComponentCarrierId> {
        self.component_carriers.iter().map(|cc| cc.id).collect()
    }

    /// Validates the carrier layout.
    ///
    /// Requires between one and [`MAX_COMPONENT_CARRIERS`] carriers, unique
    /// IDs, and the primary carrier (ID 0) to be present.
    pub fn validate(&self) -> Result<(), Error> {
        let count = self.component_carriers.len();
        if count == 0 {
            return Err(Error::Config("no component carrier configured".to_string()));
        }
        if count > MAX_COMPONENT_CARRIERS {
            return Err(Error::Config(format!(
                "{count} component carriers configured, at most {MAX_COMPONENT_CARRIERS} supported"
            )));
        }

        let ids = self.carrier_ids();
        if ids.len() != count {
            return Err(Error::Config("duplicate component carrier id".to_string()));
        }
        if !ids.contains(&ComponentCarrierId::PRIMARY) {
            return Err(Error::Config("primary component carrier (id 0) missing".to_string()));
        }
        Ok(())
    }

    /// Parses a configuration from a YAML string.
    ///
    /// # Example
    /// ```
    /// use ltesim_common::UeCcmConfig;
    ///
    /// let yaml = r#"
    /// component_carriers:
    ///   - id: 0
    ///     dl_earfcn: 100
    ///     ul_earfcn: 18100
    ///   - id: 1
    ///     dl_earfcn: 300
    ///     ul_earfcn: 18300
    /// ccm_algorithm: SplitAcrossCarriers
    /// "#;
    ///
    /// let config = UeCcmConfig::from_yaml(yaml).unwrap();
    /// assert_eq!(config.component_carriers.len(), 2);
    /// ```
    pub fn from_yaml(yaml: &str) -> Result<Self, Error> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Loads a configuration from a YAML file.
    ///
    /// # Example
    /// ```no_run
    /// use ltesim_common::UeCcmConfig;
    ///
    /// let config = UeCcmConfig::from_yaml_file("config/ue-ccm.yaml").unwrap();
    /// ```
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Serializes the configuration to a YAML string.
    pub fn to_yaml(&self) -> Result<String, Error> {
        Ok(serde_yaml::to_string(self)?)
    }
}
