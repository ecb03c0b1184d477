//! Operator configuration file
//!
//! ```yaml
//! fieldManager: esnode-operator
//! defaults:
//!   image: registry.example.com/elasticsearch:5.6
//!   memoryLimit: 8Gi
//!   probe:
//!     timeoutSeconds: 45
//! ```
//!
//! Every key is optional; missing keys keep the built-in defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, NodeDefaults, DEFAULT_FIELD_MANAGER};

/// Top-level operator configuration
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct OperatorConfig {
    /// Fallback values used while compiling nodes
    pub defaults: NodeDefaults,
    /// Field manager name for server-side apply
    pub field_manager: String,
    /// Fail compilation when a node has no storage configured
    pub strict_storage: bool,
}

impl Default for OperatorConfig {
    fn default() -> Self {
        Self {
            defaults: NodeDefaults::default(),
            field_manager: DEFAULT_FIELD_MANAGER.to_string(),
            strict_storage: false,
        }
    }
}

impl OperatorConfig {
    /// Parse configuration from YAML text
    pub fn from_yaml(yaml: &str) -> Result<Self, Error> {
        serde_yaml::from_str(yaml).map_err(|e| Error::config("<inline>", e.to_string()))
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, Error> {
        let display = path.display().to_string();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::config(&display, format!("failed to read: {}", e)))?;
        serde_yaml::from_str(&contents).map_err(|e| Error::config(&display, e.to_string()))
    }

    /// Load from `path` if given, otherwise use built-in defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}
