//! Typed runtime configuration loaded from TOML.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// When loading prefs should close every open modal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentSwitchPolicy {
    /// Close only when a document opens while none was open before.
    #[default]
    FromNoDocument,
    /// Also close when the active document identity changes from one document to another.
    AnyDocumentChange,
}

/// Runtime tuning for the prefs client and document-switch coordinator.
///
/// Every field has a default, so an empty document is a valid configuration:
///
/// ```toml
/// synced_save_concurrency = 4
/// document_switch = "any-document-change"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Maximum in-flight per-key synced saves. `None` issues every key at once.
    pub synced_save_concurrency: Option<usize>,
    pub document_switch: DocumentSwitchPolicy,
}

impl RuntimeConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(body: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(body)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses, and validates a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let body = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&body)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.synced_save_concurrency == Some(0) {
            return Err(ConfigError::Invalid(
                "synced_save_concurrency must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Effective concurrency for a synced save of `keys` entries.
    pub(crate) fn synced_batch_width(&self, keys: usize) -> usize {
        self.synced_save_concurrency
            .unwrap_or(keys)
            .min(keys)
            .max(1)
    }
}
