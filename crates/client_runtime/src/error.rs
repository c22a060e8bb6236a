//! Error types surfaced by the prefs client and runtime configuration.

use std::fmt;

use thiserror::Error;

/// Backend call that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefsOperation {
    LoadLocal,
    SaveLocal,
    LoadGlobal,
    SaveGlobal,
    LoadSynced,
    GetSynced,
}

impl PrefsOperation {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LoadLocal => "load-local-prefs",
            Self::SaveLocal => "save-local-prefs",
            Self::LoadGlobal => "load-global-prefs",
            Self::SaveGlobal => "save-global-prefs",
            Self::LoadSynced => "load-synced-prefs",
            Self::GetSynced => "get-synced-pref",
        }
    }
}

impl fmt::Display for PrefsOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One failed per-key synced save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncedSaveFailure {
    pub key: String,
    pub message: String,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PrefsError {
    /// A backend round-trip failed. Cached state was left unchanged.
    #[error("{operation} failed: {message}")]
    Transport {
        operation: PrefsOperation,
        message: String,
    },
    /// At least one per-key synced save failed.
    ///
    /// `saved` keys were written remotely and are not rolled back; none of the keys were merged
    /// into cached synced prefs. Re-issuing the whole save is safe.
    #[error(
        "synced prefs save failed for {} of {} keys (first: {})",
        .failures.len(),
        total_keys(.failures, .saved),
        first_failure(.failures)
    )]
    SyncedSave {
        /// Failing keys in issue order; the first entry is the headline failure.
        failures: Vec<SyncedSaveFailure>,
        /// Keys whose remote save succeeded.
        saved: Vec<String>,
    },
}

fn total_keys(failures: &[SyncedSaveFailure], saved: &[String]) -> usize {
    failures.len() + saved.len()
}

fn first_failure(failures: &[SyncedSaveFailure]) -> String {
    failures
        .first()
        .map(|f| format!("`{}`: {}", f.key, f.message))
        .unwrap_or_default()
}

impl PrefsError {
    pub(crate) fn transport(operation: PrefsOperation, message: impl Into<String>) -> Self {
        Self::Transport {
            operation,
            message: message.into(),
        }
    }

    /// Keys that must be retried, if this is a synced-save failure.
    pub fn failed_keys(&self) -> Vec<&str> {
        match self {
            Self::Transport { .. } => Vec::new(),
            Self::SyncedSave { failures, .. } => failures.iter().map(|f| f.key.as_str()).collect(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse runtime config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid runtime config: {0}")]
    Invalid(String),
}
