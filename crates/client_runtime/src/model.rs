use platform_host::{local_prefs_id, PrefsMap};
use serde::{Deserialize, Serialize};

use crate::modal_stack::ModalStack;

/// One full read of the three preference tiers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrefsSnapshot {
    pub local: Option<PrefsMap>,
    pub global: PrefsMap,
    pub synced: PrefsMap,
}

impl PrefsSnapshot {
    pub fn local_id(&self) -> Option<&str> {
        self.local.as_ref().and_then(local_prefs_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrefsState {
    /// Absent while no document is open.
    pub local: Option<PrefsMap>,
    pub global: PrefsMap,
    pub synced: PrefsMap,
}

impl PrefsState {
    /// Identity of the active document, if any.
    pub fn local_id(&self) -> Option<&str> {
        self.local.as_ref().and_then(local_prefs_id)
    }

    pub fn has_document(&self) -> bool {
        self.local.is_some()
    }
}

/// Runtime state owned by a [`crate::store::ClientStore`]. Never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientState {
    pub modals: ModalStack,
    pub prefs: PrefsState,
}
