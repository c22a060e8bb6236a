//! Clears overlay state when a prefs load activates a document.
//!
//! Modals opened while no document was open (file pickers, import flows) capture context that is
//! stale once a document loads, so they are closed before the new prefs snapshot is applied.

use platform_host::PrefsMap;
use tracing::info;

use crate::{
    config::DocumentSwitchPolicy, error::PrefsError, modal_manager::ModalManager,
    prefs::PrefsClient,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchOutcome {
    /// Modals were closed before the snapshot was applied.
    ModalsClosed,
    /// The snapshot was applied with the modal stack untouched.
    Unchanged,
}

#[derive(Clone)]
pub struct DocumentSwitchCoordinator {
    prefs: PrefsClient,
    modals: ModalManager,
    policy: DocumentSwitchPolicy,
}

impl DocumentSwitchCoordinator {
    pub fn new(prefs: PrefsClient, modals: ModalManager, policy: DocumentSwitchPolicy) -> Self {
        Self {
            prefs,
            modals,
            policy,
        }
    }

    /// Loads all three tiers and applies them, closing modals first when a document activates.
    ///
    /// Returns the freshly loaded local prefs. A failed load changes nothing.
    pub async fn load_prefs(&self) -> Result<Option<PrefsMap>, PrefsError> {
        self.load_prefs_reporting().await.map(|(local, _)| local)
    }

    /// Like [`DocumentSwitchCoordinator::load_prefs`], also reporting whether modals were closed.
    pub async fn load_prefs_reporting(
        &self,
    ) -> Result<(Option<PrefsMap>, SwitchOutcome), PrefsError> {
        let previous = self.prefs.local_prefs();
        let snapshot = self.prefs.load_preferences().await?;

        let closing = should_close_modals(self.policy, previous.as_ref(), snapshot.local.as_ref());
        let outcome = if closing {
            info!(
                document = snapshot.local_id().unwrap_or_default(),
                "document activated; closing modals"
            );
            self.modals.close();
            SwitchOutcome::ModalsClosed
        } else {
            SwitchOutcome::Unchanged
        };

        let local = snapshot.local.clone();
        self.prefs.apply_snapshot(snapshot);
        Ok((local, outcome))
    }
}

/// Decides whether loading `next` local prefs over `previous` must close every modal.
///
/// Under [`DocumentSwitchPolicy::FromNoDocument`] only the "no document" to "document with an
/// id" transition qualifies; switching straight from one document to another does not.
pub fn should_close_modals(
    policy: DocumentSwitchPolicy,
    previous: Option<&PrefsMap>,
    next: Option<&PrefsMap>,
) -> bool {
    let Some(next_id) = next.and_then(platform_host::local_prefs_id) else {
        return false;
    };
    match (policy, previous) {
        (_, None) => true,
        (DocumentSwitchPolicy::FromNoDocument, Some(_)) => false,
        (DocumentSwitchPolicy::AnyDocumentChange, Some(previous)) => {
            platform_host::local_prefs_id(previous) != Some(next_id)
        }
    }
}
