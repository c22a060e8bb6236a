//! Preference store client: loads, persists, and merges the local, global, and synced tiers.
//!
//! Every successful save persists remotely first and merges into cached state second. Nothing
//! guards the window between the two; a reader in between sees the old cached value.

use std::rc::Rc;

use futures::{stream, StreamExt};
use platform_host::{read_pref_typed, PrefsBackend, PrefsMap};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    config::RuntimeConfig,
    error::{PrefsError, PrefsOperation, SyncedSaveFailure},
    model::PrefsSnapshot,
    reducer::ClientAction,
    store::ClientStore,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefsTier {
    Local,
    Global,
    Synced,
}

#[derive(Clone)]
pub struct PrefsClient {
    backend: Rc<dyn PrefsBackend>,
    store: ClientStore,
    config: RuntimeConfig,
}

impl PrefsClient {
    pub fn new(backend: Rc<dyn PrefsBackend>, store: ClientStore, config: RuntimeConfig) -> Self {
        Self {
            backend,
            store,
            config,
        }
    }

    /// Fetches all three tiers without touching cached state.
    ///
    /// The three fetches are independent round-trips; a concurrent writer may land between them.
    pub async fn load_preferences(&self) -> Result<PrefsSnapshot, PrefsError> {
        let local = self
            .backend
            .load_local_prefs()
            .await
            .map_err(|e| transport_failure(PrefsOperation::LoadLocal, e))?;
        let global = self
            .backend
            .load_global_prefs()
            .await
            .map_err(|e| transport_failure(PrefsOperation::LoadGlobal, e))?;
        let synced = self
            .backend
            .load_synced_prefs()
            .await
            .map_err(|e| transport_failure(PrefsOperation::LoadSynced, e))?;
        Ok(PrefsSnapshot {
            local,
            global,
            synced,
        })
    }

    /// Replaces all cached tiers with `snapshot` in one transition.
    pub fn apply_snapshot(&self, snapshot: PrefsSnapshot) {
        self.store.dispatch(ClientAction::SetPrefs(snapshot));
    }

    /// Persists `prefs` for the open document, then merges them into cached local prefs.
    pub async fn save_local(&self, prefs: PrefsMap) -> Result<(), PrefsError> {
        self.backend
            .save_local_prefs(&prefs)
            .await
            .map_err(|e| transport_failure(PrefsOperation::SaveLocal, e))?;
        self.store.dispatch(ClientAction::MergeLocalPrefs(prefs));
        Ok(())
    }

    /// Refreshes the cached global tier, keeping local and synced prefs as they are.
    pub async fn load_global(&self) -> Result<PrefsMap, PrefsError> {
        let global = self
            .backend
            .load_global_prefs()
            .await
            .map_err(|e| transport_failure(PrefsOperation::LoadGlobal, e))?;
        let (local, synced) = self
            .store
            .with_state(|state| (state.prefs.local.clone(), state.prefs.synced.clone()));
        self.store.dispatch(ClientAction::SetPrefs(PrefsSnapshot {
            local,
            global: global.clone(),
            synced,
        }));
        Ok(global)
    }

    pub async fn save_global(&self, prefs: PrefsMap) -> Result<(), PrefsError> {
        self.save_global_with(prefs, || {}).await
    }

    /// Persists and merges global prefs, then runs `on_complete`.
    ///
    /// `on_complete` is dropped without running when the persist fails.
    pub async fn save_global_with(
        &self,
        prefs: PrefsMap,
        on_complete: impl FnOnce(),
    ) -> Result<(), PrefsError> {
        self.backend
            .save_global_prefs(&prefs)
            .await
            .map_err(|e| transport_failure(PrefsOperation::SaveGlobal, e))?;
        self.store.dispatch(ClientAction::MergeGlobalPrefs(prefs));
        on_complete();
        Ok(())
    }

    /// Saves each synced key as its own remote upsert, all in flight together.
    ///
    /// Every call is allowed to settle. The cached synced tier is merged only when every key
    /// succeeded; otherwise the error lists the failing keys and the keys that did reach the
    /// remote store, which are not rolled back.
    pub async fn save_synced(&self, prefs: PrefsMap) -> Result<(), PrefsError> {
        let width = self.config.synced_batch_width(prefs.len());
        let backend = &self.backend;
        let outcomes: Vec<(&String, Result<(), String>)> = stream::iter(prefs.iter())
            .map(|(key, value)| async move {
                (key, backend.save_synced_pref_entry(key, value).await)
            })
            .buffered(width)
            .collect()
            .await;

        let mut failures = Vec::new();
        let mut saved = Vec::new();
        for (key, outcome) in outcomes {
            match outcome {
                Ok(()) => saved.push(key.clone()),
                Err(message) => {
                    warn!(key = %key, %message, "synced pref save failed");
                    failures.push(SyncedSaveFailure {
                        key: key.clone(),
                        message,
                    });
                }
            }
        }
        if !failures.is_empty() {
            return Err(PrefsError::SyncedSave { failures, saved });
        }

        debug!(keys = saved.len(), width, "synced prefs saved");
        self.store.dispatch(ClientAction::MergeSyncedPrefs(prefs));
        Ok(())
    }

    /// Re-reads one synced key from the remote store and merges it into the cache.
    ///
    /// Returns `None` (cache untouched) when the remote store has no value for `key`.
    pub async fn refresh_synced_pref(&self, key: &str) -> Result<Option<Value>, PrefsError> {
        let value = self
            .backend
            .get_synced_pref(key)
            .await
            .map_err(|e| transport_failure(PrefsOperation::GetSynced, e))?;
        if let Some(value) = &value {
            let mut patch = PrefsMap::new();
            patch.insert(key.to_string(), value.clone());
            self.store.dispatch(ClientAction::MergeSyncedPrefs(patch));
        }
        Ok(value)
    }

    pub fn local_prefs(&self) -> Option<PrefsMap> {
        self.store.with_state(|state| state.prefs.local.clone())
    }

    pub fn global_prefs(&self) -> PrefsMap {
        self.store.with_state(|state| state.prefs.global.clone())
    }

    pub fn synced_prefs(&self) -> PrefsMap {
        self.store.with_state(|state| state.prefs.synced.clone())
    }

    /// Identity of the document whose local prefs are cached.
    pub fn local_prefs_id(&self) -> Option<String> {
        self.store
            .with_state(|state| state.prefs.local_id().map(str::to_string))
    }

    /// Reads a typed value from a cached tier.
    ///
    /// # Errors
    ///
    /// Returns an error when the cached JSON does not deserialize into `T`.
    pub fn pref_typed<T: DeserializeOwned>(
        &self,
        tier: PrefsTier,
        key: &str,
    ) -> Result<Option<T>, String> {
        self.store.with_state(|state| match tier {
            PrefsTier::Local => match &state.prefs.local {
                Some(local) => read_pref_typed(local, key),
                None => Ok(None),
            },
            PrefsTier::Global => read_pref_typed(&state.prefs.global, key),
            PrefsTier::Synced => read_pref_typed(&state.prefs.synced, key),
        })
    }
}

fn transport_failure(operation: PrefsOperation, message: String) -> PrefsError {
    warn!(%operation, %message, "prefs backend call failed");
    PrefsError::transport(operation, message)
}
