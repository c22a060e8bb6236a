//! Three-tier preference backend contract and reference adapters.
//!
//! Local prefs are scoped to the open document, global prefs to the application instance, and
//! synced prefs live on a remote service that addresses each entry by key.

use std::{cell::RefCell, collections::BTreeMap, future::Future, pin::Pin, rc::Rc};

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::storage::keys::LOCAL_ID_KEY;

/// Ordered string-keyed preference mapping shared by all three tiers.
pub type PrefsMap = BTreeMap<String, Value>;

/// Object-safe boxed future used by [`PrefsBackend`] async methods.
pub type PrefsBackendFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Host service for loading and persisting the local, global, and synced preference tiers.
pub trait PrefsBackend {
    /// Loads prefs for the currently open document, or `None` when no document is open.
    fn load_local_prefs(&self) -> PrefsBackendFuture<'_, Result<Option<PrefsMap>, String>>;

    /// Persists local prefs for the currently open document.
    fn save_local_prefs<'a>(&'a self, prefs: &'a PrefsMap)
        -> PrefsBackendFuture<'a, Result<(), String>>;

    /// Loads application-wide prefs.
    fn load_global_prefs(&self) -> PrefsBackendFuture<'_, Result<PrefsMap, String>>;

    /// Persists application-wide prefs.
    fn save_global_prefs<'a>(
        &'a self,
        prefs: &'a PrefsMap,
    ) -> PrefsBackendFuture<'a, Result<(), String>>;

    /// Loads every synced pref in one batched round-trip.
    fn load_synced_prefs(&self) -> PrefsBackendFuture<'_, Result<PrefsMap, String>>;

    /// Loads one synced pref by key.
    ///
    /// The default implementation reads the batched mapping and picks `key` out of it.
    fn get_synced_pref<'a>(
        &'a self,
        key: &'a str,
    ) -> PrefsBackendFuture<'a, Result<Option<Value>, String>> {
        Box::pin(async move {
            let mut all = self.load_synced_prefs().await?;
            Ok(all.remove(key))
        })
    }

    /// Upserts one synced pref entry. Idempotent for a given `(key, value)`.
    fn save_synced_pref_entry<'a>(
        &'a self,
        key: &'a str,
        value: &'a Value,
    ) -> PrefsBackendFuture<'a, Result<(), String>>;
}

/// Returns the document identity carried by a local prefs mapping.
///
/// Only a non-empty string `id` counts as an identity.
pub fn local_prefs_id(prefs: &PrefsMap) -> Option<&str> {
    prefs
        .get(LOCAL_ID_KEY)
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
}

/// Merges `patch` into `target`, leaving keys absent from `patch` untouched.
pub fn merge_prefs(target: &mut PrefsMap, patch: &PrefsMap) {
    for (key, value) in patch {
        target.insert(key.clone(), value.clone());
    }
}

/// Reads and deserializes a typed value out of a preference mapping.
///
/// # Errors
///
/// Returns an error when the stored JSON does not match `T`.
pub fn read_pref_typed<T: DeserializeOwned>(
    prefs: &PrefsMap,
    key: &str,
) -> Result<Option<T>, String> {
    let Some(raw) = prefs.get(key) else {
        return Ok(None);
    };
    let value = serde_json::from_value(raw.clone()).map_err(|e| format!("pref `{key}`: {e}"))?;
    Ok(Some(value))
}

/// Serializes `value` and inserts it under `key`.
///
/// # Errors
///
/// Returns an error when `value` cannot be represented as JSON.
pub fn write_pref_typed<T: Serialize>(
    prefs: &mut PrefsMap,
    key: &str,
    value: &T,
) -> Result<(), String> {
    let raw = serde_json::to_value(value).map_err(|e| format!("pref `{key}`: {e}"))?;
    prefs.insert(key.to_string(), raw);
    Ok(())
}

#[derive(Debug, Clone, Copy, Default)]
/// No-op preference backend: no document is ever open, every tier loads empty, saves succeed.
pub struct NoopPrefsBackend;

impl PrefsBackend for NoopPrefsBackend {
    fn load_local_prefs(&self) -> PrefsBackendFuture<'_, Result<Option<PrefsMap>, String>> {
        Box::pin(async { Ok(None) })
    }

    fn save_local_prefs<'a>(
        &'a self,
        _prefs: &'a PrefsMap,
    ) -> PrefsBackendFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }

    fn load_global_prefs(&self) -> PrefsBackendFuture<'_, Result<PrefsMap, String>> {
        Box::pin(async { Ok(PrefsMap::new()) })
    }

    fn save_global_prefs<'a>(
        &'a self,
        _prefs: &'a PrefsMap,
    ) -> PrefsBackendFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }

    fn load_synced_prefs(&self) -> PrefsBackendFuture<'_, Result<PrefsMap, String>> {
        Box::pin(async { Ok(PrefsMap::new()) })
    }

    fn save_synced_pref_entry<'a>(
        &'a self,
        _key: &'a str,
        _value: &'a Value,
    ) -> PrefsBackendFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }
}

#[derive(Debug, Default)]
struct MemoryPrefsTiers {
    local: Option<PrefsMap>,
    global: PrefsMap,
    synced: PrefsMap,
}

#[derive(Debug, Clone, Default)]
/// In-memory preference backend with merge-on-save semantics for every tier.
///
/// Clones share the same underlying tiers, so a test can keep one handle for inspection while the
/// runtime owns another.
pub struct MemoryPrefsBackend {
    inner: Rc<RefCell<MemoryPrefsTiers>>,
}

impl MemoryPrefsBackend {
    /// Opens a document: local prefs become a fresh mapping carrying `id`.
    pub fn open_document(&self, id: &str) {
        let mut local = PrefsMap::new();
        local.insert(LOCAL_ID_KEY.to_string(), Value::String(id.to_string()));
        self.inner.borrow_mut().local = Some(local);
    }

    /// Closes the open document; local prefs become absent.
    pub fn close_document(&self) {
        self.inner.borrow_mut().local = None;
    }

    /// Replaces the stored local tier wholesale.
    pub fn set_local(&self, prefs: Option<PrefsMap>) {
        self.inner.borrow_mut().local = prefs;
    }

    /// Replaces the stored global tier wholesale.
    pub fn set_global(&self, prefs: PrefsMap) {
        self.inner.borrow_mut().global = prefs;
    }

    /// Replaces the stored synced tier wholesale.
    pub fn set_synced(&self, prefs: PrefsMap) {
        self.inner.borrow_mut().synced = prefs;
    }

    /// Returns a copy of the stored local tier.
    pub fn local(&self) -> Option<PrefsMap> {
        self.inner.borrow().local.clone()
    }

    /// Returns a copy of the stored global tier.
    pub fn global(&self) -> PrefsMap {
        self.inner.borrow().global.clone()
    }

    /// Returns a copy of the stored synced tier.
    pub fn synced(&self) -> PrefsMap {
        self.inner.borrow().synced.clone()
    }
}

impl PrefsBackend for MemoryPrefsBackend {
    fn load_local_prefs(&self) -> PrefsBackendFuture<'_, Result<Option<PrefsMap>, String>> {
        Box::pin(async move { Ok(self.inner.borrow().local.clone()) })
    }

    fn save_local_prefs<'a>(
        &'a self,
        prefs: &'a PrefsMap,
    ) -> PrefsBackendFuture<'a, Result<(), String>> {
        Box::pin(async move {
            let mut tiers = self.inner.borrow_mut();
            merge_prefs(tiers.local.get_or_insert_with(PrefsMap::new), prefs);
            Ok(())
        })
    }

    fn load_global_prefs(&self) -> PrefsBackendFuture<'_, Result<PrefsMap, String>> {
        Box::pin(async move { Ok(self.inner.borrow().global.clone()) })
    }

    fn save_global_prefs<'a>(
        &'a self,
        prefs: &'a PrefsMap,
    ) -> PrefsBackendFuture<'a, Result<(), String>> {
        Box::pin(async move {
            merge_prefs(&mut self.inner.borrow_mut().global, prefs);
            Ok(())
        })
    }

    fn load_synced_prefs(&self) -> PrefsBackendFuture<'_, Result<PrefsMap, String>> {
        Box::pin(async move { Ok(self.inner.borrow().synced.clone()) })
    }

    fn get_synced_pref<'a>(
        &'a self,
        key: &'a str,
    ) -> PrefsBackendFuture<'a, Result<Option<Value>, String>> {
        Box::pin(async move { Ok(self.inner.borrow().synced.get(key).cloned()) })
    }

    fn save_synced_pref_entry<'a>(
        &'a self,
        key: &'a str,
        value: &'a Value,
    ) -> PrefsBackendFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.inner
                .borrow_mut()
                .synced
                .insert(key.to_string(), value.clone());
            Ok(())
        })
    }
}
