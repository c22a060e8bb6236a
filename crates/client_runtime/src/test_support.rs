//! Test doubles shared by the unit test modules.

use std::{
    cell::{Cell, RefCell},
    collections::HashSet,
    future::Future,
    pin::Pin,
    rc::Rc,
    task::{Context, Poll},
};

use platform_host::{MemoryPrefsBackend, PrefsBackend, PrefsBackendFuture, PrefsMap};
use serde_json::Value;

pub(crate) fn prefs(entries: &[(&str, Value)]) -> PrefsMap {
    entries
        .iter()
        .map(|(k, v)| ((*k).to_string(), v.clone()))
        .collect()
}

/// Returns `Pending` once so sibling futures get polled before this one finishes.
#[derive(Default)]
struct YieldOnce {
    yielded: bool,
}

impl Future for YieldOnce {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.yielded {
            return Poll::Ready(());
        }
        self.yielded = true;
        cx.waker().wake_by_ref();
        Poll::Pending
    }
}

#[derive(Default)]
struct FlakyState {
    failing_ops: RefCell<HashSet<&'static str>>,
    failing_synced: RefCell<HashSet<String>>,
    in_flight: Cell<usize>,
    max_in_flight: Cell<usize>,
}

/// Memory backend with injectable failures and in-flight tracking for synced saves.
#[derive(Clone, Default)]
pub(crate) struct FlakyBackend {
    memory: MemoryPrefsBackend,
    state: Rc<FlakyState>,
}

impl FlakyBackend {
    /// Fails every call of one operation: `load-local`, `save-local`, `load-global`,
    /// `save-global`, or `load-synced`.
    pub(crate) fn fail_operation(&self, op: &'static str) {
        self.state.failing_ops.borrow_mut().insert(op);
    }

    pub(crate) fn fail_synced_key(&self, key: &str) {
        self.state.failing_synced.borrow_mut().insert(key.to_string());
    }

    pub(crate) fn heal(&self) {
        self.state.failing_ops.borrow_mut().clear();
        self.state.failing_synced.borrow_mut().clear();
    }

    pub(crate) fn memory(&self) -> MemoryPrefsBackend {
        self.memory.clone()
    }

    pub(crate) fn max_in_flight(&self) -> usize {
        self.state.max_in_flight.get()
    }

    fn check(&self, op: &'static str) -> Result<(), String> {
        if self.state.failing_ops.borrow().contains(op) {
            return Err(format!("{op}: backend unavailable"));
        }
        Ok(())
    }
}

impl PrefsBackend for FlakyBackend {
    fn load_local_prefs(&self) -> PrefsBackendFuture<'_, Result<Option<PrefsMap>, String>> {
        Box::pin(async move {
            self.check("load-local")?;
            self.memory.load_local_prefs().await
        })
    }

    fn save_local_prefs<'a>(
        &'a self,
        prefs: &'a PrefsMap,
    ) -> PrefsBackendFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.check("save-local")?;
            self.memory.save_local_prefs(prefs).await
        })
    }

    fn load_global_prefs(&self) -> PrefsBackendFuture<'_, Result<PrefsMap, String>> {
        Box::pin(async move {
            self.check("load-global")?;
            self.memory.load_global_prefs().await
        })
    }

    fn save_global_prefs<'a>(
        &'a self,
        prefs: &'a PrefsMap,
    ) -> PrefsBackendFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.check("save-global")?;
            self.memory.save_global_prefs(prefs).await
        })
    }

    fn load_synced_prefs(&self) -> PrefsBackendFuture<'_, Result<PrefsMap, String>> {
        Box::pin(async move {
            self.check("load-synced")?;
            self.memory.load_synced_prefs().await
        })
    }

    fn save_synced_pref_entry<'a>(
        &'a self,
        key: &'a str,
        value: &'a Value,
    ) -> PrefsBackendFuture<'a, Result<(), String>> {
        Box::pin(async move {
            let in_flight = self.state.in_flight.get() + 1;
            self.state.in_flight.set(in_flight);
            self.state
                .max_in_flight
                .set(self.state.max_in_flight.get().max(in_flight));
            YieldOnce::default().await;
            self.state.in_flight.set(self.state.in_flight.get() - 1);

            if self.state.failing_synced.borrow().contains(key) {
                return Err(format!("remote rejected `{key}`"));
            }
            self.memory.save_synced_pref_entry(key, value).await
        })
    }
}
