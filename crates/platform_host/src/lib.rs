//! Typed host-domain contracts shared by the client runtime and preference adapters.
//!
//! This crate is the API-first boundary for the preference service. It exposes the three
//! preference tiers, the object-safe async [`PrefsBackend`] trait, and reference adapters, while
//! the concrete network transport stays outside the workspace.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod host;
pub mod storage;

pub use host::{HostServices, HostStrategy};
pub use storage::keys;
pub use storage::prefs::{
    local_prefs_id, merge_prefs, read_pref_typed, write_pref_typed, MemoryPrefsBackend,
    NoopPrefsBackend, PrefsBackend, PrefsBackendFuture, PrefsMap,
};
