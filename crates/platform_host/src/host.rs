//! Host service bundle injected into the client runtime.

use std::rc::Rc;

use crate::{MemoryPrefsBackend, NoopPrefsBackend, PrefsBackend};

/// Stable host strategy selected for the current composition path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostStrategy {
    /// Preferences served by the remote preference service.
    Remote,
    /// Preferences kept in process memory (tests, previews).
    InMemory,
    /// Placeholder composition with no-op adapters.
    Stub,
}

impl HostStrategy {
    /// Returns a stable string token for diagnostics.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Remote => "remote",
            Self::InMemory => "in-memory",
            Self::Stub => "stub",
        }
    }
}

/// Runtime-selected host service bundle.
///
/// All environment-specific adapter selection happens before this bundle crosses into the
/// runtime, which keeps the runtime decoupled from transport details.
#[derive(Clone)]
pub struct HostServices {
    /// Three-tier preference backend.
    pub prefs: Rc<dyn PrefsBackend>,
    /// Stable strategy identifier for diagnostics.
    pub host_strategy: HostStrategy,
}

impl HostServices {
    /// Bundles a caller-supplied remote preference backend.
    pub fn remote(prefs: Rc<dyn PrefsBackend>) -> Self {
        Self {
            prefs,
            host_strategy: HostStrategy::Remote,
        }
    }

    /// Bundles an in-memory backend; the caller keeps `backend` as an inspection handle.
    pub fn in_memory(backend: MemoryPrefsBackend) -> Self {
        Self {
            prefs: Rc::new(backend),
            host_strategy: HostStrategy::InMemory,
        }
    }

    /// Bundles no-op adapters.
    pub fn stub() -> Self {
        Self {
            prefs: Rc::new(NoopPrefsBackend),
            host_strategy: HostStrategy::Stub,
        }
    }
}

impl std::fmt::Debug for HostServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostServices")
            .field("host_strategy", &self.host_strategy)
            .finish_non_exhaustive()
    }
}
