//! Runtime context wiring for the client.
//!
//! Owns the shared store and hands out the prefs client, modal manager, and document-switch
//! coordinator built over it. All handles observe the same state.

use platform_host::HostServices;
use tracing::debug;

use crate::{
    config::RuntimeConfig, document_switch::DocumentSwitchCoordinator,
    modal_manager::ModalManager, prefs::PrefsClient, store::ClientStore,
};

#[derive(Clone)]
pub struct ClientRuntime {
    host: HostServices,
    config: RuntimeConfig,
    store: ClientStore,
    prefs: PrefsClient,
    modals: ModalManager,
    documents: DocumentSwitchCoordinator,
}

impl ClientRuntime {
    pub fn new(host: HostServices, config: RuntimeConfig) -> Self {
        debug!(
            host = host.host_strategy.as_str(),
            policy = ?config.document_switch,
            concurrency = ?config.synced_save_concurrency,
            "client runtime starting"
        );
        let store = ClientStore::new();
        let prefs = PrefsClient::new(host.prefs.clone(), store.clone(), config.clone());
        let modals = ModalManager::new(store.clone());
        let documents =
            DocumentSwitchCoordinator::new(prefs.clone(), modals.clone(), config.document_switch);
        Self {
            host,
            config,
            store,
            prefs,
            modals,
            documents,
        }
    }

    pub fn host(&self) -> &HostServices {
        &self.host
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn store(&self) -> &ClientStore {
        &self.store
    }

    pub fn prefs(&self) -> &PrefsClient {
        &self.prefs
    }

    pub fn modals(&self) -> &ModalManager {
        &self.modals
    }

    pub fn documents(&self) -> &DocumentSwitchCoordinator {
        &self.documents
    }
}
