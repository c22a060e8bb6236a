//! Application-facing handle for presenting overlays.
//!
//! Each operation dispatches exactly one action, so listeners observe one state change per call.

use tracing::debug;

use crate::{
    modal::{Modal, ModalName},
    modal_reply::{reply_channel, ModalReply, ModalReplyReceiver},
    modal_stack::{ModalEntry, ModalInstanceId},
    reducer::{ClientAction, ShowMode},
    store::ClientStore,
};

#[derive(Debug, Clone)]
pub struct ModalManager {
    store: ClientStore,
}

impl ModalManager {
    pub fn new(store: ClientStore) -> Self {
        Self { store }
    }

    pub fn push(&self, modal: impl Into<Modal>) -> ModalInstanceId {
        self.store.show(modal.into(), ShowMode::Push)
    }

    /// Pushes `modal` and returns a future resolved by [`ModalManager::resolve`].
    pub fn push_with_reply(
        &self,
        modal: impl Into<Modal>,
    ) -> (ModalInstanceId, ModalReplyReceiver) {
        let id = self.push(modal);
        let (tx, rx) = reply_channel();
        self.store.register_reply(id, tx);
        (id, rx)
    }

    pub fn replace(&self, modal: impl Into<Modal>) -> ModalInstanceId {
        self.store.show(modal.into(), ShowMode::Replace)
    }

    /// Same as [`ModalManager::replace`], with a reply channel for the new instance.
    pub fn replace_with_reply(
        &self,
        modal: impl Into<Modal>,
    ) -> (ModalInstanceId, ModalReplyReceiver) {
        let id = self.replace(modal);
        let (tx, rx) = reply_channel();
        self.store.register_reply(id, tx);
        (id, rx)
    }

    pub fn pop(&self) {
        if self.store.dispatch(ClientAction::PopModal).is_empty() {
            debug!("pop on empty modal stack ignored");
        }
    }

    pub fn close(&self) {
        self.store.dispatch(ClientAction::CloseModal);
    }

    /// Drops every modal above the topmost `root`. No-op when `root` is not stacked.
    pub fn collapse(&self, root: ModalName) {
        let present = self.store.with_state(|state| state.modals.contains(root));
        if !present {
            debug!(root = root.as_str(), "collapse target not stacked");
        }
        self.store.dispatch(ClientAction::CollapseModals { root });
    }

    /// Delivers the user's answer for instance `id`. Returns `false` when nobody awaits it.
    ///
    /// The stack is left as is; the UI pops or collapses separately.
    pub fn resolve(&self, id: ModalInstanceId, reply: ModalReply) -> bool {
        self.store.resolve_reply(id, reply)
    }

    pub fn top(&self) -> Option<ModalEntry> {
        self.store.with_state(|state| state.modals.top().cloned())
    }

    pub fn depth(&self) -> usize {
        self.store.with_state(|state| state.modals.len())
    }

    pub fn names(&self) -> Vec<ModalName> {
        self.store.with_state(|state| state.modals.names())
    }
}
