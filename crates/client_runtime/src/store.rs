//! Long-lived owner of client state, pending modal replies, and change listeners.
//!
//! The store is the only place [`reduce_client`] runs. Both the modal manager and the prefs
//! client hold a clone of the same store; neither calls the other.

use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    rc::Rc,
};

use tracing::{debug, info};

use crate::{
    modal_reply::{ModalReply, ModalReplySender},
    modal_stack::ModalInstanceId,
    model::ClientState,
    modal::Modal,
    reducer::{reduce_client, reduce_show, ClientAction, RuntimeEffect, ShowMode},
};

type Listener = Rc<dyn Fn(&ClientAction, &ClientState)>;

/// Handle returned by [`ClientStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
struct StoreInner {
    state: RefCell<ClientState>,
    replies: RefCell<HashMap<ModalInstanceId, ModalReplySender>>,
    listeners: RefCell<Vec<(SubscriptionId, Listener)>>,
    next_subscription: Cell<u64>,
}

/// Cheap-clone shared store. Not thread-safe; meant for a single cooperative scheduler.
#[derive(Clone, Default)]
pub struct ClientStore {
    inner: Rc<StoreInner>,
}

impl std::fmt::Debug for ClientStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientStore")
            .field("state", &self.inner.state.borrow())
            .field("pending_replies", &self.inner.replies.borrow().len())
            .field("listeners", &self.inner.listeners.borrow().len())
            .finish()
    }
}

impl ClientStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reduces `action`, settles effects, then notifies each listener exactly once.
    ///
    /// Listeners receive the post-transition state, so multi-step transitions such as a replace
    /// are observed as a single change. Listeners may dispatch further actions.
    pub fn dispatch(&self, action: ClientAction) -> Vec<RuntimeEffect> {
        let observed = action.clone();
        let effects = self.reduce(&observed, |state| reduce_client(state, action));
        self.commit(&observed, &effects);
        effects
    }

    /// Pushes or replaces `modal` as one dispatch and returns the instance now on top.
    pub(crate) fn show(&self, modal: Modal, mode: ShowMode) -> ModalInstanceId {
        let observed = mode.action(modal.clone());
        let (id, effects) = self.reduce(&observed, |state| reduce_show(state, modal, mode));
        self.commit(&observed, &effects);
        id
    }

    /// Returns a copy of the current state.
    pub fn state(&self) -> ClientState {
        self.inner.state.borrow().clone()
    }

    /// Reads the current state without cloning it.
    ///
    /// `f` must not dispatch.
    pub fn with_state<R>(&self, f: impl FnOnce(&ClientState) -> R) -> R {
        f(&self.inner.state.borrow())
    }

    /// Registers a listener called after every dispatched action.
    pub fn subscribe(
        &self,
        listener: impl Fn(&ClientAction, &ClientState) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.inner.next_subscription.get());
        self.inner.next_subscription.set(id.0 + 1);
        self.inner
            .listeners
            .borrow_mut()
            .push((id, Rc::new(listener)));
        id
    }

    /// Removes a listener. Returns `false` when `id` was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.inner.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    pub(crate) fn register_reply(&self, id: ModalInstanceId, sender: ModalReplySender) {
        // A reply can only wait on an instance that is still stacked.
        if self.with_state(|state| state.modals.contains_instance(id)) {
            self.inner.replies.borrow_mut().insert(id, sender);
        }
    }

    /// Sends `reply` to whoever awaits instance `id`. Returns `false` when nobody is waiting.
    pub(crate) fn resolve_reply(&self, id: ModalInstanceId, reply: ModalReply) -> bool {
        let Some(sender) = self.inner.replies.borrow_mut().remove(&id) else {
            return false;
        };
        sender.send(reply).is_ok()
    }

    #[cfg(test)]
    pub(crate) fn pending_replies(&self) -> usize {
        self.inner.replies.borrow().len()
    }

    fn reduce<R>(&self, observed: &ClientAction, f: impl FnOnce(&mut ClientState) -> R) -> R {
        let mut state = self.inner.state.borrow_mut();
        let outcome = f(&mut state);
        debug!(
            action = observed.kind(),
            modal_depth = state.modals.len(),
            "client action reduced"
        );
        outcome
    }

    fn commit(&self, observed: &ClientAction, effects: &[RuntimeEffect]) {
        self.settle_effects(effects);
        self.notify(observed);
    }

    fn settle_effects(&self, effects: &[RuntimeEffect]) {
        for effect in effects {
            match effect {
                RuntimeEffect::ModalShown(id) => debug!(instance = id.0, "modal shown"),
                RuntimeEffect::ModalsDismissed(ids) => {
                    let mut replies = self.inner.replies.borrow_mut();
                    for id in ids {
                        // Dropping the sender resolves the receiver as dismissed.
                        replies.remove(id);
                    }
                    debug!(count = ids.len(), "modals dismissed");
                }
                RuntimeEffect::ActiveDocumentChanged { previous, current } => info!(
                    previous = previous.as_deref().unwrap_or("<none>"),
                    current = current.as_deref().unwrap_or("<none>"),
                    "active document changed"
                ),
            }
        }
    }

    fn notify(&self, action: &ClientAction) {
        let listeners: Vec<Listener> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        if listeners.is_empty() {
            return;
        }
        let state = self.state();
        for listener in listeners {
            listener(action, &state);
        }
    }
}
