//! Reducer actions, side-effect intents, and transition logic for client overlay and prefs state.

use platform_host::{merge_prefs, PrefsMap};

use crate::{
    modal::{Modal, ModalName},
    modal_stack::{ModalEntry, ModalInstanceId},
    model::{ClientState, PrefsSnapshot},
};

#[derive(Debug, Clone, PartialEq)]
/// Actions accepted by [`reduce_client`] to mutate [`ClientState`].
pub enum ClientAction {
    /// Push a modal on top of the stack.
    PushModal(Modal),
    /// Swap the top modal for another in one transition.
    ReplaceModal(Modal),
    /// Remove the top modal, if any.
    PopModal,
    /// Remove every modal.
    CloseModal,
    /// Drop every modal above the topmost instance of `root`.
    CollapseModals {
        /// Tag of the flow's initiating modal.
        root: ModalName,
    },
    /// Replace all three preference tiers with a freshly loaded snapshot.
    SetPrefs(PrefsSnapshot),
    /// Merge keys into local prefs, creating the mapping if absent.
    MergeLocalPrefs(PrefsMap),
    /// Merge keys into global prefs.
    MergeGlobalPrefs(PrefsMap),
    /// Merge keys into synced prefs.
    MergeSyncedPrefs(PrefsMap),
}

impl ClientAction {
    /// Stable label for diagnostics.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::PushModal(_) => "push-modal",
            Self::ReplaceModal(_) => "replace-modal",
            Self::PopModal => "pop-modal",
            Self::CloseModal => "close-modal",
            Self::CollapseModals { .. } => "collapse-modals",
            Self::SetPrefs(_) => "set-prefs",
            Self::MergeLocalPrefs(_) => "merge-local-prefs",
            Self::MergeGlobalPrefs(_) => "merge-global-prefs",
            Self::MergeSyncedPrefs(_) => "merge-synced-prefs",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Side-effect intents emitted by [`reduce_client`] for the store to act on.
pub enum RuntimeEffect {
    /// A modal instance became the top of the stack.
    ModalShown(ModalInstanceId),
    /// Modal instances left the stack; pending replies for them resolve as dismissed.
    ModalsDismissed(Vec<ModalInstanceId>),
    /// The active document identity changed with a prefs snapshot.
    ActiveDocumentChanged {
        /// Identity before the snapshot was applied.
        previous: Option<String>,
        /// Identity after the snapshot was applied.
        current: Option<String>,
    },
}

/// How [`reduce_show`] places a modal on the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowMode {
    Push,
    /// Swap out the current top, if any.
    Replace,
}

impl ShowMode {
    /// The action listeners observe for showing `modal` this way.
    pub fn action(self, modal: Modal) -> ClientAction {
        match self {
            Self::Push => ClientAction::PushModal(modal),
            Self::Replace => ClientAction::ReplaceModal(modal),
        }
    }
}

/// Shows `modal` and returns the id of the new top instance together with the effects.
pub fn reduce_show(
    state: &mut ClientState,
    modal: Modal,
    mode: ShowMode,
) -> (ModalInstanceId, Vec<RuntimeEffect>) {
    let mut effects = Vec::new();
    let id = match mode {
        ShowMode::Push => state.modals.push(modal),
        ShowMode::Replace => {
            let (id, removed) = state.modals.replace(modal);
            if let Some(removed) = removed {
                effects.push(RuntimeEffect::ModalsDismissed(vec![removed]));
            }
            id
        }
    };
    effects.push(RuntimeEffect::ModalShown(id));
    (id, effects)
}

/// Applies a [`ClientAction`] to the client state and collects resulting side effects.
///
/// Every transition is total; no action can fail.
pub fn reduce_client(state: &mut ClientState, action: ClientAction) -> Vec<RuntimeEffect> {
    let mut effects = Vec::new();
    match action {
        ClientAction::PushModal(modal) => {
            return reduce_show(state, modal, ShowMode::Push).1;
        }
        ClientAction::ReplaceModal(modal) => {
            return reduce_show(state, modal, ShowMode::Replace).1;
        }
        ClientAction::PopModal => {
            if let Some(entry) = state.modals.pop() {
                effects.push(RuntimeEffect::ModalsDismissed(vec![entry.id]));
            }
        }
        ClientAction::CloseModal => {
            push_dismissed(&mut effects, state.modals.close());
        }
        ClientAction::CollapseModals { root } => {
            push_dismissed(&mut effects, state.modals.collapse(root));
        }
        ClientAction::SetPrefs(snapshot) => {
            let previous = state.prefs.local_id().map(str::to_string);
            let current = snapshot.local_id().map(str::to_string);
            state.prefs.local = snapshot.local;
            state.prefs.global = snapshot.global;
            state.prefs.synced = snapshot.synced;
            if previous != current {
                effects.push(RuntimeEffect::ActiveDocumentChanged { previous, current });
            }
        }
        ClientAction::MergeLocalPrefs(prefs) => {
            merge_prefs(state.prefs.local.get_or_insert_with(PrefsMap::new), &prefs);
        }
        ClientAction::MergeGlobalPrefs(prefs) => {
            merge_prefs(&mut state.prefs.global, &prefs);
        }
        ClientAction::MergeSyncedPrefs(prefs) => {
            merge_prefs(&mut state.prefs.synced, &prefs);
        }
    }
    effects
}

fn push_dismissed(effects: &mut Vec<RuntimeEffect>, removed: Vec<ModalEntry>) {
    if !removed.is_empty() {
        effects.push(RuntimeEffect::ModalsDismissed(
            removed.into_iter().map(|entry| entry.id).collect(),
        ));
    }
}
