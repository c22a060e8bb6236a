//! Client-side runtime for a budgeting application: the modal overlay stack, the three-tier
//! preference store, and the coordinator that ties document activation to both.
//!
//! State lives in a single [`ClientStore`] mutated only through [`reduce_client`]. The
//! [`PrefsClient`], [`ModalManager`], and [`DocumentSwitchCoordinator`] handles dispatch into it,
//! and [`ClientRuntime`] wires them over a [`platform_host::HostServices`] bundle.

pub mod config;
pub mod document_switch;
pub mod entities;
pub mod error;
pub mod modal;
pub mod modal_manager;
pub mod modal_reply;
pub mod modal_stack;
pub mod model;
pub mod prefs;
pub mod reducer;
pub mod runtime;
pub mod store;

#[cfg(test)]
mod test_support;

pub use config::{DocumentSwitchPolicy, RuntimeConfig};
pub use document_switch::{should_close_modals, DocumentSwitchCoordinator, SwitchOutcome};
pub use error::{ConfigError, PrefsError, PrefsOperation, SyncedSaveFailure};
pub use modal::{Modal, ModalName, UnknownModalName};
pub use modal_manager::ModalManager;
pub use modal_reply::{ModalReply, ModalReplyReceiver};
pub use modal_stack::{ModalEntry, ModalInstanceId, ModalStack};
pub use model::{ClientState, PrefsSnapshot, PrefsState};
pub use prefs::{PrefsClient, PrefsTier};
pub use reducer::{reduce_client, reduce_show, ClientAction, RuntimeEffect, ShowMode};
pub use runtime::ClientRuntime;
pub use store::{ClientStore, SubscriptionId};
