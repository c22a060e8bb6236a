use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::fs;
use std::process;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use client_runtime::entities::AccountSyncSource;
use client_runtime::modal::{
    BudgetListOptions, CategoryDeleteTarget, ConfirmCategoryDeleteOptions, ImportOptions,
    SelectLinkedAccountsOptions,
};
use client_runtime::{
    ClientAction, ClientRuntime, DocumentSwitchPolicy, ModalName, ModalReply, PrefsError,
    RuntimeConfig,
};
use futures::executor::block_on;
use platform_host::keys::{
    SYNCED_DATE_FORMAT_KEY, SYNCED_HIDE_FRACTION_KEY, SYNCED_NUMBER_FORMAT_KEY,
};
use platform_host::{HostServices, MemoryPrefsBackend, PrefsBackend, PrefsBackendFuture, PrefsMap};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn prefs(entries: &[(&str, Value)]) -> PrefsMap {
    entries
        .iter()
        .map(|(k, v)| ((*k).to_string(), v.clone()))
        .collect()
}

/// Remote store whose synced upserts can be rejected per key and whose loads can be cut off.
#[derive(Clone, Default)]
struct RemoteStore {
    memory: MemoryPrefsBackend,
    rejected: Rc<RefCell<HashSet<String>>>,
    offline: Rc<Cell<bool>>,
}

impl RemoteStore {
    fn online(&self) -> Result<(), String> {
        if self.offline.get() {
            return Err("connection refused".to_string());
        }
        Ok(())
    }
}

impl PrefsBackend for RemoteStore {
    fn load_local_prefs(&self) -> PrefsBackendFuture<'_, Result<Option<PrefsMap>, String>> {
        Box::pin(async move {
            self.online()?;
            self.memory.load_local_prefs().await
        })
    }

    fn save_local_prefs<'a>(
        &'a self,
        prefs: &'a PrefsMap,
    ) -> PrefsBackendFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.online()?;
            self.memory.save_local_prefs(prefs).await
        })
    }

    fn load_global_prefs(&self) -> PrefsBackendFuture<'_, Result<PrefsMap, String>> {
        Box::pin(async move {
            self.online()?;
            self.memory.load_global_prefs().await
        })
    }

    fn save_global_prefs<'a>(
        &'a self,
        prefs: &'a PrefsMap,
    ) -> PrefsBackendFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.online()?;
            self.memory.save_global_prefs(prefs).await
        })
    }

    fn load_synced_prefs(&self) -> PrefsBackendFuture<'_, Result<PrefsMap, String>> {
        Box::pin(async move {
            self.online()?;
            self.memory.load_synced_prefs().await
        })
    }

    fn save_synced_pref_entry<'a>(
        &'a self,
        key: &'a str,
        value: &'a Value,
    ) -> PrefsBackendFuture<'a, Result<(), String>> {
        Box::pin(async move {
            if self.rejected.borrow().contains(key) {
                return Err("503 service unavailable".to_string());
            }
            self.memory.save_synced_pref_entry(key, value).await
        })
    }
}

fn runtime(remote: &RemoteStore, config: RuntimeConfig) -> ClientRuntime {
    ClientRuntime::new(HostServices::remote(Rc::new(remote.clone())), config)
}

fn temp_dir(prefix: &str) -> std::path::PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let path = std::env::temp_dir().join(format!("{prefix}_{}_{}", process::id(), nanos));
    fs::create_dir_all(&path).expect("create temp dir");
    path
}

#[test]
fn opening_a_budget_from_the_file_list_clears_overlays() {
    let remote = RemoteStore::default();
    let client = runtime(&remote, RuntimeConfig::default());
    let actions = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&actions);
    client
        .store()
        .subscribe(move |action, _| sink.borrow_mut().push(action.kind()));

    block_on(client.documents().load_prefs()).expect("startup load");
    let (_, picker_reply) = client.modals().push_with_reply(BudgetListOptions::default());
    client.modals().push(ImportOptions::default());

    remote.memory.open_document("my-budget");
    actions.borrow_mut().clear();
    let local = block_on(client.documents().load_prefs()).expect("document load");

    assert_eq!(
        local.as_ref().and_then(|l| l.get("id")),
        Some(&json!("my-budget"))
    );
    assert_eq!(*actions.borrow(), vec!["close-modal", "set-prefs"]);
    assert_eq!(client.modals().depth(), 0);
    assert_eq!(block_on(picker_reply), ModalReply::Dismissed);
}

#[test]
fn switching_budgets_keeps_overlays_unless_configured() {
    for (policy, expected_depth) in [
        (DocumentSwitchPolicy::FromNoDocument, 1),
        (DocumentSwitchPolicy::AnyDocumentChange, 0),
    ] {
        let remote = RemoteStore::default();
        remote.memory.open_document("first");
        let config = RuntimeConfig {
            document_switch: policy,
            ..RuntimeConfig::default()
        };
        let client = runtime(&remote, config);
        block_on(client.documents().load_prefs()).expect("first load");

        client.modals().push(ImportOptions::default());
        remote.memory.open_document("second");
        block_on(client.documents().load_prefs()).expect("second load");

        assert_eq!(client.modals().depth(), expected_depth, "{policy:?}");
        assert_eq!(client.prefs().local_prefs_id(), Some("second".to_string()));
    }
}

#[test]
fn offline_load_reports_transport_error_and_keeps_state() {
    let remote = RemoteStore::default();
    remote.memory.open_document("my-budget");
    let client = runtime(&remote, RuntimeConfig::default());
    client.modals().push(ImportOptions::default());
    remote.offline.set(true);

    let err = block_on(client.documents().load_prefs()).expect_err("offline");

    assert!(matches!(err, PrefsError::Transport { .. }));
    assert!(err.to_string().contains("connection refused"));
    assert_eq!(client.modals().depth(), 1);
    assert_eq!(client.prefs().local_prefs(), None);
}

#[test]
fn synced_save_reports_every_failed_key() {
    let remote = RemoteStore::default();
    remote.rejected.borrow_mut().insert(SYNCED_DATE_FORMAT_KEY.to_string());
    remote.rejected.borrow_mut().insert(SYNCED_NUMBER_FORMAT_KEY.to_string());
    let client = runtime(&remote, RuntimeConfig::default());

    let err = block_on(client.prefs().save_synced(prefs(&[
        (SYNCED_DATE_FORMAT_KEY, json!("dd.MM.yyyy")),
        (SYNCED_HIDE_FRACTION_KEY, json!(true)),
        (SYNCED_NUMBER_FORMAT_KEY, json!("dot-comma")),
    ])))
    .expect_err("two keys rejected");

    assert_eq!(
        err.failed_keys(),
        vec![SYNCED_DATE_FORMAT_KEY, SYNCED_NUMBER_FORMAT_KEY]
    );
    assert!(client.prefs().synced_prefs().is_empty());
    assert_eq!(
        remote.memory.synced().get(SYNCED_HIDE_FRACTION_KEY),
        Some(&json!(true))
    );
}

#[test]
fn wizard_reply_and_collapse_round_trip() {
    let remote = RemoteStore::default();
    let client = runtime(&remote, RuntimeConfig::default());

    client.modals().push(SelectLinkedAccountsOptions {
        accounts: vec![json!({ "account_id": "ext-1" })],
        requisition_id: Some("req-1".into()),
        upgrading_account_id: None,
        sync_source: Some(AccountSyncSource::GoCardless),
    });
    let (id, reply) = client.modals().push_with_reply(ConfirmCategoryDeleteOptions {
        target: CategoryDeleteTarget::Category("cat-1".into()),
    });

    assert!(client.modals().resolve(id, ModalReply::Confirmed));
    client.modals().collapse(ModalName::SelectLinkedAccounts);

    assert_eq!(block_on(reply), ModalReply::Confirmed);
    assert_eq!(client.modals().names(), vec![ModalName::SelectLinkedAccounts]);

    client.store().dispatch(ClientAction::PopModal);
    assert_eq!(client.modals().top(), None);
}

#[test]
fn runtime_config_file_drives_synced_concurrency() {
    let root = temp_dir("client_runtime_config");
    let path = root.join("runtime.toml");
    fs::write(
        &path,
        "synced_save_concurrency = 1\ndocument_switch = \"any-document-change\"\n",
    )
    .expect("write config");

    let config = RuntimeConfig::load(&path).expect("load config");
    assert_eq!(config.synced_save_concurrency, Some(1));
    assert_eq!(config.document_switch, DocumentSwitchPolicy::AnyDocumentChange);

    let remote = RemoteStore::default();
    let client = runtime(&remote, config);
    block_on(client.prefs().save_synced(prefs(&[("a", json!(1)), ("b", json!(2))])))
        .expect("sequential save");
    assert_eq!(client.prefs().synced_prefs(), remote.memory.synced());

    let _ = fs::remove_dir_all(root);
}
