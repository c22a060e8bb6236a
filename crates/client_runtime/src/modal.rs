//! Closed catalog of modal overlays and their typed payloads.
//!
//! Every overlay the client can present is one [`Modal`] variant carrying its own payload type,
//! so a descriptor can never pair a tag with another tag's options. Each payload type converts
//! into its variant via [`From`], which lets stack operations accept `impl Into<Modal>`.
//!
//! Payloads hold data only. Continuations the UI would invoke on completion are delivered through
//! [`crate::modal_reply`] instead of being embedded here.

use std::{fmt, str::FromStr};

use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::entities::{
    AccountEntity, AccountSyncSource, BudgetFile, CategoryGroupEntity, RuleEntity,
    TransactionEntity,
};

/// Returned when a string does not name any catalogued modal.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown modal name `{0}`")]
pub struct UnknownModalName(pub String);

macro_rules! modal_catalog {
    ($( $(#[$meta:meta])* $variant:ident($options:ident) => $name:literal, )*) => {
        /// A modal descriptor: discriminator plus the payload declared for it.
        ///
        /// Decoding accepts a missing or `null` `options` key for any payload that has an empty
        /// form.
        #[derive(Debug, Clone, PartialEq, Serialize)]
        #[serde(tag = "name", content = "options")]
        pub enum Modal {
            $(
                $(#[$meta])*
                #[serde(rename = $name)]
                $variant($options),
            )*
        }

        /// Discriminator of a [`Modal`], with a stable kebab-case string form.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum ModalName {
            $(
                #[serde(rename = $name)]
                $variant,
            )*
        }

        impl ModalName {
            /// Every catalogued modal name, in declaration order.
            pub const ALL: &'static [ModalName] = &[$(ModalName::$variant),*];

            /// Stable string token for this modal.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)*
                }
            }
        }

        impl Modal {
            /// Returns the discriminator of this descriptor.
            pub const fn name(&self) -> ModalName {
                match self {
                    $(Self::$variant(_) => ModalName::$variant,)*
                }
            }
        }

        impl<'de> Deserialize<'de> for Modal {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let TaggedModal { name, options } = TaggedModal::deserialize(deserializer)?;
                match name {
                    $(ModalName::$variant => decode_options(options).map(Self::$variant),)*
                }
                .map_err(serde::de::Error::custom)
            }
        }

        $(
            impl From<$options> for Modal {
                fn from(options: $options) -> Self {
                    Self::$variant(options)
                }
            }
        )*
    };
}

modal_catalog! {
    ImportTransactions(ImportTransactionsOptions) => "import-transactions",
    AddAccount(AddAccountOptions) => "add-account",
    AddLocalAccount(AddLocalAccountOptions) => "add-local-account",
    CloseAccount(CloseAccountOptions) => "close-account",
    SelectLinkedAccounts(SelectLinkedAccountsOptions) => "select-linked-accounts",
    ConfirmCategoryDelete(ConfirmCategoryDeleteOptions) => "confirm-category-delete",
    LoadBackup(LoadBackupOptions) => "load-backup",
    ManageRules(ManageRulesOptions) => "manage-rules",
    EditRule(EditRuleOptions) => "edit-rule",
    MergeUnusedPayees(MergeUnusedPayeesOptions) => "merge-unused-payees",
    GoCardlessInit(GoCardlessInitOptions) => "gocardless-init",
    SimplefinInit(SimplefinInitOptions) => "simplefin-init",
    GoCardlessExternalMsg(GoCardlessExternalMsgOptions) => "gocardless-external-msg",
    DeleteBudget(DeleteBudgetOptions) => "delete-budget",
    Import(ImportOptions) => "import",
    ImportYnab4(ImportYnab4Options) => "import-ynab4",
    ImportYnab5(ImportYnab5Options) => "import-ynab5",
    ImportActual(ImportActualOptions) => "import-actual",
    OutOfSyncMigrations(OutOfSyncMigrationsOptions) => "out-of-sync-migrations",
    FilesSettings(FilesSettingsOptions) => "files-settings",
    ConfirmChangeDocumentDir(ConfirmChangeDocumentDirOptions) => "confirm-change-document-dir",
    CreateEncryptionKey(CreateEncryptionKeyOptions) => "create-encryption-key",
    FixEncryptionKey(FixEncryptionKeyOptions) => "fix-encryption-key",
    EditField(EditFieldOptions) => "edit-field",
    CategoryAutocomplete(CategoryAutocompleteOptions) => "category-autocomplete",
    AccountAutocomplete(AccountAutocompleteOptions) => "account-autocomplete",
    PayeeAutocomplete(PayeeAutocompleteOptions) => "payee-autocomplete",
    BudgetSummary(BudgetSummaryOptions) => "budget-summary",
    ScheduleEdit(ScheduleEditOptions) => "schedule-edit",
    ScheduleLink(ScheduleLinkOptions) => "schedule-link",
    SchedulesDiscover(SchedulesDiscoverOptions) => "schedules-discover",
    SchedulePostsOfflineNotification(SchedulePostsOfflineNotificationOptions) => "schedule-posts-offline-notification",
    AccountMenu(AccountMenuOptions) => "account-menu",
    CategoryMenu(CategoryMenuOptions) => "category-menu",
    EnvelopeBudgetMenu(EnvelopeBudgetMenuOptions) => "envelope-budget-menu",
    TrackingBudgetMenu(TrackingBudgetMenuOptions) => "tracking-budget-menu",
    CategoryGroupMenu(CategoryGroupMenuOptions) => "category-group-menu",
    Notes(NotesOptions) => "notes",
    TrackingBudgetSummary(TrackingBudgetSummaryOptions) => "tracking-budget-summary",
    EnvelopeBudgetSummary(EnvelopeBudgetSummaryOptions) => "envelope-budget-summary",
    NewCategoryGroup(NewCategoryGroupOptions) => "new-category-group",
    NewCategory(NewCategoryOptions) => "new-category",
    EnvelopeBalanceMenu(EnvelopeBalanceMenuOptions) => "envelope-balance-menu",
    EnvelopeSummaryToBudgetMenu(EnvelopeSummaryToBudgetMenuOptions) => "envelope-summary-to-budget-menu",
    TrackingBalanceMenu(TrackingBalanceMenuOptions) => "tracking-balance-menu",
    Transfer(TransferOptions) => "transfer",
    Cover(CoverOptions) => "cover",
    HoldBuffer(HoldBufferOptions) => "hold-buffer",
    ScheduledTransactionMenu(ScheduledTransactionMenuOptions) => "scheduled-transaction-menu",
    BudgetPageMenu(BudgetPageMenuOptions) => "budget-page-menu",
    EnvelopeBudgetMonthMenu(EnvelopeBudgetMonthMenuOptions) => "envelope-budget-month-menu",
    TrackingBudgetMonthMenu(TrackingBudgetMonthMenuOptions) => "tracking-budget-month-menu",
    BudgetList(BudgetListOptions) => "budget-list",
    ConfirmTransactionEdit(ConfirmTransactionEditOptions) => "confirm-transaction-edit",
    ConfirmTransactionDelete(ConfirmTransactionDeleteOptions) => "confirm-transaction-delete",
    ConfirmUnlinkAccount(ConfirmUnlinkAccountOptions) => "confirm-unlink-account",
    KeyboardShortcuts(KeyboardShortcutsOptions) => "keyboard-shortcuts",
    GoalTemplates(GoalTemplatesOptions) => "goal-templates",
}

impl fmt::Display for ModalName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModalName {
    type Err = UnknownModalName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| UnknownModalName(s.to_string()))
    }
}

#[derive(Deserialize)]
struct TaggedModal {
    name: ModalName,
    #[serde(default)]
    options: Value,
}

/// Absent options decode as an empty object, falling back to `null` for optional payloads.
fn decode_options<T: DeserializeOwned>(options: Value) -> Result<T, serde_json::Error> {
    if !options.is_null() {
        return serde_json::from_value(options);
    }
    serde_json::from_value(Value::Object(Map::new()))
        .or_else(|err| serde_json::from_value(Value::Null).map_err(|_| err))
}

macro_rules! empty_options {
    ($($(#[$meta:meta])* $options:ident,)*) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
            pub struct $options {}
        )*
    };
}

empty_options! {
    AddAccountOptions,
    AddLocalAccountOptions,
    LoadBackupOptions,
    /// Resolved with [`ModalReply::Confirmed`](crate::modal_reply::ModalReply::Confirmed) once
    /// bank sync credentials are stored.
    GoCardlessInitOptions,
    SimplefinInitOptions,
    GoCardlessExternalMsgOptions,
    ImportOptions,
    ImportYnab4Options,
    ImportYnab5Options,
    ImportActualOptions,
    OutOfSyncMigrationsOptions,
    FilesSettingsOptions,
    PayeeAutocompleteOptions,
    SchedulesDiscoverOptions,
    SchedulePostsOfflineNotificationOptions,
    NewCategoryGroupOptions,
    NewCategoryOptions,
    BudgetPageMenuOptions,
    BudgetListOptions,
    KeyboardShortcutsOptions,
    GoalTemplatesOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportTransactionsOptions {
    pub account_id: String,
    pub filename: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloseAccountOptions {
    pub account: AccountEntity,
    pub balance: i64,
    pub can_delete: bool,
}

/// `accounts` stays opaque: its shape depends on the bank-sync provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectLinkedAccountsOptions {
    pub accounts: Vec<Value>,
    pub requisition_id: Option<String>,
    pub upgrading_account_id: Option<String>,
    pub sync_source: Option<AccountSyncSource>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CategoryDeleteTarget {
    Category(String),
    Group(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmCategoryDeleteOptions {
    pub target: CategoryDeleteTarget,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManageRulesOptions {
    pub payee_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditRuleOptions {
    pub rule: RuleEntity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeUnusedPayeesOptions {
    pub payee_ids: Vec<String>,
    pub target_payee_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteBudgetOptions {
    pub file: BudgetFile,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmChangeDocumentDirOptions {
    pub current_budget_directory: String,
    pub new_directory: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEncryptionKeyOptions {
    #[serde(default)]
    pub recreate: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixEncryptionKeyOptions {
    #[serde(default)]
    pub has_existing_key: bool,
    pub cloud_file_id: Option<String>,
}

/// Transaction fields editable through the single-field editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EditableField {
    Date,
    Amount,
    Notes,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditFieldOptions {
    pub name: EditableField,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAutocompleteOptions {
    pub category_groups: Option<Vec<CategoryGroupEntity>>,
    pub month: Option<String>,
    #[serde(default)]
    pub show_hidden_categories: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountAutocompleteOptions {
    #[serde(default)]
    pub include_closed_accounts: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSummaryOptions {
    pub month: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEditTarget {
    pub id: String,
    pub transaction: Option<TransactionEntity>,
}

/// `None` opens the editor for a brand-new schedule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScheduleEditOptions {
    pub target: Option<ScheduleEditTarget>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleLinkOptions {
    pub transaction_ids: Vec<String>,
    pub account_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountMenuOptions {
    pub account_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryMenuOptions {
    pub category_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvelopeBudgetMenuOptions {
    pub category_id: String,
    pub month: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingBudgetMenuOptions {
    pub category_id: String,
    pub month: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryGroupMenuOptions {
    pub group_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotesOptions {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingBudgetSummaryOptions {
    pub month: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvelopeBudgetSummaryOptions {
    pub month: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvelopeBalanceMenuOptions {
    pub category_id: String,
    pub month: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvelopeSummaryToBudgetMenuOptions {
    pub month: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingBalanceMenuOptions {
    pub category_id: String,
    pub month: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferOptions {
    pub title: String,
    pub category_id: Option<String>,
    pub month: String,
    pub amount: i64,
    #[serde(default)]
    pub show_to_be_budgeted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverOptions {
    pub title: String,
    pub category_id: Option<String>,
    pub month: String,
    #[serde(default)]
    pub show_to_be_budgeted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldBufferOptions {
    pub month: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledTransactionMenuOptions {
    pub transaction_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvelopeBudgetMonthMenuOptions {
    pub month: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingBudgetMonthMenuOptions {
    pub month: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmTransactionEditOptions {
    pub confirm_reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmTransactionDeleteOptions {
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmUnlinkAccountOptions {
    pub account_name: String,
}
