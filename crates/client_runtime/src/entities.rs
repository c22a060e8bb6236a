//! Plain data models referenced by modal payloads.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountEntity {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub offbudget: bool,
    #[serde(default)]
    pub closed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountSyncSource {
    #[serde(rename = "goCardless")]
    GoCardless,
    #[serde(rename = "simpleFin")]
    SimpleFin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryEntity {
    pub id: String,
    pub name: String,
    pub group: String,
    #[serde(default)]
    pub is_income: bool,
    #[serde(default)]
    pub hidden: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryGroupEntity {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub is_income: bool,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub categories: Vec<CategoryEntity>,
}

/// Amounts are integer minor units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionEntity {
    pub id: String,
    pub account: String,
    pub date: String,
    pub amount: i64,
    pub payee: Option<String>,
    pub category: Option<String>,
    pub notes: Option<String>,
}

/// Rule conditions and actions stay opaque JSON; only the rules engine interprets them.
///
/// `id` is `None` for a rule that has not been saved yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleEntity {
    pub id: Option<String>,
    pub stage: Option<String>,
    pub conditions_op: String,
    pub conditions: Vec<Value>,
    pub actions: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetFile {
    pub id: Option<String>,
    pub cloud_file_id: Option<String>,
    pub name: String,
}
