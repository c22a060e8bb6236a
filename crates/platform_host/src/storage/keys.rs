//! Well-known preference keys for each tier.

/// Local-prefs key holding the open document's identity.
pub const LOCAL_ID_KEY: &str = "id";
/// Local-prefs key for the document display name.
pub const LOCAL_BUDGET_NAME_KEY: &str = "budgetName";
/// Local-prefs key linking the document to its cloud copy.
pub const LOCAL_CLOUD_FILE_ID_KEY: &str = "cloudFileId";
/// Local-prefs key for the sync group the document belongs to.
pub const LOCAL_GROUP_ID_KEY: &str = "groupId";
/// Local-prefs key for the active encryption key id.
pub const LOCAL_ENCRYPT_KEY_ID_KEY: &str = "encryptKeyId";

/// Global-prefs key for the number of months rendered side by side.
pub const GLOBAL_MAX_MONTHS_KEY: &str = "maxMonths";
/// Global-prefs key for the UI language.
pub const GLOBAL_LANGUAGE_KEY: &str = "language";
/// Global-prefs key for the UI theme.
pub const GLOBAL_THEME_KEY: &str = "theme";

/// Synced-prefs key for the first day of the week (0 = Sunday).
pub const SYNCED_FIRST_DAY_OF_WEEK_KEY: &str = "firstDayOfWeekIdx";
/// Synced-prefs key for the date display format.
pub const SYNCED_DATE_FORMAT_KEY: &str = "dateFormat";
/// Synced-prefs key for the number display format.
pub const SYNCED_NUMBER_FORMAT_KEY: &str = "numberFormat";
/// Synced-prefs key hiding fractional amounts.
pub const SYNCED_HIDE_FRACTION_KEY: &str = "hideFraction";
/// Synced-prefs key for the budgeting method.
pub const SYNCED_BUDGET_TYPE_KEY: &str = "budgetType";
