use serde::{Deserialize, Serialize};

/// Document field the tab id is exposed under when decoding.
pub const TAB_ID_FIELD: &str = "id";

/// Brand tab descriptor from the `dynamicTabs` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicTab {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub order: i64,
}
