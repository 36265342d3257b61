use crate::FoodItem;

use serde::{Deserialize, Serialize};

/// Promotional banner of the home screen carousel. Unrelated to the
/// banners inside a brand tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeBanner {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub is_active: bool,
}

/// Everything the home screen lists, each list in display order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeFeed {
    pub best_sellers: Vec<FoodItem>,
    /// Active banners only
    pub banners: Vec<HomeBanner>,
    pub recommended: Vec<FoodItem>,
}

impl HomeFeed {
    pub fn is_empty(&self) -> bool {
        self.best_sellers.is_empty() && self.banners.is_empty() && self.recommended.is_empty()
    }
}
