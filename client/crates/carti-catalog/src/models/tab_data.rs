use crate::{Banner, Category, CategoryFilter, Featured, FeaturedList, Product};

use serde::{Deserialize, Serialize};

/// Brand colors for the tab screen, as CSS hex strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabTheme {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent_color: Option<String>,
}

/// Contents of a brand tab from the `dynamicTabData` collection. Every
/// section is optional in storage and decodes to empty when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicTabData {
    pub brand_id: String,
    pub brand_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<TabTheme>,
    #[serde(default)]
    pub banners: Vec<Banner>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub featured: Featured,
}

impl DynamicTabData {
    /// Products passing `filter`, in stored order.
    pub fn products(&self, filter: &CategoryFilter) -> Vec<&Product> {
        self.products.iter().filter(|p| filter.matches(p)).collect()
    }

    /// Active banners by ascending `order`.
    pub fn active_banners(&self) -> Vec<&Banner> {
        let mut banners: Vec<_> = self.banners.iter().filter(|b| b.is_active).collect();
        banners.sort_by_key(|b| b.order);
        banners
    }

    /// Categories by ascending `order`.
    pub fn categories(&self) -> Vec<&Category> {
        let mut categories: Vec<_> = self.categories.iter().collect();
        categories.sort_by_key(|c| c.order);
        categories
    }

    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Products of a featured list in list order. Ids with no product are
    /// skipped.
    pub fn featured(&self, list: FeaturedList) -> Vec<&Product> {
        self.featured
            .ids(list)
            .iter()
            .filter_map(|id| self.product(id))
            .collect()
    }
}
