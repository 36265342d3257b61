//! Read side of the catalog: the home feed lists, which brand "dynamic tab"
//! is active and the catalog shown inside it.

pub mod error;
pub mod models;
pub mod service;

pub use error::{CatalogError, Result};
pub use models::banner::Banner;
pub use models::category::Category;
pub use models::dynamic_tab::DynamicTab;
pub use models::featured::{Featured, FeaturedList};
pub use models::food_item::FoodItem;
pub use models::home_feed::{HomeBanner, HomeFeed};
pub use models::product::{CategoryFilter, Product};
pub use models::tab_data::{DynamicTabData, TabTheme};
pub use service::CatalogService;

/// Tab descriptors, at most one active.
pub const TABS_COLLECTION: &str = "dynamicTabs";
/// Tab contents, keyed by tab id.
pub const TAB_DATA_COLLECTION: &str = "dynamicTabData";
/// Home feed best sellers.
pub const BEST_SELLERS_COLLECTION: &str = "bestSellers";
/// Home feed carousel banners.
pub const BANNERS_COLLECTION: &str = "banners";
/// Home feed recommendations.
pub const RECOMMENDED_COLLECTION: &str = "recommended";
/// Display position of home feed documents.
pub const ORDER_FIELD: &str = "order";

#[cfg(test)]
mod tests;
