use crate::models::dynamic_tab::TAB_ID_FIELD;
use crate::{
    BANNERS_COLLECTION, BEST_SELLERS_COLLECTION, CatalogError, DynamicTab, DynamicTabData,
    HomeFeed, ORDER_FIELD, RECOMMENDED_COLLECTION, Result, TAB_DATA_COLLECTION, TABS_COLLECTION,
};

use std::sync::Arc;

use carti_core::{DocumentStore, Query};
use log::{debug, info};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Key field of home feed documents.
const HOME_ID_FIELD: &str = "id";

/// Reads the home feed and the active brand tab from the document store.
pub struct CatalogService {
    store: Arc<dyn DocumentStore>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Best sellers, active banners and recommendations, each ordered by
    /// their `order` field. Any failed list fails the whole feed.
    pub async fn home_feed(&self) -> Result<HomeFeed> {
        let best_sellers = self
            .ordered(BEST_SELLERS_COLLECTION, Query::collection(BEST_SELLERS_COLLECTION))
            .await?;
        let banners = self
            .ordered(
                BANNERS_COLLECTION,
                Query::collection(BANNERS_COLLECTION).where_eq("isActive", true),
            )
            .await?;
        let recommended = self
            .ordered(RECOMMENDED_COLLECTION, Query::collection(RECOMMENDED_COLLECTION))
            .await?;

        let feed = HomeFeed {
            best_sellers,
            banners,
            recommended,
        };
        if feed.is_empty() {
            info!("Home feed is empty");
        }
        Ok(feed)
    }

    async fn ordered<T: DeserializeOwned>(
        &self,
        collection: &'static str,
        query: Query,
    ) -> Result<Vec<T>> {
        let documents = self
            .store
            .query(&query.order_by(ORDER_FIELD))
            .await
            .map_err(CatalogError::backend)?;

        let items = documents
            .iter()
            .map(|document| {
                document
                    .decode_with_id::<T>(HOME_ID_FIELD)
                    .map_err(|e| CatalogError::decode(collection, &document.id, e))
            })
            .collect::<Result<Vec<T>>>()?;

        debug!("Loaded {} item(s) from {collection}", items.len());
        Ok(items)
    }

    /// The tab currently flagged active, if any.
    pub async fn active_tab(&self) -> Result<Option<DynamicTab>> {
        let document = self
            .store
            .find_first(TABS_COLLECTION, "isActive", &Value::Bool(true))
            .await
            .map_err(CatalogError::backend)?;

        let Some(document) = document else {
            info!("No active dynamic tab");
            return Ok(None);
        };

        let tab = document
            .decode_with_id::<DynamicTab>(TAB_ID_FIELD)
            .map_err(|e| CatalogError::decode(TABS_COLLECTION, &document.id, e))?;

        debug!("Active dynamic tab: {} ({})", tab.name, tab.id);
        Ok(Some(tab))
    }

    /// Contents of tab `tab_id`; `None` when the tab has no data document.
    pub async fn tab_data(&self, tab_id: &str) -> Result<Option<DynamicTabData>> {
        let document = self
            .store
            .get_document(TAB_DATA_COLLECTION, tab_id)
            .await
            .map_err(CatalogError::backend)?;

        let Some(document) = document else {
            info!("No data for dynamic tab {tab_id}");
            return Ok(None);
        };

        let data = document
            .decode::<DynamicTabData>()
            .map_err(|e| CatalogError::decode(TAB_DATA_COLLECTION, tab_id, e))?;

        debug!(
            "Loaded tab {tab_id}: {} products, {} categories, {} banners",
            data.products.len(),
            data.categories.len(),
            data.banners.len()
        );
        Ok(Some(data))
    }

    /// The active tab together with its contents.
    pub async fn active_tab_data(&self) -> Result<Option<(DynamicTab, Option<DynamicTabData>)>> {
        let Some(tab) = self.active_tab().await? else {
            return Ok(None);
        };
        let data = self.tab_data(&tab.id).await?;
        Ok(Some((tab, data)))
    }
}
