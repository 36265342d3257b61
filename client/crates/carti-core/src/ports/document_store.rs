use crate::{BackendResult, Document, Fields, Query};

use async_trait::async_trait;
use serde_json::Value;

/// Remote document database, one document per `(collection, id)`.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// `Ok(None)` when no document exists under the key.
    async fn get_document(&self, collection: &str, id: &str) -> BackendResult<Option<Document>>;

    /// Merge `fields` into an existing document; other fields are untouched.
    async fn merge_document(&self, collection: &str, id: &str, fields: &Fields)
    -> BackendResult<()>;

    /// Create or replace the whole document.
    async fn set_document(&self, collection: &str, id: &str, fields: &Fields) -> BackendResult<()>;

    /// First document whose top-level `field` equals `value`.
    async fn find_first(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> BackendResult<Option<Document>>;

    /// Every document matching `query`, in the query's order.
    async fn query(&self, query: &Query) -> BackendResult<Vec<Document>>;
}
