#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use carti_core::{BackendError, BackendResult, Document, DocumentStore, Fields, Query};
use serde_json::Value;

/// Read-mostly store keyed by `(collection, id)`, iterated in key order.
#[derive(Default)]
pub struct CatalogStore {
    documents: Mutex<BTreeMap<(String, String), Fields>>,
    pub offline: AtomicBool,
}

impl CatalogStore {
    pub fn with(documents: Vec<(&str, &str, Value)>) -> Self {
        let store = Self::default();
        for (collection, id, value) in documents {
            let Value::Object(fields) = value else {
                panic!("document {collection}/{id} must be an object");
            };
            store
                .documents
                .lock()
                .unwrap()
                .insert((collection.to_string(), id.to_string()), fields);
        }
        store
    }

    fn check_online(&self) -> BackendResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(BackendError::unavailable("offline"));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for CatalogStore {
    async fn get_document(&self, collection: &str, id: &str) -> BackendResult<Option<Document>> {
        self.check_online()?;
        Ok(self
            .documents
            .lock()
            .unwrap()
            .get(&(collection.to_string(), id.to_string()))
            .map(|fields| Document::new(id, fields.clone())))
    }

    async fn merge_document(&self, _: &str, _: &str, _: &Fields) -> BackendResult<()> {
        Err(BackendError::rejected("PERMISSION_DENIED", "catalog is read-only"))
    }

    async fn set_document(&self, _: &str, _: &str, _: &Fields) -> BackendResult<()> {
        Err(BackendError::rejected("PERMISSION_DENIED", "catalog is read-only"))
    }

    async fn find_first(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> BackendResult<Option<Document>> {
        self.check_online()?;
        Ok(self
            .documents
            .lock()
            .unwrap()
            .iter()
            .find(|((c, _), fields)| c == collection && fields.get(field) == Some(value))
            .map(|((_, id), fields)| Document::new(id.clone(), fields.clone())))
    }

    async fn query(&self, query: &Query) -> BackendResult<Vec<Document>> {
        self.check_online()?;
        let documents: Vec<Document> = self
            .documents
            .lock()
            .unwrap()
            .iter()
            .filter(|((c, _), _)| *c == query.collection)
            .map(|((_, id), fields)| Document::new(id.clone(), fields.clone()))
            .collect();
        Ok(query.run(&documents))
    }
}
