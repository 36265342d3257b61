use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use carti_core::{
    BackendError, BackendResult, Document, DocumentStore, Fields, Profile, Query,
    USERS_COLLECTION,
};
use serde_json::Value;
use tokio::sync::Semaphore;

/// In-memory document store with switchable failures and per-document
/// read gates.
#[derive(Default)]
pub struct FakeStore {
    documents: Mutex<HashMap<(String, String), Fields>>,
    gates: Mutex<HashMap<String, Arc<Semaphore>>>,
    reads: AtomicUsize,
    waiting_reads: AtomicUsize,
    writes: AtomicUsize,
    failing_reads_left: AtomicUsize,
    /// Gated reads return the document as it was when the read was issued
    read_on_request: AtomicBool,
    pub fail_reads: AtomicBool,
    pub fail_writes: AtomicBool,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_profile(&self, profile: &Profile) {
        self.documents.lock().unwrap().insert(
            (USERS_COLLECTION.to_string(), profile.id.clone()),
            profile.to_fields().unwrap(),
        );
    }

    pub fn put(&self, collection: &str, id: &str, fields: Fields) {
        self.documents
            .lock()
            .unwrap()
            .insert((collection.to_string(), id.to_string()), fields);
    }

    pub fn remove(&self, collection: &str, id: &str) {
        self.documents
            .lock()
            .unwrap()
            .remove(&(collection.to_string(), id.to_string()));
    }

    pub fn fields(&self, collection: &str, id: &str) -> Option<Fields> {
        self.documents
            .lock()
            .unwrap()
            .get(&(collection.to_string(), id.to_string()))
            .cloned()
    }

    pub fn profile(&self, uid: &str) -> Option<Profile> {
        self.fields(USERS_COLLECTION, uid)
            .map(|fields| Profile::from_document(&Document::new(uid, fields)).unwrap())
    }

    /// Fail the next `count` reads with a transient error.
    pub fn fail_next_reads(&self, count: usize) {
        self.failing_reads_left.store(count, Ordering::SeqCst);
    }

    /// Block reads of document `id` until [`FakeStore::release_reads`].
    pub fn gate_reads(&self, id: &str) {
        self.gates
            .lock()
            .unwrap()
            .insert(id.to_string(), Arc::new(Semaphore::new(0)));
    }

    /// Make gated reads see the document as of the request, like a
    /// response already on the wire.
    pub fn read_on_request(&self) {
        self.read_on_request.store(true, Ordering::SeqCst);
    }

    pub fn release_reads(&self, id: &str) {
        if let Some(gate) = self.gates.lock().unwrap().remove(id) {
            gate.close();
        }
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Reads currently blocked on a gate.
    pub fn waiting_reads(&self) -> usize {
        self.waiting_reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn check_writable(&self) -> BackendResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(BackendError::unavailable("write failed"));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for FakeStore {
    async fn get_document(&self, collection: &str, id: &str) -> BackendResult<Option<Document>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let requested = self
            .read_on_request
            .load(Ordering::SeqCst)
            .then(|| self.fields(collection, id));

        let gate = self.gates.lock().unwrap().get(id).cloned();
        if let Some(gate) = gate {
            self.waiting_reads.fetch_add(1, Ordering::SeqCst);
            // A closed gate lets the read through
            let _ = gate.acquire().await;
            self.waiting_reads.fetch_sub(1, Ordering::SeqCst);
        }

        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(BackendError::unavailable("read failed"));
        }
        let failing = self
            .failing_reads_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1));
        if failing.is_ok() {
            return Err(BackendError::unavailable("read failed once"));
        }

        let fields = match requested {
            Some(fields) => fields,
            None => self.fields(collection, id),
        };
        Ok(fields.map(|fields| Document::new(id, fields)))
    }

    async fn merge_document(
        &self,
        collection: &str,
        id: &str,
        fields: &Fields,
    ) -> BackendResult<()> {
        self.check_writable()?;
        let mut documents = self.documents.lock().unwrap();
        let Some(existing) = documents.get_mut(&(collection.to_string(), id.to_string())) else {
            return Err(BackendError::rejected("NOT_FOUND", "no document to merge into"));
        };
        for (key, value) in fields {
            existing.insert(key.clone(), value.clone());
        }
        Ok(())
    }

    async fn set_document(&self, collection: &str, id: &str, fields: &Fields) -> BackendResult<()> {
        self.check_writable()?;
        self.put(collection, id, fields.clone());
        Ok(())
    }

    async fn find_first(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> BackendResult<Option<Document>> {
        let documents = self.documents.lock().unwrap();
        let mut matches: Vec<_> = documents
            .iter()
            .filter(|((c, _), fields)| c == collection && fields.get(field) == Some(value))
            .map(|((_, id), fields)| Document::new(id.clone(), fields.clone()))
            .collect();
        matches.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(matches.into_iter().next())
    }

    async fn query(&self, query: &Query) -> BackendResult<Vec<Document>> {
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
