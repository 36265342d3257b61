use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use carti_core::{BackendError, BackendResult, KeyValueCache};

fn io_failure() -> BackendError {
    BackendError::io(
        PathBuf::from("memory"),
        std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
    )
}

#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, String>>,
    pub fail_reads: AtomicBool,
    pub fail_writes: AtomicBool,
    pub fail_deletes: AtomicBool,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    pub fn insert(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }
}

#[async_trait]
impl KeyValueCache for MemoryCache {
    async fn get(&self, key: &str) -> BackendResult<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(io_failure());
        }
        Ok(self.raw(key))
    }

    async fn set(&self, key: &str, value: &str) -> BackendResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(io_failure());
        }
        self.insert(key, value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> BackendResult<()> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(io_failure());
        }
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}
