#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use carti_core::{BackendResult, KeyValueCache};
use carti_firebase::{FirebaseAuth, FirebaseSettings, FirestoreStore};
use serde_json::{Value, json};
use wiremock::MockServer;

pub const API_KEY: &str = "test-key";
pub const PROJECT_ID: &str = "demo";
pub const SESSION_KEY: &str = "@carti_session";

#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryCache {
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
        Ok(self.raw(key))
    }

    async fn set(&self, key: &str, value: &str) -> BackendResult<()> {
        self.insert(key, value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> BackendResult<()> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

pub fn settings(server: &MockServer) -> FirebaseSettings {
    FirebaseSettings::local(API_KEY, PROJECT_ID, &server.uri())
}

pub async fn open_auth(server: &MockServer, cache: Arc<MemoryCache>) -> Arc<FirebaseAuth> {
    Arc::new(FirebaseAuth::open(reqwest::Client::new(), settings(server), cache, SESSION_KEY).await)
}

pub fn open_store(server: &MockServer, auth: Option<Arc<FirebaseAuth>>) -> FirestoreStore {
    FirestoreStore::new(reqwest::Client::new(), settings(server), auth)
}

/// Identity Toolkit success body for `uid`.
pub fn account_body(uid: &str, email: &str, id_token: &str) -> Value {
    json!({
        "kind": "identitytoolkit#VerifyPasswordResponse",
        "localId": uid,
        "email": email,
        "idToken": id_token,
        "refreshToken": format!("refresh-{uid}"),
        "expiresIn": "3600",
        "registered": true
    })
}

pub fn document_path(collection: &str, id: &str) -> String {
    format!("/projects/{PROJECT_ID}/databases/(default)/documents/{collection}/{id}")
}
