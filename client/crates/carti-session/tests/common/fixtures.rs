use super::{FakeIdentityProvider, FakeStore, MemoryCache};

use std::sync::Arc;
use std::time::Duration;

use carti_core::{Identity, Profile};
use carti_session::{RetryPolicy, SessionState, SessionSynchronizer, SyncSettings};
use chrono::{TimeZone, Utc};

pub const PROFILE_KEY: &str = "@carti_user_data";

pub fn test_settings() -> SyncSettings {
    SyncSettings {
        profile_key: PROFILE_KEY.to_string(),
        fetch_timeout: Duration::from_millis(200),
        retry: RetryPolicy::none(),
    }
}

pub fn identity(uid: &str) -> Identity {
    Identity::new(uid).with_email(format!("{uid}@example.com"))
}

pub fn profile(uid: &str, full_name: &str) -> Profile {
    Profile {
        id: uid.to_string(),
        email: format!("{uid}@example.com"),
        full_name: full_name.to_string(),
        phone_number: String::from("555-0000"),
        date_of_birth: String::from("01/02/1990"),
        avatar: None,
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    }
}

/// A synchronizer wired to fresh fakes.
pub struct TestSession {
    pub provider: Arc<FakeIdentityProvider>,
    pub store: Arc<FakeStore>,
    pub cache: Arc<MemoryCache>,
    pub sync: SessionSynchronizer,
}

impl TestSession {
    pub fn start() -> Self {
        Self::start_with(test_settings())
    }

    pub fn start_with(settings: SyncSettings) -> Self {
        Self::start_seeded(settings, |_, _| {})
    }

    /// Seed the fakes before the synchronizer subscribes.
    pub fn start_seeded(
        settings: SyncSettings,
        seed: impl FnOnce(&FakeStore, &MemoryCache),
    ) -> Self {
        let provider = Arc::new(FakeIdentityProvider::new());
        let store = Arc::new(FakeStore::new());
        let cache = Arc::new(MemoryCache::new());
        seed(&store, &cache);

        let sync = SessionSynchronizer::start(
            provider.clone(),
            store.clone(),
            cache.clone(),
            settings,
        );

        Self {
            provider,
            store,
            cache,
            sync,
        }
    }

    /// Store `profile` remotely, sign its owner in and wait for the load.
    pub async fn sign_in_loaded(&self, profile: &Profile) {
        self.store.put_profile(profile);
        self.provider.emit(Some(identity(&profile.id)));
        let uid = profile.id.clone();
        wait_for(&self.sync, move |state| {
            matches!(state, SessionState::Authenticated { identity, profile: Some(_), .. } if identity.uid == uid)
        })
        .await;
    }

    pub fn cached_profile(&self) -> Option<Profile> {
        self.cache
            .raw(PROFILE_KEY)
            .map(|raw| serde_json::from_str(&raw).unwrap())
    }
}

/// Wait until the published state satisfies `predicate`.
pub async fn wait_for(
    sync: &SessionSynchronizer,
    predicate: impl FnMut(&SessionState) -> bool,
) -> SessionState {
    let mut receiver = sync.subscribe();
    let result = tokio::time::timeout(Duration::from_secs(5), receiver.wait_for(predicate)).await;
    match result {
        Ok(Ok(state)) => state.clone(),
        Ok(Err(_)) => panic!("state channel closed"),
        Err(_) => panic!("timed out waiting for state, last: {:?}", sync.state()),
    }
}

/// Poll `condition` until it holds.
pub async fn eventually(mut condition: impl FnMut() -> bool) {
    for _ in 0..500 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition never became true");
}
