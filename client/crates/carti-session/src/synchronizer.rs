use crate::{Result, SessionError, SessionState, SyncSettings, with_retry};

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex, PoisonError, Weak};

use carti_core::{
    BackendError, BackendResult, DocumentStore, Identity, IdentityProvider, KeyValueCache,
    Profile, ProfileUpdate, SessionEvents, USERS_COLLECTION,
};
use log::{debug, info, warn};
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;

/// The session a read or write was started for. Results are committed
/// only while the ticket still matches the live session.
#[derive(Debug, Clone)]
struct Ticket {
    epoch: u64,
    uid: String,
    /// Profile updates committed before the ticket was taken
    revision: u64,
}

/// Keeps the current identity and its profile consistent with the
/// identity provider, the document store and the on-device cache.
///
/// Cloning is cheap; all clones share one state. The listener task stops
/// when [`SessionSynchronizer::shutdown`] is called or the last clone is
/// dropped.
#[derive(Clone)]
pub struct SessionSynchronizer {
    inner: Arc<Inner>,
}

struct Inner {
    provider: Arc<dyn IdentityProvider>,
    store: Arc<dyn DocumentStore>,
    cache: Arc<dyn KeyValueCache>,
    settings: SyncSettings,
    state: watch::Sender<SessionState>,
    /// Bumped on every identity change, under `commit`
    epoch: AtomicU64,
    /// Bumped on every committed profile update, under `commit`
    revision: AtomicU64,
    /// Updates committed in the current session, by revision. A fetch that
    /// was issued before one of them replays it onto its result.
    updates: StdMutex<Vec<(u64, ProfileUpdate)>>,
    /// Serializes state publication and snapshot writes
    commit: Mutex<()>,
    listener: StdMutex<Option<JoinHandle<()>>>,
}

impl SessionSynchronizer {
    /// Subscribe to the identity provider and start following its session.
    ///
    /// Must be called from within a tokio runtime. The state stays
    /// [`SessionState::Initializing`] until the first notification.
    pub fn start(
        provider: Arc<dyn IdentityProvider>,
        store: Arc<dyn DocumentStore>,
        cache: Arc<dyn KeyValueCache>,
        settings: SyncSettings,
    ) -> Self {
        let (state, _) = watch::channel(SessionState::Initializing);
        let events = provider.subscribe();

        let inner = Arc::new(Inner {
            provider,
            store,
            cache,
            settings,
            state,
            epoch: AtomicU64::new(0),
            revision: AtomicU64::new(0),
            updates: StdMutex::new(Vec::new()),
            commit: Mutex::new(()),
            listener: StdMutex::new(None),
        });

        let handle = tokio::spawn(listen(Arc::downgrade(&inner), events));
        *inner
            .listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(handle);

        debug!("Session synchronizer subscribed to identity provider");
        Self { inner }
    }

    pub fn state(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    pub fn identity(&self) -> Option<Identity> {
        self.inner.state.borrow().identity().cloned()
    }

    pub fn profile(&self) -> Option<Profile> {
        self.inner.state.borrow().profile().cloned()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.state.borrow().is_loading()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.state.borrow().is_authenticated()
    }

    /// Observe state changes. The receiver starts at the current state.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    /// Wait until the state is no longer loading and return it.
    pub async fn settled(&self) -> SessionState {
        let mut receiver = self.subscribe();
        match receiver.wait_for(|state| !state.is_loading()).await {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        }
    }

    /// Whether the session listener is still running.
    pub fn is_listening(&self) -> bool {
        self.inner
            .listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Stop following the identity provider. The subscription is dropped
    /// with the listener task; the last published state stays readable.
    pub fn shutdown(&self) {
        let handle = self
            .inner
            .listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(handle) = handle {
            handle.abort();
            info!("Session synchronizer stopped");
        }
    }

    /// Sign out of the identity provider, then forget the local session.
    ///
    /// If the provider call fails the error is returned and nothing local
    /// changes. Without an active session this is a no-op.
    pub async fn log_out(&self) -> Result<()> {
        let inner = &self.inner;

        let Some(identity) = self.identity() else {
            debug!("log_out without an active session");
            return Ok(());
        };

        if let Err(e) = inner.provider.sign_out().await {
            warn!("Sign-out of {} failed, keeping session: {e}", identity.uid);
            return Err(SessionError::sign_out(e));
        }

        let _guard = inner.commit.lock().await;
        inner.next_epoch();
        inner.state.send_replace(SessionState::Unauthenticated);
        inner
            .cache
            .delete(&inner.settings.profile_key)
            .await
            .map_err(SessionError::cache)?;

        info!("Signed out {}", identity.uid);
        Ok(())
    }

    /// Merge `update` into the remote profile, then into the local state
    /// and snapshot.
    ///
    /// Returns `Ok(None)` without doing anything when no profile is loaded.
    /// A failed remote write is returned and leaves local state untouched.
    pub async fn update_profile(&self, update: ProfileUpdate) -> Result<Option<Profile>> {
        let inner = &self.inner;

        let Some((ticket, current)) = inner.loaded_profile().await else {
            debug!("update_profile without a loaded profile; nothing to do");
            return Ok(None);
        };

        if update.is_empty() {
            return Ok(Some(current));
        }

        let fields = update.to_fields().map_err(SessionError::profile_write)?;
        inner
            .store
            .merge_document(USERS_COLLECTION, &ticket.uid, &fields)
            .await
            .map_err(SessionError::profile_write)?;

        let _guard = inner.commit.lock().await;
        if !inner.is_current(&ticket) {
            info!(
                "Profile of {} updated after its session ended; local state left alone",
                ticket.uid
            );
            return Ok(None);
        }

        inner.record_update(&update);

        let Some(latest) = inner.state.borrow().profile().cloned() else {
            return Ok(None);
        };
        let merged = update.apply_to(&latest);

        if let Err(e) = inner.write_snapshot(&merged).await {
            warn!("Profile of {} updated but not cached: {e}", ticket.uid);
        }
        inner.state.send_if_modified(|state| state.replace_profile(merged.clone()));

        info!(
            "Updated profile fields {:?} for {}",
            update.field_names(),
            ticket.uid
        );
        Ok(Some(merged))
    }

    /// Re-read the profile of the current identity. Failures are logged and
    /// the last known profile is kept.
    pub async fn refresh_profile(&self) {
        let inner = &self.inner;

        let Some(ticket) = inner.ticket().await else {
            debug!("refresh_profile without an active session");
            return;
        };

        match inner.fetch_profile(&ticket.uid).await {
            Ok(profile) => {
                inner.commit_fetched(&ticket, profile).await;
            }
            Err(e) => warn!(
                "Profile refresh for {} failed, keeping last known profile: {e}",
                ticket.uid
            ),
        }
    }
}

async fn listen(inner: Weak<Inner>, mut events: SessionEvents) {
    while let Some(identity) = events.recv().await {
        let Some(inner) = inner.upgrade() else {
            break;
        };
        inner.on_session_change(identity).await;
    }
    debug!("Session listener finished");
}

impl Inner {
    /// Runs to completion, profile load included, before the next
    /// notification is taken.
    async fn on_session_change(&self, identity: Option<Identity>) {
        match identity {
            Some(identity) => {
                let ticket = self.begin_session(identity).await;
                self.load_profile(ticket).await;
            }
            None => self.end_session().await,
        }
    }

    async fn end_session(&self) {
        let _guard = self.commit.lock().await;
        self.next_epoch();
        let previous = self.state.send_replace(SessionState::Unauthenticated);

        if let Err(e) = self.cache.delete(&self.settings.profile_key).await {
            warn!("Failed to clear cached profile: {e}");
        }

        match previous.identity() {
            Some(identity) => info!("Session of {} ended", identity.uid),
            None => debug!("No active session"),
        }
    }

    async fn begin_session(&self, identity: Identity) -> Ticket {
        info!("Session started for {}", identity.uid);

        let _guard = self.commit.lock().await;
        // Same user signing in again keeps what is already on screen
        let carried = self
            .state
            .borrow()
            .profile()
            .filter(|profile| profile.belongs_to(&identity.uid))
            .cloned();
        let epoch = self.next_epoch();
        let uid = identity.uid.clone();
        self.state.send_replace(SessionState::Authenticating {
            identity,
            cached: carried,
        });
        Ticket {
            epoch,
            uid,
            revision: self.revision.load(Ordering::SeqCst),
        }
    }

    async fn load_profile(&self, ticket: Ticket) {
        if let Some(snapshot) = self.read_snapshot(&ticket.uid).await {
            let _guard = self.commit.lock().await;
            if self.is_current(&ticket) {
                self.state.send_if_modified(|state| match state {
                    SessionState::Authenticating { cached, .. } => {
                        *cached = Some(snapshot);
                        true
                    }
                    _ => false,
                });
            }
        }

        match self.fetch_profile(&ticket.uid).await {
            Ok(profile) => {
                self.commit_fetched(&ticket, profile).await;
            }
            Err(e) => self.commit_fetch_failure(&ticket, e).await,
        }
    }

    async fn ticket(&self) -> Option<Ticket> {
        let _guard = self.commit.lock().await;
        self.current_ticket()
    }

    /// Caller holds `commit`.
    fn current_ticket(&self) -> Option<Ticket> {
        let state = self.state.borrow();
        state.identity().map(|identity| Ticket {
            epoch: self.epoch.load(Ordering::SeqCst),
            uid: identity.uid.clone(),
            revision: self.revision.load(Ordering::SeqCst),
        })
    }

    /// Start a new session epoch; updates of the old session are forgotten.
    /// Caller holds `commit`.
    fn next_epoch(&self) -> u64 {
        self.updates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.epoch.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Record a committed update. Caller holds `commit`.
    fn record_update(&self, update: &ProfileUpdate) {
        let revision = self.revision.fetch_add(1, Ordering::SeqCst) + 1;
        self.updates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((revision, update.clone()));
    }

    /// Updates committed after `ticket` was taken, oldest first.
    /// Caller holds `commit`.
    fn updates_since(&self, ticket: &Ticket) -> Vec<ProfileUpdate> {
        self.updates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|(revision, _)| *revision > ticket.revision)
            .map(|(_, update)| update.clone())
            .collect()
    }

    /// Caller holds `commit`.
    fn is_current(&self, ticket: &Ticket) -> bool {
        self.epoch.load(Ordering::SeqCst) == ticket.epoch
            && self
                .state
                .borrow()
                .identity()
                .is_some_and(|identity| identity.uid == ticket.uid)
    }

    async fn loaded_profile(&self) -> Option<(Ticket, Profile)> {
        let _guard = self.commit.lock().await;
        let profile = self.state.borrow().profile().cloned()?;
        let ticket = self.current_ticket()?;
        Some((ticket, profile))
    }

    async fn fetch_profile(&self, uid: &str) -> BackendResult<Option<Profile>> {
        let store = &self.store;
        let timeout = self.settings.fetch_timeout;

        let document = with_retry(&self.settings.retry, "Profile fetch", || async move {
            match tokio::time::timeout(timeout, store.get_document(USERS_COLLECTION, uid)).await {
                Ok(result) => result,
                Err(_) => Err(BackendError::timeout(
                    u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                )),
            }
        })
        .await?;

        document
            .map(|document| Profile::from_document(&document))
            .transpose()
    }

    /// Publish a fetch result. Returns false when the session moved on.
    async fn commit_fetched(&self, ticket: &Ticket, profile: Option<Profile>) -> bool {
        let _guard = self.commit.lock().await;
        if !self.is_current(ticket) {
            debug!(
                "Discarding profile fetched for {} (session changed)",
                ticket.uid
            );
            return false;
        }

        let Some(identity) = self.state.borrow().identity().cloned() else {
            return false;
        };

        // The read may predate updates committed meanwhile
        let newer = self.updates_since(ticket);
        let profile = if newer.is_empty() {
            profile
        } else {
            debug!(
                "Replaying {} profile update(s) onto the fetch for {}",
                newer.len(),
                ticket.uid
            );
            match profile {
                Some(fetched) => Some(newer.iter().fold(fetched, |p, u| u.apply_to(&p))),
                // A merge succeeded, so the document exists
                None => self.state.borrow().profile().cloned(),
            }
        };

        match profile {
            Some(profile) => {
                if let Err(e) = self.write_snapshot(&profile).await {
                    warn!("Failed to cache profile of {}: {e}", ticket.uid);
                }
                self.state.send_replace(SessionState::Authenticated {
                    identity,
                    profile: Some(profile),
                    stale: false,
                });
            }
            None => {
                info!("No profile document for {} yet", ticket.uid);
                if let Err(e) = self.cache.delete(&self.settings.profile_key).await {
                    warn!("Failed to clear cached profile: {e}");
                }
                self.state.send_replace(SessionState::Authenticated {
                    identity,
                    profile: None,
                    stale: false,
                });
            }
        }
        true
    }

    async fn commit_fetch_failure(&self, ticket: &Ticket, error: BackendError) {
        let _guard = self.commit.lock().await;
        if !self.is_current(ticket) {
            debug!(
                "Ignoring failed profile fetch for {} (session changed)",
                ticket.uid
            );
            return;
        }

        let next = match &*self.state.borrow() {
            SessionState::Authenticating {
                identity,
                cached: Some(profile),
            } => {
                warn!(
                    "Profile fetch for {} failed, showing cached copy: {error}",
                    ticket.uid
                );
                SessionState::Authenticated {
                    identity: identity.clone(),
                    profile: Some(profile.clone()),
                    stale: true,
                }
            }
            SessionState::Authenticating {
                identity,
                cached: None,
            } => {
                warn!(
                    "Profile fetch for {} failed with nothing cached: {error}",
                    ticket.uid
                );
                SessionState::Error {
                    identity: identity.clone(),
                    message: error.to_string(),
                }
            }
            // Already settled by a concurrent refresh
            _ => return,
        };

        self.state.send_replace(next);
    }

    async fn read_snapshot(&self, uid: &str) -> Option<Profile> {
        let raw = match self.cache.get(&self.settings.profile_key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("Failed to read cached profile: {e}");
                return None;
            }
        };

        match serde_json::from_str::<Profile>(&raw) {
            Ok(profile) if profile.belongs_to(uid) => Some(profile),
            Ok(profile) => {
                debug!("Ignoring cached profile of another user ({})", profile.id);
                None
            }
            Err(e) => {
                warn!("Cached profile is corrupted, ignoring it: {e}");
                None
            }
        }
    }

    async fn write_snapshot(&self, profile: &Profile) -> Result<()> {
        let raw = serde_json::to_string(profile)?;
        self.cache
            .set(&self.settings.profile_key, &raw)
            .await
            .map_err(SessionError::cache)
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        if let Some(handle) = self.listener.get_mut().ok().and_then(Option::take) {
            handle.abort();
        }
    }
}
