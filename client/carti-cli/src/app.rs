use crate::commands::Commands;
use crate::error::{CliError, Result};
use crate::tab_commands::TabCommands;

use std::sync::Arc;
use std::time::Duration;

use carti_catalog::{CatalogService, CategoryFilter};
use carti_config::Config;
use carti_core::{Identity, ProfileUpdate};
use carti_firebase::{FirebaseAuth, FirebaseSettings, FirestoreStore};
use carti_session::registration::DATE_OF_BIRTH_FORMAT;
use carti_session::{
    AuthService, Credentials, FileCache, Registration, SessionState, SessionSynchronizer,
    SyncSettings,
};
use log::{debug, info, warn};
use serde_json::{Value, json};

/// Upper bound on waiting for the session to settle after a sign-in.
const SETTLE_TIMEOUT: Duration = Duration::from_secs(30);

/// Backend collaborators built from the configuration.
pub(crate) struct App {
    auth: Arc<FirebaseAuth>,
    store: Arc<FirestoreStore>,
    cache: Arc<FileCache>,
    settings: SyncSettings,
}

impl App {
    pub(crate) async fn open(config: &Config) -> Result<Self> {
        let firebase = FirebaseSettings::from_config(&config.backend)?;
        let http = reqwest::Client::new();

        let cache_dir = config.cache_dir()?;
        debug!("Cache directory: {}", cache_dir.display());
        let cache = Arc::new(FileCache::new(cache_dir));

        let auth = Arc::new(
            FirebaseAuth::open(
                http.clone(),
                firebase.clone(),
                cache.clone(),
                config.cache.session_key.clone(),
            )
            .await,
        );
        let store = Arc::new(FirestoreStore::new(http, firebase, Some(auth.clone())));

        Ok(Self {
            auth,
            store,
            cache,
            settings: SyncSettings::from_config(config),
        })
    }

    fn synchronizer(&self) -> SessionSynchronizer {
        SessionSynchronizer::start(
            self.auth.clone(),
            self.store.clone(),
            self.cache.clone(),
            self.settings.clone(),
        )
    }

    fn auth_service(&self) -> AuthService {
        AuthService::new(self.auth.clone(), self.store.clone())
    }

    pub(crate) async fn run(&self, command: Commands) -> Result<Value> {
        let sync = self.synchronizer();
        let result = self.dispatch(&sync, command).await;
        sync.shutdown();
        result
    }

    async fn dispatch(&self, sync: &SessionSynchronizer, command: Commands) -> Result<Value> {
        match command {
            Commands::Register {
                full_name,
                email,
                phone_number,
                date_of_birth,
                password,
                confirm_password,
            } => {
                let registration = Registration {
                    full_name,
                    email,
                    phone_number,
                    date_of_birth,
                    confirm_password: confirm_password.unwrap_or_else(|| password.clone()),
                    password,
                };
                let profile = self.auth_service().register(&registration).await?;

                // The sign-up notification may have raced the profile write
                let identity = Identity::new(profile.id.as_str());
                settle_for(sync, &identity).await;
                sync.refresh_profile().await;
                Ok(session_json(&sync.state()))
            }

            Commands::Login { email, password } => {
                let identity = self
                    .auth_service()
                    .sign_in(&Credentials::new(email, password))
                    .await?;
                Ok(session_json(&settle_for(sync, &identity).await))
            }

            Commands::Logout => {
                sync.settled().await;
                sync.log_out().await?;
                Ok(session_json(&sync.state()))
            }

            Commands::Whoami => Ok(session_json(&sync.settled().await)),

            Commands::UpdateProfile {
                full_name,
                phone_number,
                date_of_birth,
                avatar,
            } => {
                let update = ProfileUpdate {
                    full_name,
                    phone_number,
                    date_of_birth: date_of_birth
                        .map(|d| d.format(DATE_OF_BIRTH_FORMAT).to_string()),
                    avatar,
                    ..ProfileUpdate::default()
                };
                if update.is_empty() {
                    return Err(CliError::empty_update());
                }

                let state = sync.settled().await;
                if !state.is_authenticated() {
                    return Err(CliError::not_signed_in());
                }

                match sync.update_profile(update).await? {
                    Some(profile) => Ok(json!({ "updated": true, "profile": profile })),
                    None => {
                        warn!("Profile not updated: no profile loaded for this session");
                        Ok(json!({ "updated": false, "session": session_json(&sync.state()) }))
                    }
                }
            }

            Commands::Refresh => {
                if !sync.settled().await.is_authenticated() {
                    return Err(CliError::not_signed_in());
                }
                sync.refresh_profile().await;
                Ok(session_json(&sync.state()))
            }

            Commands::ResetPassword { email } => {
                self.auth_service().send_password_reset(&email).await?;
                info!("Password reset email requested");
                Ok(json!({ "sent": true, "email": email.trim() }))
            }

            Commands::Home => {
                let feed = CatalogService::new(self.store.clone()).home_feed().await?;
                Ok(json!(feed))
            }

            Commands::Tab { action } => self.tab(action).await,
        }
    }

    async fn tab(&self, action: TabCommands) -> Result<Value> {
        let catalog = CatalogService::new(self.store.clone());

        let Some((tab, data)) = catalog.active_tab_data().await? else {
            return Ok(json!({ "tab": null }));
        };

        let value = match action {
            TabCommands::Active => json!({
                "tab": tab,
                "brand": data.as_ref().map(|d| json!({
                    "brandId": d.brand_id,
                    "brandName": d.brand_name,
                    "description": d.description,
                    "theme": d.metadata,
                })),
                "categories": data.as_ref().map(|d| d.categories()).unwrap_or_default(),
                "banners": data.as_ref().map(|d| d.active_banners()).unwrap_or_default(),
            }),
            TabCommands::Products { category } => {
                let filter = CategoryFilter::from(category);
                json!({
                    "tab": tab.id,
                    "products": data.as_ref().map(|d| d.products(&filter)).unwrap_or_default(),
                })
            }
            TabCommands::Featured { list } => json!({
                "tab": tab.id,
                "list": list.as_str(),
                "products": data.as_ref().map(|d| d.featured(list)).unwrap_or_default(),
            }),
        };
        Ok(value)
    }
}

/// Wait until the session of `identity` has finished loading. Gives up
/// after [`SETTLE_TIMEOUT`] and returns whatever state was reached.
async fn settle_for(sync: &SessionSynchronizer, identity: &Identity) -> SessionState {
    let mut receiver = sync.subscribe();
    let settled = receiver.wait_for(|state| {
        !state.is_loading() && state.identity().is_some_and(|i| i.uid == identity.uid)
    });

    match tokio::time::timeout(SETTLE_TIMEOUT, settled).await {
        Ok(Ok(state)) => state.clone(),
        Ok(Err(_)) => sync.state(),
        Err(_) => {
            warn!("Session of {} did not settle in time", identity.uid);
            sync.state()
        }
    }
}

/// JSON view of a session state.
pub(crate) fn session_json(state: &SessionState) -> Value {
    let mut view = json!({
        "state": state.name(),
        "identity": state.identity(),
        "profile": state.profile(),
        "stale": state.is_stale(),
    });
    if let SessionState::Error { message, .. } = state {
        view["error"] = Value::String(message.clone());
    }
    view
}
