use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use carti_core::{BackendError, BackendResult, Identity, IdentityProvider, SessionEvents};
use tokio::sync::mpsc::{UnboundedSender, unbounded_channel};

/// Identity provider driven by the test: sessions change only when the
/// test calls [`FakeIdentityProvider::emit`] or one of the auth calls.
#[derive(Default)]
pub struct FakeIdentityProvider {
    listeners: Mutex<Vec<UnboundedSender<Option<Identity>>>>,
    accounts: Mutex<HashMap<String, (String, String)>>,
    subscriptions: AtomicUsize,
    sign_out_calls: AtomicUsize,
    reset_requests: Mutex<Vec<String>>,
    pub fail_sign_out: AtomicBool,
    pub fail_auth: AtomicBool,
}

impl FakeIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver a session change to every live subscriber.
    pub fn emit(&self, identity: Option<Identity>) {
        let mut listeners = self.listeners.lock().unwrap();
        listeners.retain(|listener| listener.send(identity.clone()).is_ok());
    }

    pub fn subscriptions(&self) -> usize {
        self.subscriptions.load(Ordering::SeqCst)
    }

    pub fn live_listeners(&self) -> usize {
        let listeners = self.listeners.lock().unwrap();
        listeners.iter().filter(|l| !l.is_closed()).count()
    }

    pub fn sign_out_calls(&self) -> usize {
        self.sign_out_calls.load(Ordering::SeqCst)
    }

    pub fn reset_requests(&self) -> Vec<String> {
        self.reset_requests.lock().unwrap().clone()
    }

    pub fn add_account(&self, uid: &str, email: &str, password: &str) {
        self.accounts
            .lock()
            .unwrap()
            .insert(email.to_string(), (uid.to_string(), password.to_string()));
    }

    fn check_available(&self) -> BackendResult<()> {
        if self.fail_auth.load(Ordering::SeqCst) {
            return Err(BackendError::unavailable("identity provider offline"));
        }
        Ok(())
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentityProvider {
    fn subscribe(&self) -> SessionEvents {
        let (sender, receiver) = unbounded_channel();
        self.subscriptions.fetch_add(1, Ordering::SeqCst);
        self.listeners.lock().unwrap().push(sender);
        receiver
    }

    async fn sign_out(&self) -> BackendResult<()> {
        self.sign_out_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_sign_out.load(Ordering::SeqCst) {
            return Err(BackendError::unavailable("network down"));
        }
        self.emit(None);
        Ok(())
    }

    async fn sign_in(&self, email: &str, password: &str) -> BackendResult<Identity> {
        self.check_available()?;
        let account = self.accounts.lock().unwrap().get(email).cloned();
        match account {
            Some((uid, stored)) if stored == password => {
                let identity = Identity::new(uid).with_email(email);
                self.emit(Some(identity.clone()));
                Ok(identity)
            }
            _ => Err(BackendError::rejected(
                "INVALID_LOGIN_CREDENTIALS",
                "wrong email or password",
            )),
        }
    }

    async fn sign_up(&self, email: &str, password: &str) -> BackendResult<Identity> {
        self.check_available()?;
        let uid = {
            let mut accounts = self.accounts.lock().unwrap();
            if accounts.contains_key(email) {
                return Err(BackendError::rejected("EMAIL_EXISTS", "email already in use"));
            }
            let uid = format!("uid-{}", accounts.len() + 1);
            accounts.insert(email.to_string(), (uid.clone(), password.to_string()));
            uid
        };
        let identity = Identity::new(uid).with_email(email);
        self.emit(Some(identity.clone()));
        Ok(identity)
    }

    async fn send_password_reset(&self, email: &str) -> BackendResult<()> {
        self.check_available()?;
        self.reset_requests.lock().unwrap().push(email.to_string());
        Ok(())
    }
}
