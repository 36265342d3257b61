//! Firebase REST adapters for the collaborator ports in `carti-core`:
//! [`FirebaseAuth`] (Identity Toolkit + secure token) and
//! [`FirestoreStore`] (Firestore documents API).

pub mod auth;
pub mod firestore;
pub mod http;
pub mod settings;
pub mod stored_session;
pub mod value;

pub use auth::FirebaseAuth;
pub use firestore::FirestoreStore;
pub use settings::FirebaseSettings;
pub use stored_session::StoredSession;
