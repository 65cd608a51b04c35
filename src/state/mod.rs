/// Review moderation state machine.
pub mod moderation;

use std::sync::Arc;

use dashmap::DashMap;
use uuid::Uuid;

use crate::{
    config::AppConfig,
    dao::{deals::DealsClient, store::DocumentStore},
};

/// State handle shared by every handler.
pub type SharedState = Arc<AppState>;

/// Who is acting on a request. Obtained from `POST /sessions` and passed
/// explicitly to every operation that needs an author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Opaque token sent in `X-Session-Token`.
    pub token: String,
    /// Account the session acts for.
    pub user_id: Uuid,
    /// Username at login time.
    pub username: String,
}

/// Central application state: the document store, the deals client and live sessions.
pub struct AppState {
    store: DocumentStore,
    deals: DealsClient,
    config: AppConfig,
    sessions: DashMap<String, Session>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The store is not ready until the storage supervisor installs a backend.
    pub fn new(config: AppConfig, store: DocumentStore, deals: DealsClient) -> SharedState {
        Arc::new(Self {
            store,
            deals,
            config,
            sessions: DashMap::new(),
        })
    }

    /// Document store holding every collection.
    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    /// Client for the external deals API.
    pub fn deals(&self) -> &DealsClient {
        &self.deals
    }

    /// Runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Open a session for `user_id` and return it.
    pub fn open_session(&self, user_id: Uuid, username: String) -> Session {
        let session = Session {
            token: Uuid::new_v4().simple().to_string(),
            user_id,
            username,
        };
        self.sessions.insert(session.token.clone(), session.clone());
        session
    }

    /// Look up an open session by token.
    pub fn session(&self, token: &str) -> Option<Session> {
        self.sessions.get(token).map(|entry| entry.value().clone())
    }

    /// Close one session; `false` when the token was not known.
    pub fn close_session(&self, token: &str) -> bool {
        self.sessions.remove(token).is_some()
    }

    /// Drop every session of a user, e.g. after the account is deleted.
    pub fn close_sessions_of(&self, user_id: Uuid) {
        self.sessions.retain(|_, session| session.user_id != user_id);
    }

    /// Drop every open session.
    pub fn close_all_sessions(&self) {
        self.sessions.clear();
    }
}
