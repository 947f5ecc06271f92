//! Application state management for the Grievance Dashboard

use crate::api::build_client;
use crate::storage::BrowserSessionRepository;
use grievance_client::{ApiClient, Registration, SessionStore};
use grievance_common::User;
use leptos::*;

type Session = SessionStore<BrowserSessionRepository>;

/// Global application state: the viewer's session mirrored into signals.
#[derive(Clone, Copy)]
pub struct AppState {
    session: StoredValue<Session>,
    pub user: RwSignal<Option<User>>,
    pub is_loading: RwSignal<bool>,
    pub is_authenticated: Signal<bool>,
}

impl AppState {
    pub fn new() -> Self {
        let api = build_client();
        let repository = BrowserSessionRepository::new(api.config());
        let user = create_rw_signal(None::<User>);

        Self {
            session: store_value(SessionStore::new(api, repository)),
            user,
            is_loading: create_rw_signal(true),
            is_authenticated: Signal::derive(move || user.with(Option::is_some)),
        }
    }

    fn session(&self) -> Session {
        self.session.get_value()
    }

    /// Shared API client carrying the session token.
    pub fn api(&self) -> ApiClient {
        self.session().api().clone()
    }

    /// Load the persisted session before the first render.
    pub fn restore(&self) {
        let state = self.session().restore();
        self.user.set(state.user);
        self.is_loading.set(state.is_loading);
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<User, String> {
        let result = self.session().login(email, password).await;
        self.sync();
        result.map_err(|e| e.to_string())
    }

    pub async fn register(&self, registration: &Registration) -> Result<User, String> {
        let result = self.session().register(registration).await;
        self.sync();
        result.map_err(|e| e.to_string())
    }

    pub fn logout(&self) {
        self.session().logout();
        self.sync();
    }

    fn sync(&self) {
        let state = self.session().state();
        self.user.set(state.user);
        self.is_loading.set(state.is_loading);
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Provide application state context
pub fn provide_app_state() -> AppState {
    let state = AppState::new();
    state.restore();
    provide_context(state);
    state
}

/// Use application state from context
pub fn use_app_state() -> AppState {
    expect_context::<AppState>()
}
