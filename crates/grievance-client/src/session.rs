//! Grievance Client Session
//!
//! Authentication state of the current viewer. The session survives reloads
//! through a `SessionRepository`, which stores the access token and the
//! serialized user under two separate keys.
//!
//! Key Features:
//! - Login and self-registration against the remote API
//! - Synchronous restore before the first render
//! - Pluggable persistence (memory, browser storage, file)
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use crate::api::{ApiClient, AuthGrant};
use crate::payload::Registration;
use grievance_common::{GrievanceError, Result, User};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{info, warn};

// =============================================================================
// Persistence
// =============================================================================

/// Raw persisted session: the token and the serialized user, each optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredSession {
    pub token: Option<String>,
    pub user: Option<String>,
}

/// Storage for the session. Implementations hold both keys together and
/// `clear` removes both.
pub trait SessionRepository {
    fn load(&self) -> Result<StoredSession>;
    fn save(&self, token: &str, user_json: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// In-process session storage.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionRepository {
    inner: Arc<RwLock<StoredSession>>,
}

impl MemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository pre-populated with raw values.
    pub fn with_stored(token: Option<&str>, user_json: Option<&str>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(StoredSession {
                token: token.map(str::to_string),
                user: user_json.map(str::to_string),
            })),
        }
    }

    pub fn snapshot(&self) -> StoredSession {
        self.inner.read().clone()
    }
}

impl SessionRepository for MemorySessionRepository {
    fn load(&self) -> Result<StoredSession> {
        Ok(self.snapshot())
    }

    fn save(&self, token: &str, user_json: &str) -> Result<()> {
        *self.inner.write() = StoredSession {
            token: Some(token.to_string()),
            user: Some(user_json.to_string()),
        };
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.inner.write() = StoredSession::default();
        Ok(())
    }
}

// =============================================================================
// Auth State
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct AuthState {
    pub user: Option<User>,
    pub is_authenticated: bool,
    pub is_loading: bool,
}

impl AuthState {
    fn loading() -> Self {
        Self {
            user: None,
            is_authenticated: false,
            is_loading: true,
        }
    }

    fn signed_out() -> Self {
        Self {
            user: None,
            is_authenticated: false,
            is_loading: false,
        }
    }

    fn signed_in(user: User) -> Self {
        Self {
            user: Some(user),
            is_authenticated: true,
            is_loading: false,
        }
    }
}

// =============================================================================
// Session Store
// =============================================================================

/// The viewer's session. Clones share state.
pub struct SessionStore<R: SessionRepository> {
    api: ApiClient,
    repository: Arc<R>,
    state: Arc<RwLock<AuthState>>,
}

impl<R: SessionRepository> Clone for SessionStore<R> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            repository: Arc::clone(&self.repository),
            state: Arc::clone(&self.state),
        }
    }
}

impl<R: SessionRepository> SessionStore<R> {
    /// New store in the loading state. Call `restore` before rendering.
    pub fn new(api: ApiClient, repository: R) -> Self {
        Self {
            api,
            repository: Arc::new(repository),
            state: Arc::new(RwLock::new(AuthState::loading())),
        }
    }

    pub fn state(&self) -> AuthState {
        self.state.read().clone()
    }

    pub fn user(&self) -> Option<User> {
        self.state.read().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.read().is_authenticated
    }

    pub fn is_loading(&self) -> bool {
        self.state.read().is_loading
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Load the persisted session. A user without a token, or a user record
    /// that does not parse, is discarded and storage cleared.
    pub fn restore(&self) -> AuthState {
        let state = match self.repository.load() {
            Ok(StoredSession {
                token: Some(token),
                user: Some(user_json),
            }) => match serde_json::from_str::<User>(&user_json) {
                Ok(user) => {
                    self.api.set_token(token);
                    info!(user = %user.user_name, "session restored");
                    AuthState::signed_in(user)
                }
                Err(e) => {
                    warn!(error = %e, "stored user unreadable, clearing session");
                    self.discard();
                    AuthState::signed_out()
                }
            },
            Ok(StoredSession { token: None, user: None }) => AuthState::signed_out(),
            Ok(_) => {
                warn!("incomplete stored session, clearing");
                self.discard();
                AuthState::signed_out()
            }
            Err(e) => {
                warn!(error = %e, "session storage unavailable");
                AuthState::signed_out()
            }
        };

        *self.state.write() = state.clone();
        state
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        match self.api.login(email.trim(), password).await {
            Ok(grant) => self.authenticate(grant),
            Err(e) => {
                warn!(email = %email.trim(), error = %e, "login failed");
                *self.state.write() = AuthState::signed_out();
                Err(e)
            }
        }
    }

    pub async fn register(&self, registration: &Registration) -> Result<User> {
        match self.api.register(registration).await {
            Ok(grant) => self.authenticate(grant),
            Err(e) => {
                warn!(email = %registration.email, error = %e, "registration failed");
                *self.state.write() = AuthState::signed_out();
                Err(e)
            }
        }
    }

    /// Forget the session locally. No server call is made.
    pub fn logout(&self) {
        if let Some(user) = self.user() {
            info!(user = %user.user_name, "logged out");
        }
        self.discard();
        *self.state.write() = AuthState::signed_out();
    }

    /// The current user, or `NotAuthenticated`.
    pub fn require_user(&self) -> Result<User> {
        self.user().ok_or(GrievanceError::NotAuthenticated)
    }

    fn authenticate(&self, grant: AuthGrant) -> Result<User> {
        let user_json = serde_json::to_string(&grant.user)?;
        self.repository.save(&grant.access_token, &user_json)?;
        self.api.set_token(grant.access_token);
        info!(user = %grant.user.user_name, role = %grant.user.role, "logged in");
        *self.state.write() = AuthState::signed_in(grant.user.clone());
        Ok(grant.user)
    }

    fn discard(&self) {
        self.api.clear_token();
        if let Err(e) = self.repository.clear() {
            warn!(error = %e, "failed to clear session storage");
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockTransport;
    use grievance_common::ApiConfig;

    fn store(repo: MemorySessionRepository) -> SessionStore<MemorySessionRepository> {
        let api = ApiClient::new(ApiConfig::default(), MockTransport::with_fixtures());
        SessionStore::new(api, repo)
    }

    #[test]
    fn test_loading_until_restored() {
        let store = store(MemorySessionRepository::new());
        assert!(store.is_loading());
        let state = store.restore();
        assert!(!state.is_loading);
        assert!(!state.is_authenticated);
    }

    #[tokio::test]
    async fn test_login_persists_both_keys() {
        let repo = MemorySessionRepository::new();
        let store = store(repo.clone());
        store.restore();

        let user = store.login("admin@elogisol.com", "admin123").await.unwrap();
        assert!(user.is_admin());
        assert!(store.is_authenticated());
        assert!(store.api().has_token());

        let stored = repo.snapshot();
        assert!(stored.token.is_some());
        let saved: User = serde_json::from_str(stored.user.as_deref().unwrap()).unwrap();
        assert_eq!(saved.email, "admin@elogisol.com");
    }

    #[tokio::test]
    async fn test_login_failure_leaves_signed_out() {
        let repo = MemorySessionRepository::new();
        let store = store(repo.clone());
        store.restore();

        let err = store.login("admin@elogisol.com", "wrong").await.unwrap_err();
        assert!(matches!(err, GrievanceError::AuthenticationFailed(_)));
        assert!(!store.is_authenticated());
        assert_eq!(repo.snapshot(), StoredSession::default());
    }

    #[tokio::test]
    async fn test_logout_clears_both_keys() {
        let repo = MemorySessionRepository::new();
        let store = store(repo.clone());
        store.login("john@company.com", "user123").await.unwrap();

        store.logout();
        assert!(!store.is_authenticated());
        assert!(store.user().is_none());
        assert!(!store.api().has_token());
        assert_eq!(repo.snapshot(), StoredSession::default());
    }

    #[tokio::test]
    async fn test_restore_after_login() {
        let repo = MemorySessionRepository::new();
        store(repo.clone()).login("john@company.com", "user123").await.unwrap();

        let reopened = store(repo);
        let state = reopened.restore();
        assert!(state.is_authenticated);
        assert_eq!(state.user.unwrap().email, "john@company.com");
        assert!(reopened.api().has_token());
    }

    #[test]
    fn test_restore_user_without_token() {
        let user = r#"{"userId":2,"userName":"john_doe","email":"john@company.com","role":"User"}"#;
        let repo = MemorySessionRepository::with_stored(None, Some(user));
        let store = store(repo.clone());

        let state = store.restore();
        assert!(!state.is_authenticated);
        assert_eq!(repo.snapshot(), StoredSession::default());
    }

    #[test]
    fn test_restore_unreadable_user() {
        let repo = MemorySessionRepository::with_stored(Some("tok"), Some("{not json"));
        let store = store(repo.clone());

        assert!(!store.restore().is_authenticated);
        assert!(!store.api().has_token());
        assert_eq!(repo.snapshot(), StoredSession::default());
    }

    #[tokio::test]
    async fn test_register_authenticates() {
        let repo = MemorySessionRepository::new();
        let store = store(repo.clone());
        let reg = Registration::new("jane", "jane@corp.com", "secret1", "Corp");

        let user = store.register(&reg).await.unwrap();
        assert!(user.is_customer());
        assert_eq!(user.company_label(), Some("Corp"));
        assert!(store.is_authenticated());
        assert!(repo.snapshot().token.is_some());

        store.logout();
        store.login("jane@corp.com", "secret1").await.unwrap();
    }

    #[test]
    fn test_require_user() {
        let store = store(MemorySessionRepository::new());
        store.restore();
        assert!(matches!(store.require_user(), Err(GrievanceError::NotAuthenticated)));
    }
}
