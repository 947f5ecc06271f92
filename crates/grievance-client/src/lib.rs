//! Grievance Client - Console Core
//!
//! Front-end independent core of the grievance console: the typed API
//! client, session persistence, the request and mail stores, analytics and
//! the dashboard navigation model. The browser dashboard and the CLI only
//! supply a transport and a session repository.
//!
//! Key Features:
//! - Transport-agnostic async API client with bearer authentication
//! - Tolerant normalization of the server's mixed-case wire rows
//! - Role-aware request scoping and admin-only actions
//! - Threaded mail view with reply, reply-all and forward drafts
//! - In-memory demo server for offline use and tests
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

pub mod analytics;
pub mod api;
pub mod compose;
pub mod controller;
pub mod mail;
pub mod mock;
pub mod payload;
pub mod requests;
pub mod session;
pub mod style;
pub mod transport;
pub mod wire;

#[cfg(test)]
mod testing;

pub use analytics::{Analytics, Breakdown};
pub use api::{endpoints, ApiClient, AuthGrant};
pub use compose::{ComposeDraft, ComposeMode};
pub use controller::{DashboardController, DetailMode, MenuItem, Screen};
pub use mail::{MailFolder, MailStore};
pub use mock::MockTransport;
pub use payload::{
    Assignment, AttachmentUpload, Credentials, NewRequest, OutgoingMail, Registration,
    StatusUpdate,
};
pub use requests::RequestStore;
pub use session::{AuthState, MemorySessionRepository, SessionRepository, SessionStore, StoredSession};
pub use style::{CardColor, StatCard};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Method};

pub use grievance_common::{ApiConfig, GrievanceError, Result};

/// A client wired to the in-memory demo server.
pub fn demo_client(config: grievance_common::ApiConfig) -> ApiClient {
    ApiClient::new(config, MockTransport::with_fixtures())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_demo_client_logs_in() {
        let client = demo_client(ApiConfig::default());
        let grant = client
            .login("admin@elogisol.com", "admin123")
            .await
            .unwrap();
        assert!(grant.user.is_admin());
        assert!(!grant.access_token.is_empty());
    }
}
