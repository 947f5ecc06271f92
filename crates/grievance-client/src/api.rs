//! Grievance Client API
//!
//! Typed access to every endpoint of the grievance API. One client owns the
//! base URL and the bearer token; every call goes through `call`, which
//! attaches the token and maps HTTP failures onto `GrievanceError`.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use crate::payload::{AssignmentBody, Credentials, NewRequest, OutgoingMail, OutgoingMailBody, Registration, StatusUpdate};
use crate::transport::{ApiRequest, ApiResponse, HttpTransport, Method};
use crate::wire::{self, ActionEnvelope, AuthEnvelope, FetchRequestsEnvelope, MailsEnvelope, PriorityListEnvelope, RequestTypeListEnvelope, UsersEnvelope};
use grievance_common::config::{FETCH_PAGE, FETCH_PAGE_SIZE};
use grievance_common::{
    ApiConfig, GrievanceError, Mail, MailId, Priority, Request, RequestTypeInfo, Result, User,
    UserId,
};
use parking_lot::RwLock;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, warn};

pub mod endpoints {
    pub const LOGIN: &str = "/api/auth/login";
    pub const REGISTER: &str = "/api/auth/register";
    pub const FETCH_REQUESTS: &str = "/api/request-fetch/fetch";
    pub const SAVE_REQUEST: &str = "/api/request/save";
    pub const REQUEST_STATUS: &str = "/api/request/status";
    pub const REQUEST_ASSIGN: &str = "/api/request/assign";
    pub const PRIORITY_LIST: &str = "/api/master/priority-list";
    pub const REQUEST_TYPE_LIST: &str = "/api/master/request-type-list";
    pub const USERS: &str = "/api/users";
    pub const MAILS: &str = "/api/mails";
    pub const SEND_MAIL: &str = "/api/mail/send";

    pub fn mail_star(id: u64) -> String {
        format!("/api/mail/{}/star", id)
    }

    pub fn mail_archive(id: u64) -> String {
        format!("/api/mail/{}/archive", id)
    }

    pub fn mail(id: u64) -> String {
        format!("/api/mail/{}", id)
    }
}

/// Token and user returned by a successful login or registration.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthGrant {
    pub access_token: String,
    pub user: User,
}

// =============================================================================
// API Client
// =============================================================================

/// Shared handle to the grievance API. Clones share the transport and token.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn HttpTransport>,
    config: Arc<ApiConfig>,
    token: Arc<RwLock<Option<String>>>,
}

impl ApiClient {
    pub fn new(config: ApiConfig, transport: impl HttpTransport + 'static) -> Self {
        Self {
            transport: Arc::new(transport),
            config: Arc::new(config),
            token: Arc::new(RwLock::new(None)),
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn set_token(&self, token: impl Into<String>) {
        *self.token.write() = Some(token.into());
    }

    pub fn clear_token(&self) {
        *self.token.write() = None;
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().clone()
    }

    pub fn has_token(&self) -> bool {
        self.token.read().is_some()
    }

    // -------------------------------------------------------------------------
    // Core
    // -------------------------------------------------------------------------

    /// Issue one call. Only transport failures are errors here.
    pub async fn call(&self, method: Method, path: &str, body: Option<Value>) -> Result<ApiResponse> {
        let request = ApiRequest {
            method,
            url: self.config.url(path),
            path: path.to_string(),
            body,
            bearer: self.token(),
        };
        debug!(method = %method, path, "api call");

        let response = self.transport.send(request).await?;
        debug!(method = %method, path, status = response.status, "api response");
        Ok(response)
    }

    /// Issue a call and fail on any non-2xx status.
    async fn call_ok(&self, method: Method, path: &str, body: Option<Value>) -> Result<ApiResponse> {
        let response = self.call(method, path, body).await?;
        if !response.is_success() {
            let message = response
                .message()
                .unwrap_or_else(|| format!("{} {} failed", method, path));
            return Err(GrievanceError::http(response.status, message));
        }
        Ok(response)
    }

    /// Issue a mutation; a body with `success: false` is a rejection.
    async fn mutate(&self, method: Method, path: &str, body: Option<Value>) -> Result<()> {
        let response = self.call_ok(method, path, body).await?;
        if response.body.trim().is_empty() {
            return Ok(());
        }
        let envelope: ActionEnvelope = match response.json() {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(
                    method = %method,
                    path,
                    status = response.status,
                    error = %e,
                    "mutation succeeded with an unreadable body"
                );
                return Ok(());
            }
        };
        match envelope.success {
            Some(false) => Err(GrievanceError::Rejected(
                envelope
                    .message
                    .unwrap_or_else(|| format!("{} {} was rejected", method, path)),
            )),
            _ => Ok(()),
        }
    }

    // -------------------------------------------------------------------------
    // Authentication
    // -------------------------------------------------------------------------

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthGrant> {
        let body = to_value(&Credentials {
            email: email.to_string(),
            password: password.to_string(),
        })?;
        let response = self.call(Method::Post, endpoints::LOGIN, Some(body)).await?;
        auth_grant(&response)
    }

    pub async fn register(&self, registration: &Registration) -> Result<AuthGrant> {
        registration.validate()?;
        let response = self
            .call(Method::Post, endpoints::REGISTER, Some(to_value(registration)?))
            .await?;
        auth_grant(&response)
    }

    // -------------------------------------------------------------------------
    // Requests
    // -------------------------------------------------------------------------

    /// Fetch requests, scoped to `user_id` when given.
    pub async fn fetch_requests(&self, user_id: Option<UserId>) -> Result<Vec<Request>> {
        let body = json!({
            "userId": user_id,
            "page": FETCH_PAGE,
            "pageSize": FETCH_PAGE_SIZE,
        });
        let response = self
            .call_ok(Method::Post, endpoints::FETCH_REQUESTS, Some(body))
            .await?;
        let envelope: FetchRequestsEnvelope = response.json()?;
        if !envelope.success {
            return Err(GrievanceError::Rejected(
                envelope
                    .message
                    .unwrap_or_else(|| "API returned unsuccessful response".to_string()),
            ));
        }
        Ok(wire::requests_from_rows(envelope.requests))
    }

    pub async fn save_request(&self, request: &NewRequest) -> Result<()> {
        request.validate()?;
        self.mutate(Method::Post, endpoints::SAVE_REQUEST, Some(to_value(request)?))
            .await
    }

    pub async fn update_status(&self, update: &StatusUpdate) -> Result<()> {
        self.mutate(Method::Put, endpoints::REQUEST_STATUS, Some(to_value(update)?))
            .await
    }

    pub async fn assign(&self, body: &AssignmentBody) -> Result<()> {
        self.mutate(Method::Put, endpoints::REQUEST_ASSIGN, Some(to_value(body)?))
            .await
    }

    // -------------------------------------------------------------------------
    // Reference data
    // -------------------------------------------------------------------------

    pub async fn priorities(&self) -> Result<Vec<Priority>> {
        let response = self.call_ok(Method::Get, endpoints::PRIORITY_LIST, None).await?;
        let envelope: PriorityListEnvelope = response.json()?;
        match envelope.priorities {
            Some(items) if envelope.success => Ok(wire::priorities_from_list(items)),
            _ => Err(GrievanceError::Rejected(
                envelope.message.unwrap_or_else(|| "priority list unavailable".to_string()),
            )),
        }
    }

    pub async fn request_types(&self) -> Result<Vec<RequestTypeInfo>> {
        let response = self
            .call_ok(Method::Get, endpoints::REQUEST_TYPE_LIST, None)
            .await?;
        let envelope: RequestTypeListEnvelope = response.json()?;
        match envelope.request_types {
            Some(items) if envelope.success => Ok(wire::request_types_from_list(items)),
            _ => Err(GrievanceError::Rejected(
                envelope.message.unwrap_or_else(|| "request type list unavailable".to_string()),
            )),
        }
    }

    pub async fn users(&self) -> Result<Vec<User>> {
        let response = self.call_ok(Method::Get, endpoints::USERS, None).await?;
        let envelope: UsersEnvelope = response.json()?;
        Ok(wire::users_from_rows(envelope.users))
    }

    // -------------------------------------------------------------------------
    // Mails
    // -------------------------------------------------------------------------

    pub async fn mails(&self) -> Result<Vec<Mail>> {
        let response = self.call_ok(Method::Get, endpoints::MAILS, None).await?;
        let envelope: MailsEnvelope = response.json()?;
        Ok(wire::mails_from_rows(envelope.mails))
    }

    pub async fn send_mail(&self, mail: &OutgoingMail) -> Result<()> {
        let body = to_value(&OutgoingMailBody::from(mail))?;
        self.mutate(Method::Post, endpoints::SEND_MAIL, Some(body)).await
    }

    pub async fn star_mail(&self, id: MailId) -> Result<()> {
        self.mutate(Method::Put, &endpoints::mail_star(id.0), None).await
    }

    pub async fn archive_mail(&self, id: MailId) -> Result<()> {
        self.mutate(Method::Put, &endpoints::mail_archive(id.0), None).await
    }

    pub async fn delete_mail(&self, id: MailId) -> Result<()> {
        self.mutate(Method::Delete, &endpoints::mail(id.0), None).await
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.config.base_url)
            .field("has_token", &self.has_token())
            .finish()
    }
}

fn to_value<T: Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(GrievanceError::from)
}

/// Interpret a login/register response. Anything short of a token plus a
/// readable user is an authentication failure.
fn auth_grant(response: &ApiResponse) -> Result<AuthGrant> {
    let envelope: AuthEnvelope = response.json().unwrap_or_default();
    let failure = |message: Option<String>| {
        GrievanceError::AuthenticationFailed(
            message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| "Invalid credentials".to_string()),
        )
    };

    match (envelope.success, envelope.access_token, envelope.user) {
        (true, Some(token), Some(user)) if !token.is_empty() => {
            let user = wire::user_from_value(user).map_err(|e| failure(Some(e.to_string())))?;
            Ok(AuthGrant {
                access_token: token,
                user,
            })
        }
        _ => Err(failure(envelope.message)),
    }
}

// =============================================================================
// Tests
// =============================================================================
