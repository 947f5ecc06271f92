//! Grievance Client Requests
//!
//! Request data for one viewer: the fetched request list, the reference data
//! used by the forms, and the mutations. Every mutation is a direct API call
//! followed by a full re-fetch; the latest response is the truth.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use crate::api::ApiClient;
use crate::payload::{Assignment, AssignmentBody, NewRequest, StatusUpdate};
use grievance_common::{
    Priority, Request, RequestId, RequestStatus, RequestType, RequestTypeInfo, Result, Status,
    User, UserId, UserRole,
};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{error, info, warn};

pub const FETCH_ERROR: &str = "Error fetching requests";

#[derive(Debug, Clone)]
struct RequestState {
    requests: Vec<Request>,
    loading: bool,
    error: Option<String>,
    priorities: Vec<Priority>,
    statuses: Vec<Status>,
    request_types: Vec<RequestTypeInfo>,
    users: Vec<User>,
}

impl Default for RequestState {
    fn default() -> Self {
        Self {
            requests: Vec::new(),
            loading: true,
            error: None,
            priorities: Priority::defaults(),
            statuses: Status::defaults(),
            request_types: default_request_types(),
            users: Vec::new(),
        }
    }
}

fn default_request_types() -> Vec<RequestTypeInfo> {
    RequestType::KNOWN
        .iter()
        .enumerate()
        .map(|(i, kind)| RequestTypeInfo {
            id: i as u32 + 1,
            name: kind.as_str().to_string(),
        })
        .collect()
}

// =============================================================================
// Request Store
// =============================================================================

/// Requests visible to one viewer. Clones share state.
#[derive(Debug, Clone)]
pub struct RequestStore {
    api: ApiClient,
    scope: Arc<RwLock<Option<UserId>>>,
    state: Arc<RwLock<RequestState>>,
}

impl RequestStore {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            scope: Arc::new(RwLock::new(None)),
            state: Arc::new(RwLock::new(RequestState::default())),
        }
    }

    /// Store scoped to `viewer`.
    pub fn for_viewer(api: ApiClient, viewer: Option<&User>) -> Self {
        let store = Self::new(api);
        store.set_viewer(viewer);
        store
    }

    /// Customers only see their own requests; everyone else sees all.
    pub fn set_viewer(&self, viewer: Option<&User>) {
        *self.scope.write() = viewer
            .filter(|u| u.role == UserRole::User)
            .map(|u| u.user_id);
    }

    pub fn scope(&self) -> Option<UserId> {
        *self.scope.read()
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    /// Re-fetch the request list. On failure the list is emptied and the
    /// generic error flag set.
    pub async fn refresh(&self) -> Result<()> {
        self.state.write().loading = true;
        let scope = self.scope();

        let result = self.api.fetch_requests(scope).await;
        let mut state = self.state.write();
        state.loading = false;
        match result {
            Ok(requests) => {
                info!(count = requests.len(), scope = ?scope.map(|u| u.0), "requests loaded");
                state.requests = requests;
                state.error = None;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "request fetch failed");
                state.requests.clear();
                state.error = Some(FETCH_ERROR.to_string());
                Err(e)
            }
        }
    }

    /// Load priorities, request types and the user directory. Failures fall
    /// back to the built-in tables (or an empty directory).
    pub async fn load_reference_data(&self) {
        match self.api.priorities().await {
            Ok(priorities) if !priorities.is_empty() => self.state.write().priorities = priorities,
            Ok(_) => warn!("empty priority list, keeping defaults"),
            Err(e) => {
                warn!(error = %e, "priority list unavailable, using defaults");
                self.state.write().priorities = Priority::defaults();
            }
        }

        match self.api.request_types().await {
            Ok(types) if !types.is_empty() => self.state.write().request_types = types,
            Ok(_) => warn!("empty request type list, keeping defaults"),
            Err(e) => warn!(error = %e, "request type list unavailable, using defaults"),
        }

        self.load_users().await;
    }

    /// Re-fetch the user directory.
    pub async fn load_users(&self) {
        match self.api.users().await {
            Ok(users) => self.state.write().users = users,
            Err(e) => {
                warn!(error = %e, "user directory unavailable");
                self.state.write().users.clear();
            }
        }
    }

    pub fn requests(&self) -> Vec<Request> {
        self.state.read().requests.clone()
    }

    pub fn loading(&self) -> bool {
        self.state.read().loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.read().error.clone()
    }

    pub fn priorities(&self) -> Vec<Priority> {
        self.state.read().priorities.clone()
    }

    pub fn statuses(&self) -> Vec<Status> {
        self.state.read().statuses.clone()
    }

    pub fn request_types(&self) -> Vec<RequestTypeInfo> {
        self.state.read().request_types.clone()
    }

    pub fn users(&self) -> Vec<User> {
        self.state.read().users.clone()
    }

    /// Directory users who can take an assignment.
    pub fn assignable_users(&self) -> Vec<User> {
        self.state
            .read()
            .users
            .iter()
            .filter(|u| u.role != UserRole::User)
            .cloned()
            .collect()
    }

    pub fn find(&self, id: RequestId) -> Option<Request> {
        self.state
            .read()
            .requests
            .iter()
            .find(|r| r.request_id == id)
            .cloned()
    }

    pub fn with_status(&self, status: RequestStatus) -> Vec<Request> {
        self.state
            .read()
            .requests
            .iter()
            .filter(|r| r.status_name() == status)
            .cloned()
            .collect()
    }

    pub fn status_id(&self, status: RequestStatus) -> u32 {
        self.state
            .read()
            .statuses
            .iter()
            .find(|s| s.status_name == status)
            .map(|s| s.status_id)
            .unwrap_or_else(|| status.default_id())
    }

    /// Id of a request type by name, from the loaded reference data.
    pub fn request_type_id(&self, name: &str) -> Option<u32> {
        self.state
            .read()
            .request_types
            .iter()
            .find(|t| t.name == name)
            .map(|t| t.id)
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    pub async fn create_request(&self, request: NewRequest) -> Result<()> {
        let mut request = request;
        if request.request_type_id.is_none() {
            request.request_type_id = self.request_type_id(&request.request_type);
        }

        if let Err(e) = self.api.save_request(&request).await {
            error!(subject = %request.subject, error = %e, "failed to create request");
            return Err(e);
        }
        info!(subject = %request.subject, "request created");
        self.refresh_after_mutation().await;
        Ok(())
    }

    pub async fn update_request_status(
        &self,
        request_id: RequestId,
        status_id: u32,
        remark: Option<String>,
    ) -> Result<()> {
        let update = StatusUpdate {
            request_id,
            status_id,
            remark: remark.filter(|r| !r.trim().is_empty()),
        };
        if let Err(e) = self.api.update_status(&update).await {
            error!(request = request_id.0, status_id, error = %e, "failed to update status");
            return Err(e);
        }
        info!(request = request_id.0, status_id, "status updated");
        self.refresh_after_mutation().await;
        Ok(())
    }

    pub async fn assign_request(&self, request_id: RequestId, assignment: Assignment) -> Result<()> {
        let body = AssignmentBody::new(request_id, &assignment).map_err(|e| {
            error!(request = request_id.0, error = %e, "invalid assignment");
            e
        })?;
        if let Err(e) = self.api.assign(&body).await {
            error!(request = request_id.0, error = %e, "failed to assign request");
            return Err(e);
        }
        info!(request = request_id.0, assignee = body.assigned_to.0, "request assigned");
        self.refresh_after_mutation().await;
        Ok(())
    }

    /// The mutation already succeeded; a failed re-fetch only sets the flag.
    async fn refresh_after_mutation(&self) {
        let _ = self.refresh().await;
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockTransport;
    use grievance_common::{ApiConfig, GrievanceError, PriorityLevel};

    async fn admin_store(mock: &MockTransport) -> RequestStore {
        let api = ApiClient::new(ApiConfig::default(), mock.clone());
        let grant = api.login("admin@elogisol.com", "admin123").await.unwrap();
        api.set_token(grant.access_token);
        RequestStore::for_viewer(api, Some(&grant.user))
    }

    #[tokio::test]
    async fn test_scope_by_role() {
        let mock = MockTransport::with_fixtures();
        let api = ApiClient::new(ApiConfig::default(), mock);
        let customer = api.login("john@company.com", "user123").await.unwrap().user;
        let admin = api.login("admin@elogisol.com", "admin123").await.unwrap().user;

        let store = RequestStore::for_viewer(api, Some(&customer));
        assert_eq!(store.scope(), Some(customer.user_id));
        store.set_viewer(Some(&admin));
        assert_eq!(store.scope(), None);
        store.set_viewer(None);
        assert_eq!(store.scope(), None);
    }

    #[tokio::test]
    async fn test_refresh_loads_requests() {
        let mock = MockTransport::with_fixtures();
        let store = admin_store(&mock).await;
        assert!(store.loading());

        store.refresh().await.unwrap();
        assert!(!store.loading());
        assert_eq!(store.error(), None);
        assert_eq!(store.requests().len(), mock.request_count());
    }

    #[tokio::test]
    async fn test_customer_sees_own_requests() {
        let mock = MockTransport::with_fixtures();
        let api = ApiClient::new(ApiConfig::default(), mock.clone());
        let grant = api.login("john@company.com", "user123").await.unwrap();
        api.set_token(grant.access_token);
        let store = RequestStore::for_viewer(api, Some(&grant.user));

        store.refresh().await.unwrap();
        assert!(!store.requests().is_empty());
        assert!(store
            .requests()
            .iter()
            .all(|r| r.created_by.user_id == grant.user.user_id));
    }

    #[tokio::test]
    async fn test_failed_read_empties_list() {
        let mock = MockTransport::with_fixtures();
        let store = admin_store(&mock).await;
        store.refresh().await.unwrap();
        assert!(!store.requests().is_empty());

        mock.set_offline(true);
        let err = store.refresh().await.unwrap_err();
        assert!(err.is_transport());
        assert!(store.requests().is_empty());
        assert_eq!(store.error().as_deref(), Some(FETCH_ERROR));
        assert!(!store.loading());
    }

    #[tokio::test]
    async fn test_update_status_refetches() {
        let mock = MockTransport::with_fixtures();
        let store = admin_store(&mock).await;
        store.refresh().await.unwrap();

        let pending = store.with_status(RequestStatus::Pending);
        let target = pending.first().unwrap();
        let before = chrono::Utc::now();

        store
            .update_request_status(target.request_id, store.status_id(RequestStatus::Dev), Some("Starting".into()))
            .await
            .unwrap();

        let updated = store.find(target.request_id).unwrap();
        assert_eq!(updated.status_name(), RequestStatus::Dev);
        assert!(updated.updated_on.unwrap() >= before - chrono::Duration::seconds(1));
        assert_eq!(updated.remark.as_deref(), Some("Starting"));
    }

    #[tokio::test]
    async fn test_failed_mutation_returns_error() {
        let mock = MockTransport::with_fixtures();
        let store = admin_store(&mock).await;
        store.refresh().await.unwrap();

        let err = store
            .update_request_status(RequestId(9999), 2, None)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), Some(404));
    }

    #[tokio::test]
    async fn test_assign_rejects_zero_assignee_locally() {
        let mock = MockTransport::with_fixtures();
        let store = admin_store(&mock).await;
        let calls = mock.call_count();

        let err = store
            .assign_request(RequestId(1), Assignment::to(UserId(0)))
            .await
            .unwrap_err();
        assert!(matches!(err, GrievanceError::Validation(_)));
        assert_eq!(mock.call_count(), calls);
    }

    #[tokio::test]
    async fn test_assign_request() {
        let mock = MockTransport::with_fixtures();
        let store = admin_store(&mock).await;
        store.load_reference_data().await;
        let assignee = store.assignable_users().into_iter().next().unwrap();
        assert_ne!(assignee.role, UserRole::User);

        store
            .assign_request(RequestId(1), Assignment::to(assignee.user_id))
            .await
            .unwrap();
        let request = store.find(RequestId(1)).unwrap();
        assert_eq!(request.assigned_to.unwrap().user_id, assignee.user_id);
        assert!(request.assigned_on.is_some());
    }

    #[tokio::test]
    async fn test_create_request_fills_type_id() {
        let mock = MockTransport::with_fixtures();
        let store = admin_store(&mock).await;
        store.load_reference_data().await;
        store.refresh().await.unwrap();
        let before = store.requests().len();

        let new = NewRequest::new("Add export", "Export to PDF please")
            .with_request_type("New Development", None)
            .with_priority(2)
            .with_user(UserId(1));
        store.create_request(new).await.unwrap();

        let requests = store.requests();
        assert_eq!(requests.len(), before + 1);
        let created = requests.iter().find(|r| r.subject == "Add export").unwrap();
        assert_eq!(created.request_type, RequestType::NewDevelopment);
        assert_eq!(created.request_type_id, Some(1));
        assert_eq!(created.status_name(), RequestStatus::Pending);
        assert_eq!(created.priority_level(), PriorityLevel::Medium);
    }

    #[tokio::test]
    async fn test_reference_data_fallbacks() {
        let mock = MockTransport::with_fixtures();
        let store = admin_store(&mock).await;
        mock.set_offline(true);

        store.load_reference_data().await;
        assert_eq!(store.priorities(), Priority::defaults());
        assert_eq!(store.statuses().len(), 7);
        assert_eq!(store.request_types().len(), 3);
        assert!(store.users().is_empty());
    }
}
