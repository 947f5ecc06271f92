//! Dashboard state management using Leptos signals and context
//!
//! The request and mail stores own the data; after every call their
//! contents are copied into signals so the views re-render.

use grievance_client::{ApiClient, DashboardController, MailStore, RequestStore};
use grievance_common::{Mail, Priority, Request, RequestTypeInfo, Status, User};
use leptos::*;

/// Dashboard context containing all shared state
#[derive(Clone, Copy)]
pub struct DashboardContext {
    // Navigation
    pub controller: RwSignal<DashboardController>,

    // Request data
    pub requests: RwSignal<Vec<Request>>,
    pub users: RwSignal<Vec<User>>,
    pub priorities: RwSignal<Vec<Priority>>,
    pub statuses: RwSignal<Vec<Status>>,
    pub request_types: RwSignal<Vec<RequestTypeInfo>>,
    pub loading: RwSignal<bool>,
    pub error: RwSignal<Option<String>>,

    // Mail data
    pub mails: RwSignal<Vec<Mail>>,
    pub mail_error: RwSignal<Option<String>>,

    // Banner for mutation results: (text, success)
    pub message: RwSignal<Option<(String, bool)>>,

    request_store: StoredValue<RequestStore>,
    mail_store: StoredValue<MailStore>,
}

impl DashboardContext {
    pub fn new(api: ApiClient, viewer: &User) -> Self {
        let requests = RequestStore::for_viewer(api.clone(), Some(viewer));
        let mails = MailStore::new(api);

        Self {
            controller: create_rw_signal(DashboardController::new(viewer)),
            requests: create_rw_signal(Vec::new()),
            users: create_rw_signal(Vec::new()),
            priorities: create_rw_signal(requests.priorities()),
            statuses: create_rw_signal(requests.statuses()),
            request_types: create_rw_signal(requests.request_types()),
            loading: create_rw_signal(true),
            error: create_rw_signal(None),
            mails: create_rw_signal(Vec::new()),
            mail_error: create_rw_signal(None),
            message: create_rw_signal(None),
            request_store: store_value(requests),
            mail_store: store_value(mails),
        }
    }

    pub fn request_store(&self) -> RequestStore {
        self.request_store.get_value()
    }

    pub fn mail_store(&self) -> MailStore {
        self.mail_store.get_value()
    }

    /// Copy the request store into the signals.
    pub fn sync_requests(&self) {
        let store = self.request_store();
        let requests = store.requests();
        self.controller.update(|c| c.sync_selection(&requests));
        self.requests.set(requests);
        self.users.set(store.users());
        self.priorities.set(store.priorities());
        self.statuses.set(store.statuses());
        self.request_types.set(store.request_types());
        self.loading.set(store.loading());
        self.error.set(store.error());
    }

    /// Copy the mail store into the signals.
    pub fn sync_mails(&self) {
        let store = self.mail_store();
        self.mails.set(store.get_all_mails());
        self.mail_error.set(store.error());
    }

    /// Fetch everything the dashboard shows.
    pub async fn load(&self) {
        self.loading.set(true);
        let requests = self.request_store();
        requests.load_reference_data().await;
        let _ = requests.refresh().await;
        self.sync_requests();

        let _ = self.mail_store().refresh().await;
        self.sync_mails();
    }

    /// Show the outcome of a mutation in the banner.
    pub fn report(&self, result: Result<(), String>, success: &str) -> bool {
        match result {
            Ok(()) => {
                self.message.set(Some((success.to_string(), true)));
                true
            }
            Err(e) => {
                self.message.set(Some((e, false)));
                false
            }
        }
    }
}

/// Provide the dashboard context to child components
pub fn provide_dashboard_context(api: ApiClient, viewer: &User) -> DashboardContext {
    let ctx = DashboardContext::new(api, viewer);
    provide_context(ctx);
    ctx
}

/// Get the dashboard context from the component tree
pub fn use_dashboard_context() -> DashboardContext {
    expect_context::<DashboardContext>()
}
