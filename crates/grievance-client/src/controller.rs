//! Grievance Client Dashboard Controller
//!
//! The console's screen state machine: which screen is showing, which
//! request is selected, whether an admin form is open over it, and whether
//! the messages overlay is up. Also derives the per-role menu, the visible
//! request lists and the dashboard stat cards.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use crate::style::{CardColor, StatCard};
use grievance_common::{PriorityLevel, Request, RequestStatus, User};
use tracing::{debug, warn};

pub const DASHBOARD_LIST_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Dashboard,
    MyRequests,
    AllRequests,
    Pending,
    Active,
    CreateRequest,
    Analytics,
    Users,
    RequestDetail,
}

impl Screen {
    /// Stable identifier, used by menus and the CLI.
    pub fn id(&self) -> &'static str {
        match self {
            Screen::Dashboard => "dashboard",
            Screen::MyRequests => "my-requests",
            Screen::AllRequests => "all-requests",
            Screen::Pending => "pending",
            Screen::Active => "active",
            Screen::CreateRequest => "create-request",
            Screen::Analytics => "analytics",
            Screen::Users => "users",
            Screen::RequestDetail => "request-detail",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        [
            Screen::Dashboard,
            Screen::MyRequests,
            Screen::AllRequests,
            Screen::Pending,
            Screen::Active,
            Screen::CreateRequest,
            Screen::Analytics,
            Screen::Users,
            Screen::RequestDetail,
        ]
        .into_iter()
        .find(|s| s.id() == id)
    }
}

/// What is shown over a selected request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailMode {
    #[default]
    Plain,
    StatusUpdate,
    AssignForm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItem {
    pub screen: Screen,
    pub label: &'static str,
    pub icon: &'static str,
}

const CUSTOMER_MENU: [MenuItem; 3] = [
    MenuItem { screen: Screen::Dashboard, label: "Dashboard", icon: "home" },
    MenuItem { screen: Screen::MyRequests, label: "My Requests", icon: "file-text" },
    MenuItem { screen: Screen::CreateRequest, label: "New Request", icon: "plus" },
];

const ADMIN_MENU: [MenuItem; 6] = [
    MenuItem { screen: Screen::Dashboard, label: "Dashboard", icon: "home" },
    MenuItem { screen: Screen::Analytics, label: "Analytics", icon: "bar-chart" },
    MenuItem { screen: Screen::AllRequests, label: "All Requests", icon: "file-text" },
    MenuItem { screen: Screen::Pending, label: "Pending", icon: "filter" },
    MenuItem { screen: Screen::Active, label: "Active", icon: "star" },
    MenuItem { screen: Screen::Users, label: "Users", icon: "users" },
];

// =============================================================================
// Controller
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardController {
    is_admin: bool,
    screen: Screen,
    detail_mode: DetailMode,
    selected: Option<Request>,
    show_messages: bool,
    sidebar_open: bool,
}

impl DashboardController {
    pub fn new(viewer: &User) -> Self {
        Self {
            is_admin: viewer.is_admin(),
            screen: Screen::Dashboard,
            detail_mode: DetailMode::Plain,
            selected: None,
            show_messages: false,
            sidebar_open: false,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn detail_mode(&self) -> DetailMode {
        self.detail_mode
    }

    pub fn selected(&self) -> Option<&Request> {
        self.selected.as_ref()
    }

    pub fn show_messages(&self) -> bool {
        self.show_messages
    }

    pub fn sidebar_open(&self) -> bool {
        self.sidebar_open
    }

    // -------------------------------------------------------------------------
    // Transitions
    // -------------------------------------------------------------------------

    pub fn navigate(&mut self, screen: Screen) {
        debug!(from = self.screen.id(), to = screen.id(), "navigate");
        self.screen = screen;
        self.detail_mode = DetailMode::Plain;
        self.sidebar_open = false;
    }

    pub fn select_request(&mut self, request: Request) {
        debug!(request = request.request_id.0, "select request");
        self.selected = Some(request);
        self.navigate(Screen::RequestDetail);
    }

    /// Open the status form. Returns false (and changes nothing) for
    /// non-admins or without a selection.
    pub fn open_status_update(&mut self) -> bool {
        self.open_form(DetailMode::StatusUpdate)
    }

    pub fn open_assign_form(&mut self) -> bool {
        self.open_form(DetailMode::AssignForm)
    }

    fn open_form(&mut self, mode: DetailMode) -> bool {
        if !self.is_admin {
            warn!(?mode, "admin form refused for non-admin viewer");
            return false;
        }
        if self.selected.is_none() || self.screen != Screen::RequestDetail {
            return false;
        }
        self.detail_mode = mode;
        true
    }

    pub fn cancel_form(&mut self) {
        self.detail_mode = DetailMode::Plain;
    }

    pub fn on_status_updated(&mut self) {
        self.finish_admin_action();
    }

    pub fn on_assigned(&mut self) {
        self.finish_admin_action();
    }

    pub fn on_request_created(&mut self) {
        self.navigate(Screen::MyRequests);
    }

    fn finish_admin_action(&mut self) {
        self.selected = None;
        self.navigate(Screen::Dashboard);
    }

    pub fn open_messages(&mut self) {
        self.show_messages = true;
    }

    pub fn close_messages(&mut self) {
        self.show_messages = false;
    }

    pub fn toggle_sidebar(&mut self) {
        self.sidebar_open = !self.sidebar_open;
    }

    /// Replace the selected snapshot with its re-fetched version, if any.
    pub fn sync_selection(&mut self, requests: &[Request]) {
        if let Some(selected) = &self.selected {
            if let Some(fresh) = requests.iter().find(|r| r.request_id == selected.request_id) {
                self.selected = Some(fresh.clone());
            }
        }
    }

    // -------------------------------------------------------------------------
    // Derived views
    // -------------------------------------------------------------------------

    pub fn menu(&self) -> &'static [MenuItem] {
        if self.is_admin {
            &ADMIN_MENU
        } else {
            &CUSTOMER_MENU
        }
    }

    pub fn title(&self) -> &'static str {
        match self.screen {
            Screen::Dashboard => "Dashboard",
            Screen::MyRequests | Screen::AllRequests if self.is_admin => "All Requests",
            Screen::MyRequests | Screen::AllRequests => "My Requests",
            Screen::Pending => "Pending Requests",
            Screen::Active => "Active Requests",
            Screen::CreateRequest => "New Request",
            Screen::Analytics => "Analytics Dashboard",
            Screen::Users => "Users",
            Screen::RequestDetail => "Request Details",
        }
    }

    /// Requests listed on the current screen.
    pub fn visible_requests(&self, requests: &[Request]) -> Vec<Request> {
        match self.screen {
            Screen::MyRequests | Screen::AllRequests => requests.to_vec(),
            Screen::Pending => by_status(requests, &[RequestStatus::Pending], usize::MAX),
            Screen::Active => by_status(requests, &[RequestStatus::Active], usize::MAX),
            _ => Vec::new(),
        }
    }

    /// The two dashboard lists: recent pending and in-flight requests.
    pub fn dashboard_lists(&self, requests: &[Request]) -> (Vec<Request>, Vec<Request>) {
        (
            by_status(requests, &[RequestStatus::Pending], DASHBOARD_LIST_LIMIT),
            by_status(
                requests,
                &[RequestStatus::Active, RequestStatus::Dev],
                DASHBOARD_LIST_LIMIT,
            ),
        )
    }

    pub fn stat_cards(&self, requests: &[Request], users: &[User]) -> Vec<StatCard> {
        let count = |pred: &dyn Fn(&Request) -> bool| requests.iter().filter(|r| pred(r)).count();
        let status = |s: RequestStatus| move |r: &Request| r.status_name() == s;

        if self.is_admin {
            vec![
                StatCard::new("Total Requests", requests.len(), CardColor::Blue),
                StatCard::new("Pending", count(&status(RequestStatus::Pending)), CardColor::Yellow),
                StatCard::new("Active", count(&status(RequestStatus::Active)), CardColor::Blue),
                StatCard::new("Closed", count(&status(RequestStatus::Closed)), CardColor::Green),
                StatCard::new(
                    "High Priority",
                    count(&|r: &Request| r.priority_level() == PriorityLevel::High),
                    CardColor::Red,
                ),
                StatCard::new(
                    "Active Users",
                    users.iter().filter(|u| u.is_active).count(),
                    CardColor::Purple,
                ),
            ]
        } else {
            vec![
                StatCard::new("My Requests", requests.len(), CardColor::Blue),
                StatCard::new("Pending", count(&status(RequestStatus::Pending)), CardColor::Yellow),
                StatCard::new(
                    "In Progress",
                    count(&|r: &Request| r.status_name().is_in_progress()),
                    CardColor::Blue,
                ),
                StatCard::new("Resolved", count(&status(RequestStatus::Closed)), CardColor::Green),
            ]
        }
    }
}

fn by_status(requests: &[Request], statuses: &[RequestStatus], limit: usize) -> Vec<Request> {
    requests
        .iter()
        .filter(|r| statuses.contains(&r.status_name()))
        .take(limit)
        .cloned()
        .collect()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{request_fixture, user_fixture};
    use chrono::Utc;
    use grievance_common::{RequestType, UserRole};

    fn req(id: u64, status: RequestStatus) -> Request {
        request_fixture(id, status, PriorityLevel::Medium, RequestType::SystemBug, Utc::now())
    }

    #[test]
    fn test_menus_by_role() {
        let admin = DashboardController::new(&user_fixture(1, UserRole::Admin));
        let labels: Vec<&str> = admin.menu().iter().map(|m| m.label).collect();
        assert_eq!(labels, vec!["Dashboard", "Analytics", "All Requests", "Pending", "Active", "Users"]);

        let customer = DashboardController::new(&user_fixture(2, UserRole::User));
        let labels: Vec<&str> = customer.menu().iter().map(|m| m.label).collect();
        assert_eq!(labels, vec!["Dashboard", "My Requests", "New Request"]);
    }

    #[test]
    fn test_select_and_forms() {
        let mut c = DashboardController::new(&user_fixture(1, UserRole::Admin));
        assert!(!c.open_status_update());

        c.select_request(req(3, RequestStatus::Pending));
        assert_eq!(c.screen(), Screen::RequestDetail);
        assert_eq!(c.detail_mode(), DetailMode::Plain);

        assert!(c.open_status_update());
        assert_eq!(c.detail_mode(), DetailMode::StatusUpdate);
        c.cancel_form();
        assert_eq!(c.detail_mode(), DetailMode::Plain);

        assert!(c.open_assign_form());
        c.on_assigned();
        assert_eq!(c.screen(), Screen::Dashboard);
        assert!(c.selected().is_none());
        assert_eq!(c.detail_mode(), DetailMode::Plain);
    }

    #[test]
    fn test_customer_cannot_open_admin_forms() {
        let mut c = DashboardController::new(&user_fixture(2, UserRole::User));
        c.select_request(req(3, RequestStatus::Pending));
        let before = c.clone();

        assert!(!c.open_status_update());
        assert!(!c.open_assign_form());
        assert_eq!(c, before);
    }

    #[test]
    fn test_status_update_returns_to_dashboard() {
        let mut c = DashboardController::new(&user_fixture(1, UserRole::Admin));
        c.select_request(req(3, RequestStatus::Pending));
        c.open_status_update();
        c.on_status_updated();
        assert_eq!(c.screen(), Screen::Dashboard);
        assert!(c.selected().is_none());
    }

    #[test]
    fn test_create_goes_to_my_requests() {
        let mut c = DashboardController::new(&user_fixture(2, UserRole::User));
        c.navigate(Screen::CreateRequest);
        c.on_request_created();
        assert_eq!(c.screen(), Screen::MyRequests);
        assert_eq!(c.title(), "My Requests");
    }

    #[test]
    fn test_dashboard_lists_capped() {
        let c = DashboardController::new(&user_fixture(1, UserRole::Admin));
        let mut requests: Vec<Request> = (1..=7).map(|i| req(i, RequestStatus::Pending)).collect();
        requests.push(req(8, RequestStatus::Dev));
        requests.push(req(9, RequestStatus::Stag));
        requests.push(req(10, RequestStatus::Active));

        let (pending, active) = c.dashboard_lists(&requests);
        assert_eq!(pending.len(), 5);
        assert_eq!(pending[0].request_id.0, 1);
        let ids: Vec<u64> = active.iter().map(|r| r.request_id.0).collect();
        assert_eq!(ids, vec![8, 10]);
    }

    #[test]
    fn test_visible_requests_by_screen() {
        let mut c = DashboardController::new(&user_fixture(1, UserRole::Admin));
        let requests = vec![
            req(1, RequestStatus::Pending),
            req(2, RequestStatus::Active),
            req(3, RequestStatus::Dev),
        ];
        c.navigate(Screen::Pending);
        assert_eq!(c.visible_requests(&requests).len(), 1);
        c.navigate(Screen::Active);
        assert_eq!(c.visible_requests(&requests)[0].request_id.0, 2);
        c.navigate(Screen::AllRequests);
        assert_eq!(c.visible_requests(&requests).len(), 3);
        assert_eq!(c.title(), "All Requests");
    }

    #[test]
    fn test_stat_cards() {
        let requests = vec![
            req(1, RequestStatus::Pending),
            req(2, RequestStatus::Dev),
            req(3, RequestStatus::Uat),
            req(4, RequestStatus::Closed),
            req(5, RequestStatus::Live),
        ];
        let mut inactive = user_fixture(3, UserRole::Support);
        inactive.is_active = false;
        let users = vec![user_fixture(1, UserRole::Admin), user_fixture(2, UserRole::User), inactive];

        let admin = DashboardController::new(&users[0]);
        let cards = admin.stat_cards(&requests, &users);
        let values: Vec<(&str, &str)> = cards.iter().map(|c| (c.title.as_str(), c.value.as_str())).collect();
        assert_eq!(
            values,
            vec![
                ("Total Requests", "5"),
                ("Pending", "1"),
                ("Active", "0"),
                ("Closed", "1"),
                ("High Priority", "0"),
                ("Active Users", "2"),
            ]
        );

        let customer = DashboardController::new(&users[1]);
        let cards = customer.stat_cards(&requests, &users);
        let values: Vec<&str> = cards.iter().map(|c| c.value.as_str()).collect();
        assert_eq!(values, vec!["5", "1", "2", "1"]);
    }

    #[test]
    fn test_sync_selection() {
        let mut c = DashboardController::new(&user_fixture(1, UserRole::Admin));
        c.select_request(req(1, RequestStatus::Pending));
        c.sync_selection(&[req(1, RequestStatus::Live)]);
        assert_eq!(c.selected().unwrap().status_name(), RequestStatus::Live);
    }

    #[test]
    fn test_screen_ids_round_trip() {
        assert_eq!(Screen::from_id("all-requests"), Some(Screen::AllRequests));
        assert_eq!(Screen::from_id("nope"), None);
    }
}
