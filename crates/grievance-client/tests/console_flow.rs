//! Grievance Client Integration Tests
//!
//! End-to-end flows through the session, request and mail stores against
//! the in-memory server.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use grievance_client::{
    Analytics, ApiClient, Assignment, ComposeDraft, DashboardController, MailFolder, MailStore,
    MemorySessionRepository, MockTransport, NewRequest, RequestStore, Screen, SessionStore,
};
use grievance_common::{ApiConfig, PhasePlan, RequestId, RequestStatus, UserRole};

fn session(mock: &MockTransport) -> SessionStore<MemorySessionRepository> {
    let api = ApiClient::new(ApiConfig::default(), mock.clone());
    let store = SessionStore::new(api, MemorySessionRepository::new());
    store.restore();
    store
}

#[tokio::test]
async fn test_admin_triage_flow() {
    let mock = MockTransport::with_fixtures();
    let session = session(&mock);
    let admin = session.login("admin@elogisol.com", "admin123").await.unwrap();
    assert_eq!(admin.role, UserRole::Admin);

    let requests = RequestStore::for_viewer(session.api().clone(), Some(&admin));
    requests.load_reference_data().await;
    requests.refresh().await.unwrap();
    assert_eq!(requests.requests().len(), mock.request_count());

    let mut controller = DashboardController::new(&admin);
    let (pending, _) = controller.dashboard_lists(&requests.requests());
    let target = pending.first().cloned().unwrap();

    controller.select_request(target.clone());
    assert!(controller.open_status_update());
    requests
        .update_request_status(
            target.request_id,
            requests.status_id(RequestStatus::Active),
            Some("Picked up".to_string()),
        )
        .await
        .unwrap();
    controller.on_status_updated();
    assert_eq!(controller.screen(), Screen::Dashboard);
    assert!(controller.selected().is_none());

    let assignee = requests.assignable_users().into_iter().next().unwrap();
    let assignment = Assignment {
        dev: PhasePlan {
            target_date: chrono::NaiveDate::from_ymd_opt(2030, 1, 15),
            remark: Some("Hotfix branch".to_string()),
        },
        ..Assignment::to(assignee.user_id)
    };
    requests.assign_request(target.request_id, assignment).await.unwrap();

    let updated = requests.find(target.request_id).unwrap();
    assert_eq!(updated.status_name(), RequestStatus::Active);
    assert_eq!(updated.remark.as_deref(), Some("Picked up"));
    assert_eq!(updated.assigned_to.unwrap().user_id, assignee.user_id);
    assert_eq!(updated.dev.remark.as_deref(), Some("Hotfix branch"));
    assert_eq!(
        updated.dev.target_date,
        chrono::NaiveDate::from_ymd_opt(2030, 1, 15)
    );
}

#[tokio::test]
async fn test_customer_request_and_reply_flow() {
    let mock = MockTransport::with_fixtures();
    let session = session(&mock);
    let customer = session.login("john@company.com", "user123").await.unwrap();

    let requests = RequestStore::for_viewer(session.api().clone(), Some(&customer));
    requests.load_reference_data().await;
    requests.refresh().await.unwrap();
    let before = requests.requests().len();

    let mut controller = DashboardController::new(&customer);
    controller.navigate(Screen::CreateRequest);
    requests
        .create_request(
            NewRequest::new("Report totals", "Totals differ between screens")
                .with_request_type("System Bug", None)
                .with_priority(1)
                .with_user(customer.user_id),
        )
        .await
        .unwrap();
    controller.on_request_created();
    assert_eq!(controller.screen(), Screen::MyRequests);

    let mine = controller.visible_requests(&requests.requests());
    assert_eq!(mine.len(), before + 1);
    assert!(mine.iter().all(|r| r.created_by.user_id == customer.user_id));

    let created = mine.iter().find(|r| r.subject == "Report totals").unwrap();
    controller.select_request(created.clone());
    assert!(!controller.open_status_update());

    let mails = MailStore::new(session.api().clone());
    mails.refresh().await.unwrap();
    assert!(mails.get_request_messages(created.request_id).is_empty());

    let mut draft = ComposeDraft::for_request(created);
    assert_eq!(draft.subject, "Re: Report totals");
    draft.set_recipients("admin@elogisol.com", "", "");
    draft.body = "Screenshots to follow.".to_string();
    mails
        .send_mail(draft.into_outgoing(&customer).unwrap())
        .await
        .unwrap();

    let thread = mails.get_request_messages(created.request_id);
    assert_eq!(thread.len(), 1);
    assert_eq!(thread[0].from_address, customer.email);
    assert_eq!(mails.unread_count(Some(created.request_id)), 1);
}

#[tokio::test]
async fn test_reply_all_threads_under_parent() {
    let mock = MockTransport::with_fixtures();
    let session = session(&mock);
    let admin = session.login("admin@elogisol.com", "admin123").await.unwrap();

    let mails = MailStore::new(session.api().clone());
    mails.refresh().await.unwrap();
    let latest = mails
        .get_request_messages(RequestId(1))
        .into_iter()
        .last()
        .unwrap();

    let mut draft = ComposeDraft::reply_all(&latest, &admin.email);
    draft.body = "Looping everyone in.".to_string();
    assert!(!draft.to.iter().any(|a| a == &admin.email));
    mails
        .send_mail(draft.into_outgoing(&admin).unwrap())
        .await
        .unwrap();

    let reply = mails
        .get_request_messages(RequestId(1))
        .into_iter()
        .last()
        .unwrap();
    assert_eq!(reply.parent_mail_id, Some(latest.mail_id));
    let thread = mails.thread(reply.mail_id);
    assert!(thread.len() >= 3);
    assert!(thread[0].parent_mail_id.is_none());
    assert!(mails
        .filter(MailFolder::Inbox, Some(RequestId(1)), "")
        .iter()
        .any(|m| m.mail_id == reply.mail_id));
}

#[tokio::test]
async fn test_session_survives_restart() {
    let mock = MockTransport::with_fixtures();
    let repository = MemorySessionRepository::new();
    let first = SessionStore::new(
        ApiClient::new(ApiConfig::default(), mock.clone()),
        repository.clone(),
    );
    first.restore();
    first.login("admin@elogisol.com", "admin123").await.unwrap();

    let second = SessionStore::new(ApiClient::new(ApiConfig::default(), mock.clone()), repository);
    let state = second.restore();
    assert!(state.is_authenticated);
    assert!(second.api().has_token());

    let requests = RequestStore::for_viewer(second.api().clone(), state.user.as_ref());
    requests.refresh().await.unwrap();
    let analytics = Analytics::compute(&requests.requests(), chrono::Utc::now());
    assert_eq!(analytics.total, mock.request_count());
    assert!(analytics.recent_count > 0);

    second.logout();
    assert!(!second.api().has_token());
    let err = requests.refresh().await.unwrap_err();
    assert!(err.requires_login());
}
