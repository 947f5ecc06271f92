//! Grievance Client Mail
//!
//! The fetched mail collection and the mail mutations. Per-request views are
//! filters over the one collection; threads follow the parent back-references.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use crate::api::ApiClient;
use crate::payload::OutgoingMail;
use grievance_common::{Mail, MailId, RequestId, Result};
use parking_lot::RwLock;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{error, info, warn};

pub const FETCH_ERROR: &str = "Error fetching mails";

/// Mailbox folders of the message list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MailFolder {
    #[default]
    Inbox,
    Starred,
    Archived,
    All,
}

impl MailFolder {
    pub const ALL: [MailFolder; 4] = [
        MailFolder::Inbox,
        MailFolder::Starred,
        MailFolder::Archived,
        MailFolder::All,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MailFolder::Inbox => "Inbox",
            MailFolder::Starred => "Starred",
            MailFolder::Archived => "Archived",
            MailFolder::All => "All Mail",
        }
    }

    pub fn contains(&self, mail: &Mail) -> bool {
        match self {
            MailFolder::Inbox => !mail.is_archived,
            MailFolder::Starred => mail.is_starred,
            MailFolder::Archived => mail.is_archived,
            MailFolder::All => true,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct MailState {
    mails: Vec<Mail>,
    loading: bool,
    error: Option<String>,
}

// =============================================================================
// Mail Store
// =============================================================================

/// All mails visible to the viewer. Clones share state.
#[derive(Debug, Clone)]
pub struct MailStore {
    api: ApiClient,
    state: Arc<RwLock<MailState>>,
}

impl MailStore {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: Arc::new(RwLock::new(MailState {
                loading: true,
                ..Default::default()
            })),
        }
    }

    pub async fn refresh(&self) -> Result<()> {
        self.state.write().loading = true;

        let result = self.api.mails().await;
        let mut state = self.state.write();
        state.loading = false;
        match result {
            Ok(mails) => {
                info!(count = mails.len(), "mails loaded");
                state.mails = mails;
                state.error = None;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "mail fetch failed");
                state.mails.clear();
                state.error = Some(FETCH_ERROR.to_string());
                Err(e)
            }
        }
    }

    pub fn loading(&self) -> bool {
        self.state.read().loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.read().error.clone()
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Mails of one request, in fetch order.
    pub fn get_request_messages(&self, request_id: RequestId) -> Vec<Mail> {
        self.state
            .read()
            .mails
            .iter()
            .filter(|m| m.request_id == request_id)
            .cloned()
            .collect()
    }

    pub fn get_all_mails(&self) -> Vec<Mail> {
        self.state.read().mails.clone()
    }

    pub fn find(&self, id: MailId) -> Option<Mail> {
        self.state.read().mails.iter().find(|m| m.mail_id == id).cloned()
    }

    /// The mail `mail` replies to, if it was fetched.
    pub fn parent_of(&self, mail: &Mail) -> Option<Mail> {
        mail.parent_mail_id.and_then(|id| self.find(id))
    }

    /// Ancestors of `mail_id` followed by the mail itself, root first.
    pub fn thread(&self, mail_id: MailId) -> Vec<Mail> {
        let state = self.state.read();
        let by_id = |id: MailId| state.mails.iter().find(|m| m.mail_id == id);

        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut cursor = by_id(mail_id);
        while let Some(mail) = cursor {
            if !seen.insert(mail.mail_id) {
                warn!(mail = mail.mail_id.0, "reply cycle detected");
                break;
            }
            chain.push(mail.clone());
            cursor = mail.parent_mail_id.and_then(by_id);
        }
        chain.reverse();
        chain
    }

    /// Mails in `folder`, optionally narrowed to one request and a search term.
    pub fn filter(&self, folder: MailFolder, request_id: Option<RequestId>, search: &str) -> Vec<Mail> {
        let needle = search.trim().to_lowercase();
        self.state
            .read()
            .mails
            .iter()
            .filter(|m| folder.contains(m))
            .filter(|m| request_id.map_or(true, |id| m.request_id == id))
            .filter(|m| {
                needle.is_empty()
                    || m.subject.to_lowercase().contains(&needle)
                    || m.body.to_lowercase().contains(&needle)
                    || m.from_address.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect()
    }

    pub fn unread_count(&self, request_id: Option<RequestId>) -> usize {
        self.state
            .read()
            .mails
            .iter()
            .filter(|m| !m.is_read && !m.is_archived)
            .filter(|m| request_id.map_or(true, |id| m.request_id == id))
            .count()
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    pub async fn send_mail(&self, mail: OutgoingMail) -> Result<()> {
        if let Err(e) = self.api.send_mail(&mail).await {
            error!(request = mail.request_id.0, error = %e, "failed to send mail");
            return Err(e);
        }
        info!(request = mail.request_id.0, recipients = mail.to.len(), "mail sent");
        self.refresh_after_mutation().await;
        Ok(())
    }

    pub async fn toggle_star(&self, id: MailId) -> Result<()> {
        if let Err(e) = self.api.star_mail(id).await {
            error!(mail = id.0, error = %e, "failed to toggle star");
            return Err(e);
        }
        self.refresh_after_mutation().await;
        Ok(())
    }

    pub async fn archive_mail(&self, id: MailId) -> Result<()> {
        if let Err(e) = self.api.archive_mail(id).await {
            error!(mail = id.0, error = %e, "failed to archive mail");
            return Err(e);
        }
        self.refresh_after_mutation().await;
        Ok(())
    }

    pub async fn delete_mail(&self, id: MailId) -> Result<()> {
        if let Err(e) = self.api.delete_mail(id).await {
            error!(mail = id.0, error = %e, "failed to delete mail");
            return Err(e);
        }
        info!(mail = id.0, "mail deleted");
        self.refresh_after_mutation().await;
        Ok(())
    }

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
    use grievance_common::{ApiConfig, UserId};

    async fn store(mock: &MockTransport) -> MailStore {
        let api = ApiClient::new(ApiConfig::default(), mock.clone());
        let grant = api.login("admin@elogisol.com", "admin123").await.unwrap();
        api.set_token(grant.access_token);
        let store = MailStore::new(api);
        store.refresh().await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_request_messages_preserve_fetch_order() {
        let mock = MockTransport::with_fixtures();
        let store = store(&mock).await;

        let all = store.get_all_mails();
        let expected: Vec<MailId> = all
            .iter()
            .filter(|m| m.request_id == RequestId(1))
            .map(|m| m.mail_id)
            .collect();
        let actual: Vec<MailId> = store
            .get_request_messages(RequestId(1))
            .iter()
            .map(|m| m.mail_id)
            .collect();
        assert!(actual.len() >= 2);
        assert_eq!(actual, expected);
        assert!(store.get_request_messages(RequestId(9999)).is_empty());
    }

    #[tokio::test]
    async fn test_thread_walks_to_root() {
        let mock = MockTransport::with_fixtures();
        let store = store(&mock).await;

        let reply = store
            .get_all_mails()
            .into_iter()
            .find(|m| m.parent_mail_id.is_some())
            .unwrap();
        let thread = store.thread(reply.mail_id);
        assert!(thread.len() >= 2);
        assert!(thread[0].parent_mail_id.is_none());
        assert_eq!(thread.last().unwrap().mail_id, reply.mail_id);
        assert_eq!(store.parent_of(&reply).unwrap().mail_id, thread[thread.len() - 2].mail_id);
        assert!(store.thread(MailId(9999)).is_empty());
    }

    #[tokio::test]
    async fn test_toggle_star_and_archive() {
        let mock = MockTransport::with_fixtures();
        let store = store(&mock).await;
        let mail = store.get_all_mails().into_iter().next().unwrap();

        store.toggle_star(mail.mail_id).await.unwrap();
        assert_eq!(store.find(mail.mail_id).unwrap().is_starred, !mail.is_starred);

        store.archive_mail(mail.mail_id).await.unwrap();
        assert!(store.find(mail.mail_id).unwrap().is_archived);
        assert!(store
            .filter(MailFolder::Archived, None, "")
            .iter()
            .any(|m| m.mail_id == mail.mail_id));
        assert!(!store
            .filter(MailFolder::Inbox, None, "")
            .iter()
            .any(|m| m.mail_id == mail.mail_id));
    }

    #[tokio::test]
    async fn test_delete_and_send() {
        let mock = MockTransport::with_fixtures();
        let store = store(&mock).await;
        let before = store.get_all_mails().len();
        let first = store.get_all_mails()[0].mail_id;

        store.delete_mail(first).await.unwrap();
        assert_eq!(store.get_all_mails().len(), before - 1);
        assert!(store.find(first).is_none());

        store
            .send_mail(OutgoingMail {
                request_id: RequestId(2),
                parent_mail_id: None,
                from_address: "admin@elogisol.com".to_string(),
                created_by: UserId(1),
                to: vec!["john@company.com".to_string()],
                cc: Vec::new(),
                bcc: Vec::new(),
                subject: "Re: status".to_string(),
                body: "Deployed to UAT".to_string(),
                attachments: Vec::new(),
            })
            .await
            .unwrap();
        let sent = store.get_request_messages(RequestId(2));
        let last = sent.last().unwrap();
        assert_eq!(last.body, "Deployed to UAT");
        assert_eq!(last.to_addresses, vec!["john@company.com".to_string()]);
    }

    #[tokio::test]
    async fn test_failed_fetch_empties_collection() {
        let mock = MockTransport::with_fixtures();
        let store = store(&mock).await;
        mock.set_offline(true);

        assert!(store.refresh().await.is_err());
        assert!(store.get_all_mails().is_empty());
        assert_eq!(store.error().as_deref(), Some(FETCH_ERROR));
    }

    #[tokio::test]
    async fn test_failed_mutation_is_returned() {
        let mock = MockTransport::with_fixtures();
        let store = store(&mock).await;
        let err = store.toggle_star(MailId(9999)).await.unwrap_err();
        assert_eq!(err.status_code(), Some(404));
    }

    #[tokio::test]
    async fn test_search_filter() {
        let mock = MockTransport::with_fixtures();
        let store = store(&mock).await;
        let hits = store.filter(MailFolder::All, None, "LOGIN");
        assert!(!hits.is_empty());
        assert!(store.filter(MailFolder::All, None, "no-such-term-xyz").is_empty());
    }
}
