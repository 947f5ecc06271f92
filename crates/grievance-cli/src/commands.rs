//! Grievance CLI Commands
//!
//! Executes one parsed command against a session store and returns the
//! text to print. Commands other than login, register and logout run as
//! the signed-in user, signing in first when credentials were supplied.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use crate::output;
use crate::{Commands, FolderArg};
use chrono::Utc;
use grievance_client::{
    Analytics, Assignment, AttachmentUpload, ComposeDraft, MailFolder, MailStore, NewRequest, Registration,
    RequestStore, SessionRepository, SessionStore,
};
use grievance_common::utils::{join_addresses, parse_date};
use grievance_common::{
    GrievanceError, MailId, PhasePlan, PriorityLevel, RequestId, RequestStatus, Result, User, UserId,
};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Account used by `--demo` when no credentials are given.
pub const DEMO_LOGIN: (&str, &str) = ("admin@elogisol.com", "admin123");

impl From<FolderArg> for MailFolder {
    fn from(arg: FolderArg) -> Self {
        match arg {
            FolderArg::Inbox => MailFolder::Inbox,
            FolderArg::Starred => MailFolder::Starred,
            FolderArg::Archived => MailFolder::Archived,
            FolderArg::All => MailFolder::All,
        }
    }
}

fn missing_credentials() -> GrievanceError {
    GrievanceError::Validation("--email and --password are required".to_string())
}

fn require_admin(user: &User, action: &str) -> Result<()> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(GrievanceError::PermissionDenied(format!("only administrators can {}", action)))
    }
}

fn not_found(what: &str, id: u64) -> GrievanceError {
    GrievanceError::NotFound(format!("{} #{}", what, id))
}

/// Content type guessed from the file extension.
fn content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "pdf" => "application/pdf",
        "txt" | "log" => "text/plain",
        "csv" => "text/csv",
        "json" => "application/json",
        "zip" => "application/zip",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        _ => "application/octet-stream",
    }
}

pub fn read_attachment(path: &Path) -> Result<AttachmentUpload> {
    let bytes = std::fs::read(path)?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| GrievanceError::Validation(format!("not a file: {}", path.display())))?;
    debug!(file = %file_name, size = bytes.len(), "attachment read");
    Ok(AttachmentUpload::from_bytes(file_name, content_type(path), &bytes))
}

fn read_attachments(paths: &[PathBuf]) -> Result<Vec<AttachmentUpload>> {
    paths.iter().map(|p| read_attachment(p)).collect()
}

fn phase(date: Option<String>, remark: Option<String>) -> Result<PhasePlan> {
    let target_date = match date {
        Some(raw) => Some(
            parse_date(&raw).ok_or_else(|| GrievanceError::Validation(format!("invalid date: {}", raw)))?,
        ),
        None => None,
    };
    Ok(PhasePlan {
        target_date,
        remark: remark.filter(|r| !r.trim().is_empty()),
    })
}

/// Runs commands for one session.
pub struct Console<R: SessionRepository> {
    session: SessionStore<R>,
}

impl<R: SessionRepository> Console<R> {
    pub fn new(session: SessionStore<R>) -> Self {
        session.restore();
        Self { session }
    }

    pub fn session(&self) -> &SessionStore<R> {
        &self.session
    }

    pub async fn execute(&self, command: Commands, credentials: Option<(String, String)>) -> Result<String> {
        match command {
            Commands::Login => {
                let (email, password) = credentials.ok_or_else(missing_credentials)?;
                let user = self.session.login(&email, &password).await?;
                Ok(format!("Signed in as {}\n", output::user_line(&user)))
            }
            Commands::Register { name, company, mobile } => {
                let (email, password) = credentials.ok_or_else(missing_credentials)?;
                let mut registration = Registration::new(name, email, password, company);
                if let Some(mobile) = mobile {
                    registration = registration.with_mobile(mobile);
                }
                registration.validate()?;
                let user = self.session.register(&registration).await?;
                Ok(format!("Registered and signed in as {}\n", output::user_line(&user)))
            }
            Commands::Logout => {
                self.session.logout();
                Ok("Signed out\n".to_string())
            }
            other => {
                let user = self.ensure_user(credentials).await?;
                self.run_as(&user, other).await
            }
        }
    }

    async fn ensure_user(&self, credentials: Option<(String, String)>) -> Result<User> {
        if self.session.is_authenticated() {
            return self.session.require_user();
        }
        match credentials {
            Some((email, password)) => {
                info!(email = %email, "signing in with supplied credentials");
                self.session.login(&email, &password).await
            }
            None => Err(GrievanceError::NotAuthenticated),
        }
    }

    async fn request_store(&self, user: &User) -> Result<RequestStore> {
        let store = RequestStore::for_viewer(self.session.api().clone(), Some(user));
        store.refresh().await?;
        Ok(store)
    }

    async fn mail_store(&self) -> Result<MailStore> {
        let store = MailStore::new(self.session.api().clone());
        store.refresh().await?;
        Ok(store)
    }

    async fn run_as(&self, user: &User, command: Commands) -> Result<String> {
        match command {
            Commands::Whoami => Ok(format!("{}\n", output::user_line(user))),

            Commands::Requests { status, search } => {
                let store = self.request_store(user).await?;
                let mut requests = match status {
                    Some(raw) => store.with_status(raw.parse::<RequestStatus>()?),
                    None => store.requests(),
                };
                if let Some(needle) = search.map(|s| s.trim().to_lowercase()).filter(|s| !s.is_empty()) {
                    requests.retain(|r| {
                        r.subject.to_lowercase().contains(&needle)
                            || r.created_by.user_name.to_lowercase().contains(&needle)
                    });
                }
                Ok(output::request_table(&requests))
            }

            Commands::Show { id } => {
                let store = self.request_store(user).await?;
                let request = store.find(RequestId(id)).ok_or_else(|| not_found("request", id))?;
                let mails = match self.mail_store().await {
                    Ok(mails) => mails.get_request_messages(request.request_id),
                    Err(_) => Vec::new(),
                };
                Ok(output::request_detail(&request, &mails))
            }

            Commands::Create {
                subject,
                message,
                request_type,
                priority,
                attachments,
            } => {
                let store = RequestStore::for_viewer(self.session.api().clone(), Some(user));
                store.load_reference_data().await;
                let priority_id = match priority.trim().parse::<u32>() {
                    Ok(id) => id,
                    Err(_) => {
                        let level = priority.parse::<PriorityLevel>()?;
                        store
                            .priorities()
                            .iter()
                            .find(|p| p.priority_name == level)
                            .map(|p| p.priority_id)
                            .unwrap_or_else(|| level.default_id())
                    }
                };
                let type_id = store.request_type_id(&request_type);
                let mut new = NewRequest::new(subject.trim(), message)
                    .with_request_type(request_type, type_id)
                    .with_priority(priority_id)
                    .with_user(user.user_id);
                for attachment in read_attachments(&attachments)? {
                    new = new.with_attachment(attachment);
                }
                new.validate()?;
                store.create_request(new).await?;
                Ok("Request submitted successfully\n".to_string())
            }

            Commands::Status { id, status, remark } => {
                require_admin(user, "update request status")?;
                let status = status.parse::<RequestStatus>()?;
                let store = self.request_store(user).await?;
                store
                    .update_request_status(RequestId(id), store.status_id(status), remark)
                    .await?;
                Ok(format!("Request #{} is now {}\n", id, status.label()))
            }

            Commands::Assign {
                id,
                to,
                dev_date,
                dev_remark,
                uat_date,
                uat_remark,
                live_date,
                live_remark,
            } => {
                require_admin(user, "assign requests")?;
                let assignment = Assignment {
                    assigned_to: Some(UserId(to)),
                    dev: phase(dev_date, dev_remark)?,
                    uat: phase(uat_date, uat_remark)?,
                    live: phase(live_date, live_remark)?,
                };
                let store = RequestStore::for_viewer(self.session.api().clone(), Some(user));
                store.assign_request(RequestId(id), assignment).await?;
                let assignee = store
                    .find(RequestId(id))
                    .and_then(|r| r.assigned_to)
                    .map(|u| u.user_name)
                    .unwrap_or_else(|| format!("user #{}", to));
                Ok(format!("Request #{} assigned to {}\n", id, assignee))
            }

            Commands::Mails { folder, request, search } => {
                let store = self.mail_store().await?;
                let mails = store.filter(folder.into(), request.map(RequestId), search.as_deref().unwrap_or(""));
                Ok(output::mail_table(&mails))
            }

            Commands::Read { id } => {
                let store = self.mail_store().await?;
                let thread = store.thread(MailId(id));
                if thread.is_empty() {
                    return Err(not_found("message", id));
                }
                Ok(output::mail_thread(&thread))
            }

            Commands::Send {
                request,
                reply_to,
                all,
                forward,
                to,
                cc,
                bcc,
                subject,
                body,
                attachments,
            } => {
                let mails = self.mail_store().await?;
                let mut draft = match (reply_to, forward, request) {
                    (Some(mail_id), _, _) => {
                        let mail = mails.find(MailId(mail_id)).ok_or_else(|| not_found("message", mail_id))?;
                        if all {
                            ComposeDraft::reply_all(&mail, &user.email)
                        } else {
                            ComposeDraft::reply(&mail)
                        }
                    }
                    (None, Some(mail_id), _) => {
                        let mail = mails.find(MailId(mail_id)).ok_or_else(|| not_found("message", mail_id))?;
                        ComposeDraft::forward(&mail)
                    }
                    (None, None, Some(request_id)) => {
                        let requests = self.request_store(user).await?;
                        match requests.find(RequestId(request_id)) {
                            Some(found) => ComposeDraft::for_request(&found),
                            None => ComposeDraft::blank(Some(RequestId(request_id))),
                        }
                    }
                    (None, None, None) => {
                        return Err(GrievanceError::Validation(
                            "one of --request, --reply-to or --forward is required".to_string(),
                        ))
                    }
                };

                let to = to.unwrap_or_else(|| join_addresses(&draft.to));
                let cc = cc.unwrap_or_else(|| join_addresses(&draft.cc));
                let bcc = bcc.unwrap_or_else(|| join_addresses(&draft.bcc));
                draft.set_recipients(&to, &cc, &bcc);
                if let Some(subject) = subject {
                    draft.subject = subject;
                }
                draft.body = body;
                draft.attachments.extend(read_attachments(&attachments)?);

                let outgoing = draft.into_outgoing(user)?;
                let request_id = outgoing.request_id;
                mails.send_mail(outgoing).await?;
                Ok(format!("Message sent on request #{}\n", request_id))
            }

            Commands::Star { id } => {
                let store = self.mail_store().await?;
                store.toggle_star(MailId(id)).await?;
                let starred = store.find(MailId(id)).map(|m| m.is_starred).unwrap_or(false);
                Ok(format!("Message #{} {}\n", id, if starred { "starred" } else { "unstarred" }))
            }

            Commands::Archive { id } => {
                self.mail_store().await?.archive_mail(MailId(id)).await?;
                Ok(format!("Message #{} archived\n", id))
            }

            Commands::Delete { id } => {
                self.mail_store().await?.delete_mail(MailId(id)).await?;
                Ok(format!("Message #{} deleted\n", id))
            }

            Commands::Analytics => {
                let store = self.request_store(user).await?;
                let analytics = Analytics::compute(&store.requests(), Utc::now());
                Ok(output::analytics_report(&analytics))
            }

            Commands::Users => {
                let store = RequestStore::new(self.session.api().clone());
                store.load_users().await;
                Ok(output::user_table(&store.users()))
            }

            Commands::Login | Commands::Register { .. } | Commands::Logout => {
                Err(GrievanceError::Validation("command does not need a session".to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grievance_client::{demo_client, ApiConfig, MemorySessionRepository};

    fn console() -> Console<MemorySessionRepository> {
        let session = SessionStore::new(demo_client(ApiConfig::default()), MemorySessionRepository::new());
        Console::new(session)
    }

    fn admin() -> Option<(String, String)> {
        Some((DEMO_LOGIN.0.to_string(), DEMO_LOGIN.1.to_string()))
    }

    #[tokio::test]
    async fn test_requires_session_without_credentials() {
        let console = console();
        let err = console.execute(Commands::Whoami, None).await.unwrap_err();
        assert!(err.requires_login());
    }

    #[tokio::test]
    async fn test_signs_in_with_credentials() {
        let console = console();
        let out = console.execute(Commands::Whoami, admin()).await.unwrap();
        assert!(out.contains("admin@elogisol.com"));
        assert!(console.session().is_authenticated());
    }

    #[tokio::test]
    async fn test_status_and_show() {
        let console = console();
        let out = console
            .execute(
                Commands::Status {
                    id: 1,
                    status: "active".to_string(),
                    remark: Some("Looking into it".to_string()),
                },
                admin(),
            )
            .await
            .unwrap();
        assert_eq!(out, "Request #1 is now Active\n");

        let detail = console.execute(Commands::Show { id: 1 }, None).await.unwrap();
        assert!(detail.contains("Status: Active"));
        assert!(detail.contains("Remark: Looking into it"));
    }

    #[tokio::test]
    async fn test_create_then_list() {
        let console = console();
        let john = Some(("john@company.com".to_string(), "user123".to_string()));
        console.execute(Commands::Login, john).await.unwrap();
        console
            .execute(
                Commands::Create {
                    subject: "Export fails".to_string(),
                    message: "CSV export returns an empty file".to_string(),
                    request_type: "SystemBug".to_string(),
                    priority: "medium".to_string(),
                    attachments: Vec::new(),
                },
                None,
            )
            .await
            .unwrap();

        let list = console
            .execute(
                Commands::Requests {
                    status: Some("pending".to_string()),
                    search: Some("export".to_string()),
                },
                None,
            )
            .await
            .unwrap();
        assert!(list.contains("Export fails"));
        assert!(list.contains("1 requests"));
    }

    #[tokio::test]
    async fn test_customer_cannot_change_status() {
        let console = console();
        let maria = Some(("maria@retailhub.com".to_string(), "user123".to_string()));
        let err = console
            .execute(
                Commands::Status {
                    id: 4,
                    status: "closed".to_string(),
                    remark: None,
                },
                maria,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, GrievanceError::PermissionDenied(_)));
    }

    #[tokio::test]
    async fn test_show_unknown_request() {
        let console = console();
        let err = console.execute(Commands::Show { id: 999 }, admin()).await.unwrap_err();
        assert!(matches!(err, GrievanceError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_send_requires_target() {
        let console = console();
        let err = console
            .execute(
                Commands::Send {
                    request: None,
                    reply_to: None,
                    all: false,
                    forward: None,
                    to: None,
                    cc: None,
                    bcc: None,
                    subject: None,
                    body: "hello".to_string(),
                    attachments: Vec::new(),
                },
                admin(),
            )
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_reply_threads_and_star() {
        let console = console();
        let sent = console
            .execute(
                Commands::Send {
                    request: None,
                    reply_to: Some(3),
                    all: false,
                    forward: None,
                    to: None,
                    cc: None,
                    bcc: None,
                    subject: None,
                    body: "Fixed in the latest build.".to_string(),
                    attachments: Vec::new(),
                },
                admin(),
            )
            .await
            .unwrap();
        assert_eq!(sent, "Message sent on request #1\n");

        let thread = console.execute(Commands::Read { id: 5 }, None).await.unwrap();
        assert!(thread.contains("Fixed in the latest build."));

        let starred = console.execute(Commands::Star { id: 5 }, None).await.unwrap();
        assert_eq!(starred, "Message #5 starred\n");
    }

    #[test]
    fn test_phase_rejects_bad_date() {
        assert!(phase(Some("31/31/2024".to_string()), None).is_err());
        let plan = phase(Some("2024-05-01".to_string()), Some(" ".to_string())).unwrap();
        assert!(plan.target_date.is_some());
        assert!(plan.remark.is_none());
    }

    #[test]
    fn test_content_type() {
        assert_eq!(content_type(Path::new("shot.PNG")), "image/png");
        assert_eq!(content_type(Path::new("notes")), "application/octet-stream");
    }
}
