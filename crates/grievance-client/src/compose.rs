//! Grievance Client Compose
//!
//! Mail drafts opened from the message thread: a fresh message on a request,
//! reply, reply-all and forward. Drafts are prefilled from their source and
//! validated before they become an `OutgoingMail`.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use crate::payload::{AttachmentUpload, OutgoingMail};
use grievance_common::utils::parse_addresses;
use grievance_common::{GrievanceError, Mail, MailId, Request, RequestId, Result, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeMode {
    Compose,
    Reply,
    ReplyAll,
    Forward,
}

impl ComposeMode {
    pub fn title(&self) -> &'static str {
        match self {
            ComposeMode::Compose => "New Message",
            ComposeMode::Reply => "Reply",
            ComposeMode::ReplyAll => "Reply All",
            ComposeMode::Forward => "Forward",
        }
    }
}

/// An editable mail draft.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposeDraft {
    pub mode: ComposeMode,
    pub request_id: Option<RequestId>,
    pub parent_mail_id: Option<MailId>,
    pub to: Vec<String>,
    pub cc: Vec<String>,
    pub bcc: Vec<String>,
    pub subject: String,
    /// Text the sender writes.
    pub body: String,
    /// Quoted source mail, appended below `body` when sent.
    pub quoted: String,
    pub attachments: Vec<AttachmentUpload>,
}

fn with_prefix(prefix: &str, subject: &str) -> String {
    if subject.starts_with(prefix) {
        subject.to_string()
    } else {
        format!("{} {}", prefix, subject)
    }
}

fn quoted(mail: &Mail) -> String {
    let quoted_lines: Vec<String> = mail.body.lines().map(|line| format!("> {}", line)).collect();
    format!(
        "\n\nOn {}, {} wrote:\n{}",
        mail.sent_on.format("%b %d, %Y %H:%M"),
        mail.from_address,
        quoted_lines.join("\n")
    )
}

impl ComposeDraft {
    /// Blank draft, optionally tied to a request.
    pub fn blank(request_id: Option<RequestId>) -> Self {
        Self {
            mode: ComposeMode::Compose,
            request_id,
            parent_mail_id: None,
            to: Vec::new(),
            cc: Vec::new(),
            bcc: Vec::new(),
            subject: String::new(),
            body: String::new(),
            quoted: String::new(),
            attachments: Vec::new(),
        }
    }

    /// New message on a request, addressed to its creator.
    pub fn for_request(request: &Request) -> Self {
        Self {
            subject: format!("Re: {}", request.subject),
            to: request.created_by.email.iter().cloned().collect(),
            ..Self::blank(Some(request.request_id))
        }
    }

    pub fn reply(mail: &Mail) -> Self {
        Self {
            mode: ComposeMode::Reply,
            parent_mail_id: Some(mail.mail_id),
            subject: with_prefix("Re:", &mail.subject),
            to: parse_addresses(&mail.from_address),
            quoted: quoted(mail),
            ..Self::blank(Some(mail.request_id))
        }
    }

    /// Reply to the sender and every recipient except the current user.
    pub fn reply_all(mail: &Mail, current_email: &str) -> Self {
        let mut recipients: Vec<String> = Vec::new();
        let candidates = std::iter::once(&mail.from_address)
            .chain(mail.to_addresses.iter())
            .chain(mail.cc_addresses.iter());
        for addr in candidates {
            let addr = addr.trim();
            if addr.is_empty() || addr.eq_ignore_ascii_case(current_email.trim()) {
                continue;
            }
            if !recipients.iter().any(|r| r.eq_ignore_ascii_case(addr)) {
                recipients.push(addr.to_string());
            }
        }

        Self {
            mode: ComposeMode::ReplyAll,
            to: recipients,
            ..Self::reply(mail)
        }
    }

    pub fn forward(mail: &Mail) -> Self {
        Self {
            mode: ComposeMode::Forward,
            parent_mail_id: Some(mail.mail_id),
            subject: with_prefix("Fwd:", &mail.subject),
            quoted: quoted(mail),
            attachments: Vec::new(),
            ..Self::blank(Some(mail.request_id))
        }
    }

    /// Replace the recipient lists from comma-separated form input.
    pub fn set_recipients(&mut self, to: &str, cc: &str, bcc: &str) {
        self.to = parse_addresses(to);
        self.cc = parse_addresses(cc);
        self.bcc = parse_addresses(bcc);
    }

    /// The body as sent: the written text followed by the quote.
    pub fn full_body(&self) -> String {
        format!("{}{}", self.body, self.quoted)
    }

    pub fn validate(&self) -> Result<()> {
        if self.request_id.is_none() {
            return Err(GrievanceError::Validation("a message must belong to a request".to_string()));
        }
        if self.to.is_empty() {
            return Err(GrievanceError::Validation("at least one recipient is required".to_string()));
        }
        if let Some(bad) = self
            .to
            .iter()
            .chain(self.cc.iter())
            .chain(self.bcc.iter())
            .find(|a| !a.contains('@'))
        {
            return Err(GrievanceError::Validation(format!("invalid address: {}", bad)));
        }
        if self.subject.trim().is_empty() {
            return Err(GrievanceError::Validation("subject is required".to_string()));
        }
        if self.body.trim().is_empty() {
            return Err(GrievanceError::Validation("message body is required".to_string()));
        }
        Ok(())
    }

    /// Validate and address the draft from `sender`.
    pub fn into_outgoing(self, sender: &User) -> Result<OutgoingMail> {
        self.validate()?;
        let request_id = self
            .request_id
            .ok_or_else(|| GrievanceError::Validation("a message must belong to a request".to_string()))?;

        let body = self.full_body();
        Ok(OutgoingMail {
            request_id,
            parent_mail_id: self.parent_mail_id,
            from_address: sender.email.clone(),
            created_by: sender.user_id,
            to: self.to,
            cc: self.cc,
            bcc: self.bcc,
            subject: self.subject.trim().to_string(),
            body,
            attachments: self.attachments,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use grievance_common::{UserId, UserRef, UserRole};

    fn mail(subject: &str) -> Mail {
        Mail {
            mail_id: MailId(5),
            request_id: RequestId(7),
            parent_mail_id: None,
            subject: subject.to_string(),
            body: "line one\nline two".to_string(),
            from_address: "john@company.com".to_string(),
            to_addresses: vec!["admin@elogisol.com".to_string(), "ops@elogisol.com".to_string()],
            cc_addresses: vec!["John@Company.com".to_string(), "qa@elogisol.com".to_string()],
            sent_on: Utc.with_ymd_and_hms(2024, 1, 16, 9, 0, 0).unwrap(),
            is_read: false,
            is_starred: false,
            is_archived: false,
            has_attachment: false,
            attachments: Vec::new(),
            created_by: UserRef {
                user_id: UserId(2),
                user_name: "john_doe".to_string(),
                email: Some("john@company.com".to_string()),
            },
            created_by_role: UserRole::User,
        }
    }

    fn admin() -> User {
        User {
            user_id: UserId(1),
            user_name: "admin".to_string(),
            email: "admin@elogisol.com".to_string(),
            mobile: None,
            role: UserRole::Admin,
            company_id: None,
            company_name: None,
            company: None,
            is_active: true,
        }
    }

    #[test]
    fn test_reply_prefix_only_once() {
        assert_eq!(ComposeDraft::reply(&mail("Login issue")).subject, "Re: Login issue");
        assert_eq!(ComposeDraft::reply(&mail("Re: Login issue")).subject, "Re: Login issue");
        assert_eq!(ComposeDraft::forward(&mail("Login issue")).subject, "Fwd: Login issue");
        assert_eq!(ComposeDraft::forward(&mail("Fwd: Login issue")).subject, "Fwd: Login issue");
    }

    #[test]
    fn test_reply_targets_sender_and_quotes() {
        let draft = ComposeDraft::reply(&mail("Login issue"));
        assert_eq!(draft.mode, ComposeMode::Reply);
        assert_eq!(draft.to, vec!["john@company.com".to_string()]);
        assert_eq!(draft.parent_mail_id, Some(MailId(5)));
        assert!(draft.body.is_empty());
        assert!(draft.quoted.contains("> line one\n> line two"));
    }

    #[test]
    fn test_reply_needs_written_text() {
        let mut draft = ComposeDraft::reply(&mail("Login issue"));
        assert!(matches!(draft.validate(), Err(GrievanceError::Validation(_))));

        draft.body = " \n ".to_string();
        assert!(draft.clone().into_outgoing(&admin()).is_err());

        draft.body = "On it.".to_string();
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_reply_all_excludes_self_and_dedupes() {
        let draft = ComposeDraft::reply_all(&mail("Login issue"), "admin@elogisol.com");
        assert_eq!(
            draft.to,
            vec![
                "john@company.com".to_string(),
                "ops@elogisol.com".to_string(),
                "qa@elogisol.com".to_string(),
            ]
        );
        assert_eq!(draft.mode, ComposeMode::ReplyAll);
    }

    #[test]
    fn test_forward_has_no_recipients() {
        let draft = ComposeDraft::forward(&mail("Login issue"));
        assert!(draft.to.is_empty());
        assert!(matches!(draft.validate(), Err(GrievanceError::Validation(_))));
    }

    #[test]
    fn test_validation() {
        let mut draft = ComposeDraft::blank(Some(RequestId(1)));
        draft.subject = "Hello".to_string();
        draft.body = "Body".to_string();
        assert!(draft.validate().is_err());

        draft.set_recipients("john@company.com", "", "");
        assert!(draft.validate().is_ok());

        draft.set_recipients("not-an-address", "", "");
        assert!(draft.validate().is_err());

        draft.set_recipients("john@company.com", "", "");
        draft.body = "  ".to_string();
        assert!(draft.validate().is_err());

        let mut orphan = ComposeDraft::blank(None);
        orphan.set_recipients("a@b.c", "", "");
        orphan.subject = "s".to_string();
        orphan.body = "b".to_string();
        assert!(orphan.validate().is_err());
    }

    #[test]
    fn test_into_outgoing() {
        let mut draft = ComposeDraft::reply(&mail("Login issue"));
        draft.body = "Fixed now.".to_string();
        let outgoing = draft.into_outgoing(&admin()).unwrap();
        assert!(outgoing.body.starts_with("Fixed now.\n\nOn Jan 16, 2024 09:00"));
        assert!(outgoing.body.ends_with("> line one\n> line two"));
        assert_eq!(outgoing.from_address, "admin@elogisol.com");
        assert_eq!(outgoing.created_by, UserId(1));
        assert_eq!(outgoing.request_id, RequestId(7));
        assert_eq!(outgoing.parent_mail_id, Some(MailId(5)));
    }
}
