//! Grievance Client Payloads
//!
//! Bodies of the mutating API calls, serialized exactly as the server expects
//! them, plus the local validation each one gets before it is sent.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use data_encoding::BASE64;
use grievance_common::utils::join_addresses;
use grievance_common::{GrievanceError, MailId, PhasePlan, RequestId, Result, UserId};
use serde::Serialize;

// =============================================================================
// Authentication
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Self-registration form. The role is always `User`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub user_name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    pub company_name: String,
    role: &'static str,
}

impl Registration {
    pub fn new(
        user_name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        company_name: impl Into<String>,
    ) -> Self {
        Self {
            user_name: user_name.into(),
            email: email.into(),
            password: password.into(),
            mobile: None,
            company_name: company_name.into(),
            role: "User",
        }
    }

    pub fn with_mobile(mut self, mobile: impl Into<String>) -> Self {
        let mobile = mobile.into();
        self.mobile = if mobile.trim().is_empty() { None } else { Some(mobile) };
        self
    }

    pub fn validate(&self) -> Result<()> {
        require("user name", &self.user_name)?;
        require("email", &self.email)?;
        require("password", &self.password)?;
        require("company name", &self.company_name)?;
        if !self.email.contains('@') {
            return Err(GrievanceError::Validation(format!("invalid email: {}", self.email)));
        }
        Ok(())
    }
}

// =============================================================================
// Attachments
// =============================================================================

/// A file the caller already holds, encoded for upload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentUpload {
    pub file_name: String,
    pub file_type: String,
    pub file_size: u64,
    pub base64: String,
}

impl AttachmentUpload {
    pub fn from_bytes(file_name: impl Into<String>, file_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            file_name: file_name.into(),
            file_type: file_type.into(),
            file_size: bytes.len() as u64,
            base64: BASE64.encode(bytes),
        }
    }

    /// Decode the payload back into bytes.
    pub fn decode(&self) -> Result<Vec<u8>> {
        BASE64
            .decode(self.base64.as_bytes())
            .map_err(|e| GrievanceError::Validation(format!("invalid attachment encoding: {}", e)))
    }
}

// =============================================================================
// Requests
// =============================================================================

/// A request being created.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRequest {
    pub subject: String,
    pub message: String,
    pub request_type: String,
    pub request_type_id: Option<u32>,
    pub priority_id: u32,
    pub user_id: Option<UserId>,
    pub attachments: Vec<AttachmentUpload>,
}

impl NewRequest {
    pub fn new(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            message: message.into(),
            request_type: String::new(),
            request_type_id: None,
            priority_id: 0,
            user_id: None,
            attachments: Vec::new(),
        }
    }

    pub fn with_request_type(mut self, name: impl Into<String>, id: Option<u32>) -> Self {
        self.request_type = name.into();
        self.request_type_id = id;
        self
    }

    pub fn with_priority(mut self, priority_id: u32) -> Self {
        self.priority_id = priority_id;
        self
    }

    pub fn with_user(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn with_attachment(mut self, attachment: AttachmentUpload) -> Self {
        self.attachments.push(attachment);
        self
    }

    pub fn validate(&self) -> Result<()> {
        require("subject", &self.subject)?;
        require("message", &self.message)?;
        require("request type", &self.request_type)?;
        if self.priority_id == 0 {
            return Err(GrievanceError::Validation("priority is required".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub request_id: RequestId,
    pub status_id: u32,
    pub remark: Option<String>,
}

/// Assignee plus the per-phase plan of a request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assignment {
    pub assigned_to: Option<UserId>,
    pub dev: PhasePlan,
    pub uat: PhasePlan,
    pub live: PhasePlan,
}

impl Assignment {
    pub fn to(user_id: UserId) -> Self {
        Self {
            assigned_to: Some(user_id),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self.assigned_to {
            Some(UserId(id)) if id != 0 => Ok(()),
            _ => Err(GrievanceError::Validation("an assignee is required".to_string())),
        }
    }
}

/// Wire form of an assignment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentBody {
    pub request_id: RequestId,
    pub assigned_to: UserId,
    pub dev_target_date: Option<String>,
    pub dev_remark: Option<String>,
    pub uat_target_date: Option<String>,
    pub uat_remark: Option<String>,
    pub live_target_date: Option<String>,
    pub live_remark: Option<String>,
}

impl AssignmentBody {
    pub fn new(request_id: RequestId, assignment: &Assignment) -> Result<Self> {
        assignment.validate()?;
        let date = |plan: &PhasePlan| plan.target_date.map(|d| d.format("%Y-%m-%d").to_string());

        Ok(Self {
            request_id,
            assigned_to: assignment.assigned_to.unwrap_or(UserId(0)),
            dev_target_date: date(&assignment.dev),
            dev_remark: assignment.dev.remark.clone(),
            uat_target_date: date(&assignment.uat),
            uat_remark: assignment.uat.remark.clone(),
            live_target_date: date(&assignment.live),
            live_remark: assignment.live.remark.clone(),
        })
    }
}

// =============================================================================
// Mails
// =============================================================================

/// A mail ready to be sent.
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingMail {
    pub request_id: RequestId,
    pub parent_mail_id: Option<MailId>,
    pub from_address: String,
    pub created_by: UserId,
    pub to: Vec<String>,
    pub cc: Vec<String>,
    pub bcc: Vec<String>,
    pub subject: String,
    pub body: String,
    pub attachments: Vec<AttachmentUpload>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingMailBody {
    pub request_id: RequestId,
    pub parent_mail_id: Option<MailId>,
    pub from_address: String,
    pub created_by: UserId,
    pub to_addresses: String,
    pub cc_addresses: String,
    pub bcc_addresses: String,
    pub subject: String,
    pub body: String,
    pub attachments: Vec<AttachmentUpload>,
}

impl From<&OutgoingMail> for OutgoingMailBody {
    fn from(mail: &OutgoingMail) -> Self {
        Self {
            request_id: mail.request_id,
            parent_mail_id: mail.parent_mail_id,
            from_address: mail.from_address.clone(),
            created_by: mail.created_by,
            to_addresses: join_addresses(&mail.to),
            cc_addresses: join_addresses(&mail.cc),
            bcc_addresses: join_addresses(&mail.bcc),
            subject: mail.subject.clone(),
            body: mail.body.clone(),
            attachments: mail.attachments.clone(),
        }
    }
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(GrievanceError::Validation(format!("{} is required", field)))
    } else {
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
