//! Grievance Client Wire Normalization
//!
//! Maps the server's response shapes into the canonical domain types. The
//! request fetch endpoint answers with PascalCase rows whose status and
//! priority may arrive as a name, an id, or both; users and mails arrive in
//! camelCase with loosely typed fields. Everything is checked here once so
//! the rest of the crate only ever sees well-formed values.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use grievance_common::utils::{parse_addresses, parse_date, parse_timestamp};
use grievance_common::{
    Attachment, AttachmentId, Company, CompanyId, GrievanceError, Mail, MailId, PhasePlan,
    Priority, PriorityLevel, Request, RequestId, RequestStatus, RequestType, RequestTypeInfo,
    Result, Status, User, UserId, UserRef, UserRole,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

// =============================================================================
// Envelopes
// =============================================================================

/// Response of `/api/request-fetch/fetch`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FetchRequestsEnvelope {
    pub success: bool,
    pub requests: Vec<Value>,
    pub message: Option<String>,
}

/// Response of the login and register endpoints.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AuthEnvelope {
    pub success: bool,
    pub access_token: Option<String>,
    pub user: Option<Value>,
    pub message: Option<String>,
}

/// `{ id, name }` pair used by the master-data endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct IdName {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PriorityListEnvelope {
    pub success: bool,
    pub priorities: Option<Vec<IdName>>,
    pub message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RequestTypeListEnvelope {
    pub success: bool,
    pub request_types: Option<Vec<IdName>>,
    pub message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UsersEnvelope {
    pub users: Vec<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MailsEnvelope {
    pub mails: Vec<Value>,
}

/// Body of a mutation response. Missing `success` counts as success.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ActionEnvelope {
    pub success: Option<bool>,
    pub message: Option<String>,
}

// =============================================================================
// Loose Field Types
// =============================================================================

/// A user reference the server sends either as an id or as a display name.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum IdOrName {
    Id(u64),
    Name(String),
}

/// Address lists arrive joined (`"a, b"`) or as arrays.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum AddressField {
    Joined(String),
    List(Vec<String>),
}

impl AddressField {
    fn into_vec(self) -> Vec<String> {
        match self {
            AddressField::Joined(raw) => parse_addresses(&raw),
            AddressField::List(items) => items
                .iter()
                .flat_map(|item| parse_addresses(item))
                .collect(),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn timestamp(field: &str, raw: Option<String>) -> Result<Option<DateTime<Utc>>> {
    match non_empty(raw) {
        None => Ok(None),
        Some(raw) => parse_timestamp(&raw)
            .map(Some)
            .ok_or_else(|| GrievanceError::Validation(format!("{} is not a timestamp: {}", field, raw))),
    }
}

/// Lenient variant for optional display-only timestamps.
fn optional_timestamp(field: &str, raw: Option<String>) -> Option<DateTime<Utc>> {
    match timestamp(field, raw) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "ignoring unparsable timestamp");
            None
        }
    }
}

fn user_ref(
    reference: Option<IdOrName>,
    explicit_id: Option<u64>,
    name: Option<String>,
    email: Option<String>,
) -> Option<UserRef> {
    let (id, fallback_name) = match reference {
        Some(IdOrName::Id(id)) => (Some(id), None),
        Some(IdOrName::Name(name)) => (None, non_empty(Some(name))),
        None => (None, None),
    };
    let user_id = explicit_id.or(id);
    let user_name = non_empty(name).or(fallback_name);

    if user_id.is_none() && user_name.is_none() {
        return None;
    }

    Some(UserRef {
        user_id: UserId(user_id.unwrap_or(0)),
        user_name: user_name.unwrap_or_else(|| user_id.unwrap_or(0).to_string()),
        email: non_empty(email),
    })
}

// =============================================================================
// Requests
// =============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct WireRequest {
    #[serde(alias = "requestId")]
    request_id: Option<u64>,
    #[serde(alias = "subject")]
    subject: Option<String>,
    #[serde(alias = "message")]
    message: Option<String>,
    #[serde(alias = "requestType")]
    request_type: Option<String>,
    #[serde(alias = "requestTypeId")]
    request_type_id: Option<u32>,
    remark: Option<String>,
    priority_id: Option<u32>,
    priority: Option<Value>,
    priority_name: Option<String>,
    status_id: Option<u32>,
    status: Option<Value>,
    status_name: Option<String>,
    created_by: Option<IdOrName>,
    created_by_id: Option<u64>,
    created_by_name: Option<String>,
    created_by_email: Option<String>,
    #[serde(alias = "createdOn")]
    created_on: Option<String>,
    updated_by: Option<IdOrName>,
    updated_on: Option<String>,
    assigned_to: Option<IdOrName>,
    assigned_to_id: Option<u64>,
    assigned_to_name: Option<String>,
    assigned_to_email: Option<String>,
    assigned_on: Option<String>,
    dev_target_date: Option<String>,
    dev_remark: Option<String>,
    uat_target_date: Option<String>,
    uat_remark: Option<String>,
    live_target_date: Option<String>,
    live_remark: Option<String>,
    attachments: Option<Vec<Value>>,
    #[serde(alias = "mailCount")]
    mail_count: Option<u32>,
    last_activity: Option<String>,
}

/// Name carried by a status/priority field that may be a string, an id or an object.
fn reference_name(value: &Option<Value>, name_keys: &[&str]) -> Option<String> {
    match value {
        Some(Value::String(name)) => non_empty(Some(name.clone())),
        Some(Value::Object(map)) => name_keys
            .iter()
            .find_map(|k| map.get(*k).and_then(Value::as_str))
            .and_then(|s| non_empty(Some(s.to_string()))),
        _ => None,
    }
}

fn reference_id(value: &Option<Value>, id_keys: &[&str]) -> Option<u32> {
    match value {
        Some(Value::Number(n)) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Some(Value::Object(map)) => id_keys
            .iter()
            .find_map(|k| map.get(*k).and_then(Value::as_u64))
            .and_then(|n| u32::try_from(n).ok()),
        _ => None,
    }
}

fn resolve_status(wire: &WireRequest) -> Result<Status> {
    let name = non_empty(wire.status_name.clone())
        .or_else(|| reference_name(&wire.status, &["statusName", "StatusName"]));
    let id = wire
        .status_id
        .or_else(|| reference_id(&wire.status, &["statusId", "StatusId"]));

    let status = match name.as_deref().map(str::parse::<RequestStatus>) {
        Some(Ok(status)) => status,
        _ => id.and_then(RequestStatus::from_default_id).ok_or_else(|| {
            GrievanceError::Validation(format!(
                "unresolvable status (name: {:?}, id: {:?})",
                name, id
            ))
        })?,
    };

    Ok(Status {
        status_id: id.unwrap_or_else(|| status.default_id()),
        status_name: status,
        is_active: true,
    })
}

fn resolve_priority(wire: &WireRequest) -> Result<Priority> {
    let name = non_empty(wire.priority_name.clone())
        .or_else(|| reference_name(&wire.priority, &["priorityName", "PriorityName"]));
    let id = wire
        .priority_id
        .or_else(|| reference_id(&wire.priority, &["priorityId", "PriorityId"]));

    let level = match name.as_deref().map(str::parse::<PriorityLevel>) {
        Some(Ok(level)) => level,
        _ => id.and_then(PriorityLevel::from_default_id).ok_or_else(|| {
            GrievanceError::Validation(format!(
                "unresolvable priority (name: {:?}, id: {:?})",
                name, id
            ))
        })?,
    };

    Ok(Priority {
        priority_id: id.unwrap_or_else(|| level.default_id()),
        priority_name: level,
        is_active: true,
    })
}

fn phase(target: Option<String>, remark: Option<String>) -> PhasePlan {
    PhasePlan {
        target_date: non_empty(target).and_then(|raw| parse_date(&raw)),
        remark: non_empty(remark),
    }
}

/// Convert one fetched request row.
pub fn request_from_value(value: Value) -> Result<Request> {
    let wire: WireRequest = serde_json::from_value(value)?;

    let request_id = wire
        .request_id
        .ok_or_else(|| GrievanceError::Validation("request row without RequestId".to_string()))?;
    let status = resolve_status(&wire)?;
    let priority = resolve_priority(&wire)?;
    let created_on = timestamp("CreatedOn", wire.created_on.clone())?.ok_or_else(|| {
        GrievanceError::Validation(format!("request {} has no CreatedOn", request_id))
    })?;

    let created_by = user_ref(
        wire.created_by,
        wire.created_by_id,
        wire.created_by_name,
        wire.created_by_email,
    )
    .unwrap_or(UserRef {
        user_id: UserId(0),
        user_name: "Unknown".to_string(),
        email: None,
    });

    let updated_by = match wire.updated_by {
        Some(IdOrName::Id(id)) => Some(id.to_string()),
        Some(IdOrName::Name(name)) => non_empty(Some(name)),
        None => None,
    };

    let attachments = wire
        .attachments
        .map(|rows| normalize_rows("attachment", rows, attachment_from_value))
        .unwrap_or_default();

    Ok(Request {
        request_id: RequestId(request_id),
        subject: wire.subject.unwrap_or_default(),
        message: wire.message.unwrap_or_default(),
        request_type: RequestType::from_name(&wire.request_type.unwrap_or_default()),
        request_type_id: wire.request_type_id,
        remark: non_empty(wire.remark),
        priority,
        status,
        created_by,
        created_on,
        updated_by,
        updated_on: optional_timestamp("UpdatedOn", wire.updated_on),
        assigned_to: user_ref(
            wire.assigned_to,
            wire.assigned_to_id,
            wire.assigned_to_name,
            wire.assigned_to_email,
        ),
        assigned_on: optional_timestamp("AssignedOn", wire.assigned_on),
        dev: phase(wire.dev_target_date, wire.dev_remark),
        uat: phase(wire.uat_target_date, wire.uat_remark),
        live: phase(wire.live_target_date, wire.live_remark),
        attachments,
        mail_count: wire.mail_count.unwrap_or(0),
        last_activity: optional_timestamp("LastActivity", wire.last_activity),
    })
}

pub fn requests_from_rows(rows: Vec<Value>) -> Vec<Request> {
    normalize_rows("request", rows, request_from_value)
}

// =============================================================================
// Attachments
// =============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct WireAttachment {
    #[serde(alias = "AttachmentId", alias = "id")]
    attachment_id: Option<u64>,
    #[serde(alias = "FileName")]
    file_name: Option<String>,
    #[serde(alias = "FilePath")]
    file_path: Option<String>,
    #[serde(alias = "FileSize")]
    file_size: Option<u64>,
    #[serde(alias = "ContentType", alias = "fileType")]
    content_type: Option<String>,
    #[serde(alias = "CreatedOn")]
    created_on: Option<String>,
}

pub fn attachment_from_value(value: Value) -> Result<Attachment> {
    let wire: WireAttachment = serde_json::from_value(value)?;
    let file_name = non_empty(wire.file_name)
        .ok_or_else(|| GrievanceError::Validation("attachment without file name".to_string()))?;

    Ok(Attachment {
        attachment_id: AttachmentId(wire.attachment_id.unwrap_or(0)),
        file_path: non_empty(wire.file_path).unwrap_or_else(|| file_name.clone()),
        file_name,
        file_size: wire.file_size,
        content_type: non_empty(wire.content_type),
        created_on: optional_timestamp("attachment createdOn", wire.created_on),
    })
}

// =============================================================================
// Users
// =============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct WireCompany {
    company_id: Option<u64>,
    company_name: Option<String>,
    company_email: Option<String>,
    address: Option<String>,
    mobile: Option<String>,
    is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct WireUser {
    #[serde(alias = "UserId", alias = "id")]
    user_id: Option<u64>,
    #[serde(alias = "UserName")]
    user_name: Option<String>,
    #[serde(alias = "Email")]
    email: Option<String>,
    mobile: Option<String>,
    #[serde(alias = "Role")]
    role: Option<String>,
    company_id: Option<u64>,
    company_name: Option<String>,
    company: Option<WireCompany>,
    is_active: Option<bool>,
}

fn role_from(raw: Option<String>) -> UserRole {
    match non_empty(raw) {
        None => UserRole::User,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            warn!(role = %raw, "unknown role, treating as User");
            UserRole::User
        }),
    }
}

/// Convert one user record (login response or directory row).
pub fn user_from_value(value: Value) -> Result<User> {
    let wire: WireUser = serde_json::from_value(value)?;

    let user_id = wire
        .user_id
        .ok_or_else(|| GrievanceError::Validation("user without userId".to_string()))?;
    let email = non_empty(wire.email)
        .ok_or_else(|| GrievanceError::Validation(format!("user {} has no email", user_id)))?;

    let company = wire.company.and_then(|c| {
        let company_name = non_empty(c.company_name)?;
        Some(Company {
            company_id: CompanyId(c.company_id.unwrap_or(0)),
            company_name,
            company_email: non_empty(c.company_email),
            address: non_empty(c.address),
            mobile: non_empty(c.mobile),
            is_active: c.is_active.unwrap_or(true),
        })
    });

    Ok(User {
        user_id: UserId(user_id),
        user_name: non_empty(wire.user_name).unwrap_or_else(|| email.clone()),
        email,
        mobile: non_empty(wire.mobile),
        role: role_from(wire.role),
        company_id: wire.company_id.map(CompanyId),
        company_name: non_empty(wire.company_name),
        company,
        is_active: wire.is_active.unwrap_or(true),
    })
}

pub fn users_from_rows(rows: Vec<Value>) -> Vec<User> {
    normalize_rows("user", rows, user_from_value)
}

// =============================================================================
// Mails
// =============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct WireMail {
    mail_id: Option<u64>,
    request_id: Option<u64>,
    parent_mail_id: Option<u64>,
    subject: Option<String>,
    body: Option<String>,
    from_address: Option<String>,
    to_addresses: Option<AddressField>,
    cc_addresses: Option<AddressField>,
    sent_on: Option<String>,
    is_read: Option<bool>,
    is_starred: Option<bool>,
    is_archived: Option<bool>,
    has_attachment: Option<bool>,
    attachments: Option<Vec<Value>>,
    created_by: Option<IdOrName>,
    created_by_user_name: Option<String>,
    created_by_email: Option<String>,
    created_by_role: Option<String>,
}

/// Convert one mail row.
pub fn mail_from_value(value: Value) -> Result<Mail> {
    let wire: WireMail = serde_json::from_value(value)?;

    let mail_id = wire
        .mail_id
        .ok_or_else(|| GrievanceError::Validation("mail without mailId".to_string()))?;
    let request_id = wire
        .request_id
        .ok_or_else(|| GrievanceError::Validation(format!("mail {} has no requestId", mail_id)))?;
    let sent_on = timestamp("sentOn", wire.sent_on)?
        .ok_or_else(|| GrievanceError::Validation(format!("mail {} has no sentOn", mail_id)))?;
    let from_address = non_empty(wire.from_address).unwrap_or_default();

    let attachments = wire
        .attachments
        .map(|rows| normalize_rows("attachment", rows, attachment_from_value))
        .unwrap_or_default();

    let created_by = user_ref(
        wire.created_by,
        None,
        wire.created_by_user_name,
        wire.created_by_email.or_else(|| Some(from_address.clone())),
    )
    .unwrap_or(UserRef {
        user_id: UserId(0),
        user_name: from_address.clone(),
        email: non_empty(Some(from_address.clone())),
    });

    Ok(Mail {
        mail_id: MailId(mail_id),
        request_id: RequestId(request_id),
        parent_mail_id: wire.parent_mail_id.filter(|id| *id != 0).map(MailId),
        subject: wire.subject.unwrap_or_default(),
        body: wire.body.unwrap_or_default(),
        from_address,
        to_addresses: wire.to_addresses.map(AddressField::into_vec).unwrap_or_default(),
        cc_addresses: wire.cc_addresses.map(AddressField::into_vec).unwrap_or_default(),
        sent_on,
        is_read: wire.is_read.unwrap_or(false),
        is_starred: wire.is_starred.unwrap_or(false),
        is_archived: wire.is_archived.unwrap_or(false),
        has_attachment: wire.has_attachment.unwrap_or(!attachments.is_empty()),
        attachments,
        created_by,
        created_by_role: role_from(wire.created_by_role),
    })
}

pub fn mails_from_rows(rows: Vec<Value>) -> Vec<Mail> {
    normalize_rows("mail", rows, mail_from_value)
}

// =============================================================================
// Reference Data
// =============================================================================

pub fn priorities_from_list(items: Vec<IdName>) -> Vec<Priority> {
    items
        .into_iter()
        .filter_map(|item| match item.name.parse::<PriorityLevel>() {
            Ok(level) => Some(Priority {
                priority_id: item.id,
                priority_name: level,
                is_active: true,
            }),
            Err(e) => {
                warn!(id = item.id, error = %e, "skipping priority");
                None
            }
        })
        .collect()
}

pub fn request_types_from_list(items: Vec<IdName>) -> Vec<RequestTypeInfo> {
    items
        .into_iter()
        .filter(|item| !item.name.trim().is_empty())
        .map(|item| RequestTypeInfo {
            id: item.id,
            name: item.name.trim().to_string(),
        })
        .collect()
}

// =============================================================================
// Helpers
// =============================================================================

/// Keep the rows that normalize, logging each rejected one.
fn normalize_rows<T>(kind: &str, rows: Vec<Value>, convert: impl Fn(Value) -> Result<T>) -> Vec<T> {
    rows.into_iter()
        .enumerate()
        .filter_map(|(index, row)| match convert(row) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(kind, index, error = %e, "skipping invalid row");
                None
            }
        })
        .collect()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request_row() -> Value {
        json!({
            "RequestId": 7,
            "Subject": "Login page broken",
            "Message": "Cannot sign in since the update",
            "RequestType": "System Bug",
            "RequestTypeId": 3,
            "Remark": "",
            "PriorityId": 1,
            "Priority": "High",
            "StatusId": 2,
            "Status": "Active",
            "CreatedBy": "john_doe",
            "CreatedById": 2,
            "CreatedByEmail": "john@company.com",
            "CreatedOn": "2024-01-15T10:30:00Z",
            "AssignedTo": 1,
            "AssignedToName": "admin",
            "DevTargetDate": "2024-02-01",
            "DevRemark": "Patch auth flow",
            "UatTargetDate": "",
            "mailCount": 3
        })
    }

    #[test]
    fn test_request_row_normalizes() {
        let request = request_from_value(request_row()).unwrap();
        assert_eq!(request.request_id, RequestId(7));
        assert_eq!(request.request_type, RequestType::SystemBug);
        assert_eq!(request.status_name(), RequestStatus::Active);
        assert_eq!(request.status.status_id, 2);
        assert_eq!(request.priority_level(), PriorityLevel::High);
        assert_eq!(request.remark, None);
        assert_eq!(request.created_by.user_id, UserId(2));
        assert_eq!(request.created_by.user_name, "john_doe");
        assert_eq!(request.created_by.email.as_deref(), Some("john@company.com"));
        let assignee = request.assigned_to.unwrap();
        assert_eq!(assignee.user_id, UserId(1));
        assert_eq!(assignee.user_name, "admin");
        assert!(request.dev.target_date.is_some());
        assert_eq!(request.dev.remark.as_deref(), Some("Patch auth flow"));
        assert!(request.uat.is_empty());
        assert_eq!(request.mail_count, 3);
    }

    #[test]
    fn test_status_resolution_order() {
        let mut row = request_row();
        row["StatusName"] = json!("Closed");
        let request = request_from_value(row).unwrap();
        assert_eq!(request.status_name(), RequestStatus::Closed);

        let mut row = request_row();
        row.as_object_mut().unwrap().remove("Status");
        row["StatusId"] = json!(5);
        let request = request_from_value(row).unwrap();
        assert_eq!(request.status_name(), RequestStatus::Uat);

        let mut row = request_row();
        row["Status"] = json!({"statusId": 6, "statusName": "Live"});
        row.as_object_mut().unwrap().remove("StatusId");
        let request = request_from_value(row).unwrap();
        assert_eq!(request.status_name(), RequestStatus::Live);
        assert_eq!(request.status.status_id, 6);
    }

    #[test]
    fn test_priority_from_id_only() {
        let mut row = request_row();
        row.as_object_mut().unwrap().remove("Priority");
        row["PriorityId"] = json!(3);
        let request = request_from_value(row).unwrap();
        assert_eq!(request.priority_level(), PriorityLevel::Low);
    }

    #[test]
    fn test_missing_fields_default() {
        let row = json!({
            "RequestId": 1,
            "Subject": "s",
            "Message": "m",
            "RequestType": "Data Change",
            "Status": "Pending",
            "Priority": "Low",
            "CreatedBy": 2,
            "CreatedOn": "2024-01-15 08:00:00"
        });
        let request = request_from_value(row).unwrap();
        assert_eq!(request.mail_count, 0);
        assert!(request.attachments.is_empty());
        assert!(request.assigned_to.is_none());
        assert_eq!(request.created_by.user_id, UserId(2));
    }

    #[test]
    fn test_invalid_rows_are_skipped() {
        let mut no_created = request_row();
        no_created.as_object_mut().unwrap().remove("CreatedOn");

        let mut bad_status = request_row();
        bad_status["Status"] = json!("Frozen");
        bad_status.as_object_mut().unwrap().remove("StatusId");

        let rows = vec![request_row(), no_created, bad_status, json!("garbage")];
        let requests = requests_from_rows(rows);
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].request_id, RequestId(7));
    }

    #[test]
    fn test_user_normalizes() {
        let user = user_from_value(json!({
            "userId": 2,
            "userName": "john_doe",
            "email": "john@company.com",
            "role": "User",
            "companyName": "Tech Corp",
            "mobile": ""
        }))
        .unwrap();
        assert_eq!(user.user_id, UserId(2));
        assert!(user.is_customer());
        assert_eq!(user.mobile, None);
        assert!(user.is_active);
        assert_eq!(user.company_label(), Some("Tech Corp"));

        let admin = user_from_value(json!({"userId": 1, "email": "a@x", "role": "admin"})).unwrap();
        assert!(admin.is_admin());
        assert_eq!(admin.user_name, "a@x");

        assert!(user_from_value(json!({"userName": "ghost"})).is_err());
    }

    #[test]
    fn test_mail_normalizes() {
        let mail = mail_from_value(json!({
            "mailId": 11,
            "requestId": 7,
            "parentMailId": 10,
            "subject": "Re: Login page broken",
            "body": "Working on it",
            "fromAddress": "admin@elogisol.com",
            "toAddresses": "john@company.com, ",
            "ccAddresses": ["ops@elogisol.com"],
            "sentOn": "2024-01-16T09:00:00Z",
            "isStarred": true,
            "createdBy": 1,
            "createdByUserName": "admin",
            "createdByRole": "Admin"
        }))
        .unwrap();
        assert_eq!(mail.parent_mail_id, Some(MailId(10)));
        assert_eq!(mail.to_addresses, vec!["john@company.com".to_string()]);
        assert_eq!(mail.cc_addresses, vec!["ops@elogisol.com".to_string()]);
        assert!(mail.is_starred);
        assert!(!mail.is_read);
        assert!(!mail.has_attachment);
        assert_eq!(mail.created_by.user_name, "admin");
        assert_eq!(mail.created_by.email.as_deref(), Some("admin@elogisol.com"));
        assert_eq!(mail.created_by_role, UserRole::Admin);
    }

    #[test]
    fn test_mail_without_sent_on_is_rejected() {
        let result = mail_from_value(json!({"mailId": 1, "requestId": 1, "subject": "x"}));
        assert!(matches!(result, Err(GrievanceError::Validation(_))));
    }

    #[test]
    fn test_priority_list() {
        let priorities = priorities_from_list(vec![
            IdName { id: 4, name: "High".to_string() },
            IdName { id: 5, name: "Urgent".to_string() },
        ]);
        assert_eq!(priorities.len(), 1);
        assert_eq!(priorities[0].priority_id, 4);
    }
}
