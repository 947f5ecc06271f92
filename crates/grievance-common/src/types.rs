//! Grievance Types - Core Domain Types
//!
//! The canonical shapes of everything the console works with: users and their
//! companies, the priority/status reference data, requests, mails and their
//! attachments. There is exactly one shape per entity; the server's wire
//! formats are mapped into these by the client's normalization layer.
//!
//! Key Features:
//! - Type-safe identifiers (UserId, RequestId, MailId, ...)
//! - Closed enumerations for roles, priorities and statuses
//! - Request type with a preserving fallback for unknown names
//! - Serialization support via serde (camelCase)
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use crate::error::GrievanceError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Identifier Types
// =============================================================================

/// Unique identifier for users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

/// Unique identifier for companies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompanyId(pub u64);

/// Unique identifier for requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub u64);

/// Unique identifier for mails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MailId(pub u64);

/// Unique identifier for attachments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttachmentId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::Display for MailId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

// =============================================================================
// Users
// =============================================================================

/// Role discriminator deciding which requests and actions a viewer sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum UserRole {
    Admin,
    #[default]
    User,
    Support,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "Admin",
            UserRole::User => "User",
            UserRole::Support => "Support",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = GrievanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(UserRole::Admin),
            "user" | "customer" => Ok(UserRole::User),
            "support" => Ok(UserRole::Support),
            other => Err(GrievanceError::Validation(format!("unknown user role: {}", other))),
        }
    }
}

/// Organizational affiliation of a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub company_id: CompanyId,
    pub company_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// A console user (customer, administrator or support staff).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: UserId,
    pub user_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_id: Option<CompanyId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<Company>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Customers only ever see their own requests.
    pub fn is_customer(&self) -> bool {
        self.role == UserRole::User
    }

    /// Company display name from either the flat field or the nested record.
    pub fn company_label(&self) -> Option<&str> {
        self.company_name
            .as_deref()
            .or_else(|| self.company.as_ref().map(|c| c.company_name.as_str()))
    }

    /// Lightweight reference to this user.
    pub fn to_ref(&self) -> UserRef {
        UserRef {
            user_id: self.user_id,
            user_name: self.user_name.clone(),
            email: Some(self.email.clone()),
        }
    }
}

/// A denormalized reference to a user embedded in another record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRef {
    pub user_id: UserId,
    pub user_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

// =============================================================================
// Reference Data
// =============================================================================

/// Severity level of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PriorityLevel {
    High,
    Medium,
    Low,
}

impl PriorityLevel {
    pub const ALL: [PriorityLevel; 3] = [PriorityLevel::High, PriorityLevel::Medium, PriorityLevel::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            PriorityLevel::High => "High",
            PriorityLevel::Medium => "Medium",
            PriorityLevel::Low => "Low",
        }
    }

    /// Id used by the server's default priority table.
    pub fn default_id(&self) -> u32 {
        match self {
            PriorityLevel::High => 1,
            PriorityLevel::Medium => 2,
            PriorityLevel::Low => 3,
        }
    }

    pub fn from_default_id(id: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.default_id() == id)
    }
}

impl fmt::Display for PriorityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PriorityLevel {
    type Err = GrievanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(PriorityLevel::High),
            "medium" => Ok(PriorityLevel::Medium),
            "low" => Ok(PriorityLevel::Low),
            other => Err(GrievanceError::Validation(format!("unknown priority: {}", other))),
        }
    }
}

/// Priority reference record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Priority {
    pub priority_id: u32,
    pub priority_name: PriorityLevel,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Priority {
    pub fn new(level: PriorityLevel) -> Self {
        Self {
            priority_id: level.default_id(),
            priority_name: level,
            is_active: true,
        }
    }

    /// Built-in priority table.
    pub fn defaults() -> Vec<Priority> {
        PriorityLevel::ALL.into_iter().map(Priority::new).collect()
    }
}

/// Lifecycle stage of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestStatus {
    Pending,
    Active,
    Dev,
    Stag,
    Uat,
    Live,
    Closed,
}

impl RequestStatus {
    pub const ALL: [RequestStatus; 7] = [
        RequestStatus::Pending,
        RequestStatus::Active,
        RequestStatus::Dev,
        RequestStatus::Stag,
        RequestStatus::Uat,
        RequestStatus::Live,
        RequestStatus::Closed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "Pending",
            RequestStatus::Active => "Active",
            RequestStatus::Dev => "Dev",
            RequestStatus::Stag => "Stag",
            RequestStatus::Uat => "Uat",
            RequestStatus::Live => "Live",
            RequestStatus::Closed => "Closed",
        }
    }

    /// Long label used in the status flow view.
    pub fn label(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "Pending",
            RequestStatus::Active => "Active",
            RequestStatus::Dev => "Development",
            RequestStatus::Stag => "Staging",
            RequestStatus::Uat => "UAT",
            RequestStatus::Live => "Live",
            RequestStatus::Closed => "Closed",
        }
    }

    pub fn default_id(&self) -> u32 {
        match self {
            RequestStatus::Pending => 1,
            RequestStatus::Active => 2,
            RequestStatus::Dev => 3,
            RequestStatus::Stag => 4,
            RequestStatus::Uat => 5,
            RequestStatus::Live => 6,
            RequestStatus::Closed => 7,
        }
    }

    pub fn from_default_id(id: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.default_id() == id)
    }

    /// Statuses a customer sees as "in progress".
    pub fn is_in_progress(&self) -> bool {
        matches!(
            self,
            RequestStatus::Active | RequestStatus::Dev | RequestStatus::Stag | RequestStatus::Uat
        )
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = GrievanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(RequestStatus::Pending),
            "active" => Ok(RequestStatus::Active),
            "dev" | "development" => Ok(RequestStatus::Dev),
            "stag" | "staging" => Ok(RequestStatus::Stag),
            "uat" => Ok(RequestStatus::Uat),
            "live" => Ok(RequestStatus::Live),
            "closed" => Ok(RequestStatus::Closed),
            other => Err(GrievanceError::Validation(format!("unknown status: {}", other))),
        }
    }
}

/// Status reference record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    pub status_id: u32,
    pub status_name: RequestStatus,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Status {
    pub fn new(status: RequestStatus) -> Self {
        Self {
            status_id: status.default_id(),
            status_name: status,
            is_active: true,
        }
    }

    /// Built-in status table.
    pub fn defaults() -> Vec<Status> {
        RequestStatus::ALL.into_iter().map(Status::new).collect()
    }
}

/// Kind of work a request asks for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RequestType {
    NewDevelopment,
    DataChange,
    SystemBug,
    Other(String),
}

impl RequestType {
    pub const KNOWN: [RequestType; 3] = [
        RequestType::NewDevelopment,
        RequestType::DataChange,
        RequestType::SystemBug,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            RequestType::NewDevelopment => "New Development",
            RequestType::DataChange => "Data Change",
            RequestType::SystemBug => "System Bug",
            RequestType::Other(name) => name,
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name.trim() {
            "New Development" => RequestType::NewDevelopment,
            "Data Change" => RequestType::DataChange,
            "System Bug" => RequestType::SystemBug,
            other => RequestType::Other(other.to_string()),
        }
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for RequestType {
    fn from(name: String) -> Self {
        RequestType::from_name(&name)
    }
}

impl From<RequestType> for String {
    fn from(kind: RequestType) -> Self {
        kind.as_str().to_string()
    }
}

/// Request type entry served by the reference-data endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestTypeInfo {
    pub id: u32,
    pub name: String,
}

impl RequestTypeInfo {
    pub fn kind(&self) -> RequestType {
        RequestType::from_name(&self.name)
    }
}

// =============================================================================
// Attachments
// =============================================================================

/// File metadata. Embedded in exactly one owning request or mail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub attachment_id: AttachmentId,
    pub file_name: String,
    pub file_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_on: Option<DateTime<Utc>>,
}

// =============================================================================
// Requests
// =============================================================================

/// Planned completion of one resolution phase.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhasePlan {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

impl PhasePlan {
    pub fn is_empty(&self) -> bool {
        self.target_date.is_none() && self.remark.is_none()
    }
}

/// A customer-submitted grievance tracked through its lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub request_id: RequestId,
    pub subject: String,
    pub message: String,
    pub request_type: RequestType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_type_id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    pub priority: Priority,
    pub status: Status,
    pub created_by: UserRef,
    pub created_on: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_on: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<UserRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_on: Option<DateTime<Utc>>,
    #[serde(default)]
    pub dev: PhasePlan,
    #[serde(default)]
    pub uat: PhasePlan,
    #[serde(default)]
    pub live: PhasePlan,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub mail_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_activity: Option<DateTime<Utc>>,
}

impl Request {
    pub fn status_name(&self) -> RequestStatus {
        self.status.status_name
    }

    pub fn priority_level(&self) -> PriorityLevel {
        self.priority.priority_name
    }

    pub fn is_assigned(&self) -> bool {
        self.assigned_to.is_some()
    }

    /// Phase plans in lifecycle order, with their labels.
    pub fn phases(&self) -> [(&'static str, &PhasePlan); 3] {
        [("Development", &self.dev), ("UAT", &self.uat), ("Live", &self.live)]
    }
}

// =============================================================================
// Mails
// =============================================================================

/// A message tied to one request, optionally replying to another mail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mail {
    pub mail_id: MailId,
    pub request_id: RequestId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_mail_id: Option<MailId>,
    pub subject: String,
    pub body: String,
    pub from_address: String,
    #[serde(default)]
    pub to_addresses: Vec<String>,
    #[serde(default)]
    pub cc_addresses: Vec<String>,
    pub sent_on: DateTime<Utc>,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub is_starred: bool,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub has_attachment: bool,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    pub created_by: UserRef,
    #[serde(default)]
    pub created_by_role: UserRole,
}

impl Mail {
    pub fn is_reply(&self) -> bool {
        self.parent_mail_id.is_some()
    }
}

fn default_true() -> bool {
    true
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing() {
        assert_eq!("Admin".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert_eq!("support".parse::<UserRole>().unwrap(), UserRole::Support);
        assert_eq!("Customer".parse::<UserRole>().unwrap(), UserRole::User);
        assert!("root".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_status_table() {
        let statuses = Status::defaults();
        assert_eq!(statuses.len(), 7);
        assert_eq!(statuses[0].status_name, RequestStatus::Pending);
        assert_eq!(statuses[6].status_id, 7);
        assert_eq!(RequestStatus::from_default_id(5), Some(RequestStatus::Uat));
        assert_eq!(RequestStatus::from_default_id(42), None);
        assert_eq!("Staging".parse::<RequestStatus>().unwrap(), RequestStatus::Stag);
    }

    #[test]
    fn test_in_progress_statuses() {
        assert!(RequestStatus::Dev.is_in_progress());
        assert!(RequestStatus::Uat.is_in_progress());
        assert!(!RequestStatus::Pending.is_in_progress());
        assert!(!RequestStatus::Live.is_in_progress());
        assert!(!RequestStatus::Closed.is_in_progress());
    }

    #[test]
    fn test_priority_table() {
        let priorities = Priority::defaults();
        assert_eq!(priorities.len(), 3);
        assert_eq!(PriorityLevel::from_default_id(1), Some(PriorityLevel::High));
        assert_eq!("low".parse::<PriorityLevel>().unwrap(), PriorityLevel::Low);
    }

    #[test]
    fn test_request_type_preserves_unknown_names() {
        assert_eq!(RequestType::from_name("System Bug"), RequestType::SystemBug);
        let other = RequestType::from_name("Training");
        assert_eq!(other, RequestType::Other("Training".to_string()));
        assert_eq!(other.as_str(), "Training");

        let json = serde_json::to_string(&RequestType::DataChange).unwrap();
        assert_eq!(json, "\"Data Change\"");
        let back: RequestType = serde_json::from_str("\"New Development\"").unwrap();
        assert_eq!(back, RequestType::NewDevelopment);
    }

    #[test]
    fn test_user_serializes_camel_case() {
        let user = User {
            user_id: UserId(2),
            user_name: "john_doe".to_string(),
            email: "john@company.com".to_string(),
            mobile: None,
            role: UserRole::User,
            company_id: None,
            company_name: None,
            company: Some(Company {
                company_id: CompanyId(1),
                company_name: "Tech Corp".to_string(),
                company_email: None,
                address: None,
                mobile: None,
                is_active: true,
            }),
            is_active: true,
        };

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["userId"], 2);
        assert_eq!(json["userName"], "john_doe");
        assert_eq!(json["role"], "User");
        assert_eq!(user.company_label(), Some("Tech Corp"));

        let back: User = serde_json::from_value(json).unwrap();
        assert_eq!(back, user);
    }
}
