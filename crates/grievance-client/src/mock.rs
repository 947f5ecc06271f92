//! Grievance Client Mock Server
//!
//! An in-memory implementation of the grievance API behind the transport
//! trait. It speaks the same wire shapes as the hosted server (PascalCase
//! request rows, camelCase users and mails), enforces bearer tokens, and
//! applies mutations, so it backs both the demo mode of the front-ends and
//! the test suite.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use crate::api::endpoints;
use crate::transport::{ApiRequest, ApiResponse, HttpTransport, Method};
use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use grievance_common::utils::{join_addresses, parse_addresses, parse_date};
use grievance_common::{
    Attachment, AttachmentId, Company, CompanyId, GrievanceError, Mail, MailId, PhasePlan,
    Priority, PriorityLevel, Request, RequestId, RequestStatus, RequestType, Result, Status,
    User, UserId, UserRole,
};
use parking_lot::RwLock;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

// =============================================================================
// Database
// =============================================================================

#[derive(Debug, Clone)]
struct Account {
    user: User,
    password: String,
}

#[derive(Debug, Default)]
struct MockDb {
    accounts: Vec<Account>,
    requests: Vec<Request>,
    mails: Vec<Mail>,
    tokens: HashMap<String, UserId>,
    next_request_id: u64,
    next_mail_id: u64,
    next_attachment_id: u64,
    next_token: u64,
    offline: bool,
    calls: usize,
}

/// In-memory grievance API. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    db: Arc<RwLock<MockDb>>,
}

impl MockTransport {
    /// An empty server with no accounts.
    pub fn new() -> Self {
        let transport = Self::default();
        {
            let mut db = transport.db.write();
            db.next_request_id = 1;
            db.next_mail_id = 1;
            db.next_attachment_id = 1;
        }
        transport
    }

    /// A server seeded with demo accounts, requests and mails.
    pub fn with_fixtures() -> Self {
        let transport = Self::new();
        seed(&mut transport.db.write(), Utc::now());
        transport
    }

    /// Simulate a network outage: every call fails at the transport level.
    pub fn set_offline(&self, offline: bool) {
        self.db.write().offline = offline;
    }

    pub fn call_count(&self) -> usize {
        self.db.read().calls
    }

    pub fn request_count(&self) -> usize {
        self.db.read().requests.len()
    }

    pub fn mail_count(&self) -> usize {
        self.db.read().mails.len()
    }

    pub fn request(&self, id: RequestId) -> Option<Request> {
        self.db.read().requests.iter().find(|r| r.request_id == id).cloned()
    }

    /// Add a login to the server.
    pub fn add_account(&self, user: User, password: &str) {
        self.db.write().accounts.push(Account {
            user,
            password: password.to_string(),
        });
    }
}

#[async_trait(?Send)]
impl HttpTransport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let mut db = self.db.write();
        db.calls += 1;
        if db.offline {
            return Err(GrievanceError::Transport(format!(
                "{} {}: connection refused",
                request.method, request.url
            )));
        }
        debug!(method = %request.method, path = %request.path, "mock api");
        Ok(db.route(&request))
    }
}

// =============================================================================
// Routing
// =============================================================================

fn reply(status: u16, body: Value) -> ApiResponse {
    ApiResponse::json_body(status, &body)
}

fn failure(status: u16, message: &str) -> ApiResponse {
    reply(status, json!({"success": false, "message": message}))
}

fn parse_body<T: for<'de> Deserialize<'de>>(request: &ApiRequest) -> std::result::Result<T, ApiResponse> {
    let body = request.body.clone().unwrap_or(Value::Null);
    serde_json::from_value(body).map_err(|e| failure(400, &format!("Invalid request body: {}", e)))
}

#[derive(Deserialize)]
struct LoginBody {
    email: String,
    password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegisterBody {
    user_name: String,
    email: String,
    password: String,
    mobile: Option<String>,
    company_name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FetchBody {
    user_id: Option<u64>,
    page: Option<usize>,
    page_size: Option<usize>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadBody {
    file_name: String,
    file_type: Option<String>,
    file_size: Option<u64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SaveBody {
    #[serde(default)]
    subject: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    request_type: String,
    request_type_id: Option<u32>,
    priority_id: Option<u32>,
    user_id: Option<u64>,
    #[serde(default)]
    attachments: Vec<UploadBody>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatusBody {
    request_id: u64,
    status_id: u32,
    remark: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssignBody {
    request_id: u64,
    assigned_to: u64,
    dev_target_date: Option<String>,
    dev_remark: Option<String>,
    uat_target_date: Option<String>,
    uat_remark: Option<String>,
    live_target_date: Option<String>,
    live_remark: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendBody {
    request_id: u64,
    parent_mail_id: Option<u64>,
    from_address: Option<String>,
    created_by: Option<u64>,
    #[serde(default)]
    to_addresses: String,
    #[serde(default)]
    cc_addresses: String,
    #[serde(default)]
    subject: String,
    #[serde(default)]
    body: String,
    #[serde(default)]
    attachments: Vec<UploadBody>,
}

impl MockDb {
    fn route(&mut self, request: &ApiRequest) -> ApiResponse {
        let path = request.path.as_str();
        let result = match (request.method, path) {
            (Method::Post, endpoints::LOGIN) => return self.login(request),
            (Method::Post, endpoints::REGISTER) => return self.register(request),
            _ => self.authorize(request),
        };
        let caller = match result {
            Ok(caller) => caller,
            Err(response) => return response,
        };

        let outcome = match (request.method, path) {
            (Method::Post, endpoints::FETCH_REQUESTS) => self.fetch_requests(request),
            (Method::Post, endpoints::SAVE_REQUEST) => self.save_request(request),
            (Method::Put, endpoints::REQUEST_STATUS) => self.update_status(request, &caller),
            (Method::Put, endpoints::REQUEST_ASSIGN) => self.assign(request, &caller),
            (Method::Get, endpoints::PRIORITY_LIST) => Ok(self.priority_list()),
            (Method::Get, endpoints::REQUEST_TYPE_LIST) => Ok(self.request_type_list()),
            (Method::Get, endpoints::USERS) => Ok(self.user_list()),
            (Method::Get, endpoints::MAILS) => Ok(self.mail_list(&caller)),
            (Method::Post, endpoints::SEND_MAIL) => self.send_mail(request, &caller),
            (method, path) => self.mail_action(method, path),
        };
        outcome.unwrap_or_else(|response| response)
    }

    fn authorize(&self, request: &ApiRequest) -> std::result::Result<User, ApiResponse> {
        request
            .bearer
            .as_ref()
            .and_then(|token| self.tokens.get(token))
            .and_then(|id| self.user(*id))
            .ok_or_else(|| failure(401, "Unauthorized"))
    }

    fn user(&self, id: UserId) -> Option<User> {
        self.accounts
            .iter()
            .find(|a| a.user.user_id == id)
            .map(|a| a.user.clone())
    }

    fn issue_token(&mut self, user: &User) -> String {
        self.next_token += 1;
        let token = format!("demo-{}-{}", user.user_id, self.next_token);
        self.tokens.insert(token.clone(), user.user_id);
        token
    }

    // -------------------------------------------------------------------------
    // Auth
    // -------------------------------------------------------------------------

    fn login(&mut self, request: &ApiRequest) -> ApiResponse {
        let body: LoginBody = match parse_body(request) {
            Ok(body) => body,
            Err(response) => return response,
        };
        let account = self
            .accounts
            .iter()
            .find(|a| a.user.email.eq_ignore_ascii_case(body.email.trim()) && a.password == body.password)
            .cloned();

        match account {
            Some(account) if account.user.is_active => {
                let token = self.issue_token(&account.user);
                reply(200, json!({
                    "success": true,
                    "accessToken": token,
                    "user": user_json(&account.user),
                }))
            }
            Some(_) => failure(403, "Account is disabled"),
            None => failure(401, "Invalid email or password"),
        }
    }

    fn register(&mut self, request: &ApiRequest) -> ApiResponse {
        let body: RegisterBody = match parse_body(request) {
            Ok(body) => body,
            Err(response) => return response,
        };
        if self
            .accounts
            .iter()
            .any(|a| a.user.email.eq_ignore_ascii_case(body.email.trim()))
        {
            return failure(409, "Email already registered");
        }

        let id = self.accounts.iter().map(|a| a.user.user_id.0).max().unwrap_or(0) + 1;
        let user = User {
            user_id: UserId(id),
            user_name: body.user_name,
            email: body.email.trim().to_string(),
            mobile: body.mobile,
            role: UserRole::User,
            company_id: Some(CompanyId(id)),
            company_name: None,
            company: Some(Company {
                company_id: CompanyId(id),
                company_name: body.company_name,
                company_email: None,
                address: None,
                mobile: None,
                is_active: true,
            }),
            is_active: true,
        };
        self.accounts.push(Account {
            user: user.clone(),
            password: body.password,
        });
        let token = self.issue_token(&user);
        reply(201, json!({
            "success": true,
            "message": "Registration successful",
            "accessToken": token,
            "user": user_json(&user),
        }))
    }

    // -------------------------------------------------------------------------
    // Requests
    // -------------------------------------------------------------------------

    fn fetch_requests(&self, request: &ApiRequest) -> std::result::Result<ApiResponse, ApiResponse> {
        let body: FetchBody = parse_body(request)?;
        let page = body.page.unwrap_or(1).max(1);
        let page_size = body.page_size.unwrap_or(10).max(1);

        let mut visible: Vec<&Request> = self
            .requests
            .iter()
            .filter(|r| body.user_id.map_or(true, |id| r.created_by.user_id.0 == id))
            .collect();
        visible.sort_by(|a, b| b.created_on.cmp(&a.created_on));

        let total = visible.len();
        let rows: Vec<Value> = visible
            .into_iter()
            .skip((page - 1) * page_size)
            .take(page_size)
            .map(|r| self.request_row(r))
            .collect();

        Ok(reply(200, json!({
            "success": true,
            "total": total,
            "page": page,
            "pageSize": page_size,
            "requests": rows,
        })))
    }

    fn request_row(&self, r: &Request) -> Value {
        let date = |d: &Option<NaiveDate>| d.map(|d| d.format("%Y-%m-%d").to_string());
        let stamp = |t: &Option<DateTime<Utc>>| t.map(|t| t.to_rfc3339());
        let mail_count = self.mails.iter().filter(|m| m.request_id == r.request_id).count();
        let last_activity = self
            .mails
            .iter()
            .filter(|m| m.request_id == r.request_id)
            .map(|m| m.sent_on)
            .max();

        json!({
            "RequestId": r.request_id,
            "Subject": r.subject,
            "Message": r.message,
            "RequestType": r.request_type.as_str(),
            "RequestTypeId": r.request_type_id,
            "Remark": r.remark,
            "PriorityId": r.priority.priority_id,
            "Priority": r.priority.priority_name.as_str(),
            "StatusId": r.status.status_id,
            "Status": r.status.status_name.as_str(),
            "CreatedBy": r.created_by.user_name,
            "CreatedById": r.created_by.user_id,
            "CreatedByEmail": r.created_by.email,
            "CreatedOn": r.created_on.to_rfc3339(),
            "UpdatedBy": r.updated_by,
            "UpdatedOn": stamp(&r.updated_on),
            "AssignedTo": r.assigned_to.as_ref().map(|u| u.user_id),
            "AssignedToName": r.assigned_to.as_ref().map(|u| u.user_name.clone()),
            "AssignedToEmail": r.assigned_to.as_ref().and_then(|u| u.email.clone()),
            "AssignedOn": stamp(&r.assigned_on),
            "DevTargetDate": date(&r.dev.target_date),
            "DevRemark": r.dev.remark,
            "UatTargetDate": date(&r.uat.target_date),
            "UatRemark": r.uat.remark,
            "LiveTargetDate": date(&r.live.target_date),
            "LiveRemark": r.live.remark,
            "Attachments": r.attachments.iter().map(attachment_json).collect::<Vec<_>>(),
            "mailCount": mail_count,
            "LastActivity": stamp(&last_activity.or(r.last_activity)),
        })
    }

    fn save_request(&mut self, request: &ApiRequest) -> std::result::Result<ApiResponse, ApiResponse> {
        let body: SaveBody = parse_body(request)?;
        if body.subject.trim().is_empty() || body.message.trim().is_empty() {
            return Ok(failure(200, "Subject and message are required"));
        }
        let creator = body
            .user_id
            .and_then(|id| self.user(UserId(id)))
            .ok_or_else(|| failure(400, "Unknown user"))?;
        let level = body
            .priority_id
            .and_then(PriorityLevel::from_default_id)
            .ok_or_else(|| failure(400, "Unknown priority"))?;

        let now = Utc::now();
        let attachments = self.store_uploads(body.attachments, now);
        let id = self.next_request_id;
        self.next_request_id += 1;

        self.requests.push(Request {
            request_id: RequestId(id),
            subject: body.subject.trim().to_string(),
            message: body.message,
            request_type: RequestType::from_name(&body.request_type),
            request_type_id: body.request_type_id,
            remark: None,
            priority: Priority::new(level),
            status: Status::new(RequestStatus::Pending),
            created_by: creator.to_ref(),
            created_on: now,
            updated_by: None,
            updated_on: None,
            assigned_to: None,
            assigned_on: None,
            dev: PhasePlan::default(),
            uat: PhasePlan::default(),
            live: PhasePlan::default(),
            attachments,
            mail_count: 0,
            last_activity: None,
        });

        Ok(reply(200, json!({
            "success": true,
            "message": "Request saved successfully",
            "requestId": id,
        })))
    }

    fn update_status(&mut self, request: &ApiRequest, caller: &User) -> std::result::Result<ApiResponse, ApiResponse> {
        let body: StatusBody = parse_body(request)?;
        let status = RequestStatus::from_default_id(body.status_id)
            .ok_or_else(|| failure(400, "Unknown status"))?;
        let target = self
            .requests
            .iter_mut()
            .find(|r| r.request_id.0 == body.request_id)
            .ok_or_else(|| failure(404, "Request not found"))?;

        target.status = Status::new(status);
        if let Some(remark) = body.remark.filter(|r| !r.trim().is_empty()) {
            target.remark = Some(remark);
        }
        target.updated_on = Some(Utc::now());
        target.updated_by = Some(caller.user_name.clone());

        Ok(reply(200, json!({"success": true, "message": "Status updated"})))
    }

    fn assign(&mut self, request: &ApiRequest, caller: &User) -> std::result::Result<ApiResponse, ApiResponse> {
        let body: AssignBody = parse_body(request)?;
        let assignee = self
            .user(UserId(body.assigned_to))
            .ok_or_else(|| failure(400, "Unknown assignee"))?;
        let target = self
            .requests
            .iter_mut()
            .find(|r| r.request_id.0 == body.request_id)
            .ok_or_else(|| failure(404, "Request not found"))?;

        let plan = |date: Option<String>, remark: Option<String>| PhasePlan {
            target_date: date.and_then(|d| parse_date(&d)),
            remark: remark.filter(|r| !r.trim().is_empty()),
        };
        let now = Utc::now();
        target.assigned_to = Some(assignee.to_ref());
        target.assigned_on = Some(now);
        target.dev = plan(body.dev_target_date, body.dev_remark);
        target.uat = plan(body.uat_target_date, body.uat_remark);
        target.live = plan(body.live_target_date, body.live_remark);
        target.updated_on = Some(now);
        target.updated_by = Some(caller.user_name.clone());

        Ok(reply(200, json!({"success": true, "message": "Request assigned"})))
    }

    fn store_uploads(&mut self, uploads: Vec<UploadBody>, now: DateTime<Utc>) -> Vec<Attachment> {
        uploads
            .into_iter()
            .map(|upload| {
                let id = self.next_attachment_id;
                self.next_attachment_id += 1;
                Attachment {
                    attachment_id: AttachmentId(id),
                    file_path: format!("uploads/{}/{}", id, upload.file_name),
                    file_name: upload.file_name,
                    file_size: upload.file_size,
                    content_type: upload.file_type,
                    created_on: Some(now),
                }
            })
            .collect()
    }

    // -------------------------------------------------------------------------
    // Reference data
    // -------------------------------------------------------------------------

    fn priority_list(&self) -> ApiResponse {
        let priorities: Vec<Value> = Priority::defaults()
            .iter()
            .map(|p| json!({"id": p.priority_id, "name": p.priority_name.as_str()}))
            .collect();
        reply(200, json!({"success": true, "priorities": priorities}))
    }

    fn request_type_list(&self) -> ApiResponse {
        let types: Vec<Value> = RequestType::KNOWN
            .iter()
            .enumerate()
            .map(|(i, t)| json!({"id": i + 1, "name": t.as_str()}))
            .collect();
        reply(200, json!({"success": true, "requestTypes": types}))
    }

    fn user_list(&self) -> ApiResponse {
        let users: Vec<Value> = self.accounts.iter().map(|a| user_json(&a.user)).collect();
        reply(200, json!({"users": users}))
    }

    // -------------------------------------------------------------------------
    // Mails
    // -------------------------------------------------------------------------

    fn mail_list(&self, caller: &User) -> ApiResponse {
        let own_requests: Vec<RequestId> = self
            .requests
            .iter()
            .filter(|r| r.created_by.user_id == caller.user_id)
            .map(|r| r.request_id)
            .collect();
        let mails: Vec<Value> = self
            .mails
            .iter()
            .filter(|m| !caller.is_customer() || own_requests.contains(&m.request_id))
            .map(mail_json)
            .collect();
        reply(200, json!({"mails": mails}))
    }

    fn send_mail(&mut self, request: &ApiRequest, caller: &User) -> std::result::Result<ApiResponse, ApiResponse> {
        let body: SendBody = parse_body(request)?;
        if !self.requests.iter().any(|r| r.request_id.0 == body.request_id) {
            return Err(failure(404, "Request not found"));
        }
        let to = parse_addresses(&body.to_addresses);
        if to.is_empty() {
            return Err(failure(400, "At least one recipient is required"));
        }
        let sender = body
            .created_by
            .and_then(|id| self.user(UserId(id)))
            .unwrap_or_else(|| caller.clone());

        let now = Utc::now();
        let attachments = self.store_uploads(body.attachments, now);
        let id = self.next_mail_id;
        self.next_mail_id += 1;

        self.mails.push(Mail {
            mail_id: MailId(id),
            request_id: RequestId(body.request_id),
            parent_mail_id: body.parent_mail_id.map(MailId),
            subject: body.subject,
            body: body.body,
            from_address: body.from_address.unwrap_or_else(|| sender.email.clone()),
            to_addresses: to,
            cc_addresses: parse_addresses(&body.cc_addresses),
            sent_on: now,
            is_read: false,
            is_starred: false,
            is_archived: false,
            has_attachment: !attachments.is_empty(),
            attachments,
            created_by: sender.to_ref(),
            created_by_role: sender.role,
        });

        Ok(reply(200, json!({"success": true, "mailId": id})))
    }

    fn mail_action(&mut self, method: Method, path: &str) -> std::result::Result<ApiResponse, ApiResponse> {
        let rest = path
            .strip_prefix("/api/mail/")
            .ok_or_else(|| failure(404, "Not found"))?;
        let (id, action) = match rest.split_once('/') {
            Some((id, action)) => (id, Some(action)),
            None => (rest, None),
        };
        let id: u64 = id.parse().map_err(|_| failure(404, "Not found"))?;
        let index = self
            .mails
            .iter()
            .position(|m| m.mail_id.0 == id)
            .ok_or_else(|| failure(404, "Mail not found"))?;

        match (method, action) {
            (Method::Put, Some("star")) => {
                let mail = &mut self.mails[index];
                mail.is_starred = !mail.is_starred;
                Ok(reply(200, json!({"success": true, "isStarred": mail.is_starred})))
            }
            (Method::Put, Some("archive")) => {
                self.mails[index].is_archived = true;
                Ok(reply(200, json!({"success": true})))
            }
            (Method::Delete, None) => {
                self.mails.remove(index);
                Ok(reply(200, json!({"success": true})))
            }
            _ => Err(failure(404, "Not found")),
        }
    }
}

// =============================================================================
// Wire Encoding
// =============================================================================

fn user_json(user: &User) -> Value {
    serde_json::to_value(user).unwrap_or(Value::Null)
}

fn attachment_json(a: &Attachment) -> Value {
    json!({
        "AttachmentId": a.attachment_id,
        "FileName": a.file_name,
        "FilePath": a.file_path,
        "FileSize": a.file_size,
        "ContentType": a.content_type,
        "CreatedOn": a.created_on.map(|t| t.to_rfc3339()),
    })
}

fn mail_json(m: &Mail) -> Value {
    json!({
        "mailId": m.mail_id,
        "requestId": m.request_id,
        "parentMailId": m.parent_mail_id,
        "subject": m.subject,
        "body": m.body,
        "fromAddress": m.from_address,
        "toAddresses": join_addresses(&m.to_addresses),
        "ccAddresses": join_addresses(&m.cc_addresses),
        "sentOn": m.sent_on.to_rfc3339(),
        "isRead": m.is_read,
        "isStarred": m.is_starred,
        "isArchived": m.is_archived,
        "hasAttachment": m.has_attachment,
        "attachments": m.attachments.iter().map(|a| json!({
            "attachmentId": a.attachment_id,
            "fileName": a.file_name,
            "filePath": a.file_path,
            "fileSize": a.file_size,
            "contentType": a.content_type,
        })).collect::<Vec<_>>(),
        "createdBy": m.created_by.user_id,
        "createdByUserName": m.created_by.user_name,
        "createdByEmail": m.created_by.email,
        "createdByRole": m.created_by_role.as_str(),
    })
}

// =============================================================================
// Fixtures
// =============================================================================

fn account(id: u64, name: &str, email: &str, role: UserRole, company: Option<&str>, password: &str) -> Account {
    Account {
        user: User {
            user_id: UserId(id),
            user_name: name.to_string(),
            email: email.to_string(),
            mobile: None,
            role,
            company_id: company.map(|_| CompanyId(1)),
            company_name: company.map(str::to_string),
            company: None,
            is_active: true,
        },
        password: password.to_string(),
    }
}

fn seed(db: &mut MockDb, now: DateTime<Utc>) {
    db.accounts = vec![
        account(1, "admin", "admin@elogisol.com", UserRole::Admin, None, "admin123"),
        account(2, "john_doe", "john@company.com", UserRole::User, Some("Tech Corp"), "user123"),
        account(3, "sarah_support", "sarah@elogisol.com", UserRole::Support, None, "support123"),
        account(4, "maria_lopez", "maria@retailhub.com", UserRole::User, Some("Retail Hub"), "user123"),
    ];

    let users: Vec<User> = db.accounts.iter().map(|a| a.user.clone()).collect();
    let by = |id: u64| users[(id - 1) as usize].to_ref();
    let days_ago = |d: i64| now - Duration::days(d);
    let target = |d: i64| Some((now + Duration::days(d)).date_naive());

    let request = |id: u64,
                   subject: &str,
                   message: &str,
                   kind: RequestType,
                   level: PriorityLevel,
                   status: RequestStatus,
                   creator: u64,
                   age: i64| Request {
        request_id: RequestId(id),
        subject: subject.to_string(),
        message: message.to_string(),
        request_type_id: RequestType::KNOWN.iter().position(|k| *k == kind).map(|i| i as u32 + 1),
        request_type: kind,
        remark: None,
        priority: Priority::new(level),
        status: Status::new(status),
        created_by: by(creator),
        created_on: days_ago(age),
        updated_by: None,
        updated_on: None,
        assigned_to: None,
        assigned_on: None,
        dev: PhasePlan::default(),
        uat: PhasePlan::default(),
        live: PhasePlan::default(),
        attachments: Vec::new(),
        mail_count: 0,
        last_activity: None,
    };

    let mut export = request(
        2,
        "Add export to PDF",
        "Monthly reports should be downloadable as PDF.",
        RequestType::NewDevelopment,
        PriorityLevel::Medium,
        RequestStatus::Active,
        2,
        3,
    );
    export.assigned_to = Some(by(3));
    export.assigned_on = Some(days_ago(2));
    export.dev = PhasePlan {
        target_date: target(7),
        remark: Some("Use the existing report templates".to_string()),
    };
    export.uat = PhasePlan {
        target_date: target(14),
        remark: None,
    };

    let mut address = request(
        3,
        "Update customer address",
        "Customer 4411 moved; billing address must change.",
        RequestType::DataChange,
        PriorityLevel::Low,
        RequestStatus::Dev,
        2,
        10,
    );
    address.assigned_to = Some(by(3));
    address.assigned_on = Some(days_ago(9));
    address.remark = Some("Waiting for the signed form".to_string());

    db.requests = vec![
        request(
            1,
            "Login page not loading",
            "The login page shows a blank screen after the last release.",
            RequestType::SystemBug,
            PriorityLevel::High,
            RequestStatus::Pending,
            2,
            1,
        ),
        export,
        address,
        request(
            4,
            "Invoice totals wrong",
            "Totals on invoices ignore the discount line.",
            RequestType::SystemBug,
            PriorityLevel::High,
            RequestStatus::Uat,
            4,
            5,
        ),
        request(
            5,
            "Archive old orders",
            "Move orders older than 2019 to the archive schema.",
            RequestType::DataChange,
            PriorityLevel::Medium,
            RequestStatus::Closed,
            2,
            20,
        ),
        request(
            6,
            "Dashboard widgets",
            "Add a widget for open tickets per region.",
            RequestType::NewDevelopment,
            PriorityLevel::Low,
            RequestStatus::Pending,
            4,
            2,
        ),
    ];
    db.requests[0].attachments = vec![Attachment {
        attachment_id: AttachmentId(1),
        file_name: "blank-login.png".to_string(),
        file_path: "uploads/1/blank-login.png".to_string(),
        file_size: Some(245_760),
        content_type: Some("image/png".to_string()),
        created_on: Some(days_ago(1)),
    }];

    let mail = |id: u64, request: u64, parent: Option<u64>, subject: &str, body: &str, from: u64, to: &[&str], cc: &[&str], hours: i64| {
        let sender = &users[(from - 1) as usize];
        Mail {
            mail_id: MailId(id),
            request_id: RequestId(request),
            parent_mail_id: parent.map(MailId),
            subject: subject.to_string(),
            body: body.to_string(),
            from_address: sender.email.clone(),
            to_addresses: to.iter().map(|s| s.to_string()).collect(),
            cc_addresses: cc.iter().map(|s| s.to_string()).collect(),
            sent_on: now - Duration::hours(hours),
            is_read: hours > 12,
            is_starred: false,
            is_archived: false,
            has_attachment: false,
            attachments: Vec::new(),
            created_by: sender.to_ref(),
            created_by_role: sender.role,
        }
    };

    db.mails = vec![
        mail(
            1,
            1,
            None,
            "Login page not loading",
            "Since this morning the login page is blank for all our staff.",
            2,
            &["admin@elogisol.com"],
            &[],
            20,
        ),
        mail(
            2,
            1,
            Some(1),
            "Re: Login page not loading",
            "Thanks for the report. We are looking into it.",
            1,
            &["john@company.com"],
            &["sarah@elogisol.com"],
            18,
        ),
        mail(
            3,
            1,
            Some(2),
            "Re: Login page not loading",
            "Any update? The login issue blocks invoicing.",
            2,
            &["admin@elogisol.com"],
            &["sarah@elogisol.com"],
            2,
        ),
        mail(
            4,
            2,
            None,
            "Export scope",
            "Should the PDF include charts or tables only?",
            3,
            &["john@company.com"],
            &[],
            30,
        ),
    ];
    db.mails[3].is_starred = true;

    db.next_request_id = 7;
    db.next_mail_id = 5;
    db.next_attachment_id = 2;
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn call(method: Method, path: &str, body: Option<Value>, bearer: Option<&str>) -> ApiRequest {
        ApiRequest {
            method,
            url: format!("http://mock{}", path),
            path: path.to_string(),
            body,
            bearer: bearer.map(str::to_string),
        }
    }

    async fn token(mock: &MockTransport, email: &str, password: &str) -> String {
        let response = mock
            .send(call(
                Method::Post,
                endpoints::LOGIN,
                Some(json!({"email": email, "password": password})),
                None,
            ))
            .await
            .unwrap();
        let body: Value = response.json().unwrap();
        body["accessToken"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_requires_bearer() {
        let mock = MockTransport::with_fixtures();
        let response = mock.send(call(Method::Get, endpoints::USERS, None, None)).await.unwrap();
        assert_eq!(response.status, 401);

        let response = mock
            .send(call(Method::Get, endpoints::USERS, None, Some("forged")))
            .await
            .unwrap();
        assert_eq!(response.status, 401);
    }

    #[tokio::test]
    async fn test_fetch_rows_are_pascal_case() {
        let mock = MockTransport::with_fixtures();
        let token = token(&mock, "admin@elogisol.com", "admin123").await;
        let response = mock
            .send(call(
                Method::Post,
                endpoints::FETCH_REQUESTS,
                Some(json!({"userId": null, "page": 1, "pageSize": 10})),
                Some(&token),
            ))
            .await
            .unwrap();
        let body: Value = response.json().unwrap();
        let rows = body["requests"].as_array().unwrap();
        assert_eq!(rows.len(), 6);
        assert!(rows[0].get("RequestId").is_some());
        assert!(rows[0].get("CreatedOn").is_some());
        let login = rows.iter().find(|r| r["RequestId"] == 1).unwrap();
        assert_eq!(login["mailCount"], 3);
    }

    #[tokio::test]
    async fn test_paging() {
        let mock = MockTransport::with_fixtures();
        let token = token(&mock, "admin@elogisol.com", "admin123").await;
        let response = mock
            .send(call(
                Method::Post,
                endpoints::FETCH_REQUESTS,
                Some(json!({"userId": null, "page": 2, "pageSize": 4})),
                Some(&token),
            ))
            .await
            .unwrap();
        let body: Value = response.json().unwrap();
        assert_eq!(body["requests"].as_array().unwrap().len(), 2);
        assert_eq!(body["total"], 6);
    }

    #[tokio::test]
    async fn test_customer_mail_scope() {
        let mock = MockTransport::with_fixtures();
        let token = token(&mock, "maria@retailhub.com", "user123").await;
        let response = mock
            .send(call(Method::Get, endpoints::MAILS, None, Some(&token)))
            .await
            .unwrap();
        let body: Value = response.json().unwrap();
        assert!(body["mails"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_offline() {
        let mock = MockTransport::with_fixtures();
        mock.set_offline(true);
        let err = mock
            .send(call(Method::Get, endpoints::USERS, None, None))
            .await
            .unwrap_err();
        assert!(err.is_transport());
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let mock = MockTransport::with_fixtures();
        let token = token(&mock, "admin@elogisol.com", "admin123").await;
        let response = mock
            .send(call(Method::Get, "/api/nothing", None, Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status, 404);
    }
}
