//! Shared fixtures for unit tests.

use chrono::{DateTime, Utc};
use grievance_common::{
    PhasePlan, Priority, PriorityLevel, Request, RequestId, RequestStatus, RequestType, Status,
    User, UserId, UserRef, UserRole,
};

pub fn request_fixture(
    id: u64,
    status: RequestStatus,
    priority: PriorityLevel,
    request_type: RequestType,
    created_on: DateTime<Utc>,
) -> Request {
    Request {
        request_id: RequestId(id),
        subject: format!("Request {}", id),
        message: "Details".to_string(),
        request_type,
        request_type_id: None,
        remark: None,
        priority: Priority::new(priority),
        status: Status::new(status),
        created_by: UserRef {
            user_id: UserId(2),
            user_name: "john_doe".to_string(),
            email: Some("john@company.com".to_string()),
        },
        created_on,
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
    }
}

pub fn user_fixture(id: u64, role: UserRole) -> User {
    User {
        user_id: UserId(id),
        user_name: format!("user{}", id),
        email: format!("user{}@example.com", id),
        mobile: None,
        role,
        company_id: None,
        company_name: None,
        company: None,
        is_active: true,
    }
}
