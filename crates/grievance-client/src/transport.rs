//! Grievance Client Transport
//!
//! The seam between the API client and whatever actually moves bytes: the
//! browser fetch API, a native HTTP client, or the in-memory demo server.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use async_trait::async_trait;
use grievance_common::{GrievanceError, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;

// =============================================================================
// Request / Response
// =============================================================================

/// HTTP method of an API call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully prepared API call.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Absolute URL (base URL joined with `path`).
    pub url: String,
    /// Endpoint path, e.g. `/api/mails`.
    pub path: String,
    pub body: Option<Value>,
    pub bearer: Option<String>,
}

impl ApiRequest {
    /// Serialized body, if any.
    pub fn body_text(&self) -> Option<String> {
        self.body.as_ref().map(Value::to_string)
    }
}

/// Raw response of an API call.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn json_body(status: u16, body: &Value) -> Self {
        Self::new(status, body.to_string())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body).map_err(GrievanceError::from)
    }

    /// `message` field of a JSON body, if present.
    pub fn message(&self) -> Option<String> {
        serde_json::from_str::<Value>(&self.body)
            .ok()
            .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
            .filter(|m| !m.trim().is_empty())
    }
}

// =============================================================================
// Transport Trait
// =============================================================================

/// Executes API calls. Implementations must not retry or time out.
#[async_trait(?Send)]
pub trait HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse>;
}

// =============================================================================
// Tests
// =============================================================================
