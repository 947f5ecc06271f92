//! Grievance CLI Transport
//!
//! Native HTTP transport over reqwest. Calls are sent once with no timeout
//! or retry; non-2xx responses are returned as-is for the client to map.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use async_trait::async_trait;
use grievance_client::{ApiRequest, ApiResponse, HttpTransport, Method};
use grievance_common::{GrievanceError, Result};
use tracing::debug;

const USER_AGENT: &str = concat!("grievance-cli/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| GrievanceError::Transport(e.to_string()))?;
        Ok(Self { client })
    }
}

fn method_of(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
    }
}

fn transport_error(request: &ApiRequest, err: reqwest::Error) -> GrievanceError {
    GrievanceError::Transport(format!("{} {}: {}", request.method, request.path, err))
}

#[async_trait(?Send)]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let mut builder = self.client.request(method_of(request.method), &request.url);
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| transport_error(&request, e))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| transport_error(&request, e))?;
        debug!(method = %request.method, path = %request.path, status, "response received");
        Ok(ApiResponse::new(status, body))
    }
}
