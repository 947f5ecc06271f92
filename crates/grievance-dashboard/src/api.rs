//! API transport for the Grievance Dashboard
//!
//! Moves API calls through the browser fetch API and builds the shared
//! client. The base URL comes from the `data-api-url` attribute on the
//! document root; the value `demo` switches to the in-memory server.

use async_trait::async_trait;
use gloo_net::http::Request as HttpRequest;
use grievance_client::{ApiClient, ApiRequest, ApiResponse, HttpTransport, Method, MockTransport};
use grievance_common::{ApiConfig, GrievanceError, Result};
use web_sys::window;

/// Attribute value that selects the in-memory demo server.
pub const DEMO_API: &str = "demo";

/// Configured API base, from `data-api-url` on the document root.
fn configured_api_url() -> Option<String> {
    window()
        .and_then(|win| win.document())
        .and_then(|doc| doc.document_element())
        .and_then(|root| root.get_attribute("data-api-url"))
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
}

/// Whether the page asked for the demo server.
pub fn demo_mode() -> bool {
    configured_api_url().as_deref() == Some(DEMO_API)
}

/// API configuration for this page.
pub fn api_config() -> ApiConfig {
    match configured_api_url() {
        Some(url) if url != DEMO_API => ApiConfig::default().with_base_url(url),
        _ => ApiConfig::default(),
    }
}

/// The client every page shares.
pub fn build_client() -> ApiClient {
    let config = api_config();
    if demo_mode() {
        log::info!("using the in-memory demo API");
        ApiClient::new(config, MockTransport::with_fixtures())
    } else {
        log::info!("using API at {}", config.base_url);
        ApiClient::new(config, GlooTransport)
    }
}

/// Transport over `gloo-net`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlooTransport;

fn transport_error(request: &ApiRequest, err: gloo_net::Error) -> GrievanceError {
    GrievanceError::Transport(format!("{} {}: {}", request.method, request.url, err))
}

#[async_trait(?Send)]
impl HttpTransport for GlooTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let mut builder = match request.method {
            Method::Get => HttpRequest::get(&request.url),
            Method::Post => HttpRequest::post(&request.url),
            Method::Put => HttpRequest::put(&request.url),
            Method::Delete => HttpRequest::delete(&request.url),
        };
        if let Some(token) = &request.bearer {
            builder = builder.header("Authorization", &format!("Bearer {}", token));
        }

        let sent = match request.body_text() {
            Some(body) => {
                let prepared = builder
                    .header("Content-Type", "application/json")
                    .body(body)
                    .map_err(|e| transport_error(&request, e))?;
                prepared.send().await
            }
            None => builder.send().await,
        };
        let response = sent.map_err(|e| transport_error(&request, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| transport_error(&request, e))?;
        Ok(ApiResponse::new(status, body))
    }
}
