//! Grievance Config - Configuration Structures
//!
//! Configuration for talking to the grievance API. Supports loading from
//! environment variables, TOML files, and programmatic construction.
//! Defaults point at the hosted API. Request paging is fixed at the first
//! page of ten and is not configurable.
//!
//! Key Features:
//! - Centralized API base URL
//! - Fixed fetch paging parameters
//! - Session storage key names
//! - Environment and TOML overrides
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use crate::error::{GrievanceError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_API_URL: &str = "https://teamelogisolgrievanceapi.onrender.com";
pub const DEFAULT_TOKEN_KEY: &str = "accessToken";
pub const DEFAULT_USER_KEY: &str = "auth_user";

/// Page and page size sent with every request fetch.
pub const FETCH_PAGE: u32 = 1;
pub const FETCH_PAGE_SIZE: u32 = 10;

pub const ENV_API_URL: &str = "GRIEVANCE_API_URL";

// =============================================================================
// API Configuration
// =============================================================================

/// Configuration for the remote grievance API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub token_key: String,
    pub user_key: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            token_key: DEFAULT_TOKEN_KEY.to_string(),
            user_key: DEFAULT_USER_KEY.to_string(),
        }
    }
}

impl ApiConfig {
    /// Create a new configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file. Missing keys keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: ApiConfig =
            toml::from_str(content).map_err(|e| GrievanceError::Configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overridden by `GRIEVANCE_API_URL`.
    pub fn from_env() -> Result<Self> {
        Self::default().merge_env(|key| std::env::var(key).ok())
    }

    /// Apply environment overrides read through `lookup`.
    pub fn merge_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            self.base_url = url.trim().to_string();
        }
        self.validate()?;
        Ok(self)
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_storage_keys(mut self, token_key: impl Into<String>, user_key: impl Into<String>) -> Self {
        self.token_key = token_key.into();
        self.user_key = user_key.into();
        self
    }

    /// Join an endpoint path onto the base URL.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(GrievanceError::Configuration("base_url must not be empty".to_string()));
        }
        if self.token_key == self.user_key {
            return Err(GrievanceError::Configuration(
                "token_key and user_key must differ".to_string(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.base_url, DEFAULT_API_URL);
        assert_eq!(config.token_key, "accessToken");
        assert_eq!(config.user_key, "auth_user");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_url_joining() {
        let config = ApiConfig::new().with_base_url("http://localhost:5000/");
        assert_eq!(config.url("/api/mails"), "http://localhost:5000/api/mails");
        assert_eq!(config.url("api/users"), "http://localhost:5000/api/users");
    }

    #[test]
    fn test_from_toml_partial() {
        let config = ApiConfig::from_toml("base_url = \"http://api.test\"\n").unwrap();
        assert_eq!(config.base_url, "http://api.test");
        assert_eq!(config.token_key, DEFAULT_TOKEN_KEY);

        assert!(ApiConfig::from_toml("base_url = 5").is_err());
        assert!(ApiConfig::from_toml("base_url = \" \"").is_err());
    }

    #[test]
    fn test_env_overrides() {
        let config = ApiConfig::default()
            .merge_env(|key| match key {
                ENV_API_URL => Some(" http://staging.test ".to_string()),
                "GRIEVANCE_PAGE_SIZE" => Some("50".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.base_url, "http://staging.test");
        assert_eq!(config, ApiConfig::default().with_base_url("http://staging.test"));

        let blank = ApiConfig::default().merge_env(|_| Some("  ".to_string())).unwrap();
        assert_eq!(blank.base_url, DEFAULT_API_URL);
    }

    #[test]
    fn test_storage_keys_must_differ() {
        let config = ApiConfig::new().with_storage_keys("same", "same");
        assert!(config.validate().is_err());
    }
}
