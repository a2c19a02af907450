//! Client configuration

use serde::{Deserialize, Serialize};
use url::Url;

/// Connection options for [`ControlPlaneClient::connect`](crate::ControlPlaneClient::connect)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientOptions {
    /// Base URL of the control plane
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Login username
    #[serde(default = "default_username")]
    pub username: String,

    /// Login password
    #[serde(default)]
    pub password: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    "http://localhost:8080".to_string()
}

fn default_username() -> String {
    "admin".to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            username: default_username(),
            password: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ClientOptions {
    /// Create options suitable for testing
    #[must_use]
    pub fn for_testing(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            username: "admin".to_string(),
            password: "test".to_string(),
            timeout_secs: 5,
        }
    }

    /// Endpoint without a trailing slash, ready for path concatenation
    #[must_use]
    pub fn normalized_endpoint(&self) -> String {
        self.endpoint.trim_end_matches('/').to_string()
    }

    /// Validate the options
    ///
    /// # Errors
    ///
    /// Returns an error if the options are invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.endpoint.is_empty() {
            return Err("endpoint must not be empty".to_string());
        }

        if Url::parse(&self.endpoint).is_err() {
            return Err(format!("endpoint is not a valid URL: {}", self.endpoint));
        }

        if self.username.is_empty() {
            return Err("username must not be empty".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        Ok(())
    }
}
