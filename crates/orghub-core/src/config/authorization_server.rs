//! Authorization server configuration.

use serde::{Deserialize, Serialize};

/// Settings for the external OAuth2 authorization server's admin API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizationServerConfig {
    /// Base URL of the admin API.
    #[serde(default = "default_admin_url")]
    pub admin_url: String,
    /// Timeout for a single outbound call, in milliseconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
    /// Scopes granted to new machine clients when the request names none.
    #[serde(default)]
    pub default_scopes: Vec<String>,
}

impl Default for AuthorizationServerConfig {
    fn default() -> Self {
        Self {
            admin_url: default_admin_url(),
            request_timeout_ms: default_request_timeout(),
            default_scopes: Vec::new(),
        }
    }
}

fn default_admin_url() -> String {
    "http://127.0.0.1:4445".to_string()
}

fn default_request_timeout() -> u64 {
    5000
}
