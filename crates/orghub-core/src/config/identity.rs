//! Identity provider configuration.

use serde::{Deserialize, Serialize};

/// Settings for the external identity provider (session introspection,
/// directory lookups, and inbound webhooks).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Base URL of the provider's public API (session introspection).
    #[serde(default = "default_public_url")]
    pub public_url: String,
    /// Base URL of the provider's admin API (identity directory).
    #[serde(default = "default_admin_url")]
    pub admin_url: String,
    /// Name of the session cookie issued by the provider.
    #[serde(default = "default_cookie_name")]
    pub session_cookie_name: String,
    /// Timeout for a single outbound call, in milliseconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
    /// Total budget shared by all session validation attempts of one request.
    #[serde(default = "default_session_timeout")]
    pub session_timeout_ms: u64,
    /// Shared key expected in the `X-Webhook-Key` header of provider webhooks.
    /// Webhooks are accepted unauthenticated when unset.
    #[serde(default)]
    pub webhook_api_key: Option<String>,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            public_url: default_public_url(),
            admin_url: default_admin_url(),
            session_cookie_name: default_cookie_name(),
            request_timeout_ms: default_request_timeout(),
            session_timeout_ms: default_session_timeout(),
            webhook_api_key: None,
        }
    }
}

fn default_public_url() -> String {
    "http://127.0.0.1:4433".to_string()
}

fn default_admin_url() -> String {
    "http://127.0.0.1:4434".to_string()
}

fn default_cookie_name() -> String {
    "ory_kratos_session".to_string()
}

fn default_request_timeout() -> u64 {
    3000
}

fn default_session_timeout() -> u64 {
    5000
}
