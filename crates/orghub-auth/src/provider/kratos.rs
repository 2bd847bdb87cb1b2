//! HTTP client for a Kratos-compatible identity provider.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::COOKIE;
use tracing::{debug, warn};

use orghub_core::config::IdentityConfig;
use orghub_core::error::AppError;
use orghub_core::result::AppResult;

use super::{IdentityProvider, IntrospectionError, ProviderIdentity, ProviderSession, Transport};

/// Header carrying a session token for API clients.
const SESSION_TOKEN_HEADER: &str = "X-Session-Token";

/// Identity provider client speaking the Kratos public and admin APIs.
#[derive(Debug, Clone)]
pub struct KratosClient {
    client: reqwest::Client,
    public_url: String,
    admin_url: String,
    cookie_name: String,
}

impl KratosClient {
    /// Build a client from the identity configuration.
    pub fn new(config: &IdentityConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .user_agent(concat!("orghub/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build identity client: {e}")))?;

        Ok(Self {
            client,
            public_url: config.public_url.trim_end_matches('/').to_string(),
            admin_url: config.admin_url.trim_end_matches('/').to_string(),
            cookie_name: config.session_cookie_name.clone(),
        })
    }
}

#[async_trait]
impl IdentityProvider for KratosClient {
    async fn whoami(
        &self,
        token: &str,
        transport: Transport,
    ) -> Result<ProviderSession, IntrospectionError> {
        let url = format!("{}/sessions/whoami", self.public_url);
        let request = match transport {
            Transport::SessionToken => self.client.get(&url).header(SESSION_TOKEN_HEADER, token),
            Transport::Cookie => self
                .client
                .get(&url)
                .header(COOKIE, format!("{}={}", self.cookie_name, token)),
        };

        let response = request
            .send()
            .await
            .map_err(|e| IntrospectionError::Unreachable(e.to_string()))?;

        let status = response.status();
        debug!(status = %status, ?transport, "whoami answered");

        match status {
            s if s.is_success() => {}
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => {
                return Err(IntrospectionError::Rejected);
            }
            s if s.is_server_error() => {
                return Err(IntrospectionError::Unreachable(format!("status {s}")));
            }
            s => return Err(IntrospectionError::Malformed(format!("status {s}"))),
        }

        let session: ProviderSession = response
            .json()
            .await
            .map_err(|e| IntrospectionError::Malformed(e.to_string()))?;

        if !session.active {
            return Err(IntrospectionError::Rejected);
        }
        Ok(session)
    }

    async fn find_identity_by_email(&self, email: &str) -> AppResult<Option<ProviderIdentity>> {
        let url = format!("{}/admin/identities", self.admin_url);
        let response = self
            .client
            .get(&url)
            .query(&[("credentials_identifier", email)])
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Identity directory lookup failed");
                AppError::provider_unreachable("Identity provider is unreachable")
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::external_service(format!(
                "Identity directory lookup answered {status}"
            )));
        }

        let identities: Vec<ProviderIdentity> = response.json().await.map_err(|e| {
            AppError::external_service(format!("Invalid identity directory response: {e}"))
        })?;

        Ok(identities.into_iter().next())
    }
}
