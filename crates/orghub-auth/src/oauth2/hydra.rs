//! HTTP client for a Hydra-compatible authorization server admin API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::json;
use tracing::{info, warn};

use orghub_core::config::AuthorizationServerConfig;
use orghub_core::error::AppError;
use orghub_core::result::AppResult;
use orghub_core::types::ClientId;

use super::{AuthorizationServer, ClientRegistration, RegisteredClient, TokenIntrospection};

/// Admin API client for machine-client management.
#[derive(Debug, Clone)]
pub struct HydraClient {
    client: reqwest::Client,
    admin_url: String,
}

impl HydraClient {
    /// Build a client from configuration.
    pub fn new(config: &AuthorizationServerConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .user_agent(concat!("orghub/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                AppError::configuration(format!("Failed to build authorization server client: {e}"))
            })?;

        Ok(Self {
            client,
            admin_url: config.admin_url.trim_end_matches('/').to_string(),
        })
    }
}

fn unreachable(err: reqwest::Error) -> AppError {
    warn!(error = %err, "Authorization server call failed");
    AppError::provider_unreachable("Authorization server is unreachable")
}

#[async_trait]
impl AuthorizationServer for HydraClient {
    async fn create_client(&self, registration: &ClientRegistration) -> AppResult<RegisteredClient> {
        let body = json!({
            "client_name": registration.name,
            "grant_types": ["client_credentials"],
            "response_types": ["token"],
            "scope": registration.scopes.join(" "),
            "token_endpoint_auth_method": "client_secret_basic",
            "metadata": { "organization_id": registration.organization_id },
        });

        let response = self
            .client
            .post(format!("{}/admin/clients", self.admin_url))
            .json(&body)
            .send()
            .await
            .map_err(unreachable)?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::external_service(format!(
                "Client registration answered {status}"
            )));
        }

        let registered: RegisteredClient = response.json().await.map_err(|e| {
            AppError::external_service(format!("Invalid client registration response: {e}"))
        })?;

        info!(client_id = %registered.client_id, org_id = %registration.organization_id, "Registered machine client");
        Ok(registered)
    }

    async fn delete_client(&self, client_id: &ClientId) -> AppResult<()> {
        let response = self
            .client
            .delete(format!("{}/admin/clients/{}", self.admin_url, client_id))
            .send()
            .await
            .map_err(unreachable)?;

        match response.status() {
            s if s.is_success() => Ok(()),
            StatusCode::NOT_FOUND => {
                warn!(client_id = %client_id, "Machine client already gone at authorization server");
                Ok(())
            }
            s => Err(AppError::external_service(format!(
                "Client deletion answered {s}"
            ))),
        }
    }

    async fn introspect(&self, token: &str) -> AppResult<TokenIntrospection> {
        let response = self
            .client
            .post(format!("{}/admin/oauth2/introspect", self.admin_url))
            .form(&[("token", token)])
            .send()
            .await
            .map_err(unreachable)?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::external_service(format!(
                "Token introspection answered {status}"
            )));
        }

        response.json().await.map_err(|e| {
            AppError::external_service(format!("Invalid introspection response: {e}"))
        })
    }
}
