//! Keeps the local user cache in step with the identity provider and
//! bootstraps the first organization.

use std::sync::Arc;

use subtle::ConstantTimeEq;
use tracing::{info, instrument, warn};

use orghub_core::config::OrganizationsConfig;
use orghub_core::error::{AppError, ErrorKind};
use orghub_core::result::AppResult;
use orghub_database::{OrganizationStore, Registration};
use orghub_entity::organization::{NewOrganization, OrganizationType};
use orghub_entity::user::User;

use super::payload::HookPayload;
use crate::validate::MAX_NAME_LEN;

/// Handles `after-registration` and `after-login` events.
#[derive(Debug, Clone)]
pub struct IdentitySyncService {
    store: Arc<dyn OrganizationStore>,
    config: OrganizationsConfig,
    bootstrap_type: OrganizationType,
    webhook_api_key: Option<String>,
}

impl IdentitySyncService {
    /// Creates the sync service. Fails if the configured bootstrap type is
    /// not a known organization type.
    pub fn new(
        store: Arc<dyn OrganizationStore>,
        config: OrganizationsConfig,
        webhook_api_key: Option<String>,
    ) -> AppResult<Self> {
        let bootstrap_type = config.bootstrap_type.parse::<OrganizationType>().map_err(|e| {
            AppError::configuration(format!("organizations.bootstrap_type: {}", e.message))
        })?;
        Ok(Self {
            store,
            config,
            bootstrap_type,
            webhook_api_key: webhook_api_key.filter(|k| !k.is_empty()),
        })
    }

    /// Check the webhook key when one is configured.
    pub fn verify_webhook_key(&self, presented: Option<&str>) -> AppResult<()> {
        match &self.webhook_api_key {
            None => Ok(()),
            Some(expected) if presented.is_some_and(|p| keys_match(expected, p)) => Ok(()),
            Some(_) => {
                warn!("Webhook call with missing or wrong API key");
                Err(AppError::new(
                    ErrorKind::InvalidCredential,
                    "Invalid webhook key",
                ))
            }
        }
    }

    /// Sync a newly registered identity; the first user ever gets a default
    /// organization and the right to create more.
    #[instrument(skip(self, payload), fields(subject = %payload.identity.id))]
    pub async fn after_registration(&self, payload: &HookPayload) -> AppResult<Registration> {
        let profile = payload.profile()?;
        let bootstrap = NewOrganization {
            org_type: self.bootstrap_type,
            name: self.bootstrap_name(profile.display_name.as_deref()),
            description: None,
            metadata: serde_json::json!({}),
        };

        let registration = self
            .store
            .register_user(&profile, self.config.default_can_create, &bootstrap)
            .await?;

        info!(
            user_id = %registration.user.id,
            bootstrapped = registration.bootstrap_organization.is_some(),
            "Registration synced"
        );
        Ok(registration)
    }

    /// Refresh the cached profile and record the login time.
    #[instrument(skip(self, payload), fields(subject = %payload.identity.id))]
    pub async fn after_login(&self, payload: &HookPayload) -> AppResult<User> {
        let profile = payload.profile()?;
        let user = self
            .store
            .upsert_profile(&profile, self.config.default_can_create, true)
            .await?;
        info!(user_id = %user.id, "Login synced");
        Ok(user)
    }

    fn bootstrap_name(&self, display_name: Option<&str>) -> String {
        display_name
            .map(|n| format!("{n}'s Organization"))
            .filter(|n| n.chars().count() <= MAX_NAME_LEN)
            .unwrap_or_else(|| self.config.bootstrap_name.clone())
    }
}

/// Constant-time key comparison. Length is not secret.
fn keys_match(expected: &str, presented: &str) -> bool {
    let (a, b) = (expected.as_bytes(), presented.as_bytes());
    a.len() == b.len() && bool::from(a.ct_eq(b))
}
