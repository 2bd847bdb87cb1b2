//! Webhook payload shape.

use serde::{Deserialize, Serialize};

use orghub_auth::provider::ProviderIdentity;
use orghub_core::error::AppError;
use orghub_core::result::AppResult;
use orghub_core::types::SubjectId;
use orghub_entity::user::ProfileUpsert;

/// Body of the `after-registration` and `after-login` hooks:
/// `{"identity": {"id": …, "traits": {…}}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HookPayload {
    /// The identity the event is about.
    pub identity: ProviderIdentity,
}

impl HookPayload {
    /// Convert to the cached profile fields.
    pub fn profile(&self) -> AppResult<ProfileUpsert> {
        let id = self.identity.id.trim();
        if id.is_empty() {
            return Err(AppError::validation("Identity id is required"));
        }
        let traits = &self.identity.traits;
        Ok(ProfileUpsert {
            id: SubjectId::new(id),
            email: traits.email.clone(),
            display_name: traits.display_name(),
            locale: traits.locale.clone(),
            timezone: traits.timezone.clone(),
        })
    }
}
