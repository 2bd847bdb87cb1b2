//! Shared-secret check for identity provider webhooks.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the webhook API key.
pub const WEBHOOK_KEY_HEADER: &str = "x-webhook-key";

/// Proof that the request carried the configured webhook key, or that none
/// is configured.
#[derive(Debug, Clone, Copy)]
pub struct WebhookKey;

impl FromRequestParts<AppState> for WebhookKey {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let presented = parts
            .headers
            .get(WEBHOOK_KEY_HEADER)
            .and_then(|v| v.to_str().ok());

        state.sync_service.verify_webhook_key(presented)?;
        Ok(WebhookKey)
    }
}
