//! Identity provider webhooks. These carry no session; the optional
//! `X-Webhook-Key` header is checked by [`WebhookKey`].

use axum::Json;
use axum::extract::State;

use orghub_database::Registration;
use orghub_entity::user::User;
use orghub_service::HookPayload;

use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::{JsonBody, WebhookKey};
use crate::state::AppState;

/// POST /api/hooks/after-registration
pub async fn after_registration(
    State(state): State<AppState>,
    _key: WebhookKey,
    JsonBody(payload): JsonBody<HookPayload>,
) -> Result<Json<ApiResponse<Registration>>, ApiError> {
    let registration = state.sync_service.after_registration(&payload).await?;
    Ok(Json(ApiResponse::ok(registration)))
}

/// POST /api/hooks/after-login
pub async fn after_login(
    State(state): State<AppState>,
    _key: WebhookKey,
    JsonBody(payload): JsonBody<HookPayload>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    let user = state.sync_service.after_login(&payload).await?;
    Ok(Json(ApiResponse::ok(user)))
}
