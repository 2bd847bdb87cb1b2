//! Machine (OAuth2) client handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use orghub_auth::oauth2::TokenIntrospection;
use orghub_entity::client::MachineClient;
use orghub_service::CreatedClient;

use crate::dto::request::{CreateClientBody, IntrospectBody};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedJson, path};
use crate::state::AppState;

/// POST /api/organizations/{id}/oauth2-clients
pub async fn create_client(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<CreateClientBody>,
) -> Result<(StatusCode, Json<ApiResponse<CreatedClient>>), ApiError> {
    let org_id = path::organization_id(&id)?;
    let created = state
        .client_service
        .create_client(&auth, &org_id, req.into())
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(created))))
}

/// GET /api/organizations/{id}/oauth2-clients
pub async fn list_clients(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<MachineClient>>>, ApiError> {
    let org_id = path::organization_id(&id)?;
    let clients = state.client_service.list_clients(&auth, &org_id).await?;
    Ok(Json(ApiResponse::ok(clients)))
}

/// DELETE /api/organizations/{id}/oauth2-clients/{client_id}
pub async fn delete_client(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, client_id)): Path<(String, String)>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let org_id = path::organization_id(&id)?;
    let client_id = path::client_id(&client_id)?;
    state
        .client_service
        .delete_client(&auth, &org_id, &client_id)
        .await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Client deleted"))))
}

/// POST /api/organizations/{id}/oauth2-clients/introspect
pub async fn introspect(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<IntrospectBody>,
) -> Result<Json<ApiResponse<TokenIntrospection>>, ApiError> {
    let org_id = path::organization_id(&id)?;
    let result = state
        .client_service
        .introspect(&auth, &org_id, &req.token)
        .await?;
    Ok(Json(ApiResponse::ok(result)))
}
