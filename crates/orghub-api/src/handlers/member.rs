//! Membership handlers: invite, list, remove, change role.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use orghub_entity::membership::{MemberProfile, Membership};

use crate::dto::request::{AddMemberBody, SetRoleBody};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, JsonBody, ValidatedJson, path};
use crate::state::AppState;

/// GET /api/organizations/{id}/members
pub async fn list_members(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<MemberProfile>>>, ApiError> {
    let org_id = path::organization_id(&id)?;
    let members = state.organization_service.list_members(&auth, &org_id).await?;
    Ok(Json(ApiResponse::ok(members)))
}

/// POST /api/organizations/{id}/members
pub async fn add_member(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<AddMemberBody>,
) -> Result<(StatusCode, Json<ApiResponse<Membership>>), ApiError> {
    let org_id = path::organization_id(&id)?;
    let membership = state
        .organization_service
        .add_member(&auth, &org_id, req.into_request())
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(membership))))
}

/// DELETE /api/organizations/{id}/members/{user_id}
pub async fn remove_member(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, user_id)): Path<(String, String)>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let org_id = path::organization_id(&id)?;
    let target = path::subject_id(&user_id)?;
    state
        .organization_service
        .remove_member(&auth, &org_id, &target)
        .await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Member removed"))))
}

/// PUT /api/organizations/{id}/members/{user_id}/role
///
/// Setting `owner` transfers ownership from the caller.
pub async fn set_role(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, user_id)): Path<(String, String)>,
    JsonBody(req): JsonBody<SetRoleBody>,
) -> Result<Json<ApiResponse<Membership>>, ApiError> {
    let org_id = path::organization_id(&id)?;
    let target = path::subject_id(&user_id)?;
    let membership = state
        .role_service
        .set_role(&auth, &org_id, &target, &req.role)
        .await?;
    Ok(Json(ApiResponse::ok(membership)))
}
