//! Organization lifecycle handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use orghub_entity::organization::{Organization, OrganizationWithRole};

use crate::dto::request::{CreateOrganizationBody, UpdateOrganizationBody};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedJson, path};
use crate::state::AppState;

/// POST /api/organizations
pub async fn create_organization(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateOrganizationBody>,
) -> Result<(StatusCode, Json<ApiResponse<Organization>>), ApiError> {
    let org = state
        .organization_service
        .create(&auth, req.into_request()?)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(org))))
}

/// GET /api/organizations
pub async fn list_organizations(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<OrganizationWithRole>>>, ApiError> {
    let orgs = state.organization_service.list(&auth).await?;
    Ok(Json(ApiResponse::ok(orgs)))
}

/// GET /api/organizations/{id}
pub async fn get_organization(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Organization>>, ApiError> {
    let org_id = path::organization_id(&id)?;
    let org = state.organization_service.get(&auth, &org_id).await?;
    Ok(Json(ApiResponse::ok(org)))
}

/// PUT /api/organizations/{id}
pub async fn update_organization(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateOrganizationBody>,
) -> Result<Json<ApiResponse<Organization>>, ApiError> {
    let org_id = path::organization_id(&id)?;
    let org = state
        .organization_service
        .update(&auth, &org_id, req.into_request()?)
        .await?;
    Ok(Json(ApiResponse::ok(org)))
}

/// DELETE /api/organizations/{id}
pub async fn delete_organization(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let org_id = path::organization_id(&id)?;
    state.organization_service.delete(&auth, &org_id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Organization deleted",
    ))))
}
