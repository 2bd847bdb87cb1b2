//! Route definitions for the OrgHub HTTP API.
//!
//! All routes are organized by resource and mounted under `/api`.
//! Every route except hooks and health resolves a session through the
//! [`AuthUser`](crate::extractors::AuthUser) extractor.

use axum::{
    Router, middleware as axum_middleware,
    routing::{delete, get, post, put},
};

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the Axum router with all routes and the access-log middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(organization_routes())
        .merge(member_routes())
        .merge(client_routes())
        .merge(user_routes())
        .merge(hook_routes())
        .merge(health_routes());

    Router::new()
        .nest("/api", api_routes)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Organization CRUD
fn organization_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/organizations",
            post(handlers::organization::create_organization)
                .get(handlers::organization::list_organizations),
        )
        .route(
            "/organizations/{id}",
            get(handlers::organization::get_organization)
                .put(handlers::organization::update_organization)
                .delete(handlers::organization::delete_organization),
        )
}

/// Membership administration
fn member_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/organizations/{id}/members",
            get(handlers::member::list_members).post(handlers::member::add_member),
        )
        .route(
            "/organizations/{id}/members/{user_id}",
            delete(handlers::member::remove_member),
        )
        .route(
            "/organizations/{id}/members/{user_id}/role",
            put(handlers::member::set_role),
        )
}

/// Machine clients
fn client_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/organizations/{id}/oauth2-clients",
            post(handlers::client::create_client).get(handlers::client::list_clients),
        )
        .route(
            "/organizations/{id}/oauth2-clients/introspect",
            post(handlers::client::introspect),
        )
        .route(
            "/organizations/{id}/oauth2-clients/{client_id}",
            delete(handlers::client::delete_client),
        )
}

/// Caller profile
fn user_routes() -> Router<AppState> {
    Router::new().route(
        "/users/me",
        get(handlers::user::get_profile).put(handlers::user::update_profile),
    )
}

/// Identity provider webhooks
fn hook_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/hooks/after-registration",
            post(handlers::hook::after_registration),
        )
        .route("/hooks/after-login", post(handlers::hook::after_login))
}

/// Liveness and store check
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
