//! `AuthUser` extractor: resolves the session credential through the
//! identity provider and injects the request context.

use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::request::Parts;
use axum_extra::extract::cookie::CookieJar;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::{Authorization, HeaderMapExt};

use orghub_auth::PresentedCredentials;
use orghub_service::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Extracted authenticated user context available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl AuthUser {
    /// Returns the inner `RequestContext`.
    pub fn context(&self) -> &RequestContext {
        &self.0
    }
}

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let credentials =
            presented_credentials(&parts.headers, &state.config.identity.session_cookie_name);

        let subject = state.resolver.resolve(&credentials).await?;

        Ok(AuthUser(RequestContext::new(subject)))
    }
}

/// Collect the bearer token and the named session cookie from `headers`.
///
/// A non-bearer `Authorization` header counts as absent.
pub fn presented_credentials(headers: &HeaderMap, cookie_name: &str) -> PresentedCredentials {
    let bearer = headers
        .typed_get::<Authorization<Bearer>>()
        .map(|auth| auth.token().to_string());

    let cookie = CookieJar::from_headers(headers)
        .get(cookie_name)
        .map(|c| c.value().to_string());

    PresentedCredentials { bearer, cookie }
}
