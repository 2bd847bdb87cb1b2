//! Session resolution at the HTTP boundary.

use http::StatusCode;

use crate::helpers::{COOKIE_NAME, TestApp};

#[tokio::test]
async fn test_missing_credential_is_no_credential() {
    let app = TestApp::new();

    let response = app
        .request("GET", "/api/organizations", None, None)
        .await
        .expect(StatusCode::UNAUTHORIZED);

    assert_eq!(response.error_code(), "NO_CREDENTIAL");
}

#[tokio::test]
async fn test_unknown_token_is_invalid_credential() {
    let app = TestApp::new();

    let response = app
        .request("GET", "/api/organizations", None, Some("forged"))
        .await
        .expect(StatusCode::UNAUTHORIZED);

    assert_eq!(response.error_code(), "INVALID_CREDENTIAL");
}

#[tokio::test]
async fn test_session_cookie_is_accepted() {
    let app = TestApp::new();
    app.register("ada", "ada@example.com", "Ada Lovelace")
        .await
        .expect(StatusCode::OK);

    let cookie = format!("{COOKIE_NAME}={}", TestApp::token("ada"));
    let response = app
        .send("GET", "/api/users/me", None, &[("Cookie", cookie)])
        .await
        .expect(StatusCode::OK);

    assert_eq!(response.data()["id"], "ada");
    assert_eq!(response.data()["email"], "ada@example.com");
}

#[tokio::test]
async fn test_rejected_bearer_falls_back_to_cookie() {
    let app = TestApp::new();
    app.register("ada", "ada@example.com", "Ada Lovelace")
        .await
        .expect(StatusCode::OK);

    let headers = [
        ("Authorization", "Bearer stale-token".to_string()),
        ("Cookie", format!("{COOKIE_NAME}={}", TestApp::token("ada"))),
    ];
    let response = app
        .send("GET", "/api/users/me", None, &headers)
        .await
        .expect(StatusCode::OK);

    assert_eq!(response.data()["id"], "ada");
}

#[tokio::test]
async fn test_hanging_provider_is_service_unavailable() {
    let app = TestApp::new();
    app.register("ada", "ada@example.com", "Ada Lovelace")
        .await
        .expect(StatusCode::OK);
    app.identity.hang();

    let token = TestApp::token("ada");
    let response = app
        .request("GET", "/api/organizations", None, Some(&token))
        .await
        .expect(StatusCode::SERVICE_UNAVAILABLE);

    assert_eq!(response.error_code(), "PROVIDER_UNREACHABLE");
}

#[tokio::test]
async fn test_health_needs_no_session() {
    let app = TestApp::new();

    let response = app
        .request("GET", "/api/health", None, None)
        .await
        .expect(StatusCode::OK);
    assert_eq!(response.data()["status"], "ok");

    app.store.set_unavailable(true);
    let response = app
        .request("GET", "/api/health", None, None)
        .await
        .expect(StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.data()["database"], "unavailable");
}

#[tokio::test]
async fn test_profile_update() {
    let app = TestApp::new();
    app.register("ada", "ada@example.com", "Ada Lovelace")
        .await
        .expect(StatusCode::OK);
    let token = TestApp::token("ada");

    let response = app
        .request(
            "PUT",
            "/api/users/me",
            Some(serde_json::json!({"display_name": "Countess", "theme": "dark"})),
            Some(&token),
        )
        .await
        .expect(StatusCode::OK);

    assert_eq!(response.data()["display_name"], "Countess");
    assert_eq!(response.data()["theme"], "dark");
}
