//! Identity provider webhooks.

use http::StatusCode;
use serde_json::json;

use crate::helpers::{TestApp, WEBHOOK_KEY};

#[tokio::test]
async fn test_first_registration_bootstraps_an_organization() {
    let app = TestApp::new();

    let first = app
        .register("ada", "ada@example.com", "Ada Lovelace")
        .await
        .expect(StatusCode::OK);
    let org = &first.data()["bootstrap_organization"];
    assert_eq!(org["name"], "Ada Lovelace's Organization");
    assert_eq!(org["owner_id"], "ada");
    assert_eq!(first.data()["user"]["can_create_organizations"], true);

    let second = app
        .register("bob", "bob@example.com", "Bob Babbage")
        .await
        .expect(StatusCode::OK);
    assert!(second.data()["bootstrap_organization"].is_null());

    assert_eq!(app.store.organization_count().await, 1);
}

#[tokio::test]
async fn test_webhook_requires_the_configured_key() {
    let app = TestApp::new();
    let identity = app.create_identity("ada", "ada@example.com", "Ada Lovelace");
    let body = json!({ "identity": identity });

    let missing = app
        .hook("/api/hooks/after-registration", body.clone(), None)
        .await
        .expect(StatusCode::UNAUTHORIZED);
    assert_eq!(missing.error_code(), "INVALID_CREDENTIAL");

    app.hook("/api/hooks/after-registration", body.clone(), Some("wrong"))
        .await
        .expect(StatusCode::UNAUTHORIZED);

    app.hook("/api/hooks/after-registration", body, Some(WEBHOOK_KEY))
        .await
        .expect(StatusCode::OK);
}

#[tokio::test]
async fn test_after_login_refreshes_profile() {
    let app = TestApp::new();
    app.register("ada", "ada@example.com", "Ada Lovelace")
        .await
        .expect(StatusCode::OK);

    let renamed = json!({
        "identity": {
            "id": "ada",
            "traits": {"email": "countess@example.com", "name": {"first": "Ada", "last": "King"}},
        }
    });
    let response = app
        .hook("/api/hooks/after-login", renamed, Some(WEBHOOK_KEY))
        .await
        .expect(StatusCode::OK);

    assert_eq!(response.data()["email"], "countess@example.com");
    assert_eq!(response.data()["display_name"], "Ada King");
    assert!(!response.data()["last_login_at"].is_null());
}

#[tokio::test]
async fn test_malformed_payload_is_a_validation_error() {
    let app = TestApp::new();

    let response = app
        .hook("/api/hooks/after-login", json!({"user": "ada"}), Some(WEBHOOK_KEY))
        .await
        .expect(StatusCode::BAD_REQUEST);

    assert_eq!(response.error_code(), "VALIDATION_ERROR");
}
