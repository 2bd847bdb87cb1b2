//! Machine client registry over HTTP.

use http::StatusCode;
use serde_json::json;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_client_lifecycle() {
    let app = TestApp::new();
    let ada = app
        .register("ada", "ada@example.com", "Ada Lovelace")
        .await
        .expect(StatusCode::OK);
    let org = ada.data()["bootstrap_organization"]["id"]
        .as_str()
        .unwrap()
        .to_string();
    let token = TestApp::token("ada");
    let base = format!("/api/organizations/{org}/oauth2-clients");

    let created = app
        .request("POST", &base, Some(json!({"name": "ci-runner"})), Some(&token))
        .await
        .expect(StatusCode::CREATED);
    assert_eq!(created.data()["client_id"], "client-1");
    assert_eq!(created.data()["client_secret"], "s3cret");
    assert_eq!(created.data()["scopes"], json!(["api"]));

    let listed = app
        .request("GET", &base, None, Some(&token))
        .await
        .expect(StatusCode::OK);
    assert_eq!(listed.data().as_array().map(Vec::len), Some(1));
    assert!(listed.data()[0].get("client_secret").is_none());

    app.authorization.issue_token("machine-token", "client-1");
    let active = app
        .request(
            "POST",
            &format!("{base}/introspect"),
            Some(json!({"token": "machine-token"})),
            Some(&token),
        )
        .await
        .expect(StatusCode::OK);
    assert_eq!(active.data()["active"], true);

    let inactive = app
        .request(
            "POST",
            &format!("{base}/introspect"),
            Some(json!({"token": "unknown"})),
            Some(&token),
        )
        .await
        .expect(StatusCode::OK);
    assert_eq!(inactive.data()["active"], false);

    app.request("DELETE", &format!("{base}/client-1"), None, Some(&token))
        .await
        .expect(StatusCode::OK);
    assert!(app.authorization.was_deleted("client-1"));

    let missing = app
        .request("DELETE", &format!("{base}/client-1"), None, Some(&token))
        .await
        .expect(StatusCode::NOT_FOUND);
    assert_eq!(missing.error_code(), "NOT_FOUND");
}

#[tokio::test]
async fn test_members_cannot_register_clients() {
    let app = TestApp::new();
    let ada = app
        .register("ada", "ada@example.com", "Ada Lovelace")
        .await
        .expect(StatusCode::OK);
    app.register("bob", "bob@example.com", "Bob Babbage")
        .await
        .expect(StatusCode::OK);
    let org = ada.data()["bootstrap_organization"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    app.request(
        "POST",
        &format!("/api/organizations/{org}/members"),
        Some(json!({"email": "bob@example.com"})),
        Some(&TestApp::token("ada")),
    )
    .await
    .expect(StatusCode::CREATED);

    let response = app
        .request(
            "POST",
            &format!("/api/organizations/{org}/oauth2-clients"),
            Some(json!({"name": "sneaky"})),
            Some(&TestApp::token("bob")),
        )
        .await
        .expect(StatusCode::FORBIDDEN);
    assert_eq!(response.error_code(), "FORBIDDEN_NOT_ADMIN");
}
