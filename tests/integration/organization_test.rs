//! Organization lifecycle, membership and role transitions over HTTP.

use http::StatusCode;
use serde_json::json;

use crate::helpers::TestApp;

/// Register ada (first user, gets the bootstrap org) and bob. Returns the
/// bootstrap organization id.
async fn ada_and_bob(app: &TestApp) -> String {
    let ada = app
        .register("ada", "ada@example.com", "Ada Lovelace")
        .await
        .expect(StatusCode::OK);
    app.register("bob", "bob@example.com", "Bob Babbage")
        .await
        .expect(StatusCode::OK);

    ada.data()["bootstrap_organization"]["id"]
        .as_str()
        .expect("bootstrap organization id")
        .to_string()
}

async fn invite(app: &TestApp, org: &str, actor: &str, email: &str, role: &str) {
    app.request(
        "POST",
        &format!("/api/organizations/{org}/members"),
        Some(json!({"email": email, "role": role})),
        Some(&TestApp::token(actor)),
    )
    .await
    .expect(StatusCode::CREATED);
}

#[tokio::test]
async fn test_invite_transfer_and_delete() {
    let app = TestApp::new();
    let org = ada_and_bob(&app).await;
    let ada = TestApp::token("ada");
    let bob = TestApp::token("bob");

    let listed = app
        .request("GET", "/api/organizations", None, Some(&ada))
        .await
        .expect(StatusCode::OK);
    assert_eq!(listed.data().as_array().map(Vec::len), Some(1));
    assert_eq!(listed.data()[0]["role"], "owner");

    invite(&app, &org, "ada", "bob@example.com", "member").await;

    let members = app
        .request("GET", &format!("/api/organizations/{org}/members"), None, Some(&bob))
        .await
        .expect(StatusCode::OK);
    assert_eq!(members.data().as_array().map(Vec::len), Some(2));

    let transferred = app
        .request(
            "PUT",
            &format!("/api/organizations/{org}/members/bob/role"),
            Some(json!({"role": "owner"})),
            Some(&ada),
        )
        .await
        .expect(StatusCode::OK);
    assert_eq!(transferred.data()["role"], "owner");

    let ada_view = app
        .request("GET", "/api/organizations", None, Some(&ada))
        .await
        .expect(StatusCode::OK);
    assert_eq!(ada_view.data()[0]["role"], "admin");
    assert_eq!(ada_view.data()[0]["owner_id"], "bob");

    let denied = app
        .request("DELETE", &format!("/api/organizations/{org}"), None, Some(&ada))
        .await
        .expect(StatusCode::FORBIDDEN);
    assert_eq!(denied.error_code(), "FORBIDDEN_NOT_OWNER");

    app.store.verify_invariants().await.unwrap();

    app.request("DELETE", &format!("/api/organizations/{org}"), None, Some(&bob))
        .await
        .expect(StatusCode::OK);

    let gone = app
        .request("GET", &format!("/api/organizations/{org}"), None, Some(&bob))
        .await
        .expect(StatusCode::NOT_FOUND);
    assert_eq!(gone.error_code(), "ORGANIZATION_NOT_FOUND");
    assert_eq!(app.store.membership_count().await, 0);
}

#[tokio::test]
async fn test_non_member_and_member_permissions() {
    let app = TestApp::new();
    let org = ada_and_bob(&app).await;
    let bob = TestApp::token("bob");

    let outsider = app
        .request("GET", &format!("/api/organizations/{org}"), None, Some(&bob))
        .await
        .expect(StatusCode::FORBIDDEN);
    assert_eq!(outsider.error_code(), "FORBIDDEN_NOT_MEMBER");

    invite(&app, &org, "ada", "bob@example.com", "member").await;

    app.request("GET", &format!("/api/organizations/{org}"), None, Some(&bob))
        .await
        .expect(StatusCode::OK);

    let update = app
        .request(
            "PUT",
            &format!("/api/organizations/{org}"),
            Some(json!({"description": "hijacked"})),
            Some(&bob),
        )
        .await
        .expect(StatusCode::FORBIDDEN);
    assert_eq!(update.error_code(), "FORBIDDEN_NOT_ADMIN");
}

#[tokio::test]
async fn test_owner_is_protected_from_admins() {
    let app = TestApp::new();
    let org = ada_and_bob(&app).await;
    app.register("cy", "cy@example.com", "Cy Young")
        .await
        .expect(StatusCode::OK);
    invite(&app, &org, "ada", "bob@example.com", "admin").await;
    invite(&app, &org, "bob", "cy@example.com", "member").await;
    let bob = TestApp::token("bob");

    let removal = app
        .request("DELETE", &format!("/api/organizations/{org}/members/ada"), None, Some(&bob))
        .await
        .expect(StatusCode::FORBIDDEN);
    assert_eq!(removal.error_code(), "FORBIDDEN_OWNER_REMOVAL");

    let demotion = app
        .request(
            "PUT",
            &format!("/api/organizations/{org}/members/ada/role"),
            Some(json!({"role": "member"})),
            Some(&bob),
        )
        .await
        .expect(StatusCode::FORBIDDEN);
    assert_eq!(demotion.error_code(), "FORBIDDEN_OWNER_DEMOTION");

    let transfer = app
        .request(
            "PUT",
            &format!("/api/organizations/{org}/members/cy/role"),
            Some(json!({"role": "owner"})),
            Some(&bob),
        )
        .await
        .expect(StatusCode::FORBIDDEN);
    assert_eq!(transfer.error_code(), "FORBIDDEN_NOT_OWNER");

    app.request("DELETE", &format!("/api/organizations/{org}/members/cy"), None, Some(&bob))
        .await
        .expect(StatusCode::OK);

    app.store.verify_invariants().await.unwrap();
}

#[tokio::test]
async fn test_invalid_inputs() {
    let app = TestApp::new();
    let org = ada_and_bob(&app).await;
    let ada = TestApp::token("ada");

    let role = app
        .request(
            "POST",
            &format!("/api/organizations/{org}/members"),
            Some(json!({"email": "bob@example.com", "role": "boss"})),
            Some(&ada),
        )
        .await
        .expect(StatusCode::BAD_REQUEST);
    assert_eq!(role.error_code(), "INVALID_ROLE");

    let owner_invite = app
        .request(
            "POST",
            &format!("/api/organizations/{org}/members"),
            Some(json!({"email": "bob@example.com", "role": "owner"})),
            Some(&ada),
        )
        .await
        .expect(StatusCode::BAD_REQUEST);
    assert_eq!(owner_invite.error_code(), "INVALID_ROLE");

    let org_type = app
        .request(
            "POST",
            "/api/organizations",
            Some(json!({"name": "Guild", "type": "guild"})),
            Some(&ada),
        )
        .await
        .expect(StatusCode::BAD_REQUEST);
    assert_eq!(org_type.error_code(), "INVALID_ORG_TYPE");

    let bad_id = app
        .request("GET", "/api/organizations/not-a-uuid", None, Some(&ada))
        .await
        .expect(StatusCode::BAD_REQUEST);
    assert_eq!(bad_id.error_code(), "VALIDATION_ERROR");

    let unknown = app
        .request(
            "POST",
            &format!("/api/organizations/{org}/members"),
            Some(json!({"email": "nobody@example.com"})),
            Some(&ada),
        )
        .await
        .expect(StatusCode::NOT_FOUND);
    assert_eq!(unknown.error_code(), "USER_NOT_FOUND");
}

#[tokio::test]
async fn test_non_admin_is_refused_before_role_is_parsed() {
    let app = TestApp::new();
    let org = ada_and_bob(&app).await;
    let bob = TestApp::token("bob");

    let invite = app
        .request(
            "POST",
            &format!("/api/organizations/{org}/members"),
            Some(json!({"email": "bob@example.com", "role": "superuser"})),
            Some(&bob),
        )
        .await
        .expect(StatusCode::FORBIDDEN);
    assert_eq!(invite.error_code(), "FORBIDDEN_NOT_ADMIN");

    let change = app
        .request(
            "PUT",
            &format!("/api/organizations/{org}/members/ada/role"),
            Some(json!({"role": "superuser"})),
            Some(&bob),
        )
        .await
        .expect(StatusCode::FORBIDDEN);
    assert_eq!(change.error_code(), "FORBIDDEN_NOT_ADMIN");
}

#[tokio::test]
async fn test_create_update_and_name_conflict() {
    let app = TestApp::new();
    ada_and_bob(&app).await;
    let bob = TestApp::token("bob");

    let created = app
        .request(
            "POST",
            "/api/organizations",
            Some(json!({"name": "Engines", "type": "team", "metadata": {"tier": "gold"}})),
            Some(&bob),
        )
        .await
        .expect(StatusCode::CREATED);
    let org = created.data()["id"].as_str().unwrap().to_string();
    assert_eq!(created.data()["owner_id"], "bob");
    assert_eq!(created.data()["metadata"]["tier"], "gold");

    let updated = app
        .request(
            "PUT",
            &format!("/api/organizations/{org}"),
            Some(json!({"name": "Analytical Engines", "description": "Steam"})),
            Some(&bob),
        )
        .await
        .expect(StatusCode::OK);
    assert_eq!(updated.data()["name"], "Analytical Engines");
    assert_eq!(updated.data()["description"], "Steam");

    let conflict = app
        .request(
            "POST",
            "/api/organizations",
            Some(json!({"name": "Analytical Engines", "type": "team"})),
            Some(&bob),
        )
        .await
        .expect(StatusCode::CONFLICT);
    assert_eq!(conflict.error_code(), "CONFLICT");
}

#[tokio::test]
async fn test_unsynced_identity_cannot_create_organizations() {
    let app = TestApp::new();
    app.create_identity("eve", "eve@example.com", "Eve");

    let response = app
        .request(
            "POST",
            "/api/organizations",
            Some(json!({"name": "Shadow", "type": "team"})),
            Some(&TestApp::token("eve")),
        )
        .await
        .expect(StatusCode::FORBIDDEN);

    assert_eq!(response.error_code(), "FORBIDDEN_ORGANIZATION_CREATION");
}
