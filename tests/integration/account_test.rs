//! Integration tests for registration, login and bearer-token handling.

mod helpers;

use http::StatusCode;

use hotellisting_entity::UserRole;

#[tokio::test]
async fn test_register_then_login() {
    let app = helpers::TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/account/register",
            Some(serde_json::json!({
                "email": "guest@hotellisting.test",
                "password": "secret12",
                "firstName": "Grace",
                "lastName": "Guest",
                "roles": ["User"],
            })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::ACCEPTED);

    let response = app
        .request(
            "POST",
            "/api/account/login",
            Some(serde_json::json!({
                "email": "guest@hotellisting.test",
                "password": "secret12",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::ACCEPTED);
    assert!(response.body.get("token").is_some());
    assert!(response.body.get("expiresAt").is_some());
}

#[tokio::test]
async fn test_token_carries_username_and_roles() {
    let app = helpers::TestApp::new().await;
    let token = app.admin_token().await;

    let claims = app.state.jwt_decoder.decode(&token).unwrap();
    assert_eq!(claims.unique_name, helpers::ADMIN_EMAIL);
    assert!(claims.has_role(UserRole::Administrator));
    assert!(!claims.has_role(UserRole::User));
}

#[tokio::test]
async fn test_duplicate_registration_conflicts() {
    let app = helpers::TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/account/register",
            Some(serde_json::json!({
                "email": "USER@hotellisting.test",
                "password": "another1",
                "roles": ["User"],
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.error_kind(), Some("CONSTRAINT_VIOLATION"));
}

#[tokio::test]
async fn test_register_rejects_short_password() {
    let app = helpers::TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/account/register",
            Some(serde_json::json!({
                "email": "short@hotellisting.test",
                "password": "abc",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = helpers::TestApp::new().await;

    let wrong_password = app
        .request(
            "POST",
            "/api/account/login",
            Some(serde_json::json!({
                "email": helpers::ADMIN_EMAIL,
                "password": "wrongpassword",
            })),
            None,
        )
        .await;

    let unknown_user = app
        .request(
            "POST",
            "/api/account/login",
            Some(serde_json::json!({
                "email": "nobody@hotellisting.test",
                "password": helpers::PASSWORD,
            })),
            None,
        )
        .await;

    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.body, unknown_user.body);
}

#[tokio::test]
async fn test_garbage_bearer_token_is_unauthorized() {
    let app = helpers::TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/country",
            Some(serde_json::json!({ "name": "Barbados", "shortName": "BB" })),
            Some("not.a.jwt"),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_kind(), Some("UNAUTHORIZED"));
}

#[tokio::test]
async fn test_health_reports_ok() {
    let app = helpers::TestApp::new().await;

    let response = app.request("GET", "/api/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
}
