//! API Integration Tests
//!
//! These tests require:
//! - Running PostgreSQL instance
//! - Running Redis instance
//! - Environment variables: DATABASE_URL, REDIS_URL, JWT_SECRET, API_PORT
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{
    assert_error, assert_json, assert_status, check_test_env, fixtures::*, TestServer,
};
use reqwest::StatusCode;
use serde_json::{json, Value};

async fn setup() -> (TestServer, Seeder) {
    let server = TestServer::start().await.expect("Failed to start server");
    let seeder = Seeder::connect(&server.config)
        .await
        .expect("Failed to connect seeder");
    (server, seeder)
}

async fn sign_in(server: &TestServer, identity: &SeededIdentity) -> AuthResponse {
    let response = server
        .post("/api/v1/auth/login", &identity.login())
        .await
        .unwrap();
    assert_json(response, StatusCode::OK).await.unwrap()
}

fn find_alert<'a>(list: &'a Value, id: &str) -> Option<&'a Value> {
    list["alerts"]
        .as_array()?
        .iter()
        .find(|a| a["id"] == id)
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_health_ready() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health/ready").await.expect("Request failed");
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["checks"]["database"], "healthy");
    assert_eq!(body["checks"]["redis"], "healthy");
}

// ============================================================================
// Session Guard / Auth Tests
// ============================================================================

#[tokio::test]
async fn test_admin_login() {
    if !check_test_env().await {
        return;
    }

    let (server, seeder) = setup().await;
    let admin = seeder.admin().await.unwrap();

    let auth = sign_in(&server, &admin).await;

    assert_eq!(auth.admin.uid, admin.uid);
    assert_eq!(auth.admin.email, admin.email);
    assert_eq!(auth.admin.name, "Ops Desk");
    assert_eq!(auth.token_type, "Bearer");
    assert!(!auth.access_token.is_empty());
    assert!(!auth.refresh_token.is_empty());
}

#[tokio::test]
async fn test_non_admin_login_is_denied() {
    if !check_test_env().await {
        return;
    }

    let (server, seeder) = setup().await;
    let user = seeder.non_admin().await.unwrap();

    let response = server
        .post("/api/v1/auth/login", &user.login())
        .await
        .unwrap();
    let error = assert_error(response, StatusCode::FORBIDDEN).await.unwrap();

    assert_eq!(error["code"], "ACCESS_DENIED");
    assert_eq!(error["message"], "Access Denied: You are not an admin.");
}

#[tokio::test]
async fn test_login_without_admin_record_is_denied() {
    if !check_test_env().await {
        return;
    }

    let (server, seeder) = setup().await;
    let admin = seeder.admin().await.unwrap();
    seeder.set_admin(&admin.uid, None).await.unwrap();

    let response = server
        .post("/api/v1/auth/login", &admin.login())
        .await
        .unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    if !check_test_env().await {
        return;
    }

    let (server, seeder) = setup().await;
    let admin = seeder.admin().await.unwrap();

    let wrong_password = LoginRequest {
        email: admin.email.clone(),
        password: "not-the-password".to_string(),
    };
    let response = server
        .post("/api/v1/auth/login", &wrong_password)
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();

    let unknown = LoginRequest {
        email: "nobody@resq.test".to_string(),
        password: TEST_PASSWORD.to_string(),
    };
    let response = server.post("/api/v1/auth/login", &unknown).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_login_validation() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server
        .post(
            "/api/v1/auth/login",
            &json!({"email": "not-an-email", "password": ""}),
        )
        .await
        .unwrap();
    let error = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(error["code"], "VALIDATION_ERROR");
    assert!(error["details"].is_object());
}

#[tokio::test]
async fn test_refresh_rotates_tokens() {
    if !check_test_env().await {
        return;
    }

    let (server, seeder) = setup().await;
    let admin = seeder.admin().await.unwrap();
    let auth = sign_in(&server, &admin).await;

    let body = json!({"refresh_token": auth.refresh_token});
    let response = server.post("/api/v1/auth/refresh", &body).await.unwrap();
    let rotated: AuthResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_ne!(rotated.refresh_token, auth.refresh_token);

    // The old refresh token is spent
    let response = server.post("/api/v1/auth/refresh", &body).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_logout_revokes_refresh_token() {
    if !check_test_env().await {
        return;
    }

    let (server, seeder) = setup().await;
    let admin = seeder.admin().await.unwrap();
    let auth = sign_in(&server, &admin).await;

    let response = server
        .post_empty_auth("/api/v1/auth/logout", &auth.access_token)
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let body = json!({"refresh_token": auth.refresh_token});
    let response = server.post("/api/v1/auth/refresh", &body).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_current_admin() {
    if !check_test_env().await {
        return;
    }

    let (server, seeder) = setup().await;
    let admin = seeder.admin().await.unwrap();
    let auth = sign_in(&server, &admin).await;

    let response = server
        .get_auth("/api/v1/admin/@me", &auth.access_token)
        .await
        .unwrap();
    let me: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(me["uid"], admin.uid.as_str());
    assert_eq!(me["display_name"], admin.display_name.as_str());

    let response = server.get("/api/v1/admin/@me").await.unwrap();
    let error = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(error["code"], "MISSING_AUTHORIZATION");

    let response = server
        .get_auth("/api/v1/admin/@me", "garbage")
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_withdrawn_admin_flag_signs_out() {
    if !check_test_env().await {
        return;
    }

    let (server, seeder) = setup().await;
    let admin = seeder.admin().await.unwrap();
    let auth = sign_in(&server, &admin).await;

    seeder.set_admin(&admin.uid, Some(false)).await.unwrap();

    let response = server
        .get_auth("/api/v1/alerts", &auth.access_token)
        .await
        .unwrap();
    let error = assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(error["code"], "ACCESS_DENIED");

    // Sessions were revoked, so restoring the flag does not revive the token
    seeder.set_admin(&admin.uid, Some(true)).await.unwrap();
    let body = json!({"refresh_token": auth.refresh_token});
    let response = server.post("/api/v1/auth/refresh", &body).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

// ============================================================================
// Alert Tests
// ============================================================================

#[tokio::test]
async fn test_list_alerts_resolves_sender_names() {
    if !check_test_env().await {
        return;
    }

    let (server, seeder) = setup().await;
    let admin = seeder.admin().await.unwrap();
    let auth = sign_in(&server, &admin).await;

    let sender = seeder.user("Maria Santos", None).await.unwrap();
    let alert_id = seeder
        .alert(&sender, "Flood rising https://maps.google.com/?q=14.59,120.98")
        .await
        .unwrap();

    let response = server
        .get_auth("/api/v1/alerts", &auth.access_token)
        .await
        .unwrap();
    let list: Value = assert_json(response, StatusCode::OK).await.unwrap();

    let alert = find_alert(&list, &alert_id).expect("seeded alert listed");
    assert_eq!(alert["sender"]["name"], "Maria Santos");
    assert_eq!(alert["content"], "Flood rising");
    assert_eq!(
        alert["location_link"],
        "https://maps.google.com/?q=14.59,120.98"
    );
    assert_eq!(alert["can_acknowledge"], true);
    assert!(list["counts"]["all"].as_u64().unwrap() >= 1);
    assert_eq!(list["view"]["sort"], "newest");
}

#[tokio::test]
async fn test_list_alerts_view_parameters() {
    if !check_test_env().await {
        return;
    }

    let (server, seeder) = setup().await;
    let admin = seeder.admin().await.unwrap();
    let auth = sign_in(&server, &admin).await;

    let sender = seeder.user("Jose Rizal", None).await.unwrap();
    let alert_id = seeder.alert(&sender, "Landslide near school").await.unwrap();

    // Search matches the resolved sender name
    let response = server
        .get_auth(
            "/api/v1/alerts?status=pending&search=jose%20rizal&sort=oldest",
            &auth.access_token,
        )
        .await
        .unwrap();
    let list: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(find_alert(&list, &alert_id).is_some());

    let response = server
        .get_auth("/api/v1/alerts?status=handled", &auth.access_token)
        .await
        .unwrap();
    let list: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(find_alert(&list, &alert_id).is_none());

    let response = server
        .get_auth("/api/v1/alerts?sort=loudest", &auth.access_token)
        .await
        .unwrap();
    let error = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(error["code"], "INVALID_VIEW_PARAMETER");
}

#[tokio::test]
async fn test_get_unknown_alert() {
    if !check_test_env().await {
        return;
    }

    let (server, seeder) = setup().await;
    let admin = seeder.admin().await.unwrap();
    let auth = sign_in(&server, &admin).await;

    let response = server
        .get_auth("/api/v1/alerts/does-not-exist", &auth.access_token)
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_acknowledge_alert() {
    if !check_test_env().await {
        return;
    }

    let (server, seeder) = setup().await;
    let admin = seeder.admin().await.unwrap();
    let auth = sign_in(&server, &admin).await;

    let sender = seeder.user("Ana Cruz", None).await.unwrap();
    let alert_id = seeder.alert(&sender, "Fire on 3rd floor").await.unwrap();

    let response = server
        .post_empty_auth(
            &format!("/api/v1/alerts/{alert_id}/handle"),
            &auth.access_token,
        )
        .await
        .unwrap();
    let card: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(card["status"], "handled");
    assert_eq!(card["resolved"], true);
    assert_eq!(card["can_acknowledge"], false);
    assert_eq!(card["handled_by"], admin.display_name.as_str());
    assert!(card["handled_at"].is_string());

    let response = server
        .get_auth(&format!("/api/v1/alerts/{alert_id}"), &auth.access_token)
        .await
        .unwrap();
    let stored: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(stored["status"], "handled");

    // A second acknowledgment still succeeds
    let response = server
        .post_empty_auth(
            &format!("/api/v1/alerts/{alert_id}/handle"),
            &auth.access_token,
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_acknowledge_unknown_alert() {
    if !check_test_env().await {
        return;
    }

    let (server, seeder) = setup().await;
    let admin = seeder.admin().await.unwrap();
    let auth = sign_in(&server, &admin).await;

    let response = server
        .post_empty_auth("/api/v1/alerts/missing-alert/handle", &auth.access_token)
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

// ============================================================================
// Profile Tests
// ============================================================================

#[tokio::test]
async fn test_user_profile() {
    if !check_test_env().await {
        return;
    }

    let (server, seeder) = setup().await;
    let admin = seeder.admin().await.unwrap();
    let auth = sign_in(&server, &admin).await;

    let user_id = seeder
        .user("Pedro Reyes", Some("+639171234567"))
        .await
        .unwrap();

    let response = server
        .get_auth(&format!("/api/v1/users/{user_id}"), &auth.access_token)
        .await
        .unwrap();
    let profile: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(profile["id"], user_id.as_str());
    assert_eq!(profile["name"], "Pedro Reyes");
    assert_eq!(profile["phone_number"], "+639171234567");
}

#[tokio::test]
async fn test_unknown_user_profile() {
    if !check_test_env().await {
        return;
    }

    let (server, seeder) = setup().await;
    let admin = seeder.admin().await.unwrap();
    let auth = sign_in(&server, &admin).await;

    let response = server
        .get_auth("/api/v1/users/nobody-here", &auth.access_token)
        .await
        .unwrap();
    let error = assert_error(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(error["message"], "User profile not found: nobody-here");
}
