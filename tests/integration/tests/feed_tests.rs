//! Live feed (WebSocket) integration tests
//!
//! Same requirements as `api_tests`: PostgreSQL, Redis and the environment
//! variables DATABASE_URL, REDIS_URL, JWT_SECRET, API_PORT.
//!
//! Run with: cargo test -p integration-tests --test feed_tests

use integration_tests::{assert_json, check_test_env, fixtures::*, TestServer};
use reqwest::StatusCode;
use serde_json::{json, Value};

async fn setup() -> (TestServer, Seeder, AuthResponse) {
    let server = TestServer::start().await.expect("Failed to start server");
    let seeder = Seeder::connect(&server.config)
        .await
        .expect("Failed to connect seeder");
    let admin = seeder.admin().await.unwrap();
    let response = server
        .post("/api/v1/auth/login", &admin.login())
        .await
        .unwrap();
    let auth: AuthResponse = assert_json(response, StatusCode::OK).await.unwrap();
    (server, seeder, auth)
}

fn contains_alert(snapshot: &Value, id: &str) -> bool {
    snapshot["d"]["alerts"]
        .as_array()
        .is_some_and(|alerts| alerts.iter().any(|a| a["id"] == id))
}

#[tokio::test]
async fn test_feed_identify_and_snapshot() {
    if !check_test_env().await {
        return;
    }

    let (server, _seeder, auth) = setup().await;
    let mut feed = server.open_feed().await.unwrap();

    feed.identify(&auth.access_token).await.unwrap();
    let ready = feed.wait_for("ready").await.unwrap();
    assert_eq!(ready["d"]["admin"]["uid"], auth.admin.uid.as_str());

    let snapshot = feed.wait_for("snapshot").await.unwrap();
    assert!(snapshot["d"]["version"].as_u64().unwrap() >= 1);
    assert_eq!(snapshot["d"]["view"]["status"], "all");
}

#[tokio::test]
async fn test_feed_pushes_new_alerts() {
    if !check_test_env().await {
        return;
    }

    let (server, seeder, auth) = setup().await;
    let mut feed = server.open_feed().await.unwrap();
    feed.identify(&auth.access_token).await.unwrap();
    let first = feed.wait_for("snapshot").await.unwrap();
    let first_version = first["d"]["version"].as_u64().unwrap();

    let sender = seeder.user("Lito Lapid", None).await.unwrap();
    let alert_id = seeder.alert(&sender, "Typhoon damage").await.unwrap();

    // Other tests share the table, so skip snapshots until ours shows up
    loop {
        let snapshot = feed.wait_for("snapshot").await.unwrap();
        assert!(snapshot["d"]["version"].as_u64().unwrap() > first_version);
        if contains_alert(&snapshot, &alert_id) {
            assert_eq!(snapshot["d"]["users"][&sender], "Lito Lapid");
            break;
        }
    }
}

#[tokio::test]
async fn test_feed_view_change_rerenders() {
    if !check_test_env().await {
        return;
    }

    let (server, seeder, auth) = setup().await;
    let sender = seeder.user("Nora Aunor", None).await.unwrap();
    let alert_id = seeder.alert(&sender, "Stranded on rooftop").await.unwrap();

    let mut feed = server.open_feed().await.unwrap();
    feed.identify(&auth.access_token).await.unwrap();
    let snapshot = feed.wait_for("snapshot").await.unwrap();
    assert!(contains_alert(&snapshot, &alert_id));

    feed.send(&json!({"op": "view", "d": {"status": "handled", "sort": "oldest"}}))
        .await
        .unwrap();
    loop {
        let snapshot = feed.wait_for("snapshot").await.unwrap();
        if snapshot["d"]["view"]["status"] == "handled" {
            assert_eq!(snapshot["d"]["view"]["sort"], "oldest");
            assert!(!contains_alert(&snapshot, &alert_id));
            break;
        }
    }
}

#[tokio::test]
async fn test_feed_heartbeat() {
    if !check_test_env().await {
        return;
    }

    let (server, _seeder, auth) = setup().await;
    let mut feed = server.open_feed().await.unwrap();
    feed.identify(&auth.access_token).await.unwrap();
    feed.wait_for("ready").await.unwrap();

    feed.send(&json!({"op": "heartbeat"})).await.unwrap();
    feed.wait_for("heartbeat_ack").await.unwrap();
}

#[tokio::test]
async fn test_feed_rejects_bad_token() {
    if !check_test_env().await {
        return;
    }

    let (server, _seeder, _auth) = setup().await;
    let mut feed = server.open_feed().await.unwrap();
    feed.identify("not-a-token").await.unwrap();

    assert_eq!(feed.wait_for_close().await.unwrap(), Some(4004));
}

#[tokio::test]
async fn test_feed_rejects_non_admin() {
    if !check_test_env().await {
        return;
    }

    let (server, seeder, auth) = setup().await;
    seeder.set_admin(&auth.admin.uid, Some(false)).await.unwrap();

    let mut feed = server.open_feed().await.unwrap();
    feed.identify(&auth.access_token).await.unwrap();

    assert_eq!(feed.wait_for_close().await.unwrap(), Some(4006));
}

#[tokio::test]
async fn test_feed_requires_identify_first() {
    if !check_test_env().await {
        return;
    }

    let (server, _seeder, _auth) = setup().await;
    let mut feed = server.open_feed().await.unwrap();
    feed.send(&json!({"op": "view", "d": {"status": "pending"}}))
        .await
        .unwrap();

    assert_eq!(feed.wait_for_close().await.unwrap(), Some(4003));
}

#[tokio::test]
async fn test_feed_rejects_garbage() {
    if !check_test_env().await {
        return;
    }

    let (server, _seeder, auth) = setup().await;
    let mut feed = server.open_feed().await.unwrap();
    feed.identify(&auth.access_token).await.unwrap();
    feed.wait_for("ready").await.unwrap();

    feed.send(&json!({"op": "resume"})).await.unwrap();
    assert_eq!(feed.wait_for_close().await.unwrap(), Some(4002));
}
