//! Route definitions
//!
//! API routes are mounted under /api/v1; health routes sit outside it so they
//! can skip rate limiting.

use axum::{
    routing::{get, post},
    Router,
};

use crate::feed::feed_handler;
use crate::handlers::{admin, alerts, auth, health, users};
use crate::state::AppState;

/// API router (excluding health, which gets separate middleware)
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes())
}

/// Health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(admin_routes())
        .merge(alert_routes())
        .merge(user_routes())
        .route("/feed", get(feed_handler))
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh_token))
        .route("/auth/logout", post(auth::logout))
}

fn admin_routes() -> Router<AppState> {
    Router::new().route("/admin/@me", get(admin::get_current_admin))
}

fn alert_routes() -> Router<AppState> {
    Router::new()
        .route("/alerts", get(alerts::list_alerts))
        .route("/alerts/:alert_id", get(alerts::get_alert))
        .route("/alerts/:alert_id/handle", post(alerts::acknowledge_alert))
}

fn user_routes() -> Router<AppState> {
    Router::new().route("/users/:user_id", get(users::get_user_profile))
}
