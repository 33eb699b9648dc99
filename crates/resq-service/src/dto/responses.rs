//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.

use chrono::{DateTime, Utc};
use resq_core::{AlertView, Severity};
use serde::Serialize;

// ============================================================================
// Auth Responses
// ============================================================================

/// The signed-in admin
#[derive(Debug, Clone, Serialize)]
pub struct AdminResponse {
    pub uid: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Header name: stored admin name, else email local part, else "Admin"
    pub name: String,
}

/// Authentication response (login/refresh)
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub admin: AdminResponse,
}

impl AuthResponse {
    pub fn new(
        access_token: String,
        refresh_token: String,
        expires_in: i64,
        admin: AdminResponse,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in,
            admin,
        }
    }
}

// ============================================================================
// Alert Responses
// ============================================================================

/// Sender or receiver of an alert with its resolved name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartyResponse {
    pub id: String,
    pub name: String,
}

/// An alert card
#[derive(Debug, Clone, Serialize)]
pub struct AlertResponse {
    pub id: String,
    #[serde(rename = "type")]
    pub alert_type: String,
    pub title: String,
    pub severity: Severity,
    pub severity_label: String,
    pub status: String,
    pub resolved: bool,
    pub can_acknowledge: bool,
    /// Alert text with any embedded maps URL removed
    pub content: String,
    /// Collapsed-card text
    pub preview: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_link: Option<String>,
    pub sender: PartyResponse,
    pub receiver: PartyResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat_room_id: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    pub time_since: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handled_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handled_at: Option<DateTime<Utc>>,
    pub has_media: bool,
    pub media_urls: Vec<String>,
    pub media_count: usize,
}

/// Alert totals per status, before the view is applied
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub all: usize,
    pub pending: usize,
    pub handled: usize,
}

/// Result of `GET /alerts`
#[derive(Debug, Clone, Serialize)]
pub struct AlertListResponse {
    pub alerts: Vec<AlertResponse>,
    /// Alerts in this view
    pub total: usize,
    pub counts: StatusCounts,
    pub view: AlertView,
}

// ============================================================================
// User Responses
// ============================================================================

/// Full user profile
#[derive(Debug, Clone, Serialize)]
pub struct UserProfileResponse {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatted_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub last_login_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_provider: Option<String>,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health check status for each backing service
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub database: String,
    pub redis: String,
}

impl ReadinessResponse {
    pub fn ready(database_healthy: bool, redis_healthy: bool) -> Self {
        let all_healthy = database_healthy && redis_healthy;
        Self {
            status: if all_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                database: if database_healthy { "healthy" } else { "unhealthy" }.to_string(),
                redis: if redis_healthy { "healthy" } else { "unhealthy" }.to_string(),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}
