//! Live feed wire format
//!
//! JSON text frames shaped `{"op": ..., "d": ...}`.

use std::collections::HashMap;

use chrono::Utc;
use resq_core::{apply_view, AlertView};
use resq_service::dto::{AdminResponse, AlertResponse, StatusCounts};
use resq_service::FeedSnapshot;
use serde::{Deserialize, Serialize};

/// Frames sent by the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", content = "d", rename_all = "snake_case")]
pub enum ClientFrame {
    Identify { token: String },
    View(AlertView),
    Heartbeat,
}

impl ClientFrame {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// Frames sent by the server
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "op", content = "d", rename_all = "snake_case")]
pub enum ServerFrame {
    Hello { heartbeat_interval: u64 },
    Ready { admin: AdminResponse },
    Snapshot(SnapshotPayload),
    HeartbeatAck,
    Error { code: String, message: String },
}

impl ServerFrame {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Error {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// One rendering of the feed through the socket's current view
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotPayload {
    pub version: u64,
    /// Alerts in this view
    pub total: usize,
    pub counts: StatusCounts,
    pub view: AlertView,
    pub alerts: Vec<AlertResponse>,
    /// Resolved display name per sender/receiver id
    pub users: HashMap<String, String>,
}

impl SnapshotPayload {
    pub fn render(snapshot: &FeedSnapshot, view: &AlertView) -> Self {
        let visible = apply_view(&snapshot.alerts, view, &snapshot.users);
        let alerts = AlertResponse::build_all(&visible, &snapshot.users, Utc::now());

        Self {
            version: snapshot.version,
            total: alerts.len(),
            counts: StatusCounts::of(&snapshot.alerts),
            view: view.clone(),
            alerts,
            users: snapshot
                .users
                .iter()
                .map(|(id, info)| (id.clone(), info.name.clone()))
                .collect(),
        }
    }
}

/// Live feed WebSocket close codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum CloseCode {
    /// Unknown error occurred
    UnknownError = 4000,
    /// Frame was not valid JSON or not a known op
    DecodeError = 4002,
    /// Sent a view before identify
    NotAuthenticated = 4003,
    /// Invalid or expired access token
    AuthenticationFailed = 4004,
    /// Sent identify twice
    AlreadyAuthenticated = 4005,
    /// Identity is not an admin
    AccessDenied = 4006,
    /// No frame within the heartbeat timeout
    SessionTimeout = 4009,
    /// The alert feed stopped
    FeedFailed = 4010,
}

impl CloseCode {
    #[must_use]
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            4000 => Some(Self::UnknownError),
            4002 => Some(Self::DecodeError),
            4003 => Some(Self::NotAuthenticated),
            4004 => Some(Self::AuthenticationFailed),
            4005 => Some(Self::AlreadyAuthenticated),
            4006 => Some(Self::AccessDenied),
            4009 => Some(Self::SessionTimeout),
            4010 => Some(Self::FeedFailed),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// Whether the dashboard should reopen the feed after this close
    #[must_use]
    pub const fn should_reconnect(self) -> bool {
        matches!(
            self,
            Self::UnknownError
                | Self::DecodeError
                | Self::AlreadyAuthenticated
                | Self::SessionTimeout
                | Self::FeedFailed
        )
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::UnknownError => "Unknown error occurred",
            Self::DecodeError => "Invalid payload encoding",
            Self::NotAuthenticated => "Not authenticated",
            Self::AuthenticationFailed => "Authentication failed",
            Self::AlreadyAuthenticated => "Already authenticated",
            Self::AccessDenied => "Access Denied: You are not an admin.",
            Self::SessionTimeout => "Session timeout",
            Self::FeedFailed => "Alert feed failed",
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::UnknownError => "UnknownError",
            Self::DecodeError => "DecodeError",
            Self::NotAuthenticated => "NotAuthenticated",
            Self::AuthenticationFailed => "AuthenticationFailed",
            Self::AlreadyAuthenticated => "AlreadyAuthenticated",
            Self::AccessDenied => "AccessDenied",
            Self::SessionTimeout => "SessionTimeout",
            Self::FeedFailed => "FeedFailed",
        }
    }
}

impl std::fmt::Display for CloseCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}): {}", self.name(), self.as_u16(), self.description())
    }
}

impl From<CloseCode> for u16 {
    fn from(code: CloseCode) -> Self {
        code.as_u16()
    }
}
