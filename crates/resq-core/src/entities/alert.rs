//! Alert entity - an emergency alert raised by a mobile user
//!
//! Alerts arrive from external producers with any subset of fields present.
//! [`RawAlert`] mirrors the stored record as-is; [`Alert`] is the normalized
//! form every other component works with.

use serde::{Deserialize, Serialize};

use crate::value_objects::AlertTimestamp;

/// Stored sender/receiver name used when the producer left it blank
pub const UNKNOWN_SENDER: &str = "Unknown";

const DEFAULT_CONTENT: &str = "Emergency alert";

// ============================================================================
// Type and status tags
// ============================================================================

/// How the alert was raised
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AlertType {
    /// Escalated from a chat conversation
    ChatEmergency,
    /// Raised manually from the app
    ManualAlert,
    /// Any tag this service does not know about, preserved verbatim
    Other(String),
}

impl AlertType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::ChatEmergency => "chat_emergency",
            Self::ManualAlert => "manual_alert",
            Self::Other(tag) => tag,
        }
    }
}

impl From<String> for AlertType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "chat_emergency" => Self::ChatEmergency,
            "manual_alert" => Self::ManualAlert,
            _ => Self::Other(tag),
        }
    }
}

impl From<AlertType> for String {
    fn from(t: AlertType) -> Self {
        t.as_str().to_string()
    }
}

/// Stored workflow status
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AlertStatus {
    Pending,
    Handled,
    Other(String),
}

impl AlertStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Handled => "handled",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for AlertStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "" | "pending" => Self::Pending,
            "handled" => Self::Handled,
            _ => Self::Other(s),
        }
    }
}

impl From<AlertStatus> for String {
    fn from(s: AlertStatus) -> Self {
        s.as_str().to_string()
    }
}

/// Severity derived from type and media
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Standard = 1,
    Medium = 2,
    High = 3,
}

impl Severity {
    /// Sort weight, higher sorts first
    #[inline]
    pub fn weight(self) -> u8 {
        self as u8
    }

    /// Badge label
    pub fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Standard => "Standard",
        }
    }
}

// ============================================================================
// Raw stored record
// ============================================================================

/// An alert record exactly as the store returned it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAlert {
    pub id: String,
    pub sender_id: Option<String>,
    pub sender_name: Option<String>,
    pub receiver_id: Option<String>,
    pub receiver_name: Option<String>,
    pub content: Option<String>,
    pub message: Option<String>,
    pub timestamp: Option<AlertTimestamp>,
    #[serde(rename = "type")]
    pub alert_type: Option<String>,
    pub chat_room_id: Option<String>,
    pub status: Option<String>,
    pub location: Option<String>,
    pub is_handled: Option<bool>,
    pub handled_by: Option<String>,
    pub handled_at: Option<AlertTimestamp>,
    pub media_urls: Option<Vec<String>>,
    pub media_count: Option<i32>,
    pub has_media: Option<bool>,
}

// ============================================================================
// Normalized alert
// ============================================================================

/// A normalized alert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    pub sender_id: String,
    pub sender_name: String,
    pub receiver_id: String,
    pub receiver_name: String,
    pub content: String,
    pub message: String,
    pub timestamp: Option<AlertTimestamp>,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub chat_room_id: String,
    pub status: AlertStatus,
    pub location: String,
    pub is_handled: bool,
    pub handled_by: String,
    pub handled_at: Option<AlertTimestamp>,
    pub media_urls: Vec<String>,
    pub media_count: u32,
    pub has_media: bool,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

impl From<RawAlert> for Alert {
    fn from(raw: RawAlert) -> Self {
        let content = non_empty(raw.content);
        let message = non_empty(raw.message);
        let media_urls = raw.media_urls.unwrap_or_default();
        let media_count = raw.media_count.map_or(0, |c| u32::try_from(c).unwrap_or(0));
        let has_media =
            !media_urls.is_empty() || (raw.has_media == Some(true) && media_count > 0);

        Self {
            id: raw.id,
            sender_id: raw.sender_id.unwrap_or_default(),
            sender_name: non_empty(raw.sender_name).unwrap_or_else(|| UNKNOWN_SENDER.to_string()),
            receiver_id: raw.receiver_id.unwrap_or_default(),
            receiver_name: non_empty(raw.receiver_name)
                .unwrap_or_else(|| UNKNOWN_SENDER.to_string()),
            content: content
                .clone()
                .or_else(|| message.clone())
                .unwrap_or_else(|| DEFAULT_CONTENT.to_string()),
            message: message
                .or(content)
                .unwrap_or_else(|| DEFAULT_CONTENT.to_string()),
            timestamp: raw.timestamp,
            alert_type: non_empty(raw.alert_type).map_or(AlertType::ManualAlert, AlertType::from),
            chat_room_id: raw.chat_room_id.unwrap_or_default(),
            status: raw.status.map_or(AlertStatus::Pending, AlertStatus::from),
            location: raw.location.unwrap_or_default(),
            is_handled: raw.is_handled.unwrap_or(false),
            handled_by: raw.handled_by.unwrap_or_default(),
            handled_at: raw.handled_at,
            media_urls,
            media_count,
            has_media,
        }
    }
}

impl Alert {
    /// Resolved when either the status or the flag says so.
    ///
    /// Producers do not keep the two in sync, so both are consulted.
    pub fn is_resolved(&self) -> bool {
        self.status == AlertStatus::Handled || self.is_handled
    }

    /// Whether the acknowledge affordance should be offered
    #[inline]
    pub fn can_acknowledge(&self) -> bool {
        !self.is_resolved()
    }

    pub fn severity(&self) -> Severity {
        if self.alert_type == AlertType::ChatEmergency {
            Severity::High
        } else if self.has_media || !self.media_urls.is_empty() {
            Severity::Medium
        } else {
            Severity::Standard
        }
    }

    /// Card title
    pub fn title(&self) -> &'static str {
        match self.severity() {
            Severity::High => "Chat Emergency",
            Severity::Medium => "Alert with Media",
            Severity::Standard => "Emergency Alert",
        }
    }

    /// Media count shown on the card
    pub fn media_total(&self) -> usize {
        if self.media_count > 0 {
            self.media_count as usize
        } else {
            self.media_urls.len()
        }
    }

    /// Apply an acknowledgment in place
    pub fn apply_acknowledgment(&mut self, ack: &Acknowledgment) {
        self.status = AlertStatus::Handled;
        self.is_handled = true;
        self.handled_by.clone_from(&ack.handled_by);
        self.handled_at = Some(ack.handled_at);
    }
}

// ============================================================================
// Acknowledgment
// ============================================================================

/// The fields written when an admin marks an alert handled
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Acknowledgment {
    pub handled_by: String,
    pub handled_at: AlertTimestamp,
}

impl Acknowledgment {
    pub fn new(handled_by: impl Into<String>, handled_at: AlertTimestamp) -> Self {
        Self {
            handled_by: handled_by.into(),
            handled_at,
        }
    }
}
