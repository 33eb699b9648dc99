//! Alert database model (shared by both alert tables)

use sqlx::FromRow;

/// Database model for `dashboard_alerts` / `emergency_alerts`
#[derive(Debug, Clone, FromRow)]
pub struct AlertModel {
    pub id: String,
    pub sender_id: Option<String>,
    pub sender_name: Option<String>,
    pub receiver_id: Option<String>,
    pub receiver_name: Option<String>,
    pub content: Option<String>,
    pub message: Option<String>,
    pub ts_seconds: Option<i64>,
    pub ts_nanos: Option<i32>,
    #[sqlx(rename = "type")]
    pub alert_type: Option<String>,
    pub chat_room_id: Option<String>,
    pub status: Option<String>,
    pub location: Option<String>,
    pub is_handled: Option<bool>,
    pub handled_by: Option<String>,
    pub handled_at_seconds: Option<i64>,
    pub handled_at_nanos: Option<i32>,
    pub media_urls: Option<Vec<String>>,
    pub media_count: Option<i32>,
    pub has_media: Option<bool>,
}

/// Column list matching [`AlertModel`]
pub(crate) const ALERT_COLUMNS: &str = "id, sender_id, sender_name, receiver_id, receiver_name, \
     content, message, ts_seconds, ts_nanos, type, chat_room_id, status, location, is_handled, \
     handled_by, handled_at_seconds, handled_at_nanos, media_urls, media_count, has_media";
