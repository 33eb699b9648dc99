//! Alert model -> raw record -> normalized entity

use resq_core::entities::{Alert, RawAlert};
use resq_core::value_objects::AlertTimestamp;

use crate::models::AlertModel;

fn timestamp(seconds: Option<i64>, nanos: Option<i32>) -> Option<AlertTimestamp> {
    seconds.map(|s| AlertTimestamp::new(s, nanos.unwrap_or(0)))
}

/// Split a timestamp into its two bound columns
pub fn timestamp_parts(ts: AlertTimestamp) -> (i64, i32) {
    (ts.seconds, ts.nanoseconds)
}

impl From<AlertModel> for RawAlert {
    fn from(model: AlertModel) -> Self {
        RawAlert {
            id: model.id,
            sender_id: model.sender_id,
            sender_name: model.sender_name,
            receiver_id: model.receiver_id,
            receiver_name: model.receiver_name,
            content: model.content,
            message: model.message,
            timestamp: timestamp(model.ts_seconds, model.ts_nanos),
            alert_type: model.alert_type,
            chat_room_id: model.chat_room_id,
            status: model.status,
            location: model.location,
            is_handled: model.is_handled,
            handled_by: model.handled_by,
            handled_at: timestamp(model.handled_at_seconds, model.handled_at_nanos),
            media_urls: model.media_urls,
            media_count: model.media_count,
            has_media: model.has_media,
        }
    }
}

impl From<AlertModel> for Alert {
    fn from(model: AlertModel) -> Self {
        Alert::from(RawAlert::from(model))
    }
}
