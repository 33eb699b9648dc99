//! Derived values shown on an alert card

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::entities::Alert;
use crate::value_objects::AlertTimestamp;

/// Characters shown in a collapsed card
pub const PREVIEW_LIMIT: usize = 100;

const MAPS_PREFIX: &str = "https://maps.google.com";

static MAPS_LINK: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"https://maps\.google\.com/\?q=[\d.-]+,[\d.-]+").ok());

fn find_maps_link(text: &str) -> Option<&str> {
    MAPS_LINK.as_ref()?.find(text).map(|m| m.as_str())
}

/// Map link for the alert: the location field when it is a maps URL,
/// otherwise the first maps URL embedded in the text.
pub fn location_link(alert: &Alert) -> Option<String> {
    if alert.location.starts_with(MAPS_PREFIX) {
        return Some(alert.location.clone());
    }
    find_maps_link(&alert.content).map(str::to_string)
}

/// Alert text with the embedded maps URL removed
pub fn display_content(alert: &Alert) -> String {
    let text = &alert.content;
    match find_maps_link(text) {
        Some(link) => text.replacen(link, "", 1).trim().to_string(),
        None => text.trim().to_string(),
    }
}

/// Truncate to `limit` characters, marking the cut with "..."
pub fn preview(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Coarse age of an alert: "3d ago", "5h ago", "12m ago"
///
/// Timestamps too large to express in milliseconds read as "Unknown".
pub fn time_since(timestamp: Option<AlertTimestamp>, now: DateTime<Utc>) -> String {
    let Some(ts) = timestamp else {
        return "Unknown".to_string();
    };
    let Some(diff_ms) = ts
        .as_millis()
        .and_then(|millis| now.timestamp_millis().checked_sub(millis))
    else {
        return "Unknown".to_string();
    };
    let minutes = diff_ms.div_euclid(60_000);
    let hours = minutes.div_euclid(60);
    let days = hours.div_euclid(24);

    if days > 0 {
        format!("{days}d ago")
    } else if hours > 0 {
        format!("{hours}h ago")
    } else {
        format!("{minutes}m ago")
    }
}
