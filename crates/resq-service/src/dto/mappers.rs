//! Entity to DTO mappers

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use resq_core::view::presentation::{display_content, location_link, preview, time_since, PREVIEW_LIMIT};
use resq_core::{display_name, AdminSession, Alert, UserInfo, UserProfile};

use super::responses::{
    AdminResponse, AlertResponse, PartyResponse, StatusCounts, UserProfileResponse,
};

// ============================================================================
// Admin Mappers
// ============================================================================

impl From<&AdminSession> for AdminResponse {
    fn from(session: &AdminSession) -> Self {
        Self {
            uid: session.uid.clone(),
            email: session.email.clone(),
            display_name: session.display_name.clone(),
            name: session.name.clone(),
        }
    }
}

// ============================================================================
// Alert Mappers
// ============================================================================

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

impl AlertResponse {
    /// Build a card, resolving sender and receiver names through `names`
    pub fn build(alert: &Alert, names: &HashMap<String, UserInfo>, now: DateTime<Utc>) -> Self {
        let content = display_content(alert);
        let severity = alert.severity();

        Self {
            id: alert.id.clone(),
            alert_type: alert.alert_type.as_str().to_string(),
            title: alert.title().to_string(),
            severity,
            severity_label: severity.label().to_string(),
            status: alert.status.as_str().to_string(),
            resolved: alert.is_resolved(),
            can_acknowledge: alert.can_acknowledge(),
            preview: preview(&content, PREVIEW_LIMIT),
            content,
            location_link: location_link(alert),
            sender: PartyResponse {
                id: alert.sender_id.clone(),
                name: display_name(&alert.sender_name, &alert.sender_id, names),
            },
            receiver: PartyResponse {
                id: alert.receiver_id.clone(),
                name: display_name(&alert.receiver_name, &alert.receiver_id, names),
            },
            chat_room_id: non_empty(&alert.chat_room_id),
            timestamp: alert.timestamp.and_then(|ts| ts.to_datetime()),
            time_since: time_since(alert.timestamp, now),
            handled_by: non_empty(&alert.handled_by),
            handled_at: alert.handled_at.and_then(|ts| ts.to_datetime()),
            has_media: alert.has_media,
            media_urls: alert.media_urls.clone(),
            media_count: alert.media_total(),
        }
    }

    /// Build cards for a list, keeping its order
    pub fn build_all(
        alerts: &[Alert],
        names: &HashMap<String, UserInfo>,
        now: DateTime<Utc>,
    ) -> Vec<Self> {
        alerts.iter().map(|a| Self::build(a, names, now)).collect()
    }
}

impl StatusCounts {
    pub fn of(alerts: &[Alert]) -> Self {
        let handled = alerts.iter().filter(|a| a.is_resolved()).count();
        Self {
            all: alerts.len(),
            pending: alerts.len() - handled,
            handled,
        }
    }
}

/// Every sender and receiver id referenced by a list of alerts
pub fn party_ids(alerts: &[Alert]) -> impl Iterator<Item = &str> {
    alerts
        .iter()
        .flat_map(|a| [a.sender_id.as_str(), a.receiver_id.as_str()])
}

// ============================================================================
// User Mappers
// ============================================================================

impl From<&UserProfile> for UserProfileResponse {
    fn from(profile: &UserProfile) -> Self {
        Self {
            id: profile.id.clone(),
            name: profile.name.clone(),
            email: profile.email.clone(),
            phone_number: profile.phone_number.clone(),
            formatted_phone: profile.formatted_phone(),
            photo_url: profile.photo_url.clone(),
            bio: profile.bio.clone(),
            country_code: profile.country_code.clone(),
            created_at: profile.created_at,
            last_login_at: profile.last_login_at,
            auth_provider: profile.auth_provider.clone(),
        }
    }
}

impl From<UserProfile> for UserProfileResponse {
    fn from(profile: UserProfile) -> Self {
        Self::from(&profile)
    }
}
