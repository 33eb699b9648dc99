//! Directory entries and full user profiles

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Display name for users the directory could not find
pub const UNKNOWN_USER: &str = "Unknown User";

/// The part of a profile the directory cache keeps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

impl UserInfo {
    /// Placeholder entry for an id with no profile
    pub fn unknown(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: UNKNOWN_USER.to_string(),
            email: None,
            phone_number: None,
        }
    }

    #[inline]
    pub fn is_placeholder(&self) -> bool {
        self.name == UNKNOWN_USER && self.email.is_none() && self.phone_number.is_none()
    }
}

/// A full user profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    #[serde(rename = "photoURL")]
    pub photo_url: Option<String>,
    pub bio: Option<String>,
    pub country_code: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub auth_provider: Option<String>,
}

impl UserProfile {
    /// Build a profile, falling back to the placeholder name
    pub fn new(id: impl Into<String>, name: Option<String>) -> Self {
        Self {
            id: id.into(),
            name: name
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| UNKNOWN_USER.to_string()),
            email: None,
            phone_number: None,
            photo_url: None,
            bio: None,
            country_code: None,
            created_at: None,
            last_login_at: None,
            auth_provider: None,
        }
    }

    /// Phone number with the country code prefixed when both are known
    pub fn formatted_phone(&self) -> Option<String> {
        let phone = self.phone_number.as_deref()?;
        match self.country_code.as_deref() {
            Some(code) if !code.is_empty() && !phone.starts_with('+') => {
                Some(format!("{code} {phone}"))
            }
            _ => Some(phone.to_string()),
        }
    }
}

impl From<&UserProfile> for UserInfo {
    fn from(profile: &UserProfile) -> Self {
        Self {
            id: profile.id.clone(),
            name: profile.name.clone(),
            email: profile.email.clone(),
            phone_number: profile.phone_number.clone(),
        }
    }
}
