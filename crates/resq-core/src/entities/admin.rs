//! Admin identities and verified admin sessions

use serde::{Deserialize, Serialize};

/// An account known to the identity provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
}

/// Entry in the admins collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminRecord {
    pub uid: String,
    pub is_admin: bool,
    pub name: Option<String>,
}

/// Admin name shown in the dashboard header: stored name, else email
/// local-part, else "Admin".
pub fn admin_display_name(record_name: Option<&str>, email: &str) -> String {
    if let Some(name) = record_name.filter(|n| !n.is_empty()) {
        return name.to_string();
    }
    match email.split('@').next() {
        Some(local) if !local.is_empty() => local.to_string(),
        _ => "Admin".to_string(),
    }
}

/// An identity that passed the admin check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSession {
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
    pub name: String,
}

impl AdminSession {
    pub fn new(identity: Identity, record: &AdminRecord) -> Self {
        let name = admin_display_name(record.name.as_deref(), &identity.email);
        Self {
            uid: identity.uid,
            email: identity.email,
            display_name: identity.display_name,
            name,
        }
    }

    /// Value written to `handledBy`: display name, else email, else uid
    pub fn handler_identity(&self) -> &str {
        [self.display_name.as_deref(), Some(self.email.as_str())]
            .into_iter()
            .flatten()
            .find(|v| !v.is_empty())
            .unwrap_or(self.uid.as_str())
    }
}
