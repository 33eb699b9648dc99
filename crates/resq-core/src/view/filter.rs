//! Status filter, text search and ordering for alert views

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::entities::{Alert, UserInfo, UNKNOWN_SENDER, UNKNOWN_USER};
use crate::error::DomainError;

/// Which alerts a view shows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Handled,
}

impl StatusFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Pending => "pending",
            Self::Handled => "handled",
        }
    }

    fn matches(self, alert: &Alert) -> bool {
        match self {
            Self::All => true,
            Self::Pending => !alert.is_resolved(),
            Self::Handled => alert.is_resolved(),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "pending" => Ok(Self::Pending),
            "handled" => Ok(Self::Handled),
            other => Err(DomainError::InvalidViewParameter(format!(
                "unknown status filter '{other}'"
            ))),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// View ordering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    Severity,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::Oldest => "oldest",
            Self::Severity => "severity",
        }
    }
}

impl FromStr for SortOrder {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" => Ok(Self::Newest),
            "oldest" => Ok(Self::Oldest),
            "severity" => Ok(Self::Severity),
            other => Err(DomainError::InvalidViewParameter(format!(
                "unknown sort order '{other}'"
            ))),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filter, search term and ordering of one view
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertView {
    pub status: StatusFilter,
    pub search: String,
    pub sort: SortOrder,
}

impl AlertView {
    pub fn new(status: StatusFilter, search: impl Into<String>, sort: SortOrder) -> Self {
        Self {
            status,
            search: search.into(),
            sort,
        }
    }
}

/// Name shown for a sender or receiver.
///
/// A real stored name wins; the "Unknown" placeholder written during
/// normalization defers to the directory.
pub fn display_name(stored: &str, id: &str, names: &HashMap<String, UserInfo>) -> String {
    if !stored.is_empty() && stored != UNKNOWN_SENDER {
        return stored.to_string();
    }
    names
        .get(id)
        .map(|u| u.name.as_str())
        .filter(|n| !n.is_empty())
        .unwrap_or(UNKNOWN_USER)
        .to_string()
}

fn matches_search(alert: &Alert, needle: &str, names: &HashMap<String, UserInfo>) -> bool {
    if needle.is_empty() {
        return true;
    }
    let text = if alert.content.is_empty() {
        &alert.message
    } else {
        &alert.content
    };
    text.to_lowercase().contains(needle)
        || display_name(&alert.sender_name, &alert.sender_id, names)
            .to_lowercase()
            .contains(needle)
        || display_name(&alert.receiver_name, &alert.receiver_id, names)
            .to_lowercase()
            .contains(needle)
}

/// Apply a view to a list of alerts.
///
/// Sorting is stable: equal keys keep their input order. Alerts without a
/// timestamp sort as the oldest.
pub fn apply_view(
    alerts: &[Alert],
    view: &AlertView,
    names: &HashMap<String, UserInfo>,
) -> Vec<Alert> {
    let needle = view.search.to_lowercase();

    let mut out: Vec<Alert> = alerts
        .iter()
        .filter(|a| view.status.matches(a))
        .filter(|a| matches_search(a, &needle, names))
        .cloned()
        .collect();

    match view.sort {
        SortOrder::Newest => out.sort_by(|a, b| b.timestamp.cmp(&a.timestamp)),
        SortOrder::Oldest => out.sort_by(|a, b| a.timestamp.cmp(&b.timestamp)),
        SortOrder::Severity => out.sort_by(|a, b| b.severity().cmp(&a.severity())),
    }

    out
}
