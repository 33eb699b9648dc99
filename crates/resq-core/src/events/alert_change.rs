//! Alert change notifications
//!
//! The store emits one notification per insert, update or delete on the
//! active alert collection. The live feed only uses them as a "something
//! changed" signal and always re-reads the full list.

use serde::{Deserialize, Serialize};

/// Kind of write that produced the notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeOp {
    Insert,
    Update,
    Delete,
}

/// A single change notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertChange {
    pub collection: String,
    pub id: String,
    pub op: ChangeOp,
}

impl AlertChange {
    /// Parse a notification payload
    pub fn from_payload(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(payload)
    }
}
