//! Domain entities - core business objects

mod admin;
mod alert;
mod user;

pub use admin::{admin_display_name, AdminRecord, AdminSession, Identity};
pub use alert::{Acknowledgment, Alert, AlertStatus, AlertType, RawAlert, Severity, UNKNOWN_SENDER};
pub use user::{UserInfo, UserProfile, UNKNOWN_USER};
