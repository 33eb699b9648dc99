//! # resq-core
//!
//! Domain layer for the ResQ admin dashboard: alerts and their normalization,
//! user directory entries, admin sessions, repository traits and the pure
//! filter/sort/presentation rules applied to alert views.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod events;
pub mod traits;
pub mod value_objects;
pub mod view;

// Re-export commonly used types at crate root
pub use entities::{
    admin_display_name, Acknowledgment, AdminRecord, AdminSession, Alert, AlertStatus, AlertType,
    Identity, RawAlert, Severity, UserInfo, UserProfile, UNKNOWN_SENDER, UNKNOWN_USER,
};
pub use error::DomainError;
pub use events::{AlertChange, ChangeOp};
pub use traits::{
    AdminRepository, AlertChangeFeed, AlertChangeStream, AlertRepository, IdentityRepository,
    RefreshSession, RepoResult, SessionStore, UserRepository,
};
pub use value_objects::AlertTimestamp;
pub use view::{apply_view, display_name, AlertView, SortOrder, StatusFilter};
