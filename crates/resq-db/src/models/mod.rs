//! Database models - SQLx-compatible structs for PostgreSQL tables

mod admin;
mod alert;
mod identity;
mod user;

pub use admin::AdminModel;
pub use alert::AlertModel;
pub(crate) use alert::ALERT_COLUMNS;
pub use identity::IdentityModel;
pub use user::UserModel;
