//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in resq-core.

mod admin;
mod alert;
mod error;
mod identity;
mod user;

pub use admin::PgAdminRepository;
pub use alert::PgAlertRepository;
pub use identity::PgIdentityRepository;
pub use user::PgUserRepository;
pub(crate) use error::map_db_error;
