//! Business logic services

pub mod alert;
pub mod auth;
pub mod context;
pub mod directory;
pub mod error;
pub mod feed;
pub mod guard;
pub mod profile;

#[cfg(test)]
pub(crate) mod testing;

pub use alert::AlertService;
pub use auth::AuthService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use directory::UserDirectory;
pub use error::{ServiceError, ServiceResult};
pub use feed::{AlertFeed, AlertFeedHandle, FeedFailure, FeedSnapshot, FeedState};
pub use guard::SessionGuard;
pub use profile::ProfileService;
