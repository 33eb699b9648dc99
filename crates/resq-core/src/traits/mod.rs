//! Repository traits (ports)

mod repositories;
mod sessions;

pub use repositories::{
    AdminRepository, AlertChangeFeed, AlertChangeStream, AlertRepository, IdentityRepository,
    RepoResult, UserRepository,
};
pub use sessions::{RefreshSession, SessionStore};
