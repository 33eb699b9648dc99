//! Axum extractors for request handling

mod auth;
mod validated;

pub use auth::{AdminUser, AuthUser};
pub use validated::ValidatedJson;
