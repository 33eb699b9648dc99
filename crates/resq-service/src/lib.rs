//! # resq-service
//!
//! Application layer: admin authentication and the session guard, the live
//! alert feed, the user directory cache, alert listing and acknowledgment,
//! and the profile viewer. DTOs for the API live here too.

pub mod dto;
pub mod services;

pub use services::{
    AlertFeed, AlertFeedHandle, AlertService, AuthService, FeedFailure, FeedSnapshot, FeedState,
    ProfileService, ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult,
    SessionGuard, UserDirectory,
};
