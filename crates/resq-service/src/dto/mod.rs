//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for API inputs
//! - Response DTOs for serializing API outputs
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{AlertListQuery, LoginRequest, LogoutRequest, RefreshTokenRequest};

pub use responses::{
    AdminResponse, AlertListResponse, AlertResponse, AuthResponse, HealthChecks,
    HealthResponse, PartyResponse, ReadinessResponse, StatusCounts, UserProfileResponse,
};
