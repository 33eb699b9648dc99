//! Domain errors - error types for the domain layer

use thiserror::Error;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Alert not found: {0}")]
    AlertNotFound(String),

    #[error("User profile not found: {0}")]
    UserNotFound(String),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid view parameter: {0}")]
    InvalidViewParameter(String),

    // =========================================================================
    // Authentication Errors
    // =========================================================================
    #[error("Invalid email or password")]
    InvalidCredentials,

    // =========================================================================
    // Live Feed Errors
    // =========================================================================
    #[error("Change feed disconnected")]
    FeedDisconnected,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::AlertNotFound(_) => "UNKNOWN_ALERT",
            Self::UserNotFound(_) => "UNKNOWN_USER",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidViewParameter(_) => "INVALID_VIEW_PARAMETER",

            // Auth
            Self::InvalidCredentials => "INVALID_CREDENTIALS",

            // Feed
            Self::FeedDisconnected => "FEED_DISCONNECTED",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::CacheError(_) => "CACHE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::AlertNotFound(_) | Self::UserNotFound(_))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_) | Self::InvalidViewParameter(_)
        )
    }

    /// Check if this is an authentication error
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::InvalidCredentials)
    }

    /// Errors that end a live feed for good
    pub fn is_feed_terminal(&self) -> bool {
        matches!(self, Self::FeedDisconnected | Self::DatabaseError(_))
    }
}
