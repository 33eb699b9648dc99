//! Request DTOs for API endpoints
//!
//! Body DTOs implement `Deserialize` and `Validate` for input validation.

use resq_core::{AlertView, DomainError, SortOrder, StatusFilter};
use serde::Deserialize;
use validator::Validate;

// ============================================================================
// Auth Requests
// ============================================================================

/// Admin login request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Token refresh request
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Logout request (optional refresh token to revoke)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct LogoutRequest {
    pub refresh_token: Option<String>,
}

// ============================================================================
// Alert Queries
// ============================================================================

/// Query string of `GET /alerts`
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AlertListQuery {
    pub status: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
}

impl AlertListQuery {
    /// Parse into a view; absent parameters take their defaults
    ///
    /// # Errors
    /// Returns `InvalidViewParameter` for an unknown status or sort value
    pub fn into_view(self) -> Result<AlertView, DomainError> {
        let status = match self.status.as_deref().map(str::trim) {
            None | Some("") => StatusFilter::default(),
            Some(s) => s.parse()?,
        };
        let sort = match self.sort.as_deref().map(str::trim) {
            None | Some("") => SortOrder::default(),
            Some(s) => s.parse()?,
        };
        Ok(AlertView::new(status, self.search.unwrap_or_default(), sort))
    }
}
