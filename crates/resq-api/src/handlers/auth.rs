//! Authentication handlers
//!
//! Admin login, token refresh and logout.

use axum::{extract::State, Json};
use resq_service::dto::{AuthResponse, LoginRequest, LogoutRequest, RefreshTokenRequest};
use resq_service::AuthService;

use crate::extractors::{AuthUser, ValidatedJson};
use crate::response::{ApiResult, NoContent};
use crate::state::AppState;

/// Sign in with email and password; non-admins are refused with 403
///
/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let service = AuthService::new(state.service_context());
    let response = service.login(request).await?;
    Ok(Json(response))
}

/// Rotate a refresh token, re-checking the admin flag
///
/// POST /auth/refresh
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(request): Json<RefreshTokenRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let service = AuthService::new(state.service_context());
    let response = service.refresh(request).await?;
    Ok(Json(response))
}

/// Sign out one session, or every session when no refresh token is given
///
/// POST /auth/logout
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
    body: Option<Json<LogoutRequest>>,
) -> ApiResult<NoContent> {
    let service = AuthService::new(state.service_context());
    let request = body.map(|Json(b)| b).unwrap_or_default();
    service.logout(&auth.uid, request).await?;
    Ok(NoContent)
}
