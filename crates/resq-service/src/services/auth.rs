//! Authentication service
//!
//! Admin login, token refresh, logout and the current admin lookup. Login and
//! refresh both end in the session guard's admin check, so a non-admin never
//! holds a live session.

use resq_common::TokenPair;
use resq_core::{AdminSession, RefreshSession};
use tracing::{info, instrument, warn};

use crate::dto::{AdminResponse, AuthResponse, LoginRequest, LogoutRequest, RefreshTokenRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::guard::SessionGuard;

/// Authentication service
pub struct AuthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Login with email and password
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<AuthResponse> {
        let identity = self
            .ctx
            .identity_repo()
            .find_by_email(&request.email)
            .await?
            .ok_or_else(|| {
                warn!(email = %request.email, "Login failed: identity not found");
                ServiceError::invalid_credentials()
            })?;

        let password_hash = self
            .ctx
            .identity_repo()
            .get_password_hash(&identity.uid)
            .await?
            .ok_or_else(|| {
                warn!(uid = %identity.uid, "Login failed: no password hash");
                ServiceError::invalid_credentials()
            })?;

        if let Err(e) = self
            .ctx
            .password_service()
            .verify_or_error(&request.password, &password_hash)
        {
            warn!(uid = %identity.uid, "Login failed: invalid password");
            return Err(e.into());
        }

        // Authenticated; now the admin check
        let session = SessionGuard::new(self.ctx).verify(&identity.uid).await?;

        if let Err(e) = self.ctx.identity_repo().touch_last_login(&session.uid).await {
            warn!(uid = %session.uid, error = %e, "Failed to record last login");
        }

        let tokens = self.ctx.jwt_service().issue(&session.uid)?;
        self.remember(&tokens, &session.uid).await?;

        info!(uid = %session.uid, "Admin logged in");

        Ok(Self::response(tokens, &session))
    }

    /// Rotate a refresh token.
    ///
    /// The admin flag is checked again; a withdrawn flag ends every session.
    #[instrument(skip(self, request))]
    pub async fn refresh(&self, request: RefreshTokenRequest) -> ServiceResult<AuthResponse> {
        let claims = self
            .ctx
            .jwt_service()
            .validate_refresh_token(&request.refresh_token)?;

        let stored = self
            .ctx
            .session_store()
            .validate(&request.refresh_token)
            .await?
            .ok_or_else(|| {
                warn!(uid = %claims.uid(), "Refresh failed: token revoked or expired");
                ServiceError::invalid_token()
            })?;

        if stored.uid != claims.uid() {
            warn!(uid = %claims.uid(), "Refresh failed: token subject mismatch");
            return Err(ServiceError::invalid_token());
        }

        let session = SessionGuard::new(self.ctx).verify(&stored.uid).await?;

        self.ctx
            .session_store()
            .revoke(&request.refresh_token)
            .await?;

        let tokens = self
            .ctx
            .jwt_service()
            .issue_for_session(&session.uid, &stored.session_id)?;
        self.remember(&tokens, &session.uid).await?;

        info!(uid = %session.uid, "Refresh token rotated");

        Ok(Self::response(tokens, &session))
    }

    /// Logout: revoke one refresh token, or all of them when none is given
    #[instrument(skip(self, request))]
    pub async fn logout(&self, uid: &str, request: LogoutRequest) -> ServiceResult<()> {
        match request.refresh_token {
            Some(token) => {
                self.ctx.session_store().revoke(&token).await?;
                info!(uid = %uid, "Admin logged out");
            }
            None => {
                let revoked = self.ctx.session_store().revoke_all(uid).await?;
                info!(uid = %uid, revoked, "Admin logged out everywhere");
            }
        }
        Ok(())
    }

    /// The signed-in admin
    pub fn current_admin(&self, session: &AdminSession) -> AdminResponse {
        AdminResponse::from(session)
    }

    async fn remember(&self, tokens: &TokenPair, uid: &str) -> ServiceResult<()> {
        let session = RefreshSession::new(uid, tokens.session_id.as_str());
        self.ctx
            .session_store()
            .store(&tokens.refresh_token, &session)
            .await?;
        Ok(())
    }

    fn response(tokens: TokenPair, session: &AdminSession) -> AuthResponse {
        AuthResponse::new(
            tokens.access_token,
            tokens.refresh_token,
            tokens.expires_in,
            AdminResponse::from(session),
        )
    }
}
