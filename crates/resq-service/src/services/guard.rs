//! Session guard - admits only identities that are flagged as admins
//!
//! Every authenticated request and every live feed connection passes through
//! here. An identity that is signed in but not (or no longer) an admin is
//! signed out everywhere before the denial is returned.

use resq_core::AdminSession;
use tracing::{debug, instrument, warn};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Admin session guard
pub struct SessionGuard<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> SessionGuard<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Validate an access token and run the admin check for its subject
    #[instrument(skip(self, access_token))]
    pub async fn authenticate(&self, access_token: &str) -> ServiceResult<AdminSession> {
        let claims = self.ctx.jwt_service().validate_access_token(access_token)?;
        self.verify(claims.uid()).await
    }

    /// Run the admin check for an authenticated identity.
    ///
    /// - unknown identity: 401
    /// - missing admin record or flag not `true`: sign out everywhere, 403
    #[instrument(skip(self))]
    pub async fn verify(&self, uid: &str) -> ServiceResult<AdminSession> {
        let identity = self
            .ctx
            .identity_repo()
            .find_by_uid(uid)
            .await?
            .ok_or_else(|| {
                debug!(uid = %uid, "Token subject has no identity");
                ServiceError::invalid_token()
            })?;

        match self.ctx.admin_repo().find_by_uid(uid).await? {
            Some(record) if record.is_admin => Ok(AdminSession::new(identity, &record)),
            Some(_) | None => {
                warn!(uid = %uid, "Access denied: identity is not an admin");
                self.sign_out(uid).await;
                Err(ServiceError::access_denied())
            }
        }
    }

    /// Revoke every refresh token of an identity
    pub async fn sign_out(&self, uid: &str) {
        match self.ctx.session_store().revoke_all(uid).await {
            Ok(revoked) => debug!(uid = %uid, revoked, "Signed out everywhere"),
            Err(e) => warn!(uid = %uid, error = %e, "Failed to revoke refresh tokens"),
        }
    }
}
