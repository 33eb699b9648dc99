//! Profile viewer - full user profile behind a sender/receiver name

use resq_core::DomainError;
use tracing::{debug, instrument};

use crate::dto::UserProfileResponse;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Profile service
pub struct ProfileService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ProfileService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Read a full profile.
    ///
    /// Always goes to the store; the fresh read also refreshes the
    /// directory entry used for alert card names.
    #[instrument(skip(self))]
    pub async fn get_profile(&self, user_id: &str) -> ServiceResult<UserProfileResponse> {
        if user_id.trim().is_empty() {
            return Err(ServiceError::validation("User id is required"));
        }

        let profile = self
            .ctx
            .user_repo()
            .find_profile(user_id)
            .await?
            .ok_or_else(|| ServiceError::Domain(DomainError::UserNotFound(user_id.to_string())))?;

        self.ctx.directory().remember(&profile);
        debug!(user_id = %user_id, "Profile loaded");

        Ok(UserProfileResponse::from(&profile))
    }
}
