//! Authentication extractors
//!
//! [`AuthUser`] only checks the bearer token. [`AdminUser`] additionally runs
//! the session guard, so every request re-checks the admin flag.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use resq_core::AdminSession;
use resq_service::SessionGuard;

use crate::response::ApiError;
use crate::state::AppState;

async fn bearer_token<S>(parts: &mut Parts, state: &S) -> Result<String, ApiError>
where
    S: Send + Sync,
{
    let TypedHeader(Authorization(bearer)) =
        TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::MissingAuth)?;
    Ok(bearer.token().to_string())
}

/// Holder of a valid access token
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub uid: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts, state).await?;
        let app_state = AppState::from_ref(state);

        let claims = app_state
            .jwt_service()
            .validate_access_token(&token)
            .map_err(|e| {
                tracing::warn!(error = %e, "Invalid access token");
                ApiError::InvalidAuthFormat
            })?;

        Ok(Self {
            uid: claims.uid().to_string(),
        })
    }
}

/// Signed-in admin whose flag was confirmed for this request
#[derive(Debug, Clone)]
pub struct AdminUser(pub AdminSession);

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts, state).await?;
        let app_state = AppState::from_ref(state);

        let session = SessionGuard::new(app_state.service_context())
            .authenticate(&token)
            .await?;

        Ok(Self(session))
    }
}
