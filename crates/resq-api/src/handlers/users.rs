//! User profile handlers

use axum::{
    extract::{Path, State},
    Json,
};
use resq_service::dto::UserProfileResponse;
use resq_service::ProfileService;

use crate::extractors::AdminUser;
use crate::response::ApiResult;
use crate::state::AppState;

/// Full profile of an alert sender or receiver
///
/// GET /users/:user_id
pub async fn get_user_profile(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(user_id): Path<String>,
) -> ApiResult<Json<UserProfileResponse>> {
    let service = ProfileService::new(state.service_context());
    Ok(Json(service.get_profile(&user_id).await?))
}
