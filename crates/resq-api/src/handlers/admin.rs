//! Signed-in admin handlers

use axum::{extract::State, Json};
use resq_service::dto::AdminResponse;
use resq_service::AuthService;

use crate::extractors::AdminUser;
use crate::state::AppState;

/// The admin behind the access token
///
/// GET /admin/@me
pub async fn get_current_admin(
    State(state): State<AppState>,
    AdminUser(session): AdminUser,
) -> Json<AdminResponse> {
    let service = AuthService::new(state.service_context());
    Json(service.current_admin(&session))
}
