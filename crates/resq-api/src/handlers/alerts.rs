//! Alert handlers
//!
//! Listing through a view, single alert lookup and acknowledgment.

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use resq_service::dto::{AlertListQuery, AlertListResponse, AlertResponse};
use resq_service::AlertService;

use crate::extractors::AdminUser;
use crate::response::{ApiError, ApiResult};
use crate::state::AppState;

fn alert_id_param(raw: &str) -> ApiResult<&str> {
    if raw.trim().is_empty() {
        return Err(ApiError::invalid_path("alert id must not be blank"));
    }
    Ok(raw)
}

/// Alerts filtered, searched and sorted per the query string
///
/// GET /alerts?status=pending&search=flood&sort=severity
pub async fn list_alerts(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    query: Result<Query<AlertListQuery>, QueryRejection>,
) -> ApiResult<Json<AlertListResponse>> {
    let Query(query) = query.map_err(|e| ApiError::invalid_query(e.body_text()))?;
    let view = query.into_view()?;

    let service = AlertService::new(state.service_context());
    Ok(Json(service.list(view).await?))
}

/// One alert card
///
/// GET /alerts/:alert_id
pub async fn get_alert(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(alert_id): Path<String>,
) -> ApiResult<Json<AlertResponse>> {
    let alert_id = alert_id_param(&alert_id)?;
    let service = AlertService::new(state.service_context());
    Ok(Json(service.get(alert_id).await?))
}

/// Mark an alert handled by the calling admin
///
/// POST /alerts/:alert_id/handle
pub async fn acknowledge_alert(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(alert_id): Path<String>,
) -> ApiResult<Json<AlertResponse>> {
    let alert_id = alert_id_param(&alert_id)?;
    let service = AlertService::new(state.service_context());
    Ok(Json(service.acknowledge(alert_id, &admin).await?))
}
