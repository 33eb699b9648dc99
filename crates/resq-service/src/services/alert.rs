//! Alert service - listing, single lookup and acknowledgment
//!
//! Acknowledging is a single unconditional write of `status`, `isHandled`,
//! `handledBy` and `handledAt`. Two admins acknowledging the same alert both
//! succeed and the later write wins.

use chrono::Utc;
use resq_core::{apply_view, Acknowledgment, AdminSession, AlertTimestamp, AlertView};
use tracing::{info, instrument, warn};

use crate::dto::mappers::party_ids;
use crate::dto::{AlertListResponse, AlertResponse, StatusCounts};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Alert service
pub struct AlertService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AlertService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Current alerts through a view, names resolved
    #[instrument(skip(self))]
    pub async fn list(&self, view: AlertView) -> ServiceResult<AlertListResponse> {
        let alerts = self.ctx.alert_repo().list_newest_first().await?;
        let names = self.ctx.directory().resolve(party_ids(&alerts)).await;

        let visible = apply_view(&alerts, &view, &names);
        let cards = AlertResponse::build_all(&visible, &names, Utc::now());

        Ok(AlertListResponse {
            total: cards.len(),
            counts: StatusCounts::of(&alerts),
            alerts: cards,
            view,
        })
    }

    /// One alert card
    #[instrument(skip(self))]
    pub async fn get(&self, alert_id: &str) -> ServiceResult<AlertResponse> {
        let alert = self
            .ctx
            .alert_repo()
            .find_by_id(alert_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Alert", alert_id))?;

        let names = self
            .ctx
            .directory()
            .resolve(party_ids(std::slice::from_ref(&alert)))
            .await;

        Ok(AlertResponse::build(&alert, &names, Utc::now()))
    }

    /// Mark an alert handled by the signed-in admin
    #[instrument(skip(self, admin), fields(admin = %admin.uid))]
    pub async fn acknowledge(
        &self,
        alert_id: &str,
        admin: &AdminSession,
    ) -> ServiceResult<AlertResponse> {
        let mut alert = self
            .ctx
            .alert_repo()
            .find_by_id(alert_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Alert", alert_id))?;

        if alert.is_resolved() {
            warn!(
                alert_id = %alert_id,
                previous_handler = %alert.handled_by,
                "Alert already handled; overwriting acknowledgment"
            );
        }

        let ack = Acknowledgment::new(admin.handler_identity(), AlertTimestamp::now());
        self.ctx.alert_repo().mark_handled(alert_id, &ack).await?;
        alert.apply_acknowledgment(&ack);

        info!(alert_id = %alert_id, handled_by = %ack.handled_by, "Alert acknowledged");

        let names = self
            .ctx
            .directory()
            .resolve(party_ids(std::slice::from_ref(&alert)))
            .await;
        Ok(AlertResponse::build(&alert, &names, Utc::now()))
    }
}
