//! Reservation service.
//!
//! Overlapping reservations for the same equipment are allowed; schedule
//! conflicts are resolved manually by staff.

use crate::{
    error::{AppError, AppResult},
    models::reservation::{CreateReservation, Reservation, ReservationDetails, UpdateReservation},
    models::user::UserClaims,
    repository::Repository,
    services::{audit::AuditService, notifications::NotificationsService, resolver::ReferenceResolver},
};

fn identity_line(details: &ReservationDetails) -> String {
    format!(
        "ID: {} - {} {} ({}) for {}",
        details.id,
        details.equipment_brand,
        details.equipment_model,
        details.equipment_serial,
        details.requester_username
    )
}

#[derive(Clone)]
pub struct ReservationsService {
    repository: Repository,
    resolver: ReferenceResolver,
    audit: AuditService,
    notifications: NotificationsService,
}

impl ReservationsService {
    pub fn new(repository: Repository) -> Self {
        Self {
            resolver: ReferenceResolver::new(repository.clone()),
            audit: AuditService::new(repository.clone()),
            notifications: NotificationsService::new(repository.clone()),
            repository,
        }
    }

    pub async fn list(&self) -> AppResult<Vec<ReservationDetails>> {
        self.repository.reservations.list().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<ReservationDetails> {
        self.repository.reservations.get_details(id).await
    }

    /// Create a reservation through the mutation pipeline. The requesting
    /// user defaults to the acting user when omitted.
    pub async fn create(
        &self,
        actor: &UserClaims,
        data: CreateReservation,
    ) -> AppResult<ReservationDetails> {
        if data.end_time <= data.start_time {
            return Err(AppError::Validation(
                "end_time must be after start_time".to_string(),
            ));
        }

        let equipment = self.resolver.resolve_equipment(data.equipment_id).await?;
        let user_id = data.user_id.unwrap_or(actor.user_id);
        let user = self.resolver.resolve_user(user_id).await?;

        let reservation = self
            .repository
            .reservations
            .create(
                equipment.id,
                user.id,
                data.start_time,
                data.end_time,
                data.reason.as_deref(),
            )
            .await?;

        let details = self.repository.reservations.get_details(reservation.id).await?;

        self.audit
            .record(
                Some(actor.user_id),
                "create",
                "reservation",
                &identity_line(&details),
            )
            .await?;

        self.notifications
            .notify(
                Some(actor.user_id),
                "Reservation created",
                &format!(
                    "{} {} ({}) reserved for {}",
                    details.equipment_brand,
                    details.equipment_model,
                    details.equipment_serial,
                    details.requester_username
                ),
            )
            .await;

        Ok(details)
    }

    /// Update a reservation through the mutation pipeline
    pub async fn update(
        &self,
        actor: &UserClaims,
        id: i32,
        data: UpdateReservation,
    ) -> AppResult<ReservationDetails> {
        if let Some(equipment_id) = data.equipment_id {
            self.resolver.resolve_equipment(equipment_id).await?;
        }
        if let Some(user_id) = data.user_id {
            self.resolver.resolve_user(user_id).await?;
        }

        let reservation: Reservation = self.repository.reservations.update(id, &data).await?;
        let details = self.repository.reservations.get_details(reservation.id).await?;

        self.audit
            .record(
                Some(actor.user_id),
                "update",
                "reservation",
                &identity_line(&details),
            )
            .await?;

        self.notifications
            .notify(
                Some(actor.user_id),
                "Reservation updated",
                &format!("Updated reservation {}", details.id),
            )
            .await;

        Ok(details)
    }

    /// Delete a reservation; identifying detail captured before the delete
    pub async fn delete(&self, actor: &UserClaims, id: i32) -> AppResult<()> {
        let details = self.repository.reservations.get_details(id).await?;
        let snapshot = identity_line(&details);

        self.repository.reservations.delete(id).await?;

        self.audit
            .record(Some(actor.user_id), "delete", "reservation", &snapshot)
            .await?;

        self.notifications
            .notify(
                Some(actor.user_id),
                "Reservation deleted",
                &format!("Cancelled: {}", snapshot),
            )
            .await;

        Ok(())
    }
}
