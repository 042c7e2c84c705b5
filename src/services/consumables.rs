//! Consumable stock service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::consumable::{Consumable, CreateConsumable, UpdateConsumable},
    models::user::UserClaims,
    repository::Repository,
    services::{audit::AuditService, notifications::NotificationsService},
};

fn identity_line(consumable: &Consumable) -> String {
    format!(
        "ID: {} - {} ({})",
        consumable.id, consumable.name, consumable.code
    )
}

#[derive(Clone)]
pub struct ConsumablesService {
    repository: Repository,
    audit: AuditService,
    notifications: NotificationsService,
}

impl ConsumablesService {
    pub fn new(repository: Repository) -> Self {
        Self {
            audit: AuditService::new(repository.clone()),
            notifications: NotificationsService::new(repository.clone()),
            repository,
        }
    }

    pub async fn list(&self) -> AppResult<Vec<Consumable>> {
        self.repository.consumables.list().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Consumable> {
        self.repository.consumables.get_by_id(id).await
    }

    /// Create a consumable through the mutation pipeline
    pub async fn create(&self, actor: &UserClaims, data: CreateConsumable) -> AppResult<Consumable> {
        data.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let consumable = self.repository.consumables.create(&data).await?;

        self.audit
            .record(
                Some(actor.user_id),
                "create",
                "consumable",
                &identity_line(&consumable),
            )
            .await?;

        self.notifications
            .notify(
                Some(actor.user_id),
                "New consumable",
                &format!("Registered: {}", consumable.name),
            )
            .await;

        Ok(consumable)
    }

    /// Update a consumable through the mutation pipeline
    pub async fn update(
        &self,
        actor: &UserClaims,
        id: i32,
        data: UpdateConsumable,
    ) -> AppResult<Consumable> {
        let consumable = self.repository.consumables.update(id, &data).await?;

        self.audit
            .record(
                Some(actor.user_id),
                "update",
                "consumable",
                &identity_line(&consumable),
            )
            .await?;

        self.notifications
            .notify(
                Some(actor.user_id),
                "Consumable updated",
                &format!("Edited: {}", consumable.name),
            )
            .await;

        Ok(consumable)
    }

    /// Delete a consumable; identifying detail captured before the delete
    pub async fn delete(&self, actor: &UserClaims, id: i32) -> AppResult<()> {
        let consumable = self.repository.consumables.get_by_id(id).await?;
        let snapshot = identity_line(&consumable);

        self.repository.consumables.delete(id).await?;

        self.audit
            .record(Some(actor.user_id), "delete", "consumable", &snapshot)
            .await?;

        self.notifications
            .notify(
                Some(actor.user_id),
                "Consumable deleted",
                &format!("Removed: {}", snapshot),
            )
            .await;

        Ok(())
    }
}
