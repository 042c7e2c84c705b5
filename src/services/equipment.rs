//! Equipment service: mutation pipeline and bulk creation.
//!
//! Every mutation runs: resolve references, persist, record audit (failures
//! propagate), fan out notifications (best-effort).

use chrono::Utc;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::equipment::{
        BulkEquipmentTemplate, CreateEquipment, Equipment, EquipmentDetails, EquipmentQuery,
        UpdateEquipment,
    },
    models::user::UserClaims,
    repository::Repository,
    services::{
        audit::AuditService,
        notifications::NotificationsService,
        resolver::{RefRequirements, ReferenceResolver},
        storage::StorageService,
    },
};

/// Base used when a bulk template carries no serial prefix
const DEFAULT_SERIAL_BASE: &str = "EQ";

/// Derive one serial of a bulk batch. The timestamp keeps serials unique
/// across repeated calls with the same base; the index keeps them unique
/// within one call.
fn derive_serial(base: &str, stamp: &str, index: i64) -> String {
    format!("{}-{}-{}", base, stamp, index)
}

/// One-line identity snapshot for audit details
fn identity_line(equipment: &Equipment) -> String {
    format!(
        "ID: {} - {} {} ({})",
        equipment.id, equipment.brand, equipment.model, equipment.serial_number
    )
}

#[derive(Clone)]
pub struct EquipmentService {
    repository: Repository,
    resolver: ReferenceResolver,
    audit: AuditService,
    notifications: NotificationsService,
    storage: StorageService,
}

impl EquipmentService {
    pub fn new(repository: Repository, storage: StorageService) -> Self {
        Self {
            resolver: ReferenceResolver::new(repository.clone()),
            audit: AuditService::new(repository.clone()),
            notifications: NotificationsService::new(repository.clone()),
            repository,
            storage,
        }
    }

    /// List equipment with composable filters
    pub async fn list(&self, query: &EquipmentQuery) -> AppResult<(Vec<EquipmentDetails>, i64)> {
        self.repository.equipment.search(query).await
    }

    /// Get equipment details by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<EquipmentDetails> {
        self.repository.equipment.get_details(id).await
    }

    /// Create equipment through the mutation pipeline
    pub async fn create(
        &self,
        actor: &UserClaims,
        data: CreateEquipment,
    ) -> AppResult<EquipmentDetails> {
        data.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let refs = self
            .resolver
            .resolve_equipment_refs(&data.refs, RefRequirements::CREATE)
            .await?;

        let equipment = self.repository.equipment.create(&data, &refs).await?;

        self.audit
            .record(
                Some(actor.user_id),
                "create",
                "equipment",
                &identity_line(&equipment),
            )
            .await?;

        self.notifications
            .notify(
                Some(actor.user_id),
                "New equipment",
                &format!(
                    "Added: {} {} ({})",
                    equipment.brand, equipment.model, equipment.serial_number
                ),
            )
            .await;

        self.repository.equipment.get_details(equipment.id).await
    }

    /// Update equipment through the mutation pipeline
    pub async fn update(
        &self,
        actor: &UserClaims,
        id: i32,
        data: UpdateEquipment,
    ) -> AppResult<EquipmentDetails> {
        let refs = self
            .resolver
            .resolve_equipment_refs(&data.refs, RefRequirements::UPDATE)
            .await?;

        let equipment = self.repository.equipment.update(id, &data, &refs).await?;

        self.audit
            .record(
                Some(actor.user_id),
                "update",
                "equipment",
                &identity_line(&equipment),
            )
            .await?;

        self.notifications
            .notify(
                Some(actor.user_id),
                "Equipment updated",
                &format!("Updated: {} {}", equipment.brand, equipment.model),
            )
            .await;

        self.repository.equipment.get_details(equipment.id).await
    }

    /// Delete equipment. The identifying detail is captured before the
    /// delete executes; the row is unreadable afterwards.
    pub async fn delete(&self, actor: &UserClaims, id: i32) -> AppResult<()> {
        let equipment = self.repository.equipment.get_by_id(id).await?;
        let snapshot = identity_line(&equipment);

        self.repository.equipment.delete(id).await?;

        self.audit
            .record(Some(actor.user_id), "delete", "equipment", &snapshot)
            .await?;

        self.notifications
            .notify(
                Some(actor.user_id),
                "Equipment deleted",
                &format!("Deleted: {}", snapshot),
            )
            .await;

        Ok(())
    }

    /// Attach an invoice file to one equipment record
    pub async fn attach_invoice(
        &self,
        actor: &UserClaims,
        id: i32,
        filename: &str,
        bytes: &[u8],
    ) -> AppResult<EquipmentDetails> {
        // 404 before touching storage
        self.repository.equipment.get_by_id(id).await?;

        let handle = self.storage.store("invoices", filename, bytes).await?;
        let equipment = self.repository.equipment.set_invoice_path(id, &handle).await?;

        self.audit
            .record(
                Some(actor.user_id),
                "update",
                "equipment",
                &format!("{} - invoice attached", identity_line(&equipment)),
            )
            .await?;

        self.repository.equipment.get_details(id).await
    }

    /// Bulk-create N equipment records from one template.
    ///
    /// Validation is all-or-nothing: a bad count, missing supplier or
    /// unresolved reference rejects the request before any record exists.
    /// The insert loop itself is sequential and not transactional; a failure
    /// on record k leaves records 1..k-1 committed.
    pub async fn bulk_create(
        &self,
        actor: &UserClaims,
        template: BulkEquipmentTemplate,
        invoice: Option<(String, Vec<u8>)>,
    ) -> AppResult<Vec<Equipment>> {
        let count = template
            .count
            .ok_or_else(|| AppError::Validation("count is required".to_string()))?;
        if count < 1 {
            return Err(AppError::Validation(
                "count must be a positive integer".to_string(),
            ));
        }

        let refs = self
            .resolver
            .resolve_equipment_refs(&template.refs, RefRequirements::BULK)
            .await?;

        let base = template
            .base_serial
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SERIAL_BASE)
            .to_string();
        let stamp = Utc::now().format("%y%m%d%H%M%S").to_string();

        let mut created = Vec::with_capacity(count as usize);
        for index in 1..=count {
            let serial = derive_serial(&base, &stamp, index);

            // The buffered invoice content is attached independently to
            // every generated record.
            let invoice_path = match invoice {
                Some((ref filename, ref bytes)) => {
                    Some(self.storage.store("invoices", filename, bytes).await?)
                }
                None => None,
            };

            let equipment = self
                .repository
                .equipment
                .insert_from_template(&serial, &template, &refs, invoice_path.as_deref())
                .await?;
            created.push(equipment);
        }

        let brand = template.brand.as_deref().unwrap_or("-");
        let supplier = refs.supplier_name.as_deref().unwrap_or("-");
        self.audit
            .record(
                Some(actor.user_id),
                "bulk_create",
                "equipment",
                &format!("{} units - {} - supplier {}", count, brand, supplier),
            )
            .await?;

        self.notifications
            .notify(
                None,
                "Bulk equipment intake",
                &format!(
                    "Added {} units of {} {}",
                    count,
                    brand,
                    template.model.as_deref().unwrap_or("-")
                ),
            )
            .await;

        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn derived_serials_are_distinct_and_prefixed() {
        let stamp = "240801120000";
        let serials: Vec<String> = (1..=5).map(|i| derive_serial("X", stamp, i)).collect();

        for serial in &serials {
            assert!(serial.starts_with("X-"));
        }
        let mut unique = serials.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 5);
    }

    #[test]
    fn repeated_batches_with_same_base_stay_unique() {
        // Different call, different timestamp: same base and index never collide
        let first = derive_serial("X", "240801120000", 1);
        let second = derive_serial("X", "240801120001", 1);
        assert_ne!(first, second);
    }

    #[test]
    fn identity_line_names_the_asset() {
        let equipment = Equipment {
            id: 42,
            serial_number: "SN-1".to_string(),
            brand: "HP".to_string(),
            model: "EliteBook".to_string(),
            purchase_date: None,
            warranty_end_date: None,
            owner_national_id: None,
            processor: None,
            ram: None,
            storage_desc: None,
            invoice_path: None,
            type_id: None,
            status_id: None,
            supplier_id: None,
            branch_id: None,
            responsible_user_id: None,
            created_at: Utc::now(),
        };
        assert_eq!(identity_line(&equipment), "ID: 42 - HP EliteBook (SN-1)");
    }
}
