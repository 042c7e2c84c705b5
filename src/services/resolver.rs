//! Reference resolver for equipment write payloads.
//!
//! Resolves catalog/user identifiers into store entities or rejects the
//! request with a single aggregated error naming every invalid reference.

use crate::{
    error::{AppError, AppResult},
    models::{
        equipment::{Equipment, EquipmentRefs, ResolvedEquipmentRefs},
        user::User,
    },
    repository::Repository,
};

/// Which references the calling operation treats as mandatory
#[derive(Debug, Clone, Copy, Default)]
pub struct RefRequirements {
    pub type_required: bool,
    pub status_required: bool,
    pub supplier_required: bool,
}

impl RefRequirements {
    /// Equipment creation: type and status are mandatory
    pub const CREATE: Self = Self {
        type_required: true,
        status_required: true,
        supplier_required: false,
    };
    /// Updates: everything optional
    pub const UPDATE: Self = Self {
        type_required: false,
        status_required: false,
        supplier_required: false,
    };
    /// Bulk creation: supplier is mandatory
    pub const BULK: Self = Self {
        type_required: false,
        status_required: false,
        supplier_required: true,
    };
}

/// Names of required references missing from the payload
fn missing_required(refs: &EquipmentRefs, requirements: RefRequirements) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if requirements.type_required && refs.type_id.is_none() {
        missing.push("type_id");
    }
    if requirements.status_required && refs.status_id.is_none() {
        missing.push("status_id");
    }
    if requirements.supplier_required && refs.supplier_id.is_none() {
        missing.push("supplier_id");
    }
    missing
}

#[derive(Clone)]
pub struct ReferenceResolver {
    repository: Repository,
}

impl ReferenceResolver {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Resolve every reference in an equipment payload.
    ///
    /// Required-but-omitted references reject the whole operation up front;
    /// identifiers that do not resolve are collected and reported together.
    /// Branch special rule: an explicit id wins; otherwise a non-empty name
    /// is resolved get-or-create by exact match.
    pub async fn resolve_equipment_refs(
        &self,
        refs: &EquipmentRefs,
        requirements: RefRequirements,
    ) -> AppResult<ResolvedEquipmentRefs> {
        let missing = missing_required(refs, requirements);
        if !missing.is_empty() {
            return Err(AppError::Validation(format!(
                "Missing required reference(s): {}",
                missing.join(", ")
            )));
        }

        let mut resolved = ResolvedEquipmentRefs::default();
        let mut invalid = Vec::new();

        if let Some(id) = refs.type_id {
            match self.repository.catalogs.types_find(id).await? {
                Some(t) => resolved.type_id = Some(t.id),
                None => invalid.push(format!("equipment type {}", id)),
            }
        }

        if let Some(id) = refs.status_id {
            match self.repository.catalogs.statuses_find(id).await? {
                Some(s) => resolved.status_id = Some(s.id),
                None => invalid.push(format!("status {}", id)),
            }
        }

        if let Some(id) = refs.supplier_id {
            match self.repository.catalogs.suppliers_find(id).await? {
                Some(s) => {
                    resolved.supplier_id = Some(s.id);
                    resolved.supplier_name = Some(s.name);
                }
                None => invalid.push(format!("supplier {}", id)),
            }
        }

        if let Some(id) = refs.branch_id {
            match self.repository.catalogs.branches_find(id).await? {
                Some(b) => resolved.branch_id = Some(b.id),
                None => invalid.push(format!("branch {}", id)),
            }
        }

        if let Some(id) = refs.responsible_user_id {
            match self.repository.users.find_by_id(id).await? {
                Some(u) => resolved.responsible_user_id = Some(u.id),
                None => invalid.push(format!("user {}", id)),
            }
        }

        if !invalid.is_empty() {
            return Err(AppError::ReferenceNotFound(invalid.join(", ")));
        }

        // Name-based branch resolution may create a row, so it only runs
        // once every other reference has checked out.
        if refs.branch_id.is_none() {
            if let Some(name) = refs.branch_name.as_deref().filter(|n| !n.is_empty()) {
                let branch = self.repository.catalogs.branches_get_or_create(name).await?;
                resolved.branch_id = Some(branch.id);
            }
        }

        Ok(resolved)
    }

    /// Resolve a user reference (reservations, task assignees)
    pub async fn resolve_user(&self, id: i32) -> AppResult<User> {
        self.repository
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::ReferenceNotFound(format!("user {}", id)))
    }

    /// Resolve an equipment reference (reservations)
    pub async fn resolve_equipment(&self, id: i32) -> AppResult<Equipment> {
        self.repository
            .equipment
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::ReferenceNotFound(format!("equipment {}", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_path_requires_type_and_status() {
        let refs = EquipmentRefs::default();
        let missing = missing_required(&refs, RefRequirements::CREATE);
        assert_eq!(missing, vec!["type_id", "status_id"]);
    }

    #[test]
    fn bulk_path_requires_supplier_only() {
        let refs = EquipmentRefs::default();
        let missing = missing_required(&refs, RefRequirements::BULK);
        assert_eq!(missing, vec!["supplier_id"]);
    }

    #[test]
    fn update_path_requires_nothing() {
        let refs = EquipmentRefs::default();
        assert!(missing_required(&refs, RefRequirements::UPDATE).is_empty());
    }

    #[test]
    fn provided_references_satisfy_requirements() {
        let refs = EquipmentRefs {
            type_id: Some(1),
            status_id: Some(2),
            supplier_id: Some(3),
            ..Default::default()
        };
        assert!(missing_required(&refs, RefRequirements::CREATE).is_empty());
        assert!(missing_required(&refs, RefRequirements::BULK).is_empty());
    }
}
