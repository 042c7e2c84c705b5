//! Audit trail model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Immutable audit record of a tracked mutation.
/// The actor reference survives user deletion (set null).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AuditRecord {
    pub id: i32,
    pub user_id: Option<i32>,
    /// Action label: create / update / delete / bulk_create
    pub action: String,
    /// Affected entity kind: equipment / user / consumable / reservation / task
    pub entity: String,
    /// Human-readable detail built from the entity's identifying fields
    pub detail: String,
    pub created_at: DateTime<Utc>,
}

/// Audit record with the actor's username resolved for display
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AuditRecordDetails {
    pub id: i32,
    pub user_id: Option<i32>,
    pub username: Option<String>,
    pub action: String,
    pub entity: String,
    pub detail: String,
    pub created_at: DateTime<Utc>,
}
