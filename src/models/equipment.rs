//! Equipment model and request types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Equipment record as stored
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Equipment {
    pub id: i32,
    pub serial_number: String,
    pub brand: String,
    pub model: String,
    pub purchase_date: Option<NaiveDate>,
    pub warranty_end_date: Option<NaiveDate>,
    /// National id of the person the asset is assigned to (free text)
    pub owner_national_id: Option<String>,
    pub processor: Option<String>,
    pub ram: Option<String>,
    pub storage_desc: Option<String>,
    /// Stored invoice file handle
    pub invoice_path: Option<String>,
    pub type_id: Option<i32>,
    pub status_id: Option<i32>,
    pub supplier_id: Option<i32>,
    pub branch_id: Option<i32>,
    pub responsible_user_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// Equipment with its catalog references resolved to display names
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct EquipmentDetails {
    pub id: i32,
    pub serial_number: String,
    pub brand: String,
    pub model: String,
    pub purchase_date: Option<NaiveDate>,
    pub warranty_end_date: Option<NaiveDate>,
    pub owner_national_id: Option<String>,
    pub processor: Option<String>,
    pub ram: Option<String>,
    pub storage_desc: Option<String>,
    pub invoice_path: Option<String>,
    pub type_id: Option<i32>,
    pub status_id: Option<i32>,
    pub supplier_id: Option<i32>,
    pub branch_id: Option<i32>,
    pub responsible_user_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub type_name: Option<String>,
    pub status_name: Option<String>,
    pub supplier_name: Option<String>,
    pub branch_name: Option<String>,
    pub responsible_username: Option<String>,
    pub responsible_email: Option<String>,
}

/// Catalog/user references carried by equipment write payloads
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct EquipmentRefs {
    pub type_id: Option<i32>,
    pub status_id: Option<i32>,
    pub supplier_id: Option<i32>,
    pub branch_id: Option<i32>,
    /// Get-or-create by exact name when no branch_id is given
    pub branch_name: Option<String>,
    pub responsible_user_id: Option<i32>,
}

/// Create equipment request. Type and status are required on this path.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEquipment {
    #[validate(length(min = 1, message = "Serial number must not be empty"))]
    pub serial_number: String,
    #[validate(length(min = 1, message = "Brand must not be empty"))]
    pub brand: String,
    #[validate(length(min = 1, message = "Model must not be empty"))]
    pub model: String,
    pub purchase_date: Option<NaiveDate>,
    pub warranty_end_date: Option<NaiveDate>,
    pub owner_national_id: Option<String>,
    pub processor: Option<String>,
    pub ram: Option<String>,
    pub storage_desc: Option<String>,
    #[serde(flatten)]
    pub refs: EquipmentRefs,
}

/// Update equipment request; all fields optional
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateEquipment {
    pub serial_number: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub purchase_date: Option<NaiveDate>,
    pub warranty_end_date: Option<NaiveDate>,
    pub owner_national_id: Option<String>,
    pub processor: Option<String>,
    pub ram: Option<String>,
    pub storage_desc: Option<String>,
    #[serde(flatten)]
    pub refs: EquipmentRefs,
}

/// Equipment listing filters.
/// Structured filters compose with AND; the free-text term is OR'd across
/// joined display fields and AND'd with the structured filters.
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct EquipmentQuery {
    pub type_id: Option<i32>,
    pub status_id: Option<i32>,
    /// Purchase date lower bound (inclusive)
    pub purchase_date_min: Option<NaiveDate>,
    /// Purchase date upper bound (inclusive)
    pub purchase_date_max: Option<NaiveDate>,
    /// Case-insensitive substring search
    pub search: Option<String>,
    /// Bypass pagination for this request only
    pub all: Option<bool>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Equipment references after resolution against the store.
/// supplier_name is carried along for audit detail strings.
#[derive(Debug, Clone, Default)]
pub struct ResolvedEquipmentRefs {
    pub type_id: Option<i32>,
    pub status_id: Option<i32>,
    pub supplier_id: Option<i32>,
    pub branch_id: Option<i32>,
    pub responsible_user_id: Option<i32>,
    pub supplier_name: Option<String>,
}

/// Template payload for bulk equipment creation (multipart text fields)
#[derive(Debug, Clone, Default, ToSchema)]
pub struct BulkEquipmentTemplate {
    pub count: Option<i64>,
    pub base_serial: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub purchase_date: Option<NaiveDate>,
    pub warranty_end_date: Option<NaiveDate>,
    pub processor: Option<String>,
    pub ram: Option<String>,
    pub storage_desc: Option<String>,
    pub refs: EquipmentRefs,
}
