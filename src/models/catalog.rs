//! Catalog entities referenced by equipment: types, statuses, suppliers, branches

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Equipment type catalog entry
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct EquipmentType {
    pub id: i32,
    pub name: String,
}

/// Status catalog entry
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Status {
    pub id: i32,
    pub name: String,
}

/// Supplier catalog entry
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Supplier {
    pub id: i32,
    pub name: String,
}

/// Branch (office/site) catalog entry
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Branch {
    pub id: i32,
    pub name: String,
    pub address: Option<String>,
}

/// Create request shared by the name-only catalogs
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCatalogEntry {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,
}

/// Create branch request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBranch {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,
    pub address: Option<String>,
}
