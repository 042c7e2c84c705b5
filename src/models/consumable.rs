//! Consumable stock item model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Consumable stock item
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Consumable {
    pub id: i32,
    pub name: String,
    /// Unique stock code
    pub code: String,
    pub description: Option<String>,
    pub stock: i32,
    /// Reorder trigger threshold
    pub min_stock: i32,
    pub unit: Option<String>,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Create consumable request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateConsumable {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,
    #[validate(length(min = 1, message = "Code must not be empty"))]
    pub code: String,
    pub description: Option<String>,
    #[serde(default)]
    pub stock: i32,
    #[serde(default)]
    pub min_stock: i32,
    pub unit: Option<String>,
    pub location: Option<String>,
}

/// Update consumable request
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateConsumable {
    pub name: Option<String>,
    pub code: Option<String>,
    pub description: Option<String>,
    pub stock: Option<i32>,
    pub min_stock: Option<i32>,
    pub unit: Option<String>,
    pub location: Option<String>,
}
