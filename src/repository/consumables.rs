//! Consumables repository

use sqlx::{Pool, Postgres};

use super::map_unique_violation;
use crate::{
    error::{AppError, AppResult},
    models::consumable::{Consumable, CreateConsumable, UpdateConsumable},
};

#[derive(Clone)]
pub struct ConsumablesRepository {
    pool: Pool<Postgres>,
}

impl ConsumablesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all consumables, newest first
    pub async fn list(&self) -> AppResult<Vec<Consumable>> {
        let rows = sqlx::query_as::<_, Consumable>(
            "SELECT * FROM consumables ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Get consumable by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Consumable> {
        sqlx::query_as::<_, Consumable>("SELECT * FROM consumables WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Consumable {} not found", id)))
    }

    /// Create a consumable
    pub async fn create(&self, data: &CreateConsumable) -> AppResult<Consumable> {
        sqlx::query_as::<_, Consumable>(
            r#"
            INSERT INTO consumables (name, code, description, stock, min_stock, unit, location)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.code)
        .bind(&data.description)
        .bind(data.stock)
        .bind(data.min_stock)
        .bind(&data.unit)
        .bind(&data.location)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "Consumable code already exists"))
    }

    /// Update a consumable; only provided fields change
    pub async fn update(&self, id: i32, data: &UpdateConsumable) -> AppResult<Consumable> {
        let mut sets = Vec::new();
        let mut idx = 0;

        macro_rules! add_field {
            ($field:expr, $name:expr) => {
                if $field.is_some() {
                    idx += 1;
                    sets.push(format!("{} = ${}", $name, idx));
                }
            };
        }

        add_field!(data.name, "name");
        add_field!(data.code, "code");
        add_field!(data.description, "description");
        add_field!(data.stock, "stock");
        add_field!(data.min_stock, "min_stock");
        add_field!(data.unit, "unit");
        add_field!(data.location, "location");

        if sets.is_empty() {
            return self.get_by_id(id).await;
        }

        idx += 1;
        let query = format!(
            "UPDATE consumables SET {} WHERE id = ${} RETURNING *",
            sets.join(", "),
            idx
        );

        let mut builder = sqlx::query_as::<_, Consumable>(&query);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(data.name);
        bind_field!(data.code);
        bind_field!(data.description);
        bind_field!(data.stock);
        bind_field!(data.min_stock);
        bind_field!(data.unit);
        bind_field!(data.location);

        builder
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_unique_violation(e, "Consumable code already exists"))?
            .ok_or_else(|| AppError::NotFound(format!("Consumable {} not found", id)))
    }

    /// Delete a consumable
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM consumables WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Consumable {} not found", id)));
        }
        Ok(())
    }
}
