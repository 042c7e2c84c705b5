//! Catalog repositories: equipment types, statuses, suppliers, branches

use sqlx::{Pool, Postgres};

use super::map_unique_violation;
use crate::{
    error::{AppError, AppResult},
    models::catalog::{Branch, CreateBranch, CreateCatalogEntry, EquipmentType, Status, Supplier},
};

#[derive(Clone)]
pub struct CatalogsRepository {
    pool: Pool<Postgres>,
}

impl CatalogsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    // --- Equipment types ---

    pub async fn types_list(&self) -> AppResult<Vec<EquipmentType>> {
        let rows = sqlx::query_as::<_, EquipmentType>("SELECT * FROM equipment_types ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn types_find(&self, id: i32) -> AppResult<Option<EquipmentType>> {
        let row = sqlx::query_as::<_, EquipmentType>("SELECT * FROM equipment_types WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn types_create(&self, data: &CreateCatalogEntry) -> AppResult<EquipmentType> {
        sqlx::query_as::<_, EquipmentType>(
            "INSERT INTO equipment_types (name) VALUES ($1) RETURNING *",
        )
        .bind(&data.name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "Equipment type name already exists"))
    }

    // --- Statuses ---

    pub async fn statuses_list(&self) -> AppResult<Vec<Status>> {
        let rows = sqlx::query_as::<_, Status>("SELECT * FROM statuses ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn statuses_find(&self, id: i32) -> AppResult<Option<Status>> {
        let row = sqlx::query_as::<_, Status>("SELECT * FROM statuses WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn statuses_create(&self, data: &CreateCatalogEntry) -> AppResult<Status> {
        sqlx::query_as::<_, Status>("INSERT INTO statuses (name) VALUES ($1) RETURNING *")
            .bind(&data.name)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_unique_violation(e, "Status name already exists"))
    }

    // --- Suppliers ---

    pub async fn suppliers_list(&self) -> AppResult<Vec<Supplier>> {
        let rows = sqlx::query_as::<_, Supplier>("SELECT * FROM suppliers ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn suppliers_find(&self, id: i32) -> AppResult<Option<Supplier>> {
        let row = sqlx::query_as::<_, Supplier>("SELECT * FROM suppliers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn suppliers_create(&self, data: &CreateCatalogEntry) -> AppResult<Supplier> {
        sqlx::query_as::<_, Supplier>("INSERT INTO suppliers (name) VALUES ($1) RETURNING *")
            .bind(&data.name)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_unique_violation(e, "Supplier name already exists"))
    }

    // --- Branches ---

    pub async fn branches_list(&self) -> AppResult<Vec<Branch>> {
        let rows = sqlx::query_as::<_, Branch>("SELECT * FROM branches ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn branches_find(&self, id: i32) -> AppResult<Option<Branch>> {
        let row = sqlx::query_as::<_, Branch>("SELECT * FROM branches WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn branches_create(&self, data: &CreateBranch) -> AppResult<Branch> {
        sqlx::query_as::<_, Branch>(
            "INSERT INTO branches (name, address) VALUES ($1, $2) RETURNING *",
        )
        .bind(&data.name)
        .bind(&data.address)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "Branch name already exists"))
    }

    /// Get-or-create a branch by exact name match (case-sensitive).
    /// Used by the reference resolver when a payload names a branch that may
    /// not exist yet.
    pub async fn branches_get_or_create(&self, name: &str) -> AppResult<Branch> {
        if let Some(branch) =
            sqlx::query_as::<_, Branch>("SELECT * FROM branches WHERE name = $1")
                .bind(name)
                .fetch_optional(&self.pool)
                .await?
        {
            return Ok(branch);
        }

        // Concurrent creates race on the unique name; retry the lookup on
        // conflict instead of failing the request.
        match sqlx::query_as::<_, Branch>("INSERT INTO branches (name) VALUES ($1) RETURNING *")
            .bind(name)
            .fetch_one(&self.pool)
            .await
        {
            Ok(branch) => Ok(branch),
            Err(err) => {
                if let sqlx::Error::Database(ref db) = err {
                    if db.code().as_deref() == Some("23505") {
                        return sqlx::query_as::<_, Branch>(
                            "SELECT * FROM branches WHERE name = $1",
                        )
                        .bind(name)
                        .fetch_optional(&self.pool)
                        .await?
                        .ok_or_else(|| {
                            AppError::Internal(format!("Branch {} vanished after conflict", name))
                        });
                    }
                }
                Err(AppError::Database(err))
            }
        }
    }
}
