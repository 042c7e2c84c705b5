//! Audit log repository. Append-only: no update or delete paths exist.

use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::audit::{AuditRecord, AuditRecordDetails},
};

#[derive(Clone)]
pub struct AuditRepository {
    pool: Pool<Postgres>,
}

impl AuditRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Append one audit record
    pub async fn insert(
        &self,
        user_id: Option<i32>,
        action: &str,
        entity: &str,
        detail: &str,
    ) -> AppResult<AuditRecord> {
        let row = sqlx::query_as::<_, AuditRecord>(
            r#"
            INSERT INTO audit_log (user_id, action, entity, detail)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(action)
        .bind(entity)
        .bind(detail)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// All audit records, newest first, with actor usernames resolved
    pub async fn list(&self) -> AppResult<Vec<AuditRecordDetails>> {
        let rows = sqlx::query_as::<_, AuditRecordDetails>(
            r#"
            SELECT a.id, a.user_id, u.username, a.action, a.entity, a.detail, a.created_at
            FROM audit_log a
            LEFT JOIN users u ON a.user_id = u.id
            ORDER BY a.created_at DESC, a.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
