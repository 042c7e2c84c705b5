//! Audit trail service.
//!
//! Recording is synchronous with the triggering mutation and failures
//! propagate: the audit trail is the compliance guarantee, unlike the
//! best-effort notification fan-out.

use crate::{
    error::AppResult,
    models::audit::AuditRecordDetails,
    repository::Repository,
};

#[derive(Clone)]
pub struct AuditService {
    repository: Repository,
}

impl AuditService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Append one record describing a tracked mutation
    pub async fn record(
        &self,
        actor_id: Option<i32>,
        action: &str,
        entity: &str,
        detail: &str,
    ) -> AppResult<()> {
        self.repository
            .audit
            .insert(actor_id, action, entity, detail)
            .await?;
        Ok(())
    }

    /// All records, newest first
    pub async fn list(&self) -> AppResult<Vec<AuditRecordDetails>> {
        self.repository.audit.list().await
    }
}
