//! Audit trail endpoint (admin only)

use axum::{extract::State, Json};

use crate::{error::AppResult, models::audit::AuditRecordDetails};

use super::AuthenticatedUser;

/// List all audit records, newest first
#[utoipa::path(
    get,
    path = "/audit",
    tag = "audit",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Audit trail", body = Vec<AuditRecordDetails>),
        (status = 403, description = "Admin privileges required")
    )
)]
pub async fn list_audit(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<AuditRecordDetails>>> {
    claims.require_admin()?;
    let records = state.services.audit.list().await?;
    Ok(Json(records))
}
