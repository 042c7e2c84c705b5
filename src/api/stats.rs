//! Dashboard endpoint and response types

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::AppResult;

use super::AuthenticatedUser;

/// Dashboard summary response
#[derive(Serialize, ToSchema)]
pub struct DashboardResponse {
    pub kpis: DashboardKpis,
    pub usage: EquipmentUsage,
    /// Equipment count grouped by type
    pub by_type: Vec<StatEntry>,
    /// Equipment count grouped by supplier, with an explicit bucket for
    /// equipment without a supplier
    pub by_supplier: Vec<StatEntry>,
    /// Equipment count grouped by purchase year and supplier; rows without
    /// a purchase date are excluded
    pub by_year_supplier: Vec<YearSupplierCount>,
}

#[derive(Serialize, ToSchema)]
pub struct DashboardKpis {
    pub total_equipment: i64,
    pub total_users: i64,
    pub total_consumables: i64,
    /// Equipment whose status name contains "available"
    pub unused_equipment: i64,
}

#[derive(Serialize, ToSchema)]
pub struct EquipmentUsage {
    pub in_use: i64,
    pub unused: i64,
}

#[derive(Serialize, ToSchema)]
pub struct StatEntry {
    /// Label
    pub label: String,
    /// Value
    pub value: i64,
}

#[derive(Serialize, ToSchema)]
pub struct YearSupplierCount {
    pub year: i32,
    pub supplier: String,
    pub count: i64,
}

/// Dashboard summary: KPI counts and equipment groupings
#[utoipa::path(
    get,
    path = "/dashboard",
    tag = "dashboard",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Dashboard summary", body = DashboardResponse)
    )
)]
pub async fn get_dashboard(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<DashboardResponse>> {
    let dashboard = state.services.stats.dashboard().await?;
    Ok(Json(dashboard))
}
