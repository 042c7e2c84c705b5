//! Dashboard aggregation service

use sqlx::Row;

use crate::{
    api::stats::{DashboardKpis, DashboardResponse, EquipmentUsage, StatEntry, YearSupplierCount},
    error::AppResult,
    repository::Repository,
};

/// Bucket label for equipment without a supplier. Rendered verbatim by the
/// dashboard front end.
pub const UNASSIGNED_SUPPLIER_LABEL: &str = "Sin Proveedor Asignado";

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
}

impl StatsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Build the dashboard summary: KPI counts, usage split, and equipment
    /// groupings by type, supplier and purchase-year x supplier.
    pub async fn dashboard(&self) -> AppResult<DashboardResponse> {
        let pool = &self.repository.pool;

        let total_equipment: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM equipment")
            .fetch_one(pool)
            .await?;

        let total_users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await?;

        let total_consumables: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM consumables")
            .fetch_one(pool)
            .await?;

        // "Unused" = status whose display name contains "available"
        let unused_equipment: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM equipment e
            JOIN statuses s ON e.status_id = s.id
            WHERE s.name ILIKE '%available%'
            "#,
        )
        .fetch_one(pool)
        .await?;

        let by_type = sqlx::query(
            r#"
            SELECT t.name AS label, COUNT(e.id) AS value
            FROM equipment_types t
            LEFT JOIN equipment e ON e.type_id = t.id
            GROUP BY t.name
            ORDER BY value DESC, label
            "#,
        )
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(|row| StatEntry {
            label: row.get("label"),
            value: row.get("value"),
        })
        .collect();

        let by_supplier = sqlx::query(&format!(
            r#"
            SELECT COALESCE(p.name, '{}') AS label, COUNT(*) AS value
            FROM equipment e
            LEFT JOIN suppliers p ON e.supplier_id = p.id
            GROUP BY p.name
            ORDER BY value DESC, label
            "#,
            UNASSIGNED_SUPPLIER_LABEL
        ))
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(|row| StatEntry {
            label: row.get("label"),
            value: row.get("value"),
        })
        .collect();

        // Rows without a purchase date carry no year and are excluded
        let by_year_supplier = sqlx::query(&format!(
            r#"
            SELECT EXTRACT(YEAR FROM e.purchase_date)::int AS year,
                   COALESCE(p.name, '{}') AS supplier,
                   COUNT(*) AS value
            FROM equipment e
            LEFT JOIN suppliers p ON e.supplier_id = p.id
            WHERE e.purchase_date IS NOT NULL
            GROUP BY year, p.name
            ORDER BY year DESC, value DESC
            "#,
            UNASSIGNED_SUPPLIER_LABEL
        ))
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(|row| YearSupplierCount {
            year: row.get("year"),
            supplier: row.get("supplier"),
            count: row.get("value"),
        })
        .collect();

        Ok(DashboardResponse {
            kpis: DashboardKpis {
                total_equipment,
                total_users,
                total_consumables,
                unused_equipment,
            },
            usage: EquipmentUsage {
                in_use: total_equipment - unused_equipment,
                unused: unused_equipment,
            },
            by_type,
            by_supplier,
            by_year_supplier,
        })
    }
}
