//! Equipment repository: CRUD plus the composable listing filters

use sqlx::{Pool, Postgres};

use super::map_unique_violation;
use crate::{
    error::{AppError, AppResult},
    models::equipment::{
        BulkEquipmentTemplate, CreateEquipment, Equipment, EquipmentDetails, EquipmentQuery,
        ResolvedEquipmentRefs, UpdateEquipment,
    },
};

/// Joined fields the free-text term is matched against
const SEARCH_FIELDS: [&str; 9] = [
    "e.brand",
    "e.model",
    "e.serial_number",
    "e.owner_national_id",
    "s.name",
    "t.name",
    "b.name",
    "u.username",
    "u.email",
];

const DETAILS_SELECT: &str = r#"
    SELECT e.id, e.serial_number, e.brand, e.model, e.purchase_date, e.warranty_end_date,
           e.owner_national_id, e.processor, e.ram, e.storage_desc, e.invoice_path,
           e.type_id, e.status_id, e.supplier_id, e.branch_id, e.responsible_user_id,
           e.created_at,
           t.name AS type_name, s.name AS status_name, p.name AS supplier_name,
           b.name AS branch_name, u.username AS responsible_username,
           u.email AS responsible_email
    FROM equipment e
    LEFT JOIN equipment_types t ON e.type_id = t.id
    LEFT JOIN statuses s ON e.status_id = s.id
    LEFT JOIN suppliers p ON e.supplier_id = p.id
    LEFT JOIN branches b ON e.branch_id = b.id
    LEFT JOIN users u ON e.responsible_user_id = u.id
"#;

const LIST_JOINS: &str = r#"
    FROM equipment e
    LEFT JOIN equipment_types t ON e.type_id = t.id
    LEFT JOIN statuses s ON e.status_id = s.id
    LEFT JOIN suppliers p ON e.supplier_id = p.id
    LEFT JOIN branches b ON e.branch_id = b.id
    LEFT JOIN users u ON e.responsible_user_id = u.id
"#;

fn has_search_term(query: &EquipmentQuery) -> bool {
    query.search.as_deref().map(|s| !s.is_empty()).unwrap_or(false)
}

/// One ILIKE disjunction over the searchable fields, all reusing the same
/// bound placeholder.
fn search_disjunction(placeholder: usize) -> String {
    SEARCH_FIELDS
        .iter()
        .map(|field| format!("{} ILIKE ${}", field, placeholder))
        .collect::<Vec<_>>()
        .join(" OR ")
}

/// Assemble WHERE conditions with numbered placeholders. Structured filters
/// are AND-composed; the free-text disjunction joins them as one more AND
/// term. Binding order matches the order conditions are pushed here.
fn build_conditions(query: &EquipmentQuery) -> Vec<String> {
    let mut conditions = Vec::new();
    let mut idx = 0;

    if query.type_id.is_some() {
        idx += 1;
        conditions.push(format!("e.type_id = ${}", idx));
    }
    if query.status_id.is_some() {
        idx += 1;
        conditions.push(format!("e.status_id = ${}", idx));
    }
    if query.purchase_date_min.is_some() {
        idx += 1;
        conditions.push(format!("e.purchase_date >= ${}", idx));
    }
    if query.purchase_date_max.is_some() {
        idx += 1;
        conditions.push(format!("e.purchase_date <= ${}", idx));
    }
    if has_search_term(query) {
        idx += 1;
        conditions.push(format!("({})", search_disjunction(idx)));
    }

    conditions
}

#[derive(Clone)]
pub struct EquipmentRepository {
    pool: Pool<Postgres>,
}

impl EquipmentRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List equipment with composable filters and free-text search.
    /// `all = true` bypasses pagination for this call only.
    pub async fn search(&self, query: &EquipmentQuery) -> AppResult<(Vec<EquipmentDetails>, i64)> {
        let conditions = build_conditions(query);
        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        macro_rules! bind_filters {
            ($builder:expr) => {{
                let mut b = $builder;
                if let Some(v) = query.type_id {
                    b = b.bind(v);
                }
                if let Some(v) = query.status_id {
                    b = b.bind(v);
                }
                if let Some(v) = query.purchase_date_min {
                    b = b.bind(v);
                }
                if let Some(v) = query.purchase_date_max {
                    b = b.bind(v);
                }
                if has_search_term(query) {
                    b = b.bind(format!("%{}%", query.search.as_deref().unwrap_or_default()));
                }
                b
            }};
        }

        let count_query = format!("SELECT COUNT(*) {} {}", LIST_JOINS, where_clause);
        let count_builder = sqlx::query_scalar::<_, i64>(&count_query);
        let total = bind_filters!(count_builder).fetch_one(&self.pool).await?;

        let pagination = if query.all.unwrap_or(false) {
            String::new()
        } else {
            let page = query.page.unwrap_or(1).max(1);
            let per_page = query.per_page.unwrap_or(20).max(1);
            format!("LIMIT {} OFFSET {}", per_page, (page - 1) * per_page)
        };

        let select_query = format!(
            "{} {} ORDER BY e.created_at DESC, e.id DESC {}",
            DETAILS_SELECT, where_clause, pagination
        );
        let select_builder = sqlx::query_as::<_, EquipmentDetails>(&select_query);
        let rows = bind_filters!(select_builder).fetch_all(&self.pool).await?;

        Ok((rows, total))
    }

    /// Get equipment by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Equipment> {
        sqlx::query_as::<_, Equipment>("SELECT * FROM equipment WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))
    }

    /// Look up by id without treating a miss as an error (reference resolution)
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<Equipment>> {
        let row = sqlx::query_as::<_, Equipment>("SELECT * FROM equipment WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Get equipment with resolved display names
    pub async fn get_details(&self, id: i32) -> AppResult<EquipmentDetails> {
        let query = format!("{} WHERE e.id = $1", DETAILS_SELECT);
        sqlx::query_as::<_, EquipmentDetails>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))
    }

    /// Create equipment with its references already resolved
    pub async fn create(
        &self,
        data: &CreateEquipment,
        refs: &ResolvedEquipmentRefs,
    ) -> AppResult<Equipment> {
        sqlx::query_as::<_, Equipment>(
            r#"
            INSERT INTO equipment (
                serial_number, brand, model, purchase_date, warranty_end_date,
                owner_national_id, processor, ram, storage_desc,
                type_id, status_id, supplier_id, branch_id, responsible_user_id
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING *
            "#,
        )
        .bind(&data.serial_number)
        .bind(&data.brand)
        .bind(&data.model)
        .bind(data.purchase_date)
        .bind(data.warranty_end_date)
        .bind(&data.owner_national_id)
        .bind(&data.processor)
        .bind(&data.ram)
        .bind(&data.storage_desc)
        .bind(refs.type_id)
        .bind(refs.status_id)
        .bind(refs.supplier_id)
        .bind(refs.branch_id)
        .bind(refs.responsible_user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "Serial number already exists"))
    }

    /// Insert one record of a bulk batch from the shared template
    pub async fn insert_from_template(
        &self,
        serial_number: &str,
        template: &BulkEquipmentTemplate,
        refs: &ResolvedEquipmentRefs,
        invoice_path: Option<&str>,
    ) -> AppResult<Equipment> {
        sqlx::query_as::<_, Equipment>(
            r#"
            INSERT INTO equipment (
                serial_number, brand, model, purchase_date, warranty_end_date,
                processor, ram, storage_desc, invoice_path,
                type_id, status_id, supplier_id, branch_id, responsible_user_id
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING *
            "#,
        )
        .bind(serial_number)
        .bind(template.brand.as_deref().unwrap_or_default())
        .bind(template.model.as_deref().unwrap_or_default())
        .bind(template.purchase_date)
        .bind(template.warranty_end_date)
        .bind(&template.processor)
        .bind(&template.ram)
        .bind(&template.storage_desc)
        .bind(invoice_path)
        .bind(refs.type_id)
        .bind(refs.status_id)
        .bind(refs.supplier_id)
        .bind(refs.branch_id)
        .bind(refs.responsible_user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "Serial number already exists"))
    }

    /// Update equipment; only provided fields and resolved references change
    pub async fn update(
        &self,
        id: i32,
        data: &UpdateEquipment,
        refs: &ResolvedEquipmentRefs,
    ) -> AppResult<Equipment> {
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

        add_field!(data.serial_number, "serial_number");
        add_field!(data.brand, "brand");
        add_field!(data.model, "model");
        add_field!(data.purchase_date, "purchase_date");
        add_field!(data.warranty_end_date, "warranty_end_date");
        add_field!(data.owner_national_id, "owner_national_id");
        add_field!(data.processor, "processor");
        add_field!(data.ram, "ram");
        add_field!(data.storage_desc, "storage_desc");
        add_field!(refs.type_id, "type_id");
        add_field!(refs.status_id, "status_id");
        add_field!(refs.supplier_id, "supplier_id");
        add_field!(refs.branch_id, "branch_id");
        add_field!(refs.responsible_user_id, "responsible_user_id");

        if sets.is_empty() {
            return self.get_by_id(id).await;
        }

        idx += 1;
        let query = format!(
            "UPDATE equipment SET {} WHERE id = ${} RETURNING *",
            sets.join(", "),
            idx
        );

        let mut builder = sqlx::query_as::<_, Equipment>(&query);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(data.serial_number);
        bind_field!(data.brand);
        bind_field!(data.model);
        bind_field!(data.purchase_date);
        bind_field!(data.warranty_end_date);
        bind_field!(data.owner_national_id);
        bind_field!(data.processor);
        bind_field!(data.ram);
        bind_field!(data.storage_desc);
        bind_field!(refs.type_id);
        bind_field!(refs.status_id);
        bind_field!(refs.supplier_id);
        bind_field!(refs.branch_id);
        bind_field!(refs.responsible_user_id);

        builder
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_unique_violation(e, "Serial number already exists"))?
            .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))
    }

    /// Delete equipment (reservations cascade)
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM equipment WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Equipment {} not found", id)));
        }
        Ok(())
    }

    /// Store the handle of an uploaded invoice file
    pub async fn set_invoice_path(&self, id: i32, invoice_path: &str) -> AppResult<Equipment> {
        sqlx::query_as::<_, Equipment>(
            "UPDATE equipment SET invoice_path = $1 WHERE id = $2 RETURNING *",
        )
        .bind(invoice_path)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn no_filters_yields_no_conditions() {
        let query = EquipmentQuery::default();
        assert!(build_conditions(&query).is_empty());
    }

    #[test]
    fn structured_filters_compose_with_and() {
        let query = EquipmentQuery {
            type_id: Some(1),
            status_id: Some(2),
            purchase_date_min: Some(date("2020-06-01")),
            purchase_date_max: Some(date("2021-06-01")),
            ..Default::default()
        };
        let conditions = build_conditions(&query);
        assert_eq!(
            conditions,
            vec![
                "e.type_id = $1",
                "e.status_id = $2",
                "e.purchase_date >= $3",
                "e.purchase_date <= $4",
            ]
        );
    }

    #[test]
    fn search_term_is_a_disjunction_over_joined_fields() {
        let query = EquipmentQuery {
            search: Some("central".to_string()),
            ..Default::default()
        };
        let conditions = build_conditions(&query);
        assert_eq!(conditions.len(), 1);
        // A term matching only the branch name must still match the row
        assert!(conditions[0].contains("b.name ILIKE $1"));
        assert!(conditions[0].contains("e.brand ILIKE $1"));
        assert!(conditions[0].contains("u.email ILIKE $1"));
        assert_eq!(conditions[0].matches(" OR ").count(), SEARCH_FIELDS.len() - 1);
    }

    #[test]
    fn search_composes_with_structured_filters_using_and() {
        let query = EquipmentQuery {
            type_id: Some(1),
            search: Some("hp".to_string()),
            ..Default::default()
        };
        let conditions = build_conditions(&query);
        assert_eq!(conditions.len(), 2);
        assert_eq!(conditions[0], "e.type_id = $1");
        assert!(conditions[1].starts_with('('));
        assert!(conditions[1].contains("ILIKE $2"));
        assert!(!conditions[1].contains("$1"));
    }

    #[test]
    fn empty_search_term_is_ignored() {
        let query = EquipmentQuery {
            search: Some(String::new()),
            ..Default::default()
        };
        assert!(build_conditions(&query).is_empty());
    }
}
