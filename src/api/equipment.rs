//! Equipment API endpoints: listing with filters, CRUD, invoice attach and
//! bulk creation

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::equipment::{
        BulkEquipmentTemplate, CreateEquipment, Equipment, EquipmentDetails, EquipmentQuery,
        UpdateEquipment,
    },
};

use super::AuthenticatedUser;

/// Paginated list response
#[derive(Serialize, ToSchema)]
#[aliases(EquipmentPage = PaginatedResponse<EquipmentDetails>)]
pub struct PaginatedResponse<T: ToSchema> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
}

/// List equipment with composable filters and free-text search
#[utoipa::path(
    get,
    path = "/equipment",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(EquipmentQuery),
    responses(
        (status = 200, description = "Equipment list", body = EquipmentPage)
    )
)]
pub async fn list_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<EquipmentQuery>,
) -> AppResult<Json<PaginatedResponse<EquipmentDetails>>> {
    let (items, total) = state.services.equipment.list(&query).await?;

    // `all` bypasses pagination for this request only
    let (page, per_page) = if query.all.unwrap_or(false) {
        (1, total.max(1))
    } else {
        (query.page.unwrap_or(1), query.per_page.unwrap_or(20))
    };

    Ok(Json(PaginatedResponse {
        items,
        total,
        page,
        per_page,
    }))
}

/// Get equipment by ID
#[utoipa::path(
    get,
    path = "/equipment/{id}",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Equipment ID")),
    responses(
        (status = 200, description = "Equipment details", body = EquipmentDetails),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn get_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<EquipmentDetails>> {
    let equipment = state.services.equipment.get_by_id(id).await?;
    Ok(Json(equipment))
}

/// Create equipment
#[utoipa::path(
    post,
    path = "/equipment",
    tag = "equipment",
    security(("bearer_auth" = [])),
    request_body = CreateEquipment,
    responses(
        (status = 201, description = "Equipment created", body = EquipmentDetails),
        (status = 400, description = "Invalid input or unresolved reference"),
        (status = 409, description = "Serial number already exists")
    )
)]
pub async fn create_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateEquipment>,
) -> AppResult<(StatusCode, Json<EquipmentDetails>)> {
    let equipment = state.services.equipment.create(&claims, data).await?;
    Ok((StatusCode::CREATED, Json(equipment)))
}

/// Update equipment
#[utoipa::path(
    put,
    path = "/equipment/{id}",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Equipment ID")),
    request_body = UpdateEquipment,
    responses(
        (status = 200, description = "Equipment updated", body = EquipmentDetails),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn update_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<UpdateEquipment>,
) -> AppResult<Json<EquipmentDetails>> {
    let equipment = state.services.equipment.update(&claims, id, data).await?;
    Ok(Json(equipment))
}

/// Delete equipment
#[utoipa::path(
    delete,
    path = "/equipment/{id}",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Equipment ID")),
    responses(
        (status = 204, description = "Equipment deleted"),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn delete_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.equipment.delete(&claims, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Attach an invoice file to one equipment record (multipart, field "invoice")
#[utoipa::path(
    post,
    path = "/equipment/{id}/invoice",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Equipment ID")),
    responses(
        (status = 200, description = "Invoice attached", body = EquipmentDetails),
        (status = 400, description = "No invoice field in request"),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn attach_invoice(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    mut multipart: Multipart,
) -> AppResult<Json<EquipmentDetails>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.to_string()))?
    {
        if field.name() != Some("invoice") {
            continue;
        }
        let filename = field.file_name().unwrap_or("invoice.pdf").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let equipment = state
            .services
            .equipment
            .attach_invoice(&claims, id, &filename, &bytes)
            .await?;
        return Ok(Json(equipment));
    }

    Err(AppError::Validation("Missing invoice field".to_string()))
}

fn parse_i32(name: &str, value: &str) -> AppResult<i32> {
    value
        .parse()
        .map_err(|_| AppError::Validation(format!("{} must be an integer", name)))
}

fn parse_i64(name: &str, value: &str) -> AppResult<i64> {
    value
        .parse()
        .map_err(|_| AppError::Validation(format!("{} must be an integer", name)))
}

fn parse_date(name: &str, value: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("{} must be a YYYY-MM-DD date", name)))
}

/// Bulk-create equipment from one multipart template.
///
/// Text fields fill the shared template; the optional "invoice" file part is
/// buffered once and attached to every generated record.
#[utoipa::path(
    post,
    path = "/equipment/bulk",
    tag = "equipment",
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Batch created", body = Vec<Equipment>),
        (status = 400, description = "Invalid count, missing supplier or unresolved reference")
    )
)]
pub async fn bulk_create_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<Vec<Equipment>>)> {
    let mut template = BulkEquipmentTemplate::default();
    let mut invoice: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == "invoice" {
            let filename = field.file_name().unwrap_or("invoice.pdf").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(e.to_string()))?;
            invoice = Some((filename, bytes.to_vec()));
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| AppError::Validation(e.to_string()))?;
        if value.is_empty() {
            continue;
        }

        match name.as_str() {
            "count" => template.count = Some(parse_i64("count", &value)?),
            "base_serial" => template.base_serial = Some(value),
            "brand" => template.brand = Some(value),
            "model" => template.model = Some(value),
            "processor" => template.processor = Some(value),
            "ram" => template.ram = Some(value),
            "storage_desc" => template.storage_desc = Some(value),
            "purchase_date" => {
                template.purchase_date = Some(parse_date("purchase_date", &value)?)
            }
            "warranty_end_date" => {
                template.warranty_end_date = Some(parse_date("warranty_end_date", &value)?)
            }
            "type_id" => template.refs.type_id = Some(parse_i32("type_id", &value)?),
            "status_id" => template.refs.status_id = Some(parse_i32("status_id", &value)?),
            "supplier_id" => template.refs.supplier_id = Some(parse_i32("supplier_id", &value)?),
            "branch_id" => template.refs.branch_id = Some(parse_i32("branch_id", &value)?),
            "branch_name" => template.refs.branch_name = Some(value),
            "responsible_user_id" => {
                template.refs.responsible_user_id =
                    Some(parse_i32("responsible_user_id", &value)?)
            }
            _ => {}
        }
    }

    let created = state
        .services
        .equipment
        .bulk_create(&claims, template, invoice)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}
