//! Catalog endpoints: dropdown listings plus admin creation

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::AppResult,
    models::catalog::{Branch, CreateBranch, CreateCatalogEntry, EquipmentType, Status, Supplier},
};

use super::AuthenticatedUser;

/// List equipment types
#[utoipa::path(
    get,
    path = "/equipment-types",
    tag = "catalogs",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Equipment types", body = Vec<EquipmentType>))
)]
pub async fn list_types(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<EquipmentType>>> {
    Ok(Json(state.services.catalogs.types_list().await?))
}

/// Create an equipment type (admin only)
#[utoipa::path(
    post,
    path = "/equipment-types",
    tag = "catalogs",
    security(("bearer_auth" = [])),
    request_body = CreateCatalogEntry,
    responses(
        (status = 201, description = "Equipment type created", body = EquipmentType),
        (status = 409, description = "Name already exists")
    )
)]
pub async fn create_type(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateCatalogEntry>,
) -> AppResult<(StatusCode, Json<EquipmentType>)> {
    claims.require_admin()?;
    let created = state.services.catalogs.types_create(&data).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// List statuses
#[utoipa::path(
    get,
    path = "/statuses",
    tag = "catalogs",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Statuses", body = Vec<Status>))
)]
pub async fn list_statuses(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Status>>> {
    Ok(Json(state.services.catalogs.statuses_list().await?))
}

/// Create a status (admin only)
#[utoipa::path(
    post,
    path = "/statuses",
    tag = "catalogs",
    security(("bearer_auth" = [])),
    request_body = CreateCatalogEntry,
    responses(
        (status = 201, description = "Status created", body = Status),
        (status = 409, description = "Name already exists")
    )
)]
pub async fn create_status(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateCatalogEntry>,
) -> AppResult<(StatusCode, Json<Status>)> {
    claims.require_admin()?;
    let created = state.services.catalogs.statuses_create(&data).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// List suppliers
#[utoipa::path(
    get,
    path = "/suppliers",
    tag = "catalogs",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Suppliers", body = Vec<Supplier>))
)]
pub async fn list_suppliers(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Supplier>>> {
    Ok(Json(state.services.catalogs.suppliers_list().await?))
}

/// Create a supplier (admin only)
#[utoipa::path(
    post,
    path = "/suppliers",
    tag = "catalogs",
    security(("bearer_auth" = [])),
    request_body = CreateCatalogEntry,
    responses(
        (status = 201, description = "Supplier created", body = Supplier),
        (status = 409, description = "Name already exists")
    )
)]
pub async fn create_supplier(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateCatalogEntry>,
) -> AppResult<(StatusCode, Json<Supplier>)> {
    claims.require_admin()?;
    let created = state.services.catalogs.suppliers_create(&data).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// List branches
#[utoipa::path(
    get,
    path = "/branches",
    tag = "catalogs",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Branches", body = Vec<Branch>))
)]
pub async fn list_branches(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Branch>>> {
    Ok(Json(state.services.catalogs.branches_list().await?))
}

/// Create a branch (admin only)
#[utoipa::path(
    post,
    path = "/branches",
    tag = "catalogs",
    security(("bearer_auth" = [])),
    request_body = CreateBranch,
    responses(
        (status = 201, description = "Branch created", body = Branch),
        (status = 409, description = "Name already exists")
    )
)]
pub async fn create_branch(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateBranch>,
) -> AppResult<(StatusCode, Json<Branch>)> {
    claims.require_admin()?;
    let created = state.services.catalogs.branches_create(&data).await?;
    Ok((StatusCode::CREATED, Json(created)))
}
