//! Consumable stock endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::consumable::{Consumable, CreateConsumable, UpdateConsumable},
};

use super::AuthenticatedUser;

/// List all consumables
#[utoipa::path(
    get,
    path = "/consumables",
    tag = "consumables",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Consumables list", body = Vec<Consumable>)
    )
)]
pub async fn list_consumables(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Consumable>>> {
    let consumables = state.services.consumables.list().await?;
    Ok(Json(consumables))
}

/// Get consumable by ID
#[utoipa::path(
    get,
    path = "/consumables/{id}",
    tag = "consumables",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Consumable ID")),
    responses(
        (status = 200, description = "Consumable details", body = Consumable),
        (status = 404, description = "Consumable not found")
    )
)]
pub async fn get_consumable(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Consumable>> {
    let consumable = state.services.consumables.get_by_id(id).await?;
    Ok(Json(consumable))
}

/// Create a consumable
#[utoipa::path(
    post,
    path = "/consumables",
    tag = "consumables",
    security(("bearer_auth" = [])),
    request_body = CreateConsumable,
    responses(
        (status = 201, description = "Consumable created", body = Consumable),
        (status = 409, description = "Code already exists")
    )
)]
pub async fn create_consumable(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateConsumable>,
) -> AppResult<(StatusCode, Json<Consumable>)> {
    let consumable = state.services.consumables.create(&claims, data).await?;
    Ok((StatusCode::CREATED, Json(consumable)))
}

/// Update a consumable
#[utoipa::path(
    put,
    path = "/consumables/{id}",
    tag = "consumables",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Consumable ID")),
    request_body = UpdateConsumable,
    responses(
        (status = 200, description = "Consumable updated", body = Consumable),
        (status = 404, description = "Consumable not found")
    )
)]
pub async fn update_consumable(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<UpdateConsumable>,
) -> AppResult<Json<Consumable>> {
    let consumable = state.services.consumables.update(&claims, id, data).await?;
    Ok(Json(consumable))
}

/// Delete a consumable
#[utoipa::path(
    delete,
    path = "/consumables/{id}",
    tag = "consumables",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Consumable ID")),
    responses(
        (status = 204, description = "Consumable deleted"),
        (status = 404, description = "Consumable not found")
    )
)]
pub async fn delete_consumable(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.consumables.delete(&claims, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
