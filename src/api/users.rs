//! User management and own-profile endpoints

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::{AppError, AppResult},
    models::user::{CreateUser, UpdateOwnProfile, UpdateUser, UserQuery, UserWithProfile},
};

use super::AuthenticatedUser;

/// List users (admin only)
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    security(("bearer_auth" = [])),
    params(UserQuery),
    responses(
        (status = 200, description = "List of users", body = Vec<UserWithProfile>),
        (status = 403, description = "Admin privileges required")
    )
)]
pub async fn list_users(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<UserQuery>,
) -> AppResult<Json<Vec<UserWithProfile>>> {
    claims.require_admin()?;
    let users = state.services.users.list(&query).await?;
    Ok(Json(users))
}

/// Get user details by ID (admin only)
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User details", body = UserWithProfile),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<UserWithProfile>> {
    claims.require_admin()?;
    let user = state.services.users.get_by_id(id).await?;
    Ok(Json(user))
}

/// Create a new user (admin only)
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    security(("bearer_auth" = [])),
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created", body = UserWithProfile),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Username already exists")
    )
)]
pub async fn create_user(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(user): Json<CreateUser>,
) -> AppResult<(StatusCode, Json<UserWithProfile>)> {
    claims.require_admin()?;
    let created = state.services.users.create(&claims, user).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update an existing user (admin only)
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "users",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated", body = UserWithProfile),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_user(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(user): Json<UpdateUser>,
) -> AppResult<Json<UserWithProfile>> {
    claims.require_admin()?;
    let updated = state.services.users.update(&claims, id, user).await?;
    Ok(Json(updated))
}

/// Delete a user (admin only)
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "users",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_admin()?;
    state.services.users.delete(&claims, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Get the caller's account and profile
#[utoipa::path(
    get,
    path = "/profile",
    tag = "profile",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Own profile", body = UserWithProfile)
    )
)]
pub async fn get_my_profile(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<UserWithProfile>> {
    let user = state.services.users.get_by_id(claims.user_id).await?;
    Ok(Json(user))
}

/// Update the caller's account and profile
#[utoipa::path(
    put,
    path = "/profile",
    tag = "profile",
    security(("bearer_auth" = [])),
    request_body = UpdateOwnProfile,
    responses(
        (status = 200, description = "Profile updated", body = UserWithProfile),
        (status = 401, description = "Wrong current password")
    )
)]
pub async fn update_my_profile(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(profile): Json<UpdateOwnProfile>,
) -> AppResult<Json<UserWithProfile>> {
    let updated = state
        .services
        .users
        .update_own_profile(claims.user_id, profile)
        .await?;
    Ok(Json(updated))
}

/// Upload the caller's profile photo (multipart, field "photo")
#[utoipa::path(
    post,
    path = "/profile/photo",
    tag = "profile",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Photo stored", body = UserWithProfile),
        (status = 400, description = "No photo field in request")
    )
)]
pub async fn upload_profile_photo(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    mut multipart: Multipart,
) -> AppResult<Json<UserWithProfile>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.to_string()))?
    {
        if field.name() != Some("photo") {
            continue;
        }
        let filename = field.file_name().unwrap_or("photo.jpg").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let handle = state
            .services
            .storage
            .store("profile_photos", &filename, &bytes)
            .await?;
        let updated = state
            .services
            .users
            .set_profile_photo(claims.user_id, &handle)
            .await?;
        return Ok(Json(updated));
    }

    Err(AppError::Validation("Missing photo field".to_string()))
}
