//! Activity endpoints: unified feed, tasks, and the notification feed

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::activity::{Activity, CreateTask, UpdateTask},
};

use super::AuthenticatedUser;

/// Unified activity feed (tasks, notifications, news), newest first
#[utoipa::path(
    get,
    path = "/activities",
    tag = "activities",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Activity feed", body = Vec<Activity>)
    )
)]
pub async fn list_activities(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Activity>>> {
    let activities = state.services.tasks.list_activities().await?;
    Ok(Json(activities))
}

/// Per-user notification feed: rows addressed to the caller plus broadcasts
#[utoipa::path(
    get,
    path = "/notifications",
    tag = "activities",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Notification feed", body = Vec<Activity>)
    )
)]
pub async fn list_notifications(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Activity>>> {
    let notifications = state.services.notifications.feed(claims.user_id).await?;
    Ok(Json(notifications))
}

/// List tasks, newest first
#[utoipa::path(
    get,
    path = "/tasks",
    tag = "tasks",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Tasks list", body = Vec<Activity>)
    )
)]
pub async fn list_tasks(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Activity>>> {
    let tasks = state.services.tasks.list().await?;
    Ok(Json(tasks))
}

/// Get task by ID
#[utoipa::path(
    get,
    path = "/tasks/{id}",
    tag = "tasks",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Task ID")),
    responses(
        (status = 200, description = "Task details", body = Activity),
        (status = 404, description = "Task not found")
    )
)]
pub async fn get_task(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Activity>> {
    let task = state.services.tasks.get_by_id(id).await?;
    Ok(Json(task))
}

/// Create a task. Notifies the creator, and the assignee when different.
#[utoipa::path(
    post,
    path = "/tasks",
    tag = "tasks",
    security(("bearer_auth" = [])),
    request_body = CreateTask,
    responses(
        (status = 201, description = "Task created", body = Activity),
        (status = 400, description = "Invalid input or unresolved assignee")
    )
)]
pub async fn create_task(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateTask>,
) -> AppResult<(StatusCode, Json<Activity>)> {
    let task = state.services.tasks.create(&claims, data).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// Update a task
#[utoipa::path(
    put,
    path = "/tasks/{id}",
    tag = "tasks",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Task ID")),
    request_body = UpdateTask,
    responses(
        (status = 200, description = "Task updated", body = Activity),
        (status = 404, description = "Task not found")
    )
)]
pub async fn update_task(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<UpdateTask>,
) -> AppResult<Json<Activity>> {
    let task = state.services.tasks.update(&claims, id, data).await?;
    Ok(Json(task))
}

/// Mark a task done, stamping the completion time. Re-completing an already
/// completed task succeeds and re-stamps the time.
#[utoipa::path(
    patch,
    path = "/tasks/{id}/complete",
    tag = "tasks",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Task ID")),
    responses(
        (status = 200, description = "Task completed", body = Activity),
        (status = 404, description = "Task not found")
    )
)]
pub async fn complete_task(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Activity>> {
    let task = state.services.tasks.complete(&claims, id).await?;
    Ok(Json(task))
}

/// Delete a task
#[utoipa::path(
    delete,
    path = "/tasks/{id}",
    tag = "tasks",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Task ID")),
    responses(
        (status = 204, description = "Task deleted"),
        (status = 404, description = "Task not found")
    )
)]
pub async fn delete_task(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.tasks.delete(&claims, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
