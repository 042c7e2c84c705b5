//! Activities repository: tasks, notifications and the unified feed

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::activity::{Activity, ActivityLabel, CreateTask, UpdateTask},
};

#[derive(Clone)]
pub struct ActivitiesRepository {
    pool: Pool<Postgres>,
}

impl ActivitiesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Unified feed of all activity kinds, newest first
    pub async fn list_all(&self) -> AppResult<Vec<Activity>> {
        let rows = sqlx::query_as::<_, Activity>(
            "SELECT * FROM activities ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Per-user notification feed: rows addressed to the user plus broadcasts
    pub async fn notification_feed(&self, user_id: i32) -> AppResult<Vec<Activity>> {
        let rows = sqlx::query_as::<_, Activity>(
            r#"
            SELECT * FROM activities
            WHERE kind = 'notification' AND (user_id = $1 OR user_id IS NULL)
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Insert one notification row; user_id None means broadcast
    pub async fn insert_notification(
        &self,
        user_id: Option<i32>,
        title: &str,
        body: &str,
    ) -> AppResult<Activity> {
        let row = sqlx::query_as::<_, Activity>(
            r#"
            INSERT INTO activities (kind, label, title, body, user_id)
            VALUES ('notification', 'info', $1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(title)
        .bind(body)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    // --- Tasks ---

    /// List task rows, newest first
    pub async fn tasks_list(&self) -> AppResult<Vec<Activity>> {
        let rows = sqlx::query_as::<_, Activity>(
            "SELECT * FROM activities WHERE kind = 'task' ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Get a task by ID (404 when the id belongs to another kind)
    pub async fn task_get_by_id(&self, id: i32) -> AppResult<Activity> {
        sqlx::query_as::<_, Activity>("SELECT * FROM activities WHERE id = $1 AND kind = 'task'")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Task {} not found", id)))
    }

    /// Create a task row
    pub async fn task_create(
        &self,
        data: &CreateTask,
        assignee_id: Option<i32>,
        label: ActivityLabel,
    ) -> AppResult<Activity> {
        let row = sqlx::query_as::<_, Activity>(
            r#"
            INSERT INTO activities (kind, label, title, body, due_at, user_id)
            VALUES ('task', $1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(label)
        .bind(&data.title)
        .bind(&data.body)
        .bind(data.due_at)
        .bind(assignee_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Update a task; only provided fields change
    pub async fn task_update(&self, id: i32, data: &UpdateTask) -> AppResult<Activity> {
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

        add_field!(data.title, "title");
        add_field!(data.body, "body");
        add_field!(data.due_at, "due_at");
        add_field!(data.user_id, "user_id");
        add_field!(data.label, "label");

        if sets.is_empty() {
            return self.task_get_by_id(id).await;
        }

        idx += 1;
        let query = format!(
            "UPDATE activities SET {} WHERE id = ${} AND kind = 'task' RETURNING *",
            sets.join(", "),
            idx
        );

        let mut builder = sqlx::query_as::<_, Activity>(&query);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(data.title);
        bind_field!(data.body);
        bind_field!(data.due_at);
        bind_field!(data.user_id);
        bind_field!(data.label);

        builder
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Task {} not found", id)))
    }

    /// Mark a task done and stamp completion time. Completing an already
    /// completed task re-stamps the completion time.
    pub async fn task_complete(&self, id: i32, completed_at: DateTime<Utc>) -> AppResult<Activity> {
        sqlx::query_as::<_, Activity>(
            r#"
            UPDATE activities SET label = 'done', completed_at = $1
            WHERE id = $2 AND kind = 'task'
            RETURNING *
            "#,
        )
        .bind(completed_at)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Task {} not found", id)))
    }

    /// Delete a task
    pub async fn task_delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM activities WHERE id = $1 AND kind = 'task'")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Task {} not found", id)));
        }
        Ok(())
    }
}
