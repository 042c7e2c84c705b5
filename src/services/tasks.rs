//! Task service: explicit task lifecycle plus the dual notification fan-out
//! on assignment.

use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    models::activity::{Activity, ActivityLabel, CreateTask, UpdateTask},
    models::user::UserClaims,
    repository::Repository,
    services::{audit::AuditService, notifications::NotificationsService, resolver::ReferenceResolver},
};

/// Planned notification: recipient, title, body
type PlannedNotification = (Option<i32>, String, String);

/// Decide who gets notified about a new task.
///
/// The creator always gets a confirmation. The assignee gets an announcement
/// only when they are a different identity than the creator.
fn task_notifications(
    actor_id: i32,
    actor_name: &str,
    assignee: Option<(i32, &str)>,
    title: &str,
) -> Vec<PlannedNotification> {
    let mut planned = Vec::new();

    match assignee {
        Some((assignee_id, assignee_name)) => {
            planned.push((
                Some(actor_id),
                "New task created".to_string(),
                format!("You assigned '{}' to {}", title, assignee_name),
            ));
            if assignee_id != actor_id {
                planned.push((
                    Some(assignee_id),
                    "New task assigned".to_string(),
                    format!("{} assigned you: {}", actor_name, title),
                ));
            }
        }
        None => {
            planned.push((
                Some(actor_id),
                "New task created".to_string(),
                format!("You created task '{}'", title),
            ));
        }
    }

    planned
}

#[derive(Clone)]
pub struct TasksService {
    repository: Repository,
    resolver: ReferenceResolver,
    audit: AuditService,
    notifications: NotificationsService,
}

impl TasksService {
    pub fn new(repository: Repository) -> Self {
        Self {
            resolver: ReferenceResolver::new(repository.clone()),
            audit: AuditService::new(repository.clone()),
            notifications: NotificationsService::new(repository.clone()),
            repository,
        }
    }

    /// Unified activity feed (tasks, notifications, news), newest first
    pub async fn list_activities(&self) -> AppResult<Vec<Activity>> {
        self.repository.activities.list_all().await
    }

    pub async fn list(&self) -> AppResult<Vec<Activity>> {
        self.repository.activities.tasks_list().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Activity> {
        self.repository.activities.task_get_by_id(id).await
    }

    /// Create a task through the mutation pipeline, then fan out one or two
    /// notifications depending on who the assignee is.
    pub async fn create(&self, actor: &UserClaims, data: CreateTask) -> AppResult<Activity> {
        if data.title.trim().is_empty() {
            return Err(AppError::Validation("Title must not be empty".to_string()));
        }

        let assignee = match data.user_id {
            Some(id) => Some(self.resolver.resolve_user(id).await?),
            None => None,
        };

        let label = data.label.unwrap_or(ActivityLabel::Pending);
        let task = self
            .repository
            .activities
            .task_create(&data, assignee.as_ref().map(|u| u.id), label)
            .await?;

        self.audit
            .record(
                Some(actor.user_id),
                "create",
                "task",
                &format!("ID: {} - {}", task.id, task.title),
            )
            .await?;

        let planned = task_notifications(
            actor.user_id,
            &actor.sub,
            assignee.as_ref().map(|u| (u.id, u.username.as_str())),
            &task.title,
        );
        for (recipient, title, body) in planned {
            self.notifications.notify(recipient, &title, &body).await;
        }

        Ok(task)
    }

    /// Update a task through the mutation pipeline
    pub async fn update(&self, actor: &UserClaims, id: i32, data: UpdateTask) -> AppResult<Activity> {
        if let Some(user_id) = data.user_id {
            self.resolver.resolve_user(user_id).await?;
        }

        let task = self.repository.activities.task_update(id, &data).await?;

        self.audit
            .record(
                Some(actor.user_id),
                "update",
                "task",
                &format!("ID: {} - {}", task.id, task.title),
            )
            .await?;

        self.notifications
            .notify(
                Some(actor.user_id),
                "Task updated",
                &format!("Updated: {}", task.title),
            )
            .await;

        Ok(task)
    }

    /// Mark a task done and stamp the completion time. Re-completing an
    /// already completed task is not an error and re-stamps the time.
    pub async fn complete(&self, actor: &UserClaims, id: i32) -> AppResult<Activity> {
        self.repository.activities.task_get_by_id(id).await?;

        let task = self
            .repository
            .activities
            .task_complete(id, Utc::now())
            .await?;

        self.notifications
            .notify(
                Some(actor.user_id),
                "Task completed",
                &format!("You completed: {}", task.title),
            )
            .await;

        Ok(task)
    }

    /// Delete a task; identifying detail captured before the delete
    pub async fn delete(&self, actor: &UserClaims, id: i32) -> AppResult<()> {
        let task = self.repository.activities.task_get_by_id(id).await?;
        let snapshot = format!("ID: {} - {}", task.id, task.title);

        self.repository.activities.task_delete(id).await?;

        self.audit
            .record(Some(actor.user_id), "delete", "task", &snapshot)
            .await?;

        self.notifications
            .notify(
                Some(actor.user_id),
                "Task deleted",
                &format!("Deleted: {}", snapshot),
            )
            .await;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assigning_to_someone_else_notifies_both() {
        let planned = task_notifications(1, "ana", Some((2, "bruno")), "Replace toner");
        assert_eq!(planned.len(), 2);
        assert_eq!(planned[0].0, Some(1));
        assert_eq!(planned[1].0, Some(2));
        assert!(planned[1].2.contains("ana"));
    }

    #[test]
    fn self_assignment_notifies_once() {
        let planned = task_notifications(1, "ana", Some((1, "ana")), "Replace toner");
        assert_eq!(planned.len(), 1);
        assert_eq!(planned[0].0, Some(1));
    }

    #[test]
    fn unassigned_task_notifies_the_creator_only() {
        let planned = task_notifications(1, "ana", None, "Replace toner");
        assert_eq!(planned.len(), 1);
        assert_eq!(planned[0].0, Some(1));
    }
}
