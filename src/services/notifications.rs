//! Notification fan-out.
//!
//! Emission is best-effort: a persistence failure here must never fail the
//! mutation that triggered it, so the fallible insert sits behind the
//! `ActivityWriter` seam and `emit` downgrades any error to a diagnostic.

use async_trait::async_trait;

use crate::{
    error::AppResult,
    models::activity::Activity,
    repository::{activities::ActivitiesRepository, Repository},
};

/// Persistence seam for notification rows
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ActivityWriter: Send + Sync {
    async fn insert_notification(
        &self,
        user_id: Option<i32>,
        title: &str,
        body: &str,
    ) -> AppResult<Activity>;
}

#[async_trait]
impl ActivityWriter for ActivitiesRepository {
    async fn insert_notification(
        &self,
        user_id: Option<i32>,
        title: &str,
        body: &str,
    ) -> AppResult<Activity> {
        ActivitiesRepository::insert_notification(self, user_id, title, body).await
    }
}

/// Emit one notification through the writer, swallowing any failure.
/// `user_id` None means broadcast, visible to every user's feed.
pub(crate) async fn emit(
    writer: &dyn ActivityWriter,
    user_id: Option<i32>,
    title: &str,
    body: &str,
) {
    if let Err(err) = writer.insert_notification(user_id, title, body).await {
        tracing::error!(title, "Failed to record notification: {}", err);
    }
}

#[derive(Clone)]
pub struct NotificationsService {
    repository: Repository,
}

impl NotificationsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Best-effort emit; never surfaces an error to the caller
    pub async fn notify(&self, user_id: Option<i32>, title: &str, body: &str) {
        emit(&self.repository.activities, user_id, title, body).await;
    }

    /// Per-user feed: rows addressed to the user plus broadcasts, newest first
    pub async fn feed(&self, user_id: i32) -> AppResult<Vec<Activity>> {
        self.repository.activities.notification_feed(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::activity::{ActivityKind, ActivityLabel};
    use chrono::Utc;

    fn activity(user_id: Option<i32>, title: &str) -> Activity {
        Activity {
            id: 1,
            kind: ActivityKind::Notification,
            label: ActivityLabel::Info,
            title: title.to_string(),
            body: None,
            created_at: Utc::now(),
            due_at: None,
            completed_at: None,
            user_id,
        }
    }

    #[tokio::test]
    async fn emit_reaches_the_writer() {
        let mut writer = MockActivityWriter::new();
        writer
            .expect_insert_notification()
            .times(1)
            .returning(|user_id, title, _| Ok(activity(user_id, title)));

        emit(&writer, Some(7), "New equipment", "Added: HP EliteBook").await;
    }

    #[tokio::test]
    async fn persistence_failure_is_swallowed() {
        let mut writer = MockActivityWriter::new();
        writer
            .expect_insert_notification()
            .times(1)
            .returning(|_, _, _| Err(AppError::Internal("injected storage failure".to_string())));

        // Must return normally; the caller's mutation result is unaffected.
        emit(&writer, None, "New equipment", "Added: HP EliteBook").await;
    }
}
