//! Activity model: unified record for tasks, notifications and news items

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;

/// Activity kind discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Task,
    Notification,
    News,
}

impl ActivityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::Task => "task",
            ActivityKind::Notification => "notification",
            ActivityKind::News => "news",
        }
    }
}

impl std::fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ActivityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "task" => Ok(ActivityKind::Task),
            "notification" => Ok(ActivityKind::Notification),
            "news" => Ok(ActivityKind::News),
            _ => Err(format!("Invalid activity kind: {}", s)),
        }
    }
}

// SQLx conversion: kind is stored as TEXT
impl sqlx::Type<Postgres> for ActivityKind {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for ActivityKind {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for ActivityKind {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        let s: String = self.as_str().to_string();
        <String as Encode<Postgres>>::encode(s, buf)
    }
}

/// Activity label: task state or notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLabel {
    Urgent,
    Done,
    Pending,
    Info,
}

impl ActivityLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLabel::Urgent => "urgent",
            ActivityLabel::Done => "done",
            ActivityLabel::Pending => "pending",
            ActivityLabel::Info => "info",
        }
    }
}

impl std::fmt::Display for ActivityLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ActivityLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "urgent" => Ok(ActivityLabel::Urgent),
            "done" => Ok(ActivityLabel::Done),
            "pending" => Ok(ActivityLabel::Pending),
            "info" => Ok(ActivityLabel::Info),
            _ => Err(format!("Invalid activity label: {}", s)),
        }
    }
}

impl sqlx::Type<Postgres> for ActivityLabel {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for ActivityLabel {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for ActivityLabel {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        let s: String = self.as_str().to_string();
        <String as Encode<Postgres>>::encode(s, buf)
    }
}

/// Activity record.
/// Tasks are created explicitly; notifications only as mutation side effects.
/// user_id NULL on a notification means broadcast to all users.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Activity {
    pub id: i32,
    pub kind: ActivityKind,
    pub label: ActivityLabel,
    pub title: String,
    pub body: Option<String>,
    pub created_at: DateTime<Utc>,
    pub due_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub user_id: Option<i32>,
}

/// Create task request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTask {
    pub title: String,
    pub body: Option<String>,
    pub due_at: Option<DateTime<Utc>>,
    /// Assignee; defaults to the acting user when omitted
    pub user_id: Option<i32>,
    pub label: Option<ActivityLabel>,
}

/// Update task request
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub body: Option<String>,
    pub due_at: Option<DateTime<Utc>>,
    pub user_id: Option<i32>,
    pub label: Option<ActivityLabel>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_str() {
        for kind in [ActivityKind::Task, ActivityKind::Notification, ActivityKind::News] {
            assert_eq!(kind.as_str().parse::<ActivityKind>().unwrap(), kind);
        }
    }

    #[test]
    fn unknown_kind_is_rejected() {
        assert!("reminder".parse::<ActivityKind>().is_err());
    }

    #[test]
    fn label_round_trips_through_str() {
        for label in [
            ActivityLabel::Urgent,
            ActivityLabel::Done,
            ActivityLabel::Pending,
            ActivityLabel::Info,
        ] {
            assert_eq!(label.as_str().parse::<ActivityLabel>().unwrap(), label);
        }
    }
}
