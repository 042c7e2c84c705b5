//! Equipment reservation model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Reservation record as stored
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Reservation {
    pub id: i32,
    pub equipment_id: i32,
    pub user_id: i32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Reservation with equipment and requester display fields, for calendar views
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ReservationDetails {
    pub id: i32,
    pub equipment_id: i32,
    pub user_id: i32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub equipment_serial: String,
    pub equipment_brand: String,
    pub equipment_model: String,
    pub requester_username: String,
    pub requester_email: Option<String>,
}

/// Create reservation request.
/// When user_id is omitted the requesting user defaults to the acting user.
/// Overlapping reservations for the same equipment are allowed; conflicts
/// are resolved manually by staff.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateReservation {
    pub equipment_id: i32,
    pub user_id: Option<i32>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub reason: Option<String>,
}

/// Update reservation request
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateReservation {
    pub equipment_id: Option<i32>,
    pub user_id: Option<i32>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub reason: Option<String>,
}
