//! Reservations repository

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::reservation::{Reservation, ReservationDetails, UpdateReservation},
};

const DETAILS_SELECT: &str = r#"
    SELECT r.id, r.equipment_id, r.user_id, r.start_time, r.end_time, r.reason, r.created_at,
           e.serial_number AS equipment_serial, e.brand AS equipment_brand,
           e.model AS equipment_model,
           u.username AS requester_username, u.email AS requester_email
    FROM reservations r
    JOIN equipment e ON r.equipment_id = e.id
    JOIN users u ON r.user_id = u.id
"#;

#[derive(Clone)]
pub struct ReservationsRepository {
    pool: Pool<Postgres>,
}

impl ReservationsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all reservations with display fields, for the calendar view
    pub async fn list(&self) -> AppResult<Vec<ReservationDetails>> {
        let query = format!("{} ORDER BY r.start_time DESC, r.id DESC", DETAILS_SELECT);
        let rows = sqlx::query_as::<_, ReservationDetails>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Get reservation by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Reservation> {
        sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Reservation {} not found", id)))
    }

    /// Get reservation with display fields
    pub async fn get_details(&self, id: i32) -> AppResult<ReservationDetails> {
        let query = format!("{} WHERE r.id = $1", DETAILS_SELECT);
        sqlx::query_as::<_, ReservationDetails>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Reservation {} not found", id)))
    }

    /// Create a reservation; both references were resolved by the caller
    pub async fn create(
        &self,
        equipment_id: i32,
        user_id: i32,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        reason: Option<&str>,
    ) -> AppResult<Reservation> {
        let row = sqlx::query_as::<_, Reservation>(
            r#"
            INSERT INTO reservations (equipment_id, user_id, start_time, end_time, reason)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(equipment_id)
        .bind(user_id)
        .bind(start_time)
        .bind(end_time)
        .bind(reason)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Update a reservation; only provided fields change
    pub async fn update(&self, id: i32, data: &UpdateReservation) -> AppResult<Reservation> {
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

        add_field!(data.equipment_id, "equipment_id");
        add_field!(data.user_id, "user_id");
        add_field!(data.start_time, "start_time");
        add_field!(data.end_time, "end_time");
        add_field!(data.reason, "reason");

        if sets.is_empty() {
            return self.get_by_id(id).await;
        }

        idx += 1;
        let query = format!(
            "UPDATE reservations SET {} WHERE id = ${} RETURNING *",
            sets.join(", "),
            idx
        );

        let mut builder = sqlx::query_as::<_, Reservation>(&query);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(data.equipment_id);
        bind_field!(data.user_id);
        bind_field!(data.start_time);
        bind_field!(data.end_time);
        bind_field!(data.reason);

        builder
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Reservation {} not found", id)))
    }

    /// Delete a reservation
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM reservations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Reservation {} not found", id)));
        }
        Ok(())
    }
}
