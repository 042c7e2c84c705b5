//! Repository layer for database operations

pub mod activities;
pub mod audit;
pub mod catalogs;
pub mod consumables;
pub mod equipment;
pub mod reservations;
pub mod users;

use sqlx::{Pool, Postgres};

use crate::error::AppError;

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub users: users::UsersRepository,
    pub catalogs: catalogs::CatalogsRepository,
    pub equipment: equipment::EquipmentRepository,
    pub consumables: consumables::ConsumablesRepository,
    pub reservations: reservations::ReservationsRepository,
    pub activities: activities::ActivitiesRepository,
    pub audit: audit::AuditRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            users: users::UsersRepository::new(pool.clone()),
            catalogs: catalogs::CatalogsRepository::new(pool.clone()),
            equipment: equipment::EquipmentRepository::new(pool.clone()),
            consumables: consumables::ConsumablesRepository::new(pool.clone()),
            reservations: reservations::ReservationsRepository::new(pool.clone()),
            activities: activities::ActivitiesRepository::new(pool.clone()),
            audit: audit::AuditRepository::new(pool.clone()),
            pool,
        }
    }
}

/// Convert store-level unique violations into a conflict error; everything
/// else stays a database error.
pub(crate) fn map_unique_violation(err: sqlx::Error, message: &str) -> AppError {
    if let sqlx::Error::Database(ref db) = err {
        if db.code().as_deref() == Some("23505") {
            return AppError::Conflict(message.to_string());
        }
    }
    AppError::Database(err)
}
