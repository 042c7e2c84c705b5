//! Business logic services

pub mod audit;
pub mod catalogs;
pub mod consumables;
pub mod equipment;
pub mod notifications;
pub mod reservations;
pub mod resolver;
pub mod stats;
pub mod storage;
pub mod tasks;
pub mod users;

use crate::{
    config::{AuthConfig, StorageConfig},
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub users: users::UsersService,
    pub equipment: equipment::EquipmentService,
    pub consumables: consumables::ConsumablesService,
    pub reservations: reservations::ReservationsService,
    pub tasks: tasks::TasksService,
    pub catalogs: catalogs::CatalogsService,
    pub notifications: notifications::NotificationsService,
    pub audit: audit::AuditService,
    pub stats: stats::StatsService,
    pub storage: storage::StorageService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(
        repository: Repository,
        auth_config: AuthConfig,
        storage_config: &StorageConfig,
    ) -> Self {
        let storage = storage::StorageService::new(storage_config);
        Self {
            users: users::UsersService::new(repository.clone(), auth_config),
            equipment: equipment::EquipmentService::new(repository.clone(), storage.clone()),
            consumables: consumables::ConsumablesService::new(repository.clone()),
            reservations: reservations::ReservationsService::new(repository.clone()),
            tasks: tasks::TasksService::new(repository.clone()),
            catalogs: catalogs::CatalogsService::new(repository.clone()),
            notifications: notifications::NotificationsService::new(repository.clone()),
            audit: audit::AuditService::new(repository.clone()),
            stats: stats::StatsService::new(repository),
            storage,
        }
    }
}
