//! Catalog service: dropdown listings and admin creation

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::catalog::{Branch, CreateBranch, CreateCatalogEntry, EquipmentType, Status, Supplier},
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogsService {
    repository: Repository,
}

impl CatalogsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn types_list(&self) -> AppResult<Vec<EquipmentType>> {
        self.repository.catalogs.types_list().await
    }

    pub async fn types_create(&self, data: &CreateCatalogEntry) -> AppResult<EquipmentType> {
        data.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.repository.catalogs.types_create(data).await
    }

    pub async fn statuses_list(&self) -> AppResult<Vec<Status>> {
        self.repository.catalogs.statuses_list().await
    }

    pub async fn statuses_create(&self, data: &CreateCatalogEntry) -> AppResult<Status> {
        data.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.repository.catalogs.statuses_create(data).await
    }

    pub async fn suppliers_list(&self) -> AppResult<Vec<Supplier>> {
        self.repository.catalogs.suppliers_list().await
    }

    pub async fn suppliers_create(&self, data: &CreateCatalogEntry) -> AppResult<Supplier> {
        data.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.repository.catalogs.suppliers_create(data).await
    }

    pub async fn branches_list(&self) -> AppResult<Vec<Branch>> {
        self.repository.catalogs.branches_list().await
    }

    pub async fn branches_create(&self, data: &CreateBranch) -> AppResult<Branch> {
        data.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.repository.catalogs.branches_create(data).await
    }
}
