//! File storage service for invoice and photo attachments

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::{
    config::StorageConfig,
    error::{AppError, AppResult},
};

#[derive(Clone)]
pub struct StorageService {
    root: PathBuf,
}

impl StorageService {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            root: PathBuf::from(&config.root),
        }
    }

    /// Store a named byte payload under the given category and return the
    /// retrievable handle (path relative to the storage root).
    pub async fn store(
        &self,
        category: &str,
        original_name: &str,
        bytes: &[u8],
    ) -> AppResult<String> {
        let extension = Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("bin");
        let handle = format!("{}/{}.{}", category, Uuid::new_v4(), extension);
        let path = self.root.join(&handle);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                AppError::Storage(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to write {}: {}", path.display(), e)))?;

        Ok(handle)
    }
}
