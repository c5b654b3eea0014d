//! Repository manager that dispatches to the configured backend.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::info;

use volders_core::config::{AppConfig, BackendKind};
use volders_core::result::AppResult;
use volders_core::traits::VolderRepository;
use volders_core::types::ObjectId;
use volders_database::{DatabasePool, PgVolderRepository};
use volders_entity::{File, Folder};
use volders_memory::MemoryVolderRepository;

/// Shared handle to whichever backend the configuration selects.
///
/// Consumers depend on this (or on the trait object it wraps) and never
/// on a concrete backend.
#[derive(Debug, Clone)]
pub struct RepositoryManager {
    inner: Arc<dyn VolderRepository<Folder, File>>,
}

impl RepositoryManager {
    /// Build the backend named by `config.repository.backend`.
    ///
    /// For postgres this opens the pool and, unless disabled, applies
    /// pending migrations.
    pub async fn new(config: &AppConfig) -> AppResult<Self> {
        let inner: Arc<dyn VolderRepository<Folder, File>> = match config.repository.backend {
            BackendKind::Memory => {
                info!("Initializing in-memory repository");
                Arc::new(MemoryVolderRepository::new())
            }
            BackendKind::Postgres => {
                info!("Initializing PostgreSQL repository");
                let db = DatabasePool::connect(&config.database).await?;
                if config.database.run_migrations {
                    volders_database::migration::run_migrations(db.pool()).await?;
                }
                Arc::new(PgVolderRepository::new(db))
            }
        };

        Ok(Self { inner })
    }

    /// Wrap an existing repository (for testing).
    pub fn from_repository(repository: Arc<dyn VolderRepository<Folder, File>>) -> Self {
        Self { inner: repository }
    }

    /// The wrapped repository.
    pub fn repository(&self) -> Arc<dyn VolderRepository<Folder, File>> {
        Arc::clone(&self.inner)
    }
}

#[async_trait]
impl VolderRepository<Folder, File> for RepositoryManager {
    async fn get_folder(&self, id: &ObjectId) -> AppResult<Folder> {
        self.inner.get_folder(id).await
    }

    async fn get_file(&self, id: &ObjectId) -> AppResult<File> {
        self.inner.get_file(id).await
    }

    async fn create_folder(&self, folder: Folder) -> AppResult<Folder> {
        self.inner.create_folder(folder).await
    }

    async fn create_file(&self, file: File) -> AppResult<File> {
        self.inner.create_file(file).await
    }

    async fn update_folder(&self, folder: Folder) -> AppResult<Folder> {
        self.inner.update_folder(folder).await
    }

    async fn update_file(&self, file: File) -> AppResult<File> {
        self.inner.update_file(file).await
    }

    async fn delete_folder(&self, id: &ObjectId) -> AppResult<()> {
        self.inner.delete_folder(id).await
    }

    async fn delete_file(&self, id: &ObjectId) -> AppResult<()> {
        self.inner.delete_file(id).await
    }

    async fn get_folder_hierarchy(
        &self,
        cancel: &CancellationToken,
        folder_id: &ObjectId,
    ) -> AppResult<Vec<Folder>> {
        self.inner.get_folder_hierarchy(cancel, folder_id).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }
}
