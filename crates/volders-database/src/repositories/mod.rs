//! Repository implementations backed by PostgreSQL.

pub mod file;
pub mod folder;

pub use file::FileRepository;
pub use folder::FolderRepository;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use volders_core::result::AppResult;
use volders_core::traits::VolderRepository;
use volders_core::types::ObjectId;
use volders_entity::{File, Folder};

use crate::connection::DatabasePool;

/// Persistent backend: the folder and file repositories over one pool.
///
/// Identifiers are always generated by the database, so creates cannot
/// collide. Updates and deletes that match no row fail with `NotFound`.
#[derive(Debug, Clone)]
pub struct PgVolderRepository {
    db: DatabasePool,
    folders: FolderRepository,
    files: FileRepository,
}

impl PgVolderRepository {
    /// Build the backend over an open pool.
    pub fn new(db: DatabasePool) -> Self {
        let folders = FolderRepository::new(db.pool().clone());
        let files = FileRepository::new(db.pool().clone());
        Self { db, folders, files }
    }

    /// The folder repository.
    pub fn folders(&self) -> &FolderRepository {
        &self.folders
    }

    /// The file repository.
    pub fn files(&self) -> &FileRepository {
        &self.files
    }
}

#[async_trait]
impl VolderRepository<Folder, File> for PgVolderRepository {
    async fn get_folder(&self, id: &ObjectId) -> AppResult<Folder> {
        self.folders.find_by_id(id).await
    }

    async fn get_file(&self, id: &ObjectId) -> AppResult<File> {
        self.files.find_by_id(id).await
    }

    async fn create_folder(&self, folder: Folder) -> AppResult<Folder> {
        self.folders.create(&folder).await
    }

    async fn create_file(&self, file: File) -> AppResult<File> {
        self.files.create(&file).await
    }

    async fn update_folder(&self, folder: Folder) -> AppResult<Folder> {
        self.folders.update(&folder).await
    }

    async fn update_file(&self, file: File) -> AppResult<File> {
        self.files.update(&file).await
    }

    async fn delete_folder(&self, id: &ObjectId) -> AppResult<()> {
        self.folders.delete(id).await
    }

    async fn delete_file(&self, id: &ObjectId) -> AppResult<()> {
        self.files.delete(id).await
    }

    async fn get_folder_hierarchy(
        &self,
        cancel: &CancellationToken,
        folder_id: &ObjectId,
    ) -> AppResult<Vec<Folder>> {
        self.folders.find_hierarchy(cancel, folder_id).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.db.health_check().await
    }
}
