//! Repository capability trait for folder and file storage.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::result::AppResult;
use crate::types::id::ObjectId;

/// Data-access contract shared by every storage backend.
///
/// The trait is generic over the folder and file entity types so that this
/// crate stays free of entity definitions; backends implement it for the
/// concrete models in `volders-entity`. Callers hold it as
/// `Arc<dyn VolderRepository<Folder, File>>` and never name a backend.
///
/// Updates are full replacements of the mutable fields. Deletes never
/// cascade to child folders or contained files.
#[async_trait]
pub trait VolderRepository<Folder, File>: Send + Sync + std::fmt::Debug + 'static
where
    Folder: Send + Sync + 'static,
    File: Send + Sync + 'static,
{
    /// Fetch a folder by ID. Fails with `NotFound` if absent.
    async fn get_folder(&self, id: &ObjectId) -> AppResult<Folder>;

    /// Fetch a file by ID. Fails with `NotFound` if absent.
    async fn get_file(&self, id: &ObjectId) -> AppResult<File>;

    /// Persist a new folder, assigning its ID and timestamps.
    /// Returns the stored record.
    async fn create_folder(&self, folder: Folder) -> AppResult<Folder>;

    /// Persist a new file, assigning its ID and timestamps.
    /// Returns the stored record.
    async fn create_file(&self, file: File) -> AppResult<File>;

    /// Overwrite the mutable fields of an existing folder and refresh its
    /// modification date. Fails with `NotFound` if the ID does not exist.
    async fn update_folder(&self, folder: Folder) -> AppResult<Folder>;

    /// Overwrite the mutable fields of an existing file and refresh its
    /// modification date. Fails with `NotFound` if the ID does not exist.
    async fn update_file(&self, file: File) -> AppResult<File>;

    /// Remove a folder. Fails with `NotFound` if absent.
    async fn delete_folder(&self, id: &ObjectId) -> AppResult<()>;

    /// Remove a file. Fails with `NotFound` if absent.
    async fn delete_file(&self, id: &ObjectId) -> AppResult<()>;

    /// Return `folder_id` followed by all of its transitive descendants,
    /// ordered by depth so that every folder precedes its children.
    ///
    /// Fails with `NotFound` if `folder_id` does not exist and with
    /// `Cancelled` if `cancel` fires before the traversal completes. Partial
    /// results are never returned.
    async fn get_folder_hierarchy(
        &self,
        cancel: &CancellationToken,
        folder_id: &ObjectId,
    ) -> AppResult<Vec<Folder>>;

    /// Check that the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
