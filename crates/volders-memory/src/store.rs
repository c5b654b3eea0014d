//! In-memory repository backed by two hash maps behind one `RwLock`.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use volders_core::error::AppError;
use volders_core::result::AppResult;
use volders_core::traits::VolderRepository;
use volders_core::types::ObjectId;
use volders_entity::{File, Folder};

use crate::hierarchy;

#[derive(Debug, Default)]
struct Tables {
    folders: HashMap<ObjectId, Folder>,
    files: HashMap<ObjectId, File>,
}

/// In-memory folder/file repository.
///
/// Construct one per test or per process and hand it to consumers as
/// `Arc<dyn VolderRepository<Folder, File>>`. Entities are stored by value;
/// every read returns a copy.
#[derive(Debug, Default)]
pub struct MemoryVolderRepository {
    tables: RwLock<Tables>,
}

impl MemoryVolderRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VolderRepository<Folder, File> for MemoryVolderRepository {
    async fn get_folder(&self, id: &ObjectId) -> AppResult<Folder> {
        let tables = self.tables.read().await;
        debug!(folder_id = %id, "Looking up folder");
        tables
            .folders
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))
    }

    async fn get_file(&self, id: &ObjectId) -> AppResult<File> {
        let tables = self.tables.read().await;
        debug!(file_id = %id, "Looking up file");
        tables
            .files
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("File {id} not found")))
    }

    async fn create_folder(&self, mut folder: Folder) -> AppResult<Folder> {
        let mut tables = self.tables.write().await;

        if folder.common.id.is_empty() {
            folder.common.id = ObjectId::generate();
        } else if tables.folders.contains_key(&folder.common.id) {
            warn!(folder_id = %folder.common.id, "Folder already exists");
            return Err(AppError::already_exists(format!(
                "Folder {} already exists",
                folder.common.id
            )));
        }

        folder.common.stamp_created(Utc::now());
        tables
            .folders
            .insert(folder.common.id.clone(), folder.clone());

        info!(folder_id = %folder.common.id, name = %folder.name, "Folder created");
        Ok(folder)
    }

    async fn create_file(&self, mut file: File) -> AppResult<File> {
        let mut tables = self.tables.write().await;

        if file.common.id.is_empty() {
            file.common.id = ObjectId::generate();
        } else if tables.files.contains_key(&file.common.id) {
            warn!(file_id = %file.common.id, "File already exists");
            return Err(AppError::already_exists(format!(
                "File {} already exists",
                file.common.id
            )));
        }

        file.common.stamp_created(Utc::now());
        tables.files.insert(file.common.id.clone(), file.clone());

        info!(file_id = %file.common.id, name = %file.name, size = file.size, "File created");
        Ok(file)
    }

    async fn update_folder(&self, mut folder: Folder) -> AppResult<Folder> {
        let mut tables = self.tables.write().await;

        let stored = tables
            .folders
            .get_mut(&folder.common.id)
            .ok_or_else(|| AppError::not_found(format!("Folder {} not found", folder.common.id)))?;

        folder.common.stamp_updated(&stored.common, Utc::now());
        *stored = folder.clone();

        info!(folder_id = %folder.common.id, "Folder updated");
        Ok(folder)
    }

    async fn update_file(&self, mut file: File) -> AppResult<File> {
        let mut tables = self.tables.write().await;

        let stored = tables
            .files
            .get_mut(&file.common.id)
            .ok_or_else(|| AppError::not_found(format!("File {} not found", file.common.id)))?;

        file.common.stamp_updated(&stored.common, Utc::now());
        *stored = file.clone();

        info!(file_id = %file.common.id, "File updated");
        Ok(file)
    }

    async fn delete_folder(&self, id: &ObjectId) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        tables
            .folders
            .remove(id)
            .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))?;

        info!(folder_id = %id, "Folder deleted");
        Ok(())
    }

    async fn delete_file(&self, id: &ObjectId) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        tables
            .files
            .remove(id)
            .ok_or_else(|| AppError::not_found(format!("File {id} not found")))?;

        info!(file_id = %id, "File deleted");
        Ok(())
    }

    #[tracing::instrument(skip(self, cancel))]
    async fn get_folder_hierarchy(
        &self,
        cancel: &CancellationToken,
        folder_id: &ObjectId,
    ) -> AppResult<Vec<Folder>> {
        let tables = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return Err(AppError::cancelled("Folder hierarchy traversal cancelled"));
            }
            tables = self.tables.read() => tables,
        };

        let folders = hierarchy::collect(&tables.folders, folder_id, cancel)?;
        debug!(count = folders.len(), "Folder hierarchy collected");
        Ok(folders)
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use volders_core::error::ErrorKind;
    use volders_core::types::UserId;

    fn alice() -> UserId {
        UserId::from("alice")
    }

    fn make_repo() -> Arc<dyn VolderRepository<Folder, File>> {
        Arc::new(MemoryVolderRepository::new())
    }

    #[tokio::test]
    async fn test_create_get_folder() {
        let repo = make_repo();
        let created = repo
            .create_folder(Folder::new(alice(), None, "root"))
            .await
            .unwrap();

        assert!(!created.id().is_empty());
        assert_eq!(created.common.creation_date, created.common.modified_date);

        let fetched = repo.get_folder(created.id()).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_create_keeps_supplied_id() {
        let repo = make_repo();
        let mut folder = Folder::new(alice(), None, "root");
        folder.common.id = ObjectId::from("fixed");

        let created = repo.create_folder(folder).await.unwrap();
        assert_eq!(created.id(), &ObjectId::from("fixed"));
    }

    #[tokio::test]
    async fn test_create_duplicate_folder_is_rejected() {
        let repo = make_repo();
        let original = repo
            .create_folder(Folder::new(alice(), None, "original"))
            .await
            .unwrap();

        let mut clash = Folder::new(UserId::from("mallory"), None, "impostor");
        clash.common.id = original.id().clone();
        let err = repo.create_folder(clash).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::AlreadyExists);

        let fetched = repo.get_folder(original.id()).await.unwrap();
        assert_eq!(fetched, original);
    }

    #[tokio::test]
    async fn test_missing_records_are_not_found() {
        let repo = make_repo();
        let id = ObjectId::from("missing");

        assert_eq!(repo.get_folder(&id).await.unwrap_err().kind, ErrorKind::NotFound);
        assert_eq!(repo.get_file(&id).await.unwrap_err().kind, ErrorKind::NotFound);
        assert_eq!(repo.delete_folder(&id).await.unwrap_err().kind, ErrorKind::NotFound);
        assert_eq!(repo.delete_file(&id).await.unwrap_err().kind, ErrorKind::NotFound);

        let mut folder = Folder::new(alice(), None, "ghost");
        folder.common.id = id.clone();
        assert_eq!(
            repo.update_folder(folder).await.unwrap_err().kind,
            ErrorKind::NotFound
        );
    }

    #[tokio::test]
    async fn test_update_folder_replaces_fields() {
        let repo = make_repo();
        let parent = repo
            .create_folder(Folder::new(alice(), None, "parent"))
            .await
            .unwrap();
        let created = repo
            .create_folder(Folder::new(alice(), None, "draft"))
            .await
            .unwrap();

        let mut changed = created.clone();
        changed.name = "final".to_string();
        changed.parent_id = Some(parent.id().clone());
        changed.common.creation_date = chrono::DateTime::<Utc>::UNIX_EPOCH;

        let updated = repo.update_folder(changed).await.unwrap();
        assert_eq!(updated.name, "final");
        assert_eq!(updated.parent_id.as_ref(), Some(parent.id()));
        assert_eq!(updated.common.creation_date, created.common.creation_date);
        assert!(updated.common.modified_date >= created.common.modified_date);

        let fetched = repo.get_folder(created.id()).await.unwrap();
        assert_eq!(fetched, updated);
    }

    #[tokio::test]
    async fn test_file_lifecycle() {
        let repo = make_repo();
        let folder = repo
            .create_folder(Folder::new(alice(), None, "docs"))
            .await
            .unwrap();

        let file = repo
            .create_file(File::new(
                alice(),
                folder.id().clone(),
                "a.txt",
                "text/plain",
                b"hello".to_vec(),
            ))
            .await
            .unwrap();
        assert_eq!(repo.get_file(file.id()).await.unwrap(), file);

        let mut changed = file.clone();
        changed.data = b"hello, world".to_vec();
        changed.size = changed.data.len() as i64;
        let updated = repo.update_file(changed).await.unwrap();
        assert_eq!(updated.size, 12);
        assert_eq!(updated.common.creation_date, file.common.creation_date);

        repo.delete_file(file.id()).await.unwrap();
        assert!(repo.get_file(file.id()).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_delete_folder_does_not_cascade() {
        let repo = make_repo();
        let parent = repo
            .create_folder(Folder::new(alice(), None, "parent"))
            .await
            .unwrap();
        let child = repo
            .create_folder(Folder::new(alice(), Some(parent.id().clone()), "child"))
            .await
            .unwrap();

        repo.delete_folder(parent.id()).await.unwrap();
        assert!(repo.get_folder(parent.id()).await.unwrap_err().is_not_found());
        assert_eq!(repo.get_folder(child.id()).await.unwrap(), child);
    }

    #[tokio::test]
    async fn test_folder_hierarchy() {
        let repo = make_repo();
        let root = repo
            .create_folder(Folder::new(alice(), None, "root"))
            .await
            .unwrap();
        let a = repo
            .create_folder(Folder::new(alice(), Some(root.id().clone()), "a"))
            .await
            .unwrap();
        let b = repo
            .create_folder(Folder::new(alice(), Some(root.id().clone()), "b"))
            .await
            .unwrap();
        let c = repo
            .create_folder(Folder::new(alice(), Some(a.id().clone()), "c"))
            .await
            .unwrap();

        let result = repo
            .get_folder_hierarchy(&CancellationToken::new(), root.id())
            .await
            .unwrap();

        assert_eq!(result.len(), 4);
        let pos = |f: &Folder| result.iter().position(|r| r.id() == f.id()).unwrap();
        assert_eq!(pos(&root), 0);
        assert!(pos(&a) < pos(&c));
        assert!(pos(&b) > 0);
    }

    #[tokio::test]
    async fn test_folder_hierarchy_leaf_and_missing() {
        let repo = make_repo();
        let leaf = repo
            .create_folder(Folder::new(alice(), None, "leaf"))
            .await
            .unwrap();

        let result = repo
            .get_folder_hierarchy(&CancellationToken::new(), leaf.id())
            .await
            .unwrap();
        assert_eq!(result, vec![leaf]);

        let err = repo
            .get_folder_hierarchy(&CancellationToken::new(), &ObjectId::from("missing"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_folder_hierarchy_cancelled() {
        let repo = make_repo();
        let root = repo
            .create_folder(Folder::new(alice(), None, "root"))
            .await
            .unwrap();

        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = repo
            .get_folder_hierarchy(&cancel, root.id())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Cancelled);
    }

    #[tokio::test]
    async fn test_folder_hierarchy_cancelled_while_waiting_for_lock() {
        let repo = Arc::new(MemoryVolderRepository::new());
        let root = repo
            .create_folder(Folder::new(alice(), None, "root"))
            .await
            .unwrap();

        let writer = repo.tables.write().await;

        let cancel = CancellationToken::new();
        let traversal = {
            let repo = Arc::clone(&repo);
            let cancel = cancel.clone();
            let id = root.id().clone();
            tokio::spawn(async move { repo.get_folder_hierarchy(&cancel, &id).await })
        };

        // Let the traversal start and park on the read lock.
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!traversal.is_finished());
        cancel.cancel();

        let err = tokio::time::timeout(Duration::from_secs(1), traversal)
            .await
            .expect("traversal did not observe cancellation")
            .unwrap()
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Cancelled);

        drop(writer);
        let tree = repo
            .get_folder_hierarchy(&CancellationToken::new(), root.id())
            .await
            .unwrap();
        assert_eq!(tree, vec![root]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_parallel_reads_and_write() {
        let repo = make_repo();
        let folder = repo
            .create_folder(Folder::new(alice(), None, "before"))
            .await
            .unwrap();
        let id = folder.id().clone();

        let mut readers = Vec::new();
        for _ in 0..32 {
            let repo = Arc::clone(&repo);
            let id = id.clone();
            readers.push(tokio::spawn(async move { repo.get_folder(&id).await }));
        }

        let writer = {
            let repo = Arc::clone(&repo);
            let mut renamed = folder.clone();
            renamed.name = "after".to_string();
            tokio::spawn(async move { repo.update_folder(renamed).await })
        };

        for result in futures::future::join_all(readers).await {
            let read = result.unwrap().unwrap();
            assert!(read.name == "before" || read.name == "after");
            assert_eq!(read.common.creation_date, folder.common.creation_date);
        }
        writer.await.unwrap().unwrap();

        assert_eq!(repo.get_folder(&id).await.unwrap().name, "after");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_are_not_lost() {
        let repo = make_repo();

        let handles: Vec<_> = (0..50)
            .map(|i| {
                let repo = Arc::clone(&repo);
                tokio::spawn(async move {
                    repo.create_folder(Folder::new(alice(), None, format!("f{i}")))
                        .await
                })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().unwrap().id().clone());
        }

        for (i, id) in ids.iter().enumerate() {
            assert_eq!(repo.get_folder(id).await.unwrap().name, format!("f{i}"));
        }
    }
}
