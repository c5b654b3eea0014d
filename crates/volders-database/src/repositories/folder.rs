//! Folder repository implementation.

use chrono::Utc;
use futures::TryStreamExt;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use volders_core::error::{AppError, ErrorKind};
use volders_core::result::AppResult;
use volders_core::types::ObjectId;
use volders_entity::Folder;

/// Recursive traversal from one folder down to all of its descendants.
///
/// `path` carries the IDs already on the branch so corrupt `parent_id`
/// cycles cannot recurse forever.
const HIERARCHY_QUERY: &str = "\
WITH RECURSIVE folder_hierarchy AS ( \
    SELECT id, owner, parent_id, name, creation_date, modified_date, \
           0 AS depth, ARRAY[id] AS path \
    FROM folders \
    WHERE id = $1 \
    UNION ALL \
    SELECT f.id, f.owner, f.parent_id, f.name, f.creation_date, f.modified_date, \
           fh.depth + 1, fh.path || f.id \
    FROM folders f \
    INNER JOIN folder_hierarchy fh ON f.parent_id = fh.id \
    WHERE NOT f.id = ANY(fh.path) \
) \
SELECT id, owner, parent_id, name, creation_date, modified_date \
FROM folder_hierarchy \
ORDER BY depth ASC, creation_date ASC, id ASC";

/// Repository for folder CRUD and tree queries.
#[derive(Debug, Clone)]
pub struct FolderRepository {
    pool: PgPool,
}

impl FolderRepository {
    /// Create a new folder repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a folder by ID.
    pub async fn find_by_id(&self, id: &ObjectId) -> AppResult<Folder> {
        sqlx::query_as::<_, Folder>(
            "SELECT id, owner, parent_id, name, creation_date, modified_date \
             FROM folders WHERE id = $1",
        )
        .bind(id.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => AppError::not_found(format!("Folder {id} not found")),
            _ => AppError::with_source(ErrorKind::Database, "Failed to find folder", e),
        })
    }

    /// Insert a folder. The ID is generated by the database; any ID on
    /// `folder` is ignored.
    pub async fn create(&self, folder: &Folder) -> AppResult<Folder> {
        let now = Utc::now();
        let created = sqlx::query_as::<_, Folder>(
            "INSERT INTO folders (owner, parent_id, name, creation_date, modified_date) \
             VALUES ($1, $2, $3, $4, $4) \
             RETURNING id, owner, parent_id, name, creation_date, modified_date",
        )
        .bind(folder.common.user.as_str())
        .bind(folder.parent_id.as_ref().map(ObjectId::as_str))
        .bind(&folder.name)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create folder", e))?;

        info!(folder_id = %created.common.id, name = %created.name, "Folder created");
        Ok(created)
    }

    /// Replace the mutable columns of a folder.
    ///
    /// `creation_date` is never written and `modified_date` never moves
    /// backwards.
    pub async fn update(&self, folder: &Folder) -> AppResult<Folder> {
        let updated = sqlx::query_as::<_, Folder>(
            "UPDATE folders SET owner = $2, parent_id = $3, name = $4, \
             modified_date = GREATEST($5, modified_date) \
             WHERE id = $1 \
             RETURNING id, owner, parent_id, name, creation_date, modified_date",
        )
        .bind(folder.common.id.as_str())
        .bind(folder.common.user.as_str())
        .bind(folder.parent_id.as_ref().map(ObjectId::as_str))
        .bind(&folder.name)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update folder", e))?
        .ok_or_else(|| AppError::not_found(format!("Folder {} not found", folder.common.id)))?;

        info!(folder_id = %updated.common.id, "Folder updated");
        Ok(updated)
    }

    /// Delete a folder. Child folders and files are left in place.
    pub async fn delete(&self, id: &ObjectId) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM folders WHERE id = $1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete folder", e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Folder {id} not found")));
        }
        info!(folder_id = %id, "Folder deleted");
        Ok(())
    }

    /// Stream a folder and all of its descendants, parents before children.
    ///
    /// The row stream is dropped as soon as `cancel` fires or a row fails to
    /// decode; nothing collected so far is returned in that case.
    #[tracing::instrument(skip(self, cancel))]
    pub async fn find_hierarchy(
        &self,
        cancel: &CancellationToken,
        folder_id: &ObjectId,
    ) -> AppResult<Vec<Folder>> {
        let mut rows = sqlx::query_as::<_, Folder>(HIERARCHY_QUERY)
            .bind(folder_id.as_str())
            .fetch(&self.pool);

        let mut folders = Vec::new();
        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    return Err(AppError::cancelled("Folder hierarchy traversal cancelled"));
                }
                row = rows.try_next() => row.map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to read folder hierarchy", e)
                })?,
            };

            match next {
                Some(folder) => folders.push(folder),
                None => break,
            }
        }

        if folders.is_empty() {
            return Err(AppError::not_found(format!("Folder {folder_id} not found")));
        }

        debug!(count = folders.len(), "Folder hierarchy collected");
        Ok(folders)
    }
}
