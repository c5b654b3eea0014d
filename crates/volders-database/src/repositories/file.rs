//! File repository implementation.

use chrono::Utc;
use sqlx::PgPool;
use tracing::info;

use volders_core::error::{AppError, ErrorKind};
use volders_core::result::AppResult;
use volders_core::types::ObjectId;
use volders_entity::File;

/// Repository for file CRUD operations.
#[derive(Debug, Clone)]
pub struct FileRepository {
    pool: PgPool,
}

impl FileRepository {
    /// Create a new file repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a file by ID, including its payload.
    pub async fn find_by_id(&self, id: &ObjectId) -> AppResult<File> {
        sqlx::query_as::<_, File>(
            "SELECT id, owner, folder_id, name, content_type, size, creation_date, \
             modified_date, data FROM files WHERE id = $1",
        )
        .bind(id.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => AppError::not_found(format!("File {id} not found")),
            _ => AppError::with_source(ErrorKind::Database, "Failed to find file", e),
        })
    }

    /// Insert a file. The ID is generated by the database.
    pub async fn create(&self, file: &File) -> AppResult<File> {
        let now = Utc::now();
        let created = sqlx::query_as::<_, File>(
            "INSERT INTO files (owner, folder_id, name, content_type, size, \
             creation_date, modified_date, data) \
             VALUES ($1, $2, $3, $4, $5, $6, $6, $7) \
             RETURNING id, owner, folder_id, name, content_type, size, creation_date, \
             modified_date, data",
        )
        .bind(file.common.user.as_str())
        .bind(file.folder_id.as_str())
        .bind(&file.name)
        .bind(&file.content_type)
        .bind(file.size)
        .bind(now)
        .bind(&file.data)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create file", e))?;

        info!(
            file_id = %created.common.id,
            folder_id = %created.folder_id,
            size = created.size,
            "File created"
        );
        Ok(created)
    }

    /// Replace the mutable columns of a file, payload included.
    pub async fn update(&self, file: &File) -> AppResult<File> {
        let updated = sqlx::query_as::<_, File>(
            "UPDATE files SET owner = $2, folder_id = $3, name = $4, content_type = $5, \
             size = $6, data = $7, modified_date = GREATEST($8, modified_date) \
             WHERE id = $1 \
             RETURNING id, owner, folder_id, name, content_type, size, creation_date, \
             modified_date, data",
        )
        .bind(file.common.id.as_str())
        .bind(file.common.user.as_str())
        .bind(file.folder_id.as_str())
        .bind(&file.name)
        .bind(&file.content_type)
        .bind(file.size)
        .bind(&file.data)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update file", e))?
        .ok_or_else(|| AppError::not_found(format!("File {} not found", file.common.id)))?;

        info!(file_id = %updated.common.id, "File updated");
        Ok(updated)
    }

    /// Delete a file.
    pub async fn delete(&self, id: &ObjectId) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM files WHERE id = $1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete file", e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("File {id} not found")));
        }
        info!(file_id = %id, "File deleted");
        Ok(())
    }
}
