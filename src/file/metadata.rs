//! File record types and repository for the metadata store.

use crate::db::DbPool;
use crate::Result;

/// Metadata record for one uploaded file.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FileRecord {
    /// Record ID (UUIDv4 string).
    pub id: String,
    /// Original client-supplied filename.
    pub file_name: String,
    /// Declared or sniffed MIME type.
    pub file_type: String,
    /// Content type of the uploaded part.
    pub content_type: String,
    /// Free-text description.
    pub description: String,
    /// Blob key inside the file storage.
    pub stored_name: String,
    /// Server-side blob location.
    pub path: String,
    /// Upload timestamp (YYYY-MM-DD HH:MM:SS, UTC).
    pub uploaded_at: String,
}

/// Data for inserting a new file record.
#[derive(Debug, Clone)]
pub struct NewFileRecord {
    /// Record ID.
    pub id: String,
    /// Original filename.
    pub file_name: String,
    /// Declared or sniffed MIME type.
    pub file_type: String,
    /// Content type of the uploaded part.
    pub content_type: String,
    /// Description.
    pub description: String,
    /// Blob key inside the file storage.
    pub stored_name: String,
    /// Server-side blob location.
    pub path: String,
    /// Upload timestamp.
    pub uploaded_at: String,
}

impl NewFileRecord {
    /// Create a new record with an empty description and the current time.
    pub fn new(
        id: impl Into<String>,
        file_name: impl Into<String>,
        stored_name: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            file_name: file_name.into(),
            file_type: String::new(),
            content_type: String::new(),
            description: String::new(),
            stored_name: stored_name.into(),
            path: path.into(),
            uploaded_at: crate::datetime::now_storage_string(),
        }
    }

    /// Set the MIME type.
    pub fn with_file_type(mut self, file_type: impl Into<String>) -> Self {
        self.file_type = file_type.into();
        self
    }

    /// Set the content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

const SELECT_COLUMNS: &str =
    "SELECT id, file_name, file_type, content_type, description, stored_name, path, uploaded_at
     FROM files";

/// Repository for file record operations.
pub struct FileRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> FileRepository<'a> {
    /// Create a new FileRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Insert a new file record.
    pub async fn create(&self, file: &NewFileRecord) -> Result<FileRecord> {
        sqlx::query(
            "INSERT INTO files (id, file_name, file_type, content_type, description, stored_name, path, uploaded_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&file.id)
        .bind(&file.file_name)
        .bind(&file.file_type)
        .bind(&file.content_type)
        .bind(&file.description)
        .bind(&file.stored_name)
        .bind(&file.path)
        .bind(&file.uploaded_at)
        .execute(self.pool)
        .await?;

        self.get_by_id(&file.id)
            .await?
            .ok_or_else(|| crate::StashError::NotFound("file".to_string()))
    }

    /// Get a file record by ID.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<FileRecord>> {
        let file = sqlx::query_as::<_, FileRecord>(&format!("{SELECT_COLUMNS} WHERE id = ?"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(file)
    }

    /// List all file records in insertion order.
    pub async fn list(&self) -> Result<Vec<FileRecord>> {
        let files = sqlx::query_as::<_, FileRecord>(&format!("{SELECT_COLUMNS} ORDER BY rowid"))
            .fetch_all(self.pool)
            .await?;

        Ok(files)
    }

    /// Replace the description of a file record.
    ///
    /// Returns `false` if no record matched.
    pub async fn update_description(&self, id: &str, description: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE files SET description = ? WHERE id = ?")
            .bind(description)
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a file record by ID.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM files WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Count all file records.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM files")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}
