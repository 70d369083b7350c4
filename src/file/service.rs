//! File record service.
//!
//! Pairs each metadata record with exactly one blob. Upload writes the blob
//! and then inserts the record, deleting the blob again if the insert fails.
//! Delete removes the blob and then the record; a failure between the two
//! steps is not compensated.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::db::Database;
use crate::{Result, StashError};

use super::metadata::{FileRecord, FileRepository, NewFileRecord};
use super::storage::FileStorage;
use super::{human_readable_size, is_inline_image, DEFAULT_MAX_FILE_SIZE};

/// Request data for file upload.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Original filename.
    pub file_name: String,
    /// File content.
    pub content: Vec<u8>,
    /// MIME type declared by the client in the form.
    pub file_type: Option<String>,
    /// Content type of the uploaded part.
    pub content_type: Option<String>,
    /// Description.
    pub description: Option<String>,
}

impl UploadRequest {
    /// Create a new upload request.
    pub fn new(file_name: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content,
            file_type: None,
            content_type: None,
            description: None,
        }
    }

    /// Set the declared MIME type.
    pub fn with_file_type(mut self, file_type: impl Into<String>) -> Self {
        self.file_type = Some(file_type.into());
        self
    }

    /// Set the part content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A record with its current blob size.
#[derive(Debug, Clone)]
pub struct FileSummary {
    /// File record.
    pub record: FileRecord,
    /// Blob size in bytes (0 if the blob is missing).
    pub size: u64,
}

/// A record with its blob size and inline image payload.
#[derive(Debug, Clone)]
pub struct FileDetail {
    /// File record.
    pub record: FileRecord,
    /// Blob size in bytes (0 if the blob is missing).
    pub size: u64,
    /// Base64 content for inline image types, empty otherwise.
    pub image_data: String,
}

/// An opened blob ready to stream.
#[derive(Debug)]
pub struct DownloadResult {
    /// File record.
    pub record: FileRecord,
    /// Open handle on the blob.
    pub file: tokio::fs::File,
    /// Blob size in bytes.
    pub size: u64,
}

/// Service combining the metadata store and the blob store.
pub struct FileService<'a> {
    db: &'a Database,
    storage: &'a FileStorage,
    max_file_size: u64,
}

impl<'a> FileService<'a> {
    /// Create a new FileService.
    pub fn new(db: &'a Database, storage: &'a FileStorage) -> Self {
        Self {
            db,
            storage,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }

    /// Create a new FileService with a custom max file size.
    pub fn with_max_file_size(mut self, max_size: u64) -> Self {
        self.max_file_size = max_size;
        self
    }

    fn repo(&self) -> FileRepository<'_> {
        FileRepository::new(self.db.pool())
    }

    /// Upload a file.
    ///
    /// # Validation
    /// - Filename must not be empty
    /// - Content must not exceed the configured max size
    ///
    /// # Returns
    /// The created file record.
    pub async fn upload(&self, request: UploadRequest) -> Result<FileRecord> {
        if request.file_name.trim().is_empty() {
            return Err(StashError::Validation("No selected file".to_string()));
        }

        if request.content.len() as u64 > self.max_file_size {
            return Err(StashError::Validation(format!(
                "File too large (max {})",
                human_readable_size(self.max_file_size)
            )));
        }

        let id = Uuid::new_v4().to_string();
        let stored_name = FileStorage::stored_name_for(&id, &request.file_name);
        let path = self
            .storage
            .save_with_name(&request.content, &stored_name)
            .await?;

        let content_type = request
            .content_type
            .filter(|ct| !ct.trim().is_empty() && ct != "application/octet-stream")
            .unwrap_or_else(|| {
                mime_guess::from_path(&request.file_name)
                    .first_or_octet_stream()
                    .to_string()
            });
        let file_type = request
            .file_type
            .filter(|ft| !ft.trim().is_empty())
            .unwrap_or_else(|| content_type.clone());

        let new_file = NewFileRecord::new(
            &id,
            &request.file_name,
            &stored_name,
            path.display().to_string(),
        )
        .with_file_type(file_type)
        .with_content_type(content_type)
        .with_description(request.description.unwrap_or_default());

        match self.repo().create(&new_file).await {
            Ok(record) => {
                info!(
                    file_id = %record.id,
                    file_name = %record.file_name,
                    size = request.content.len(),
                    "File uploaded"
                );
                Ok(record)
            }
            Err(e) => {
                error!(file_id = %id, error = %e, "Failed to insert file record");
                if let Err(cleanup) = self.storage.delete(&stored_name).await {
                    warn!(stored_name = %stored_name, error = %cleanup, "Failed to remove orphan blob");
                }
                Err(e)
            }
        }
    }

    /// List every record with its current blob size, in insertion order.
    ///
    /// A record whose blob is missing is reported with size 0.
    pub async fn list(&self) -> Result<Vec<FileSummary>> {
        let records = self.repo().list().await?;

        let mut summaries = Vec::with_capacity(records.len());
        for record in records {
            let size = self.blob_size_or_zero(&record).await?;
            summaries.push(FileSummary { record, size });
        }

        Ok(summaries)
    }

    /// Get a record by id with its size and inline image payload.
    ///
    /// Fails with `InvalidId` if `id` is not a UUID.
    pub async fn get(&self, id: &str) -> Result<FileDetail> {
        let id = parse_id(id)?;

        let record = self
            .repo()
            .get_by_id(&id)
            .await?
            .ok_or_else(|| StashError::NotFound("File".to_string()))?;

        let image_data = if is_inline_image(&record.file_type) {
            match self.storage.load(&record.stored_name).await {
                Ok(content) => STANDARD.encode(content),
                Err(StashError::NotFound(_)) => {
                    warn!(file_id = %record.id, "Blob missing for image record");
                    String::new()
                }
                Err(e) => return Err(e),
            }
        } else {
            String::new()
        };

        let size = self.blob_size_or_zero(&record).await?;

        Ok(FileDetail {
            record,
            size,
            image_data,
        })
    }

    /// Replace the description of a record.
    ///
    /// Fails with `InvalidId` if `id` is not a UUID.
    pub async fn update_description(&self, id: &str, description: &str) -> Result<()> {
        let id = parse_id(id)?;

        if !self.repo().update_description(&id, description).await? {
            return Err(StashError::NotFound("File".to_string()));
        }

        info!(file_id = %id, "File description updated");
        Ok(())
    }

    /// Open a record's blob for download.
    ///
    /// A malformed id is not rejected; it simply matches nothing.
    pub async fn download(&self, id: &str) -> Result<DownloadResult> {
        let record = self
            .repo()
            .get_by_id(&lookup_id(id))
            .await?
            .ok_or_else(|| StashError::NotFound("File".to_string()))?;

        let file = self.storage.open(&record.stored_name).await?;
        let size = file.metadata().await?.len();

        Ok(DownloadResult { record, file, size })
    }

    /// Delete a record and its blob.
    ///
    /// The blob is removed first. If removing the record then fails, the
    /// record is left pointing at a missing blob.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let repo = self.repo();

        let record = repo
            .get_by_id(&lookup_id(id))
            .await?
            .ok_or_else(|| StashError::NotFound("File".to_string()))?;

        if !self.storage.delete(&record.stored_name).await? {
            warn!(file_id = %record.id, "Blob already missing on delete");
        }

        if !repo.delete(&record.id).await? {
            return Err(StashError::NotFound("File".to_string()));
        }

        info!(file_id = %record.id, file_name = %record.file_name, "File deleted");
        Ok(())
    }

    async fn blob_size_or_zero(&self, record: &FileRecord) -> Result<u64> {
        match self.storage.file_size(&record.stored_name).await {
            Ok(size) => Ok(size),
            Err(StashError::NotFound(_)) => {
                warn!(file_id = %record.id, path = %record.path, "Blob missing, reporting size 0");
                Ok(0)
            }
            Err(e) => Err(e),
        }
    }
}

/// Parse a record id, normalizing it to the stored hyphenated form.
fn parse_id(id: &str) -> Result<String> {
    Uuid::parse_str(id)
        .map(|uuid| uuid.hyphenated().to_string())
        .map_err(|_| StashError::InvalidId(id.to_string()))
}

/// Stored form of `id` when it parses, otherwise `id` unchanged.
fn lookup_id(id: &str) -> String {
    parse_id(id).unwrap_or_else(|_| id.to_string())
}
