//! Blob storage for filestash.
//!
//! This module provides physical file storage:
//! - Blobs keyed by record ID (`{id}.{ext}`), never by the client filename
//! - Directory sharding by the first 2 characters of the key
//! - Save, load, stream, stat, and delete operations

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;

use crate::{Result, StashError};

/// File storage service for managing blobs on disk.
///
/// Blobs are stored in a sharded directory structure:
/// ```text
/// {base_path}/
/// ├── ab/
/// │   └── ab12cd34-5678-40ab-8def-123456789012.png
/// ├── cd/
/// │   └── cd90ab12-3456-4890-abcd-ef1234567890.bin
/// └── ...
/// ```
#[derive(Debug, Clone)]
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    /// Create a new FileStorage with the given base path.
    ///
    /// The base directory will be created if it doesn't exist.
    pub fn new(base_path: impl Into<PathBuf>) -> Result<Self> {
        let base_path = base_path.into();
        std::fs::create_dir_all(&base_path)?;

        Ok(Self { base_path })
    }

    /// Get the base path of this storage.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Build the stored name for a record: `{id}.{ext}`.
    ///
    /// The extension comes from the original filename and defaults to "bin".
    pub fn stored_name_for(id: &str, original_name: &str) -> String {
        let ext = Self::extract_extension(original_name);
        format!("{id}.{ext}")
    }

    /// Write content under the given stored name, replacing any existing blob.
    pub async fn save_with_name(&self, content: &[u8], stored_name: &str) -> Result<PathBuf> {
        let file_path = self.get_file_path(stored_name);

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        fs::write(&file_path, content).await?;

        Ok(file_path)
    }

    /// Load the full content of a blob.
    pub async fn load(&self, stored_name: &str) -> Result<Vec<u8>> {
        let file_path = self.get_file_path(stored_name);

        fs::read(&file_path)
            .await
            .map_err(|e| Self::map_not_found(e, stored_name))
    }

    /// Open a blob for streaming reads.
    pub async fn open(&self, stored_name: &str) -> Result<fs::File> {
        let file_path = self.get_file_path(stored_name);

        fs::File::open(&file_path)
            .await
            .map_err(|e| Self::map_not_found(e, stored_name))
    }

    /// Delete a blob.
    ///
    /// Returns `true` if the file was deleted, `false` if it didn't exist.
    pub async fn delete(&self, stored_name: &str) -> Result<bool> {
        let file_path = self.get_file_path(stored_name);

        match fs::remove_file(&file_path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Check if a blob exists.
    pub async fn exists(&self, stored_name: &str) -> bool {
        fs::try_exists(self.get_file_path(stored_name))
            .await
            .unwrap_or(false)
    }

    /// Get the size of a blob in bytes.
    pub async fn file_size(&self, stored_name: &str) -> Result<u64> {
        let file_path = self.get_file_path(stored_name);

        let metadata = fs::metadata(&file_path)
            .await
            .map_err(|e| Self::map_not_found(e, stored_name))?;
        Ok(metadata.len())
    }

    /// Get the full file path for a stored name.
    ///
    /// The path is constructed as: {base_path}/{shard}/{stored_name}
    pub fn get_file_path(&self, stored_name: &str) -> PathBuf {
        let shard = Self::get_shard(stored_name);
        self.base_path.join(shard).join(stored_name)
    }

    fn map_not_found(e: io::Error, stored_name: &str) -> StashError {
        if e.kind() == io::ErrorKind::NotFound {
            StashError::NotFound(format!("blob {stored_name}"))
        } else {
            e.into()
        }
    }

    /// First 2 characters of the stored name (the id prefix).
    fn get_shard(stored_name: &str) -> &str {
        match stored_name.char_indices().nth(2) {
            Some((idx, _)) => &stored_name[..idx],
            None => stored_name,
        }
    }

    /// Extract the file extension from a filename, or "bin" if there is none.
    fn extract_extension(filename: &str) -> &str {
        Path::new(filename)
            .extension()
            .and_then(|s| s.to_str())
            .filter(|ext| ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .unwrap_or("bin")
    }
}
