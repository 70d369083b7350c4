//! API handlers.

pub mod file;

pub use file::*;

use std::sync::Arc;

use crate::file::{FileService, FileStorage, DEFAULT_MAX_FILE_SIZE};
use crate::Database;

/// Database handle shared across handlers.
pub type SharedDatabase = Arc<Database>;

/// Application state shared by all handlers.
pub struct AppState {
    /// Metadata store.
    pub db: SharedDatabase,
    /// Blob store.
    pub file_storage: FileStorage,
    /// Maximum upload size in bytes.
    pub max_upload_size: u64,
}

impl AppState {
    /// Create a new application state with the default upload limit.
    pub fn new(db: SharedDatabase, file_storage: FileStorage) -> Self {
        Self {
            db,
            file_storage,
            max_upload_size: DEFAULT_MAX_FILE_SIZE,
        }
    }

    /// Set the maximum upload size in bytes.
    pub fn with_max_upload_size(mut self, max_upload_size: u64) -> Self {
        self.max_upload_size = max_upload_size;
        self
    }

    /// File service bound to this state's stores.
    pub fn file_service(&self) -> FileService<'_> {
        FileService::new(&self.db, &self.file_storage).with_max_file_size(self.max_upload_size)
    }
}
