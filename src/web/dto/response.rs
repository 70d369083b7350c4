//! Response DTOs for the HTTP API.

use serde::Serialize;

use crate::datetime::to_rfc3339;
use crate::file::{human_readable_size, FileDetail, FileSummary};

/// Plain acknowledgement.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Human-readable message.
    pub message: String,
}

impl MessageResponse {
    /// Create a new message response.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Upload response (POST /upload).
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Human-readable message.
    pub message: String,
    /// ID of the created record.
    pub file_id: String,
}

/// One entry of the file list (GET /files).
#[derive(Debug, Serialize)]
pub struct FileSummaryResponse {
    pub id: String,
    pub file_name: String,
    pub file_type: String,
    pub uploaded_at: String,
    /// Human-readable blob size, e.g. "2.00 KB".
    pub file_size: String,
}

impl From<FileSummary> for FileSummaryResponse {
    fn from(summary: FileSummary) -> Self {
        let record = summary.record;
        Self {
            id: record.id,
            file_name: record.file_name,
            file_type: record.file_type,
            uploaded_at: to_rfc3339(&record.uploaded_at),
            file_size: human_readable_size(summary.size),
        }
    }
}

/// File detail (GET /files/:id).
#[derive(Debug, Serialize)]
pub struct FileDetailResponse {
    pub id: String,
    pub file_name: String,
    pub file_type: String,
    pub description: String,
    /// Human-readable blob size.
    pub file_size: String,
    pub uploaded_at: String,
    /// Base64 content for JPEG/PNG records, empty otherwise.
    pub image_data: String,
}

impl From<FileDetail> for FileDetailResponse {
    fn from(detail: FileDetail) -> Self {
        let record = detail.record;
        Self {
            id: record.id,
            file_name: record.file_name,
            file_type: record.file_type,
            description: record.description,
            file_size: human_readable_size(detail.size),
            uploaded_at: to_rfc3339(&record.uploaded_at),
            image_data: detail.image_data,
        }
    }
}
