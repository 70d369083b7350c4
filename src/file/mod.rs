//! File management module for filestash.
//!
//! This module provides the file record service:
//! - Blob storage on the local filesystem, keyed by record id
//! - File record metadata in the database
//! - Upload, list, detail, description update, download and delete

mod metadata;
mod service;
mod storage;

pub use metadata::{FileRecord, FileRepository, NewFileRecord};
pub use service::{DownloadResult, FileDetail, FileService, FileSummary, UploadRequest};
pub use storage::FileStorage;

/// Default maximum upload size (16MB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 16 * 1024 * 1024;

/// MIME types whose bytes are inlined as base64 in the detail view.
pub const INLINE_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png"];

const SIZE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Format a byte count with two decimals and the largest unit below 1024.
///
/// ```
/// use filestash::file::human_readable_size;
///
/// assert_eq!(human_readable_size(2048), "2.00 KB");
/// ```
pub fn human_readable_size(bytes: u64) -> String {
    let mut size = bytes as f64;
    let mut unit = SIZE_UNITS[0];

    // Anything past the table stays in the largest unit
    for next in &SIZE_UNITS[1..] {
        if size < 1024.0 {
            break;
        }
        size /= 1024.0;
        unit = next;
    }

    format!("{size:.2} {unit}")
}

/// Whether a record of this MIME type gets its bytes inlined on detail fetch.
pub fn is_inline_image(file_type: &str) -> bool {
    INLINE_IMAGE_TYPES
        .iter()
        .any(|t| t.eq_ignore_ascii_case(file_type.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_readable_size_bytes() {
        assert_eq!(human_readable_size(0), "0.00 B");
        assert_eq!(human_readable_size(500), "500.00 B");
        assert_eq!(human_readable_size(1023), "1023.00 B");
    }

    #[test]
    fn test_human_readable_size_units() {
        assert_eq!(human_readable_size(1024), "1.00 KB");
        assert_eq!(human_readable_size(2048), "2.00 KB");
        assert_eq!(human_readable_size(5_000_000), "4.77 MB");
        assert_eq!(human_readable_size(3 * 1024 * 1024 * 1024), "3.00 GB");
        assert_eq!(human_readable_size(1024u64.pow(4)), "1.00 TB");
    }

    #[test]
    fn test_human_readable_size_past_table() {
        assert_eq!(human_readable_size(2048 * 1024u64.pow(4)), "2048.00 TB");
    }

    #[test]
    fn test_is_inline_image() {
        assert!(is_inline_image("image/png"));
        assert!(is_inline_image("image/jpeg"));
        assert!(is_inline_image("IMAGE/PNG"));
        assert!(!is_inline_image("image/gif"));
        assert!(!is_inline_image("text/plain"));
        assert!(!is_inline_image(""));
    }
}
