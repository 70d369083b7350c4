//! filestash - a small file storage service.
//!
//! Uploaded files are kept as blobs on the local filesystem, with their
//! metadata in a SQLite table, and served through a JSON HTTP API.

pub mod config;
pub mod datetime;
pub mod db;
pub mod error;
pub mod file;
pub mod logging;
pub mod web;

pub use config::Config;
pub use db::Database;
pub use error::{Result, StashError};
pub use file::{FileService, FileStorage};
pub use web::WebServer;
