//! Database schema and migrations for filestash.
//!
//! Migrations are applied in order when the database is opened.

/// Database migrations.
///
/// Each migration is a SQL script that will be executed in order.
/// The schema_version table tracks which migrations have been applied.
pub const MIGRATIONS: &[&str] = &[
    // v1: File records
    r#"
-- One row per uploaded blob
CREATE TABLE files (
    id            TEXT PRIMARY KEY,          -- UUIDv4
    file_name     TEXT NOT NULL,             -- client-supplied, not unique
    file_type     TEXT NOT NULL DEFAULT '',
    content_type  TEXT NOT NULL DEFAULT '',
    description   TEXT NOT NULL DEFAULT '',
    stored_name   TEXT NOT NULL UNIQUE,      -- blob key: {id}.{ext}
    path          TEXT NOT NULL,
    uploaded_at   TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_files_file_name ON files(file_name);
"#,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_not_empty() {
        assert!(!MIGRATIONS.is_empty());
    }

    #[test]
    fn test_first_migration_contains_files_table() {
        let first = MIGRATIONS[0];
        assert!(first.contains("CREATE TABLE files"));
        assert!(first.contains("file_name"));
        assert!(first.contains("stored_name"));
        assert!(first.contains("uploaded_at"));
    }
}
